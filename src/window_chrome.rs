/*
 * Custom window chrome state machine for a borderless top-level window.
 *
 * The platform's native decorations are replaced, so this module owns what the
 * non-client area normally does: hit-testing the edges to pick a resize zone and
 * cursor, starting native resize and move drags, dragging a maximized window by
 * its title bar to restore it, translating resize-initiation messages through the
 * hit-test table, and snapping the window to the work area when a resize or move
 * ends. It never calls the platform directly; every request is queued on an
 * `EffectQueue` in the order it must be executed.
 *
 * Coordinates: "client" points are relative to the window's top-left corner
 * (the window has no native frame, so client and window origins coincide);
 * "screen" points are absolute.
 */
use crate::types::message_codes::{
    HT_BOTTOM, HT_BOTTOMLEFT, HT_BOTTOMRIGHT, HT_LEFT, HT_RIGHT, HT_TOP, HT_TOPLEFT, HT_TOPRIGHT,
    SC_SIZE, WM_LBUTTONDOWN, WM_LBUTTONUP, WM_MOUSEMOVE, WM_NCLBUTTONDOWN, WM_RBUTTONDOWN,
    WMSZ_BOTTOM, WMSZ_BOTTOMLEFT, WMSZ_BOTTOMRIGHT, WMSZ_LEFT, WMSZ_RIGHT, WMSZ_TOP,
    WMSZ_TOPLEFT, WMSZ_TOPRIGHT,
};
use crate::types::{
    AppEvent, CursorKind, EffectQueue, MessageDisposition, MouseButton, PlatformCommand,
    PlatformMessage, Point, Rect, Size, WindowId,
};

/// Native hit-test code to resize-edge code, forwarded as `SC_SIZE | edge`.
pub const RESIZE_COMMAND_TABLE: [(u32, u32); 8] = [
    (HT_TOP, WMSZ_TOP),
    (HT_TOPLEFT, WMSZ_TOPLEFT),
    (HT_TOPRIGHT, WMSZ_TOPRIGHT),
    (HT_LEFT, WMSZ_LEFT),
    (HT_RIGHT, WMSZ_RIGHT),
    (HT_BOTTOM, WMSZ_BOTTOM),
    (HT_BOTTOMLEFT, WMSZ_BOTTOMLEFT),
    (HT_BOTTOMRIGHT, WMSZ_BOTTOMRIGHT),
];

pub fn resize_edge_for_hit_test(hit_test: u32) -> Option<u32> {
    RESIZE_COMMAND_TABLE
        .iter()
        .find_map(|&(ht, edge)| (ht == hit_test).then_some(edge))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeDirection {
    BottomLeft,
    Left,
    Right,
    BottomRight,
    Bottom,
    #[default]
    None,
}

impl ResizeDirection {
    pub fn cursor(self) -> CursorKind {
        match self {
            ResizeDirection::BottomLeft => CursorKind::SizeNesw,
            ResizeDirection::Left | ResizeDirection::Right => CursorKind::SizeWe,
            ResizeDirection::BottomRight => CursorKind::SizeNwse,
            ResizeDirection::Bottom => CursorKind::SizeNs,
            ResizeDirection::None => CursorKind::Default,
        }
    }

    pub fn hit_test_code(self) -> Option<u32> {
        match self {
            ResizeDirection::BottomLeft => Some(HT_BOTTOMLEFT),
            ResizeDirection::Left => Some(HT_LEFT),
            ResizeDirection::Right => Some(HT_RIGHT),
            ResizeDirection::BottomRight => Some(HT_BOTTOMRIGHT),
            ResizeDirection::Bottom => Some(HT_BOTTOM),
            ResizeDirection::None => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromeConfig {
    pub sizable: bool,
    pub magnetic: bool,
    pub magnetic_radius: i32,
    pub border_thickness: i32,
    pub window_bar_height: i32,
    /// Design surfaces get none of the chrome behavior.
    pub design_mode: bool,
}

impl Default for ChromeConfig {
    fn default() -> Self {
        Self {
            sizable: true,
            magnetic: false,
            magnetic_radius: 100,
            border_thickness: 3,
            window_bar_height: 30,
            design_mode: false,
        }
    }
}

/// Cursor position at the time a message is handled, in both coordinate spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorSnapshot {
    pub screen: Point,
    pub client: Point,
}

/*
 * Snap test for one edge: the gap must be positive (already-flush windows do
 * not re-snap) and no wider than the radius.
 */
pub fn should_snap(position: i32, edge: i32, radius: i32) -> bool {
    let gap = position - edge;
    gap > 0 && gap <= radius
}

/*
 * Moves `bounds` flush against each work-area edge it is close to. Edges are
 * checked left, top, right, bottom against the bounds as already adjusted, so a
 * window near a corner snaps on both axes.
 */
pub fn snap_bounds(bounds: Rect, work_area: Rect, radius: i32) -> Rect {
    let mut snapped = bounds;
    if should_snap(snapped.left(), work_area.left(), radius) {
        snapped.x = work_area.left();
    }
    if should_snap(snapped.top(), work_area.top(), radius) {
        snapped.y = work_area.top();
    }
    if should_snap(work_area.right(), snapped.right(), radius) {
        snapped.x = work_area.right() - snapped.width;
    }
    if should_snap(work_area.bottom(), snapped.bottom(), radius) {
        snapped.y = work_area.bottom() - snapped.height;
    }
    snapped
}

/*
 * Where a maximized window of `width` goes when the title-bar drag restores it
 * to `previous_width`, so the cursor stays over the same part of the bar. Near
 * either end the cursor keeps its distance to that end; otherwise the restored
 * window is centered under the cursor.
 */
pub fn drag_restore_location(cursor: CursorSnapshot, width: i32, previous_width: i32) -> Point {
    let CursorSnapshot { screen, client } = cursor;
    let half_previous = previous_width / 2;
    let y = screen.y - client.y;
    let x = if client.x < width / 2 {
        if client.x < half_previous {
            screen.x - client.x
        } else {
            screen.x - half_previous
        }
    } else if width - client.x < half_previous {
        screen.x - previous_width + width - client.x
    } else {
        screen.x - half_previous
    };
    Point::new(x, y)
}

#[derive(Debug, Clone)]
pub struct WindowChrome {
    owner: WindowId,
    config: ChromeConfig,
    resize_direction: ResizeDirection,
    maximized: bool,
    header_mouse_down: bool,
    window_size: Size,
    /// Bounds before maximizing; restored when leaving the maximized state.
    previous_bounds: Rect,
    status_bar_bounds: Rect,
}

impl WindowChrome {
    pub fn new(owner: WindowId, config: ChromeConfig, window_size: Size) -> Self {
        Self {
            owner,
            config,
            resize_direction: ResizeDirection::None,
            maximized: false,
            header_mouse_down: false,
            window_size,
            previous_bounds: Rect::from_location_size(Point::default(), window_size),
            status_bar_bounds: Rect::new(0, 0, window_size.width, config.window_bar_height),
        }
    }

    pub fn config(&self) -> &ChromeConfig {
        &self.config
    }

    pub fn resize_direction(&self) -> ResizeDirection {
        self.resize_direction
    }

    /// Cursor the chrome owns while the pointer sits in a resize zone.
    pub fn resize_cursor(&self) -> Option<CursorKind> {
        (self.resize_direction != ResizeDirection::None).then(|| self.resize_direction.cursor())
    }

    pub fn is_maximized(&self) -> bool {
        self.maximized
    }

    pub fn is_header_mouse_down(&self) -> bool {
        self.header_mouse_down
    }

    pub fn previous_size(&self) -> Size {
        self.previous_bounds.size()
    }

    pub fn status_bar_bounds(&self) -> Rect {
        self.status_bar_bounds
    }

    pub fn window_size(&self) -> Size {
        self.window_size
    }

    pub fn set_sizable(&mut self, sizable: bool) {
        self.config.sizable = sizable;
        if !sizable {
            self.resize_direction = ResizeDirection::None;
        }
    }

    pub fn set_magnetic(&mut self, magnetic: bool) {
        self.config.magnetic = magnetic;
    }

    pub fn set_magnetic_radius(&mut self, radius: i32) {
        self.config.magnetic_radius = radius;
    }

    pub fn set_border_thickness(&mut self, thickness: i32) {
        self.config.border_thickness = thickness;
    }

    pub fn set_window_bar_height(&mut self, height: i32) {
        self.config.window_bar_height = height;
        self.status_bar_bounds = Rect::new(0, 0, self.window_size.width, height);
    }

    pub fn set_design_mode(&mut self, design_mode: bool) {
        self.config.design_mode = design_mode;
    }

    /// Tracks the new size and recomputes the title-bar hit rectangle.
    pub fn on_resize(&mut self, size: Size) {
        self.window_size = size;
        self.status_bar_bounds = Rect::new(0, 0, size.width, self.config.window_bar_height);
    }

    /*
     * Classifies a client point into a resize zone. Corners are tested before
     * the edges they touch. Nothing is classified while maximized or while the
     * pointer is over a child control.
     */
    pub fn hit_test(&self, pos: Point, child_under_pointer: bool) -> ResizeDirection {
        if child_under_pointer || self.maximized {
            return ResizeDirection::None;
        }
        let t = self.config.border_thickness;
        let Size { width, height } = self.window_size;
        let near_left = pos.x < t;
        let near_right = pos.x > width - t;
        let near_bottom = pos.y > height - t;

        if near_left && near_bottom {
            ResizeDirection::BottomLeft
        } else if near_left {
            ResizeDirection::Left
        } else if near_right && near_bottom {
            ResizeDirection::BottomRight
        } else if near_right {
            ResizeDirection::Right
        } else if near_bottom {
            ResizeDirection::Bottom
        } else {
            ResizeDirection::None
        }
    }

    /*
     * Pointer moved over the window (or anywhere, via the process input filter).
     * Updates the resize zone and cursor. When no zone matches, the cursor is only
     * reset if it is one of ours, so child controls keep the cursors they set.
     */
    pub fn on_pointer_move(
        &mut self,
        pos: Point,
        child_under_pointer: bool,
        current_cursor: CursorKind,
        effects: &mut EffectQueue,
    ) -> ResizeDirection {
        if self.config.design_mode || !self.config.sizable {
            return self.resize_direction;
        }

        let direction = self.hit_test(pos, child_under_pointer);
        log::trace!("WindowChrome: hit-test {pos:?} -> {direction:?}");
        self.resize_direction = direction;

        if direction != ResizeDirection::None {
            if current_cursor != direction.cursor() {
                effects.command(PlatformCommand::SetCursor(direction.cursor()));
            }
        } else if current_cursor.is_resize_cursor() {
            effects.command(PlatformCommand::SetCursor(CursorKind::Default));
        }
        direction
    }

    /// Starts a native resize drag when a zone is armed. Completion is up to the platform.
    pub fn on_pointer_down(&mut self, button: MouseButton, effects: &mut EffectQueue) -> bool {
        if self.config.design_mode || button != MouseButton::Left || self.maximized {
            return false;
        }
        let Some(hit_test) = self.resize_direction.hit_test_code() else {
            return false;
        };
        log::debug!(
            "WindowChrome: begin resize {:?} for {:?}",
            self.resize_direction,
            self.owner
        );
        effects.command(PlatformCommand::ReleaseCapture);
        effects.command(PlatformCommand::BeginResize { hit_test });
        true
    }

    pub fn on_pointer_up(&mut self, effects: &mut EffectQueue) {
        if self.config.design_mode {
            return;
        }
        effects.command(PlatformCommand::ReleaseCapture);
    }

    /*
     * Message-level handling for the title bar and native resize initiation.
     * Runs after default processing of the same message has produced the managed
     * pointer events.
     */
    pub fn handle_message(
        &mut self,
        message: &PlatformMessage,
        cursor: CursorSnapshot,
        effects: &mut EffectQueue,
    ) -> MessageDisposition {
        if self.config.design_mode {
            return MessageDisposition::Default;
        }

        match message.code {
            WM_MOUSEMOVE => {
                if self.maximized
                    && self.header_mouse_down
                    && self.status_bar_bounds.contains(cursor.client)
                {
                    self.restore_by_drag(cursor, effects);
                }
                MessageDisposition::Default
            }
            WM_LBUTTONDOWN => {
                if self.status_bar_bounds.contains(cursor.client) {
                    if self.maximized {
                        log::debug!("WindowChrome: title bar pressed while maximized; arming restore drag");
                        self.header_mouse_down = true;
                    } else {
                        effects.command(PlatformCommand::ReleaseCapture);
                        effects.command(PlatformCommand::BeginMove);
                    }
                }
                MessageDisposition::Default
            }
            WM_RBUTTONDOWN => {
                if self.status_bar_bounds.contains(cursor.client) {
                    effects.command(PlatformCommand::ShowSystemMenu { at: cursor.screen });
                }
                MessageDisposition::Default
            }
            WM_NCLBUTTONDOWN => self.translate_resize_request(message, effects),
            WM_LBUTTONUP => {
                self.header_mouse_down = false;
                MessageDisposition::Default
            }
            _ => MessageDisposition::Default,
        }
    }

    fn translate_resize_request(
        &mut self,
        message: &PlatformMessage,
        effects: &mut EffectQueue,
    ) -> MessageDisposition {
        if !self.config.sizable {
            log::trace!("WindowChrome: resize request swallowed; window is not sizable");
            return MessageDisposition::Handled;
        }
        match resize_edge_for_hit_test(message.wparam as u32) {
            Some(edge) => {
                effects.command(PlatformCommand::SystemCommand {
                    command: SC_SIZE | edge,
                    lparam: message.lparam,
                });
                MessageDisposition::Handled
            }
            None => MessageDisposition::Default,
        }
    }

    fn restore_by_drag(&mut self, cursor: CursorSnapshot, effects: &mut EffectQueue) {
        let previous_size = self.previous_bounds.size();
        let location = drag_restore_location(cursor, self.window_size.width, previous_size.width);
        log::debug!(
            "WindowChrome: restoring {:?} by title-bar drag to {location:?} size {previous_size:?}",
            self.owner
        );
        self.maximized = false;
        self.header_mouse_down = false;
        self.on_resize(previous_size);

        effects.command(PlatformCommand::SetLocation(location));
        effects.command(PlatformCommand::SetSize(previous_size));
        effects.command(PlatformCommand::ReleaseCapture);
        effects.command(PlatformCommand::BeginMove);
        effects.emit(AppEvent::WindowRestored {
            window_id: self.owner,
        });
    }

    /// Fills the work area, remembering `current_bounds` for the way back.
    pub fn maximize(&mut self, current_bounds: Rect, work_area: Rect, effects: &mut EffectQueue) -> bool {
        if self.maximized {
            return false;
        }
        log::debug!("WindowChrome: maximizing {:?} into {work_area:?}", self.owner);
        self.previous_bounds = current_bounds;
        self.maximized = true;
        self.header_mouse_down = false;
        self.resize_direction = ResizeDirection::None;
        self.on_resize(work_area.size());

        effects.command(PlatformCommand::SetLocation(work_area.location()));
        effects.command(PlatformCommand::SetSize(work_area.size()));
        effects.emit(AppEvent::WindowMaximized {
            window_id: self.owner,
        });
        true
    }

    pub fn restore(&mut self, effects: &mut EffectQueue) -> bool {
        if !self.maximized {
            return false;
        }
        log::debug!(
            "WindowChrome: restoring {:?} to {:?}",
            self.owner,
            self.previous_bounds
        );
        self.maximized = false;
        self.header_mouse_down = false;
        self.on_resize(self.previous_bounds.size());

        effects.command(PlatformCommand::SetLocation(self.previous_bounds.location()));
        effects.command(PlatformCommand::SetSize(self.previous_bounds.size()));
        effects.emit(AppEvent::WindowRestored {
            window_id: self.owner,
        });
        true
    }

    pub fn toggle_maximize(&mut self, current_bounds: Rect, work_area: Rect, effects: &mut EffectQueue) -> bool {
        if self.maximized {
            self.restore(effects)
        } else {
            self.maximize(current_bounds, work_area, effects)
        }
    }

    /// Snaps to the work area when a resize or move ends. Returns the new location if moved.
    pub fn on_resize_end(&mut self, bounds: Rect, work_area: Rect, effects: &mut EffectQueue) -> Option<Point> {
        if self.config.design_mode || !self.config.magnetic || self.maximized {
            return None;
        }
        let snapped = snap_bounds(bounds, work_area, self.config.magnetic_radius);
        if snapped.location() == bounds.location() {
            return None;
        }
        log::debug!(
            "WindowChrome: snapping {:?} from {:?} to {:?}",
            self.owner,
            bounds.location(),
            snapped.location()
        );
        effects.command(PlatformCommand::SetLocation(snapped.location()));
        effects.emit(AppEvent::WindowSnapped {
            window_id: self.owner,
            location: snapped.location(),
        });
        Some(snapped.location())
    }
}
