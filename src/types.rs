/*
 * Platform-agnostic types shared between the chrome state machine, the theme
 * protocol and the Win32 glue. Geometry is expressed in plain integer pixels,
 * native messages are carried as `{code, wparam, lparam}` triples, and every
 * side effect the core wants performed is queued as an `Effect` so callers can
 * execute (or inspect) them in strict program order.
 */
use crate::mouse_state::MouseState;
use crate::styling_primitives::Color;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u32);

impl WindowId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId(u32);

impl ControlId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Anything that can be repainted or receive a theme: a top-level window or a child control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    Window(WindowId),
    Control(ControlId),
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementId::Window(id) => write!(f, "window #{}", id.raw()),
            ElementId::Control(id) => write!(f, "control #{}", id.raw()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/*
 * Axis-aligned rectangle stored as origin plus extent, matching how windows are
 * positioned (`Location` + `Size`). `contains` is half-open: the right and bottom
 * edges are outside.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn from_location_size(location: Point, size: Size) -> Self {
        Self::new(location.x, location.y, size.width, size.height)
    }

    pub const fn left(&self) -> i32 {
        self.x
    }

    pub const fn top(&self) -> i32 {
        self.y
    }

    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub const fn location(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Grows (positive) or shrinks (negative) the extent while keeping the origin.
    pub fn resized_by(&self, delta: i32) -> Rect {
        Rect::new(self.x, self.y, self.width + delta, self.height + delta)
    }
}

/// Cursor glyphs the chrome asks the platform to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorKind {
    #[default]
    Default,
    SizeNesw,
    SizeWe,
    SizeNwse,
    SizeNs,
    /// Any cursor a child control chose for itself.
    Other,
}

impl CursorKind {
    /// True for the glyphs the chrome itself sets while hovering a resize zone.
    pub fn is_resize_cursor(self) -> bool {
        matches!(
            self,
            CursorKind::SizeNesw | CursorKind::SizeWe | CursorKind::SizeNwse | CursorKind::SizeNs
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

/// Native message codes recognized by the core. Values match the Win32 definitions.
pub mod message_codes {
    pub const WM_SIZE: u32 = 0x0005;
    pub const WM_SETFOCUS: u32 = 0x0007;
    pub const WM_KILLFOCUS: u32 = 0x0008;
    pub const WM_SETCURSOR: u32 = 0x0020;
    pub const WM_NCLBUTTONDOWN: u32 = 0x00A1;
    pub const WM_SYSCOMMAND: u32 = 0x0112;
    pub const WM_MOUSEMOVE: u32 = 0x0200;
    pub const WM_LBUTTONDOWN: u32 = 0x0201;
    pub const WM_LBUTTONUP: u32 = 0x0202;
    pub const WM_RBUTTONDOWN: u32 = 0x0204;
    pub const WM_EXITSIZEMOVE: u32 = 0x0232;
    pub const WM_MOUSELEAVE: u32 = 0x02A3;

    pub const HT_CLIENT: u32 = 1;
    pub const HT_CAPTION: u32 = 2;
    pub const HT_LEFT: u32 = 10;
    pub const HT_RIGHT: u32 = 11;
    pub const HT_TOP: u32 = 12;
    pub const HT_TOPLEFT: u32 = 13;
    pub const HT_TOPRIGHT: u32 = 14;
    pub const HT_BOTTOM: u32 = 15;
    pub const HT_BOTTOMLEFT: u32 = 16;
    pub const HT_BOTTOMRIGHT: u32 = 17;

    pub const WMSZ_LEFT: u32 = 1;
    pub const WMSZ_RIGHT: u32 = 2;
    pub const WMSZ_TOP: u32 = 3;
    pub const WMSZ_TOPLEFT: u32 = 4;
    pub const WMSZ_TOPRIGHT: u32 = 5;
    pub const WMSZ_BOTTOM: u32 = 6;
    pub const WMSZ_BOTTOMLEFT: u32 = 7;
    pub const WMSZ_BOTTOMRIGHT: u32 = 8;

    pub const SC_SIZE: u32 = 0xF000;
    pub const SC_MINIMIZE: u32 = 0xF020;
    pub const SC_MAXIMIZE: u32 = 0xF030;
    pub const SC_RESTORE: u32 = 0xF120;
}

/// One native window message as delivered by the message pump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformMessage {
    pub code: u32,
    pub wparam: usize,
    pub lparam: isize,
}

impl PlatformMessage {
    pub const fn new(code: u32, wparam: usize, lparam: isize) -> Self {
        Self {
            code,
            wparam,
            lparam,
        }
    }

    /// Packs a client point the way mouse messages carry it (signed 16-bit halves).
    pub fn with_point(code: u32, wparam: usize, point: Point) -> Self {
        let packed = ((point.y as u16 as u32) << 16) | (point.x as u16 as u32);
        Self::new(code, wparam, packed as isize)
    }

    pub fn point(&self) -> Point {
        Point::new(
            (self.lparam & 0xFFFF) as u16 as i16 as i32,
            ((self.lparam >> 16) & 0xFFFF) as u16 as i16 as i32,
        )
    }

    /// Unsigned halves of `lparam`, as used by `WM_SIZE`.
    pub fn size(&self) -> Size {
        Size::new(
            (self.lparam & 0xFFFF) as i32,
            ((self.lparam >> 16) & 0xFFFF) as i32,
        )
    }
}

/// What the window procedure should do after the core has seen a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageDisposition {
    /// Forward to the platform's default handling.
    Default,
    /// The core consumed the message.
    Handled,
}

/*
 * Requests the core issues back to the platform for the window that produced
 * them. All of them are fire-and-forget: move and resize run inside the
 * platform's own modal loop until the button is released.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCommand {
    Invalidate(ElementId),
    ReleaseCapture,
    /// Native "move" drag, as if the caption had been pressed.
    BeginMove,
    /// Native resize drag from the edge named by a hit-test code.
    BeginResize { hit_test: u32 },
    SystemCommand { command: u32, lparam: isize },
    /// Pops the system menu at a screen position and forwards the chosen command.
    ShowSystemMenu { at: Point },
    SetLocation(Point),
    SetSize(Size),
    SetCursor(CursorKind),
    /// Ask for a pointer-leave notification once the pointer exits the window.
    TrackPointerLeave,
    ShowError { message: String },
}

/// Notifications raised for application logic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ThemeChanged { source: ElementId, theme: String },
    MouseStateChanged { source: ElementId, state: MouseState },
    BackgroundChanged { source: ElementId, color: Color },
    TextStyleChanged { source: ElementId },
    WindowMaximized { window_id: WindowId },
    WindowRestored { window_id: WindowId },
    WindowSnapped { window_id: WindowId, location: Point },
}

pub trait PlatformEventHandler {
    fn handle_event(&mut self, event: AppEvent);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Command(PlatformCommand),
    Event(AppEvent),
}

/// Ordered outbox of commands and events produced while handling one input.
#[derive(Debug, Default)]
pub struct EffectQueue {
    effects: Vec<Effect>,
}

impl EffectQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn command(&mut self, command: PlatformCommand) {
        self.effects.push(Effect::Command(command));
    }

    pub fn emit(&mut self, event: AppEvent) {
        self.effects.push(Effect::Event(event));
    }

    pub fn request_repaint(&mut self, target: ElementId) {
        self.command(PlatformCommand::Invalidate(target));
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn as_slice(&self) -> &[Effect] {
        &self.effects
    }

    pub fn commands(&self) -> impl Iterator<Item = &PlatformCommand> {
        self.effects.iter().filter_map(|effect| match effect {
            Effect::Command(cmd) => Some(cmd),
            Effect::Event(_) => None,
        })
    }

    pub fn events(&self) -> impl Iterator<Item = &AppEvent> {
        self.effects.iter().filter_map(|effect| match effect {
            Effect::Event(event) => Some(event),
            Effect::Command(_) => None,
        })
    }

    pub fn drain(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }
}
