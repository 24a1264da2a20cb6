/*
 * Routes one native window message through a `VisualForm` and executes what it
 * queued.
 *
 * The form is borrowed only while it handles the message. Effects run after the
 * borrow is released, because several of them (`BeginMove`, `BeginResize`,
 * system commands) are synchronous sends that re-enter the window procedure
 * with new messages for the same form. A message that arrives while the form is
 * still borrowed is left to default handling.
 */
use crate::command_executor::{PlatformApi, execute_effects};
use crate::controls::visual_form::VisualForm;
use crate::types::message_codes::{
    HT_CLIENT, WM_EXITSIZEMOVE, WM_KILLFOCUS, WM_LBUTTONDOWN, WM_LBUTTONUP, WM_MOUSELEAVE,
    WM_MOUSEMOVE, WM_NCLBUTTONDOWN, WM_RBUTTONDOWN, WM_SETCURSOR, WM_SETFOCUS, WM_SIZE,
    WM_SYSCOMMAND,
};
use crate::types::{
    EffectQueue, MessageDisposition, MouseButton, PlatformCommand, PlatformEventHandler,
    PlatformMessage, Point,
};
use crate::window_chrome::CursorSnapshot;

use std::cell::RefCell;

/// The low four bits of a system command carry platform-private flags.
const SYSCOMMAND_MASK: u32 = 0xFFF0;

pub fn route_message(
    form: &RefCell<VisualForm>,
    platform: &mut dyn PlatformApi,
    handler: &mut dyn PlatformEventHandler,
    message: &PlatformMessage,
) -> MessageDisposition {
    let mut effects = EffectQueue::new();
    let disposition = {
        let Ok(mut form) = form.try_borrow_mut() else {
            log::debug!(
                "MessageRouter: form busy, message 0x{:04X} goes to default handling",
                message.code
            );
            return MessageDisposition::Default;
        };
        dispatch(&mut form, &*platform, message, &mut effects)
    };
    execute_effects(&mut effects, platform, handler);
    disposition
}

fn dispatch(
    form: &mut VisualForm,
    platform: &dyn PlatformApi,
    message: &PlatformMessage,
    effects: &mut EffectQueue,
) -> MessageDisposition {
    match message.code {
        WM_SIZE => {
            form.on_resize(message.size());
            MessageDisposition::Default
        }
        WM_EXITSIZEMOVE => {
            let bounds = platform.window_bounds();
            form.on_resize_end(bounds, platform.work_area_at(bounds.center()), effects);
            MessageDisposition::Default
        }
        WM_SETFOCUS => {
            form.on_focus_gained(effects);
            MessageDisposition::Default
        }
        WM_KILLFOCUS => {
            form.on_focus_lost(effects);
            MessageDisposition::Default
        }
        WM_MOUSELEAVE => {
            form.on_pointer_leave(effects);
            MessageDisposition::Default
        }
        WM_SYSCOMMAND => {
            let bounds = platform.window_bounds();
            form.on_system_command(
                message.wparam as u32 & SYSCOMMAND_MASK,
                platform.is_minimized(),
                bounds,
                platform.work_area_at(bounds.center()),
                effects,
            )
        }
        // Keeps the platform from resetting to the class cursor before each move.
        WM_SETCURSOR if message.lparam & 0xFFFF == HT_CLIENT as isize => {
            match form.chrome().resize_cursor() {
                Some(cursor) => {
                    effects.command(PlatformCommand::SetCursor(cursor));
                    MessageDisposition::Handled
                }
                None => MessageDisposition::Default,
            }
        }
        WM_MOUSEMOVE => {
            let client = message.point();
            if form.on_pointer_enter(effects) {
                effects.command(PlatformCommand::TrackPointerLeave);
            }
            form.on_pointer_move(client, platform.child_at(client), platform.current_cursor(), effects);
            form.handle_message(message, snapshot(platform, client), effects)
        }
        WM_LBUTTONDOWN => {
            let client = message.point();
            if form.on_pointer_down(MouseButton::Left, effects) {
                // A resize drag owns this press.
                return MessageDisposition::Default;
            }
            form.handle_message(message, snapshot(platform, client), effects)
        }
        WM_RBUTTONDOWN => {
            let client = message.point();
            form.on_pointer_down(MouseButton::Right, effects);
            form.handle_message(message, snapshot(platform, client), effects)
        }
        WM_LBUTTONUP => {
            let client = message.point();
            form.on_pointer_up(effects);
            form.handle_message(message, snapshot(platform, client), effects)
        }
        WM_NCLBUTTONDOWN => {
            let screen = platform.cursor_position();
            let cursor = CursorSnapshot {
                screen,
                client: platform.screen_to_client(screen),
            };
            form.handle_message(message, cursor, effects)
        }
        _ => MessageDisposition::Default,
    }
}

fn snapshot(platform: &dyn PlatformApi, client: Point) -> CursorSnapshot {
    CursorSnapshot {
        screen: platform.cursor_position(),
        client,
    }
}

/*
 * Feeds a pointer move observed by the process input filter to the form's
 * hit-test. Moves outside the window are ignored; inside, the pointer is
 * usually over a child control that swallowed the native message.
 */
pub fn route_global_pointer_move(
    form: &RefCell<VisualForm>,
    platform: &mut dyn PlatformApi,
    handler: &mut dyn PlatformEventHandler,
    screen: Point,
) {
    let bounds = platform.window_bounds();
    if !bounds.contains(screen) {
        return;
    }
    let client = platform.screen_to_client(screen);
    let mut effects = EffectQueue::new();
    {
        let Ok(mut form) = form.try_borrow_mut() else {
            return;
        };
        form.on_pointer_move(client, platform.child_at(client), platform.current_cursor(), &mut effects);
    }
    execute_effects(&mut effects, platform, handler);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_executor::tests::{Call, FakePlatform, RecordingHandler};
    use crate::controls::visual_form::FormConfig;
    use crate::theme::BuiltinThemes;
    use crate::types::message_codes::{
        HT_BOTTOMRIGHT, HT_CAPTION, HT_LEFT, SC_MAXIMIZE, SC_MINIMIZE, SC_RESTORE, SC_SIZE,
    };
    use crate::types::{AppEvent, CursorKind, Rect, Size, WindowId};

    struct Harness {
        form: RefCell<VisualForm>,
        platform: FakePlatform,
        handler: RecordingHandler,
    }

    impl Harness {
        fn new(config: FormConfig) -> Self {
            let size = config.size;
            Self {
                form: RefCell::new(VisualForm::new(WindowId(1), "Test", config, &BuiltinThemes)),
                platform: FakePlatform::new(Rect::new(100, 100, size.width, size.height)),
                handler: RecordingHandler::default(),
            }
        }

        fn send(&mut self, message: PlatformMessage) -> MessageDisposition {
            route_message(&self.form, &mut self.platform, &mut self.handler, &message)
        }

        fn mouse(&mut self, code: u32, client: Point) -> MessageDisposition {
            let bounds = self.platform.bounds;
            self.platform.cursor_screen = Point::new(bounds.x + client.x, bounds.y + client.y);
            self.send(PlatformMessage::with_point(code, 0, client))
        }
    }

    fn set_cursor_message(hit_test: u32) -> PlatformMessage {
        PlatformMessage::new(WM_SETCURSOR, 0, ((WM_MOUSEMOVE as isize) << 16) | hit_test as isize)
    }

    fn sized(width: i32, height: i32) -> FormConfig {
        FormConfig {
            size: Size::new(width, height),
            ..FormConfig::default()
        }
    }

    #[test]
    fn title_press_starts_native_move() {
        let mut h = Harness::new(sized(800, 600));

        h.mouse(WM_LBUTTONDOWN, Point::new(400, 10));

        assert_eq!(h.platform.sends(), vec![(WM_NCLBUTTONDOWN, HT_CAPTION as usize, 0)]);
        assert!(h.platform.calls.contains(&Call::ReleaseCapture));
    }

    #[test]
    fn edge_press_starts_resize_not_move() {
        let mut h = Harness::new(sized(800, 600));
        h.mouse(WM_MOUSEMOVE, Point::new(799, 599));
        assert_eq!(h.platform.cursor, CursorKind::SizeNwse);

        h.platform.calls.clear();
        h.mouse(WM_LBUTTONDOWN, Point::new(799, 599));

        assert_eq!(
            h.platform.sends(),
            vec![(WM_NCLBUTTONDOWN, HT_BOTTOMRIGHT as usize, 0)]
        );
    }

    #[test]
    fn left_edge_inside_title_bar_resizes_only() {
        let mut h = Harness::new(sized(800, 600));
        h.mouse(WM_MOUSEMOVE, Point::new(1, 10));
        h.platform.calls.clear();

        h.mouse(WM_LBUTTONDOWN, Point::new(1, 10));

        assert_eq!(h.platform.sends(), vec![(WM_NCLBUTTONDOWN, HT_LEFT as usize, 0)]);
    }

    #[test]
    fn first_move_enters_and_tracks_leave() {
        let mut h = Harness::new(sized(800, 600));

        h.mouse(WM_MOUSEMOVE, Point::new(400, 300));
        h.mouse(WM_MOUSEMOVE, Point::new(401, 300));

        let tracks = h.platform.calls.iter().filter(|c| **c == Call::TrackLeave).count();
        assert_eq!(tracks, 1);
        h.send(PlatformMessage::new(WM_MOUSELEAVE, 0, 0));
        let states: Vec<_> = h
            .handler
            .events
            .iter()
            .filter(|e| matches!(e, AppEvent::MouseStateChanged { .. }))
            .collect();
        assert_eq!(states.len(), 2);
    }

    #[test]
    fn hovering_over_child_keeps_default_cursor() {
        let mut h = Harness::new(sized(800, 600));
        h.platform.children.push(Rect::new(0, 500, 200, 100));

        h.mouse(WM_MOUSEMOVE, Point::new(1, 599));

        assert_eq!(h.platform.cursor, CursorKind::Default);
    }

    #[test]
    fn maximize_then_drag_title_restores_under_cursor() {
        let mut h = Harness::new(sized(400, 300));
        h.platform.work_area = Rect::new(0, 0, 800, 600);

        h.send(PlatformMessage::new(WM_SYSCOMMAND, SC_MAXIMIZE as usize, 0));
        assert_eq!(h.platform.bounds, Rect::new(0, 0, 800, 600));
        h.send(PlatformMessage::new(WM_SIZE, 0, (600 << 16) | 800));

        h.mouse(WM_LBUTTONDOWN, Point::new(700, 10));
        assert!(h.platform.sends().is_empty());
        h.mouse(WM_MOUSEMOVE, Point::new(700, 10));

        // Cursor near the right end keeps its distance to the right edge.
        assert_eq!(h.platform.bounds, Rect::new(400, 0, 400, 300));
        assert_eq!(h.platform.sends(), vec![(WM_NCLBUTTONDOWN, HT_CAPTION as usize, 0)]);
        assert!(h
            .handler
            .events
            .contains(&AppEvent::WindowRestored { window_id: WindowId(1) }));
    }

    #[test]
    fn resize_request_is_translated_through_table() {
        let mut h = Harness::new(sized(800, 600));

        let disposition = h.send(PlatformMessage::new(WM_NCLBUTTONDOWN, HT_LEFT as usize, 42));

        assert_eq!(disposition, MessageDisposition::Handled);
        assert_eq!(h.platform.sends(), vec![(WM_SYSCOMMAND, (SC_SIZE | 1) as usize, 42)]);
    }

    #[test]
    fn dialog_swallows_resize_requests() {
        let mut h = Harness::new(FormConfig::dialog());

        let disposition = h.send(PlatformMessage::new(WM_NCLBUTTONDOWN, HT_LEFT as usize, 0));

        assert_eq!(disposition, MessageDisposition::Handled);
        assert!(h.platform.sends().is_empty());
    }

    #[test]
    fn magnetic_form_snaps_when_move_ends() {
        let mut h = Harness::new(FormConfig {
            magnetic: true,
            ..sized(400, 300)
        });
        h.platform.bounds = Rect::new(30, 500, 400, 300);

        h.send(PlatformMessage::new(WM_EXITSIZEMOVE, 0, 0));

        assert_eq!(h.platform.bounds.location(), Point::new(0, 500));
        assert!(h.handler.events.contains(&AppEvent::WindowSnapped {
            window_id: WindowId(1),
            location: Point::new(0, 500)
        }));
    }

    #[test]
    fn system_command_flags_are_masked() {
        let mut h = Harness::new(sized(400, 300));
        h.send(PlatformMessage::new(WM_SYSCOMMAND, (SC_MAXIMIZE | 0x2) as usize, 0));
        assert!(h.form.borrow().chrome().is_maximized());
    }

    #[test]
    fn restore_from_taskbar_after_minimizing_maximized_form() {
        // Arrange
        let mut h = Harness::new(sized(640, 480));
        h.send(PlatformMessage::new(WM_SYSCOMMAND, SC_MAXIMIZE as usize, 0));
        let minimize = h.send(PlatformMessage::new(WM_SYSCOMMAND, SC_MINIMIZE as usize, 0));
        h.platform.minimized = true;
        h.platform.calls.clear();

        // Act
        let restore = h.send(PlatformMessage::new(WM_SYSCOMMAND, SC_RESTORE as usize, 0));

        // Assert
        assert_eq!(minimize, MessageDisposition::Default);
        assert_eq!(restore, MessageDisposition::Default);
        assert!(h.form.borrow().chrome().is_maximized());
        assert!(h.platform.calls.is_empty());

        // Once shown again, restore goes back to the size before maximizing.
        h.platform.minimized = false;
        let restore = h.send(PlatformMessage::new(WM_SYSCOMMAND, SC_RESTORE as usize, 0));
        assert_eq!(restore, MessageDisposition::Handled);
        assert!(!h.form.borrow().chrome().is_maximized());
        assert_eq!(h.platform.bounds.size(), Size::new(640, 480));
    }

    #[test]
    fn dialog_swallows_minimize() {
        let mut h = Harness::new(FormConfig::dialog());

        let disposition = h.send(PlatformMessage::new(WM_SYSCOMMAND, SC_MINIMIZE as usize, 0));

        assert_eq!(disposition, MessageDisposition::Handled);
        assert!(h.platform.calls.is_empty());
    }

    #[test]
    fn set_cursor_keeps_resize_cursor_in_a_zone() {
        let mut h = Harness::new(sized(800, 600));
        h.mouse(WM_MOUSEMOVE, Point::new(799, 300));
        h.platform.calls.clear();

        let disposition = h.send(set_cursor_message(HT_CLIENT));

        assert_eq!(disposition, MessageDisposition::Handled);
        assert_eq!(h.platform.calls, vec![Call::SetCursor(CursorKind::SizeWe)]);
    }

    #[test]
    fn set_cursor_outside_zones_goes_to_default_handling() {
        let mut h = Harness::new(sized(800, 600));
        h.mouse(WM_MOUSEMOVE, Point::new(400, 300));
        h.platform.calls.clear();

        assert_eq!(h.send(set_cursor_message(HT_CLIENT)), MessageDisposition::Default);
        h.mouse(WM_MOUSEMOVE, Point::new(799, 300));
        h.platform.calls.clear();
        assert_eq!(h.send(set_cursor_message(HT_CAPTION)), MessageDisposition::Default);
        assert!(h.platform.calls.is_empty());
    }

    #[test]
    fn busy_form_defers_to_default_handling() {
        let mut h = Harness::new(sized(400, 300));
        let _guard = h.form.borrow_mut();
        let disposition = route_message(
            &h.form,
            &mut h.platform,
            &mut h.handler,
            &PlatformMessage::new(WM_NCLBUTTONDOWN, HT_LEFT as usize, 0),
        );
        assert_eq!(disposition, MessageDisposition::Default);
    }

    #[test]
    fn global_move_over_child_region_updates_resize_cursor() {
        let mut h = Harness::new(sized(800, 600));

        route_global_pointer_move(&h.form, &mut h.platform, &mut h.handler, Point::new(101, 400));
        assert_eq!(h.platform.cursor, CursorKind::SizeWe);

        route_global_pointer_move(&h.form, &mut h.platform, &mut h.handler, Point::new(50, 50));
        assert_eq!(h.platform.cursor, CursorKind::SizeWe);
    }
}
