/*
 * This module is responsible for executing the `PlatformCommand`s and delivering
 * the `AppEvent`s that the chrome, theme and mouse-state logic queue while
 * handling one input.
 *
 * Execution goes through the `PlatformApi` trait so the same ordering rules hold
 * for the Win32 implementation in `window_common` and for the recording fake the
 * tests use. Effects run strictly in queue order. A command that fails is logged
 * and skipped; the remaining effects still run, because one failed platform call
 * must not leave the window half-updated.
 */
use crate::error::Result as PlatformResult;
use crate::types::message_codes::{HT_CAPTION, WM_NCLBUTTONDOWN, WM_SYSCOMMAND};
use crate::types::{
    CursorKind, Effect, EffectQueue, ElementId, PlatformCommand, PlatformEventHandler, Point, Rect,
    Size,
};

/*
 * Everything the core needs from the windowing system for one top-level window.
 * Mutators report failures; queries return plain values because the callers have
 * no meaningful recovery beyond falling back to a default.
 */
pub trait PlatformApi {
    fn invalidate(&mut self, target: ElementId) -> PlatformResult<()>;
    fn release_capture(&mut self) -> PlatformResult<()>;
    /// Synchronous send; on Win32 this re-enters the window procedure.
    fn send_message(&mut self, code: u32, wparam: usize, lparam: isize) -> PlatformResult<()>;
    fn set_location(&mut self, location: Point) -> PlatformResult<()>;
    fn set_size(&mut self, size: Size) -> PlatformResult<()>;
    fn set_cursor(&mut self, cursor: CursorKind) -> PlatformResult<()>;
    fn track_pointer_leave(&mut self) -> PlatformResult<()>;
    fn show_error(&mut self, message: &str) -> PlatformResult<()>;
    /// Pops the system menu and returns the chosen command id, if any.
    fn track_system_menu(&mut self, at: Point) -> PlatformResult<Option<u32>>;

    fn cursor_position(&self) -> Point;
    fn screen_to_client(&self, screen: Point) -> Point;
    fn child_at(&self, client: Point) -> bool;
    fn current_cursor(&self) -> CursorKind;
    fn window_bounds(&self) -> Rect;
    fn is_minimized(&self) -> bool;
    /// Work area of the monitor containing `point`.
    fn work_area_at(&self, point: Point) -> Rect;
}

/*
 * Executes the `BeginMove` command.
 * Simulates a press on the caption so the platform runs its own move loop until
 * the button is released.
 */
pub(crate) fn execute_begin_move(platform: &mut dyn PlatformApi) -> PlatformResult<()> {
    log::debug!("CommandExecutor: execute_begin_move");
    platform.send_message(WM_NCLBUTTONDOWN, HT_CAPTION as usize, 0)
}

/*
 * Executes the `BeginResize` command.
 * Same mechanism as a move, but the simulated press lands on the edge named by
 * the hit-test code.
 */
pub(crate) fn execute_begin_resize(platform: &mut dyn PlatformApi, hit_test: u32) -> PlatformResult<()> {
    log::debug!("CommandExecutor: execute_begin_resize hit_test={hit_test}");
    platform.send_message(WM_NCLBUTTONDOWN, hit_test as usize, 0)
}

pub(crate) fn execute_system_command(
    platform: &mut dyn PlatformApi,
    command: u32,
    lparam: isize,
) -> PlatformResult<()> {
    log::debug!("CommandExecutor: execute_system_command 0x{command:04X}");
    platform.send_message(WM_SYSCOMMAND, command as usize, lparam)
}

/*
 * Executes the `ShowSystemMenu` command.
 * A dismissed menu (no selection, or id 0) sends nothing.
 */
pub(crate) fn execute_show_system_menu(platform: &mut dyn PlatformApi, at: Point) -> PlatformResult<()> {
    log::debug!("CommandExecutor: execute_show_system_menu at {at:?}");
    match platform.track_system_menu(at)? {
        Some(command) if command != 0 => execute_system_command(platform, command, 0),
        _ => {
            log::debug!("CommandExecutor: system menu dismissed without a selection");
            Ok(())
        }
    }
}

pub(crate) fn execute_command(platform: &mut dyn PlatformApi, command: PlatformCommand) -> PlatformResult<()> {
    match command {
        PlatformCommand::Invalidate(target) => platform.invalidate(target),
        PlatformCommand::ReleaseCapture => platform.release_capture(),
        PlatformCommand::BeginMove => execute_begin_move(platform),
        PlatformCommand::BeginResize { hit_test } => execute_begin_resize(platform, hit_test),
        PlatformCommand::SystemCommand { command, lparam } => {
            execute_system_command(platform, command, lparam)
        }
        PlatformCommand::ShowSystemMenu { at } => execute_show_system_menu(platform, at),
        PlatformCommand::SetLocation(location) => platform.set_location(location),
        PlatformCommand::SetSize(size) => platform.set_size(size),
        PlatformCommand::SetCursor(cursor) => platform.set_cursor(cursor),
        PlatformCommand::TrackPointerLeave => platform.track_pointer_leave(),
        PlatformCommand::ShowError { message } => platform.show_error(&message),
    }
}

/// Runs every queued effect in order. Returns how many commands failed.
pub fn execute_effects(
    effects: &mut EffectQueue,
    platform: &mut dyn PlatformApi,
    handler: &mut dyn PlatformEventHandler,
) -> usize {
    let mut failures = 0;
    for effect in effects.drain() {
        match effect {
            Effect::Command(command) => {
                let description = format!("{command:?}");
                if let Err(err) = execute_command(platform, command) {
                    log::error!("CommandExecutor: {description} failed: {err}");
                    failures += 1;
                }
            }
            Effect::Event(event) => handler.handle_event(event),
        }
    }
    failures
}
