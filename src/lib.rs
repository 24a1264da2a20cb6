/*
 * Provides the public entry point for the VisualPlus crate, a themable custom-chrome
 * control toolkit for Win32. Borderless forms own their hit-testing, resize, drag and
 * snap behavior and paint their own frame, while a theme pushed into a form cascades
 * through every registered child control.
 *
 * The chrome state machine, theme propagation and mouse-state tracking are portable
 * and talk to the windowing system only through `PlatformMessage` input and queued
 * `PlatformCommand`s, so they compile and are tested on every platform. The Win32
 * glue (window class, window procedure, GDI painting, the mouse hook) is compiled
 * only on Windows.
 */
pub(crate) mod command_executor;
pub(crate) mod controls;
pub mod error;
pub(crate) mod input_filter;
pub(crate) mod message_router;
pub mod mouse_state;
pub mod styling_primitives;
pub mod theme;
pub mod theme_propagation;
pub mod types;
pub mod window_chrome;
#[cfg(target_os = "windows")]
pub(crate) mod window_common;

pub use command_executor::{PlatformApi, execute_effects};
pub use controls::paint_router::{FramePlan, plan_frame};
pub use controls::styled_control::{ControlColorState, StyledControl};
pub use controls::visual_form::{FormConfig, VisualForm, WindowVariant};
pub use error::{PlatformError, Result as PlatformResult};
pub use input_filter::{InputFilterGuard, dispatch_pointer_move, subscribe_pointer_moves};
pub use message_router::{route_global_pointer_move, route_message};
pub use mouse_state::{MouseState, MouseStateTracker};
pub use styling_primitives::{Border, Color, FontDescription, FontWeight, ShapeType, TitleAlignment};
pub use theme::{BuiltinThemes, StyleId, StyleManager, Theme, ThemeSource};
pub use theme_propagation::{SharedThemable, Themable, ThemeListeners, update_theme};
pub use types::{
    AppEvent, ControlId, CursorKind, EffectQueue, ElementId, MessageDisposition, MouseButton,
    PlatformCommand, PlatformEventHandler, PlatformMessage, Point, Rect, Size, WindowId,
};
pub use window_chrome::{ChromeConfig, ResizeDirection, WindowChrome};
#[cfg(target_os = "windows")]
pub use window_common::{FormWindow, run_message_loop};
