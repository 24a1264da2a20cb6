pub mod paint_router;
pub mod styled_control;
pub mod visual_form;

#[cfg(target_os = "windows")]
pub(crate) mod chrome_painter;
#[cfg(target_os = "windows")]
pub(crate) mod styling_handler;
