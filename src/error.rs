/*
 * Error vocabulary shared by the portable core and the Win32 glue.
 * Theme application failures are recoverable and are reported rather than
 * propagated; `OutOfRange` marks configuration faults that abort a paint pass.
 */
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),

    #[error("Invalid handle: {0}")]
    InvalidHandle(String),

    /// A raw configuration value did not name any known variant.
    #[error("{what} value {value} is out of range")]
    OutOfRange { what: &'static str, value: i32 },

    /// The theme lacks a category the element needs to render.
    #[error("Theme '{theme}' has no {category} settings")]
    MissingThemeCategory {
        theme: String,
        category: &'static str,
    },

    /// The element was already borrowed when a theme reached it.
    #[error("Element {0} is busy and cannot accept a theme right now")]
    ElementBusy(String),
}

#[cfg(target_os = "windows")]
impl From<windows::core::Error> for PlatformError {
    fn from(err: windows::core::Error) -> Self {
        PlatformError::OperationFailed(format!("Win32 call failed: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, PlatformError>;
