use std::path::Path;

use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
///
/// Almost every failure in the browser is absorbed where it happens; these
/// variants exist for the few call sites that need to report one upward
/// (startup, root changes, the external editor) before it is logged.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from the filesystem or the terminal device.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal mode switching errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A path that is not an accessible directory.
    #[error("Not a browsable directory: {0}")]
    InvalidPath(String),

    /// The external editor could not be started.
    #[error("Editor error: {0}")]
    Editor(String),
}

impl AppError {
    pub fn invalid_path(path: &Path) -> Self {
        Self::InvalidPath(path.display().to_string())
    }
}
