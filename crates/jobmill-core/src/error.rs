use thiserror::Error;

/// Errors raised while bootstrapping shared infrastructure (config, paths).
///
/// Subsystem crates define their own error enums; this one exists so the
/// composition root can report bootstrap failures without pulling in any
/// subsystem crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Short error code string for structured responses and logs.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::Config(_) => "CONFIG_ERROR",
            CoreError::Io(_) => "IO_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
