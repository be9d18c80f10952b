use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("preference store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("preference store is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no configuration directory on this platform")]
    NoConfigDir,

    #[error("presentation update failed: {0}")]
    Presentation(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown theme preference {0:?} (expected light, dark or system)")]
pub struct ParsePreferenceError(pub String);
