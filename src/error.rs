use thiserror::Error;

#[derive(Error, Debug)]
pub enum RobotreeError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Session already exists: {0}")]
    SessionExists(String),

    #[error("Log file not found: {0}")]
    LogNotFound(std::path::PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to register signal handler: {0}")]
    SignalHandler(String),

    #[error("Shell completion error: {0}")]
    Completion(String),
}

pub type Result<T> = std::result::Result<T, RobotreeError>;
