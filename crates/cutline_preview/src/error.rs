use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("failed to start mpv: {0}")]
    Spawn(std::io::Error),

    #[error("mpv socket did not appear")]
    SocketTimeout,

    #[error("failed to connect to mpv: {0}")]
    Connect(std::io::Error),

    #[error("mpv rejected {command}: {reason}")]
    Rejected { command: String, reason: String },

    #[error("source {0} has no bytes to play")]
    EmptySource(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PreviewError>;
