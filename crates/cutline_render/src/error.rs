use cutline_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to execute ffprobe: {0}")]
    FfprobeExec(String),

    #[error("ffprobe failed: {0}")]
    FfprobeFailed(String),

    #[error("ffmpeg not found")]
    FfmpegNotFound,

    #[error("ffmpeg failed: {0}")]
    FfmpegFailed(String),

    #[error("ffmpeg produced no {0}")]
    MissingOutput(String),

    #[error("no clips to render")]
    NoClips,

    #[error("editor state is poisoned")]
    StatePoisoned,

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;
