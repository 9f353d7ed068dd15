use base64::Engine as _;
use cutline_core::types::{MediaSource, TimeUs};

use crate::engine::{EngineJob, MediaEngine, VirtualFile};
use crate::error::Result;

const THUMBNAIL_OUTPUT: &str = "thumbnail.png";

/// Grab one PNG frame at `at` from a video source.
pub fn thumbnail_job(source: &MediaSource, at: TimeUs) -> EngineJob {
    EngineJob {
        inputs: vec![VirtualFile::from_source("input", source)],
        args: vec![
            "-ss".into(),
            format!("{:.3}", at.as_seconds()),
            "-i".into(),
            "input".into(),
            "-frames:v".into(),
            "1".into(),
            THUMBNAIL_OUTPUT.into(),
        ],
        output: THUMBNAIL_OUTPUT.into(),
        duration: None,
    }
}

/// Wrap PNG bytes as an inline `data:` URL the timeline can use directly.
pub fn png_data_url(png: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    )
}

/// Extract the timeline thumbnail for a video.
pub async fn video_thumbnail(
    engine: &dyn MediaEngine,
    source: &MediaSource,
    at: TimeUs,
) -> Result<String> {
    let png = engine.run(thumbnail_job(source, at)).await?;
    Ok(png_data_url(&png))
}
