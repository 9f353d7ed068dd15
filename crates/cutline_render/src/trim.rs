use cutline_core::trim::{TrimMode, TrimRequest};
use cutline_core::types::{MediaSource, TimeUs};
use cutline_core::Editor;
use std::sync::Mutex;
use uuid::Uuid;

use crate::engine::{EngineJob, MediaEngine, VirtualFile};
use crate::error::Result;
use crate::lock_editor;
use crate::probe::MediaProber;

const TRIM_INPUT: &str = "input";

/// Build the re-encode for a trim: video keeps both streams, audio drops video.
pub fn trim_job(request: &TrimRequest) -> EngineJob {
    let output = request.mode.output_name();
    let mut args = vec![
        "-ss".to_string(),
        request.start_us.as_seconds().to_string(),
        "-i".to_string(),
        TRIM_INPUT.to_string(),
        "-t".to_string(),
        request.duration().as_seconds().to_string(),
    ];
    let codec: &[&str] = match request.mode {
        TrimMode::Video => &[
            "-c:v",
            "libx264",
            "-preset",
            "ultrafast",
            "-c:a",
            "aac",
            "-strict",
            "experimental",
        ],
        TrimMode::Audio => &["-vn", "-c:a", "libmp3lame", "-b:a", "192k"],
    };
    args.extend(codec.iter().map(|s| s.to_string()));
    args.push(output.to_string());

    EngineJob {
        inputs: vec![VirtualFile::from_source(TRIM_INPUT, &request.source)],
        args,
        output: output.to_string(),
        duration: Some(request.duration()),
    }
}

/// Commit the active trim session.
///
/// The request is snapshotted and the lock released while the engine runs. If the
/// engine fails, the item and the session are left exactly as they were. On success the
/// output is probed for its real length (falling back to the selected length) and the
/// item's source and duration are replaced together. A result whose session was
/// cancelled or replaced while the engine ran is discarded.
pub async fn commit_trim(
    editor: &Mutex<Editor>,
    engine: &dyn MediaEngine,
    prober: &dyn MediaProber,
) -> Result<Uuid> {
    let request = lock_editor(editor)?.trim_request()?;
    tracing::info!(
        id = %request.item_id,
        start = %request.start_us,
        end = %request.end_us,
        mode = ?request.mode,
        "trim transcode started"
    );

    let bytes = engine.run(trim_job(&request)).await.map_err(|e| {
        tracing::warn!(id = %request.item_id, "trim transcode failed: {}", e);
        e
    })?;

    let mode = request.mode;
    let source = MediaSource::new(format!("trimmed-{}", mode.output_name()), mode.mime(), bytes);
    let duration = match prober.probe(&source).await {
        Ok(probe) if probe.duration_us > TimeUs::ZERO => probe.duration_us,
        Ok(_) => request.duration(),
        Err(e) => {
            tracing::warn!(id = %request.item_id, "probe of trimmed output failed: {}", e);
            request.duration()
        }
    };

    lock_editor(editor)?.finish_trim(request.session_id, source, duration)?;
    Ok(request.item_id)
}
