//! Trim an audio or video file through the editor's trim session.

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{bail, Context};
use cutline_core::config::EditorSettings;
use cutline_core::types::TimeUs;
use cutline_core::Editor;
use cutline_render::{commit_trim, import_file, FfmpegEngine, FfprobeProber};

use super::{load_source, lock, report_progress};

pub async fn run(
    settings: EditorSettings,
    file: PathBuf,
    start: f64,
    end: Option<f64>,
    output: PathBuf,
) -> anyhow::Result<()> {
    let source = load_source(&file)?;
    let prober = FfprobeProber::new(&settings.media);
    let (progress, reporter) = report_progress("Trimming");
    let engine = FfmpegEngine::new(&settings.media.ffmpeg).with_progress(progress);
    let editor = Mutex::new(Editor::new(settings));

    let (kind, id) = import_file(&editor, &prober, source).await?;
    if !kind.is_media() {
        bail!("{} is not audio or video", file.display());
    }

    {
        let mut editor = lock(&editor)?;
        editor.click_item(id);
        if !editor.enter_trim() {
            bail!("{} cannot be trimmed", file.display());
        }
        let session = editor
            .trim_session_mut()
            .context("trim session was not opened")?;
        if session.media_duration() == TimeUs::ZERO {
            bail!("Could not read the duration of {}", file.display());
        }
        session.set_start(TimeUs::from_seconds(start));
        if let Some(end) = end {
            session.set_end(TimeUs::from_seconds(end));
        }
        if session.selected_duration() == TimeUs::ZERO {
            bail!("Empty range: {} to {}", session.start(), session.end());
        }
        println!(
            "Trimming {} from {} to {} ({:?})",
            file.display(),
            session.start(),
            session.end(),
            session.mode()
        );
    }

    let committed = commit_trim(&editor, &engine, &prober).await;
    drop(engine);
    let _ = reporter.await;
    committed?;

    let (trimmed, duration) = {
        let editor = lock(&editor)?;
        let item = editor
            .store()
            .get(id)
            .context("trimmed item disappeared")?;
        let source = item.source().context("trimmed item has no media")?.clone();
        (source, item.media_duration_us().unwrap_or(TimeUs::ZERO))
    };
    tokio::fs::write(&output, &trimmed.data[..])
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Wrote {} ({} bytes, {})",
        output.display(),
        trimmed.len(),
        duration
    );
    Ok(())
}
