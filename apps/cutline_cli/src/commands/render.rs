//! Load a video into the editor, optionally add a text overlay, and render it out.

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use cutline_core::config::EditorSettings;
use cutline_core::types::OverlayPatch;
use cutline_core::Editor;
use cutline_render::{import_video, render, FfmpegEngine, FfprobeProber};

use super::{load_source, lock, report_progress};

/// A text overlay given on the command line.
pub struct TextSpec {
    pub content: String,
    pub x: f64,
    pub y: f64,
    pub size: u32,
    pub color: String,
}

impl TextSpec {
    fn patch(self) -> OverlayPatch {
        OverlayPatch {
            content: Some(self.content),
            x: Some(self.x),
            y: Some(self.y),
            size: Some(self.size),
            color: Some(self.color),
            ..Default::default()
        }
    }
}

pub async fn run(
    settings: EditorSettings,
    video: PathBuf,
    text: Option<TextSpec>,
    output: PathBuf,
) -> anyhow::Result<()> {
    let engine = if text.is_some() {
        FfmpegEngine::from_settings(&settings.media).with_context(|| {
            format!("Failed to load font {}", settings.media.font_path.display())
        })?
    } else {
        FfmpegEngine::new(&settings.media.ffmpeg)
    };
    let (progress, reporter) = report_progress("Rendering");
    let engine = engine.with_progress(progress);
    let prober = FfprobeProber::new(&settings.media);
    let editor = Mutex::new(Editor::new(settings));

    import_video(&editor, &prober, load_source(&video)?).await?;
    if let Some(text) = text {
        let mut editor = lock(&editor)?;
        let store = editor.store_mut();
        let id = store.add_text();
        store.update(id, &text.patch());
    }

    println!("Rendering {}...", video.display());
    let rendered = render(&editor, &engine).await;
    drop(engine);
    let _ = reporter.await;
    let rendered = rendered?;
    tokio::fs::write(&output, &rendered.data[..])
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Wrote {} ({} bytes)", output.display(), rendered.len());
    Ok(())
}
