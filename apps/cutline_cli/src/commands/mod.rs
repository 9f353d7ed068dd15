pub mod check;
pub mod preview;
pub mod probe;
pub mod render;
pub mod trim;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use anyhow::Context;
use cutline_core::clock::format_clock;
use cutline_core::types::{MediaSource, TimeUs};
use cutline_core::Editor;
use cutline_render::EngineProgress;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Guess a MIME type from the file extension. Unknown extensions import as video.
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" | "oga" => "audio/ogg",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        "flac" => "audio/flac",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Read a file into an in-memory media source.
pub fn load_source(path: &Path) -> anyhow::Result<MediaSource> {
    let data = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(MediaSource::new(name, mime_for(path), data))
}

pub fn lock(editor: &Mutex<Editor>) -> anyhow::Result<MutexGuard<'_, Editor>> {
    editor
        .lock()
        .map_err(|_| anyhow::anyhow!("editor state poisoned"))
}

/// One status line for a running engine job.
pub fn progress_line(label: &str, progress: &EngineProgress) -> String {
    let mut line = match progress.total {
        Some(total) if total > TimeUs::ZERO => format!(
            "{label} {:>3.0}% ({} of {})",
            progress.percent(),
            format_clock(progress.position),
            format_clock(total)
        ),
        _ => format!("{label} {}", format_clock(progress.position)),
    };
    if let Some(eta) = progress.eta() {
        line.push_str(&format!(", about {:.0}s left", eta.as_seconds().ceil()));
    }
    line
}

/// Print engine progress to stderr until the sender is dropped. Hand the sender to
/// `FfmpegEngine::with_progress`, drop the engine when the job is done, then await the
/// handle.
pub fn report_progress(label: &'static str) -> (watch::Sender<EngineProgress>, JoinHandle<()>) {
    let (tx, mut rx) = watch::channel(EngineProgress::default());
    let task = tokio::spawn(async move {
        let mut printed = false;
        while rx.changed().await.is_ok() {
            let line = progress_line(label, &rx.borrow_and_update());
            eprint!("\r{line}\x1b[K");
            printed = true;
        }
        if printed {
            eprintln!();
        }
    });
    (tx, task)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_line_with_known_length() {
        let progress = EngineProgress {
            position: TimeUs(1_500_000),
            total: Some(TimeUs(6_000_000)),
            frame: 45,
            speed: 0.5,
        };
        assert_eq!(
            progress_line("Trimming", &progress),
            "Trimming  25% (01:50 of 06:00), about 9s left"
        );
    }

    #[test]
    fn progress_line_with_unknown_length() {
        let progress = EngineProgress {
            position: TimeUs(2_000_000),
            ..Default::default()
        };
        assert_eq!(progress_line("Rendering", &progress), "Rendering 02:00");
    }

    #[tokio::test]
    async fn reporter_stops_when_sender_is_dropped() {
        let (tx, task) = report_progress("Testing");
        tx.send_replace(EngineProgress::default());
        drop(tx);
        task.await.unwrap();
    }

    #[test]
    fn mime_follows_extension() {
        assert_eq!(mime_for(Path::new("a/b/clip.MP4")), "video/mp4");
        assert_eq!(mime_for(Path::new("song.mp3")), "audio/mpeg");
        assert_eq!(mime_for(Path::new("loop.gif")), "image/gif");
        assert_eq!(mime_for(Path::new("photo.jpeg")), "image/jpeg");
        assert_eq!(mime_for(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn load_source_reads_bytes_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("voice.wav");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        let source = load_source(&path).unwrap();
        assert_eq!(source.name, "voice.wav");
        assert_eq!(source.mime, "audio/wav");
        assert_eq!(source.len(), 3);
    }

    #[test]
    fn load_source_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_source(&dir.path().join("absent.mp4")).unwrap_err();
        assert!(err.to_string().contains("absent.mp4"));
    }
}
