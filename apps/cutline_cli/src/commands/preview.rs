//! Play a file in mpv while the editor clock follows its playback time.

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use cutline_core::clock::format_clock;
use cutline_core::config::EditorSettings;
use cutline_core::types::TimeUs;
use cutline_core::Editor;
use cutline_preview::{MediaEvent, MpvElement, PlayheadSync};
use cutline_render::{import_file, FfprobeProber};

use super::load_source;

pub async fn run(settings: EditorSettings, file: PathBuf, start: Option<f64>) -> anyhow::Result<()> {
    let mpv_binary = settings.media.mpv.clone();

    let prober = FfprobeProber::new(&settings.media);
    let editor = Mutex::new(Editor::new(settings));
    let (_, id) = import_file(&editor, &prober, load_source(&file)?).await?;

    let mut editor = editor
        .into_inner()
        .map_err(|_| anyhow::anyhow!("editor state poisoned"))?;
    editor.click_item(id);
    let item = editor
        .store()
        .get(id)
        .with_context(|| format!("{} was not added", file.display()))?;
    let duration = item.media_duration_us().unwrap_or(TimeUs::ZERO);
    let source = item
        .source()
        .cloned()
        .with_context(|| format!("{} is not playable media", file.display()))?;
    if duration > TimeUs::ZERO {
        editor.clock_mut().set_duration_basis(duration);
    }
    let clock = editor.clock_mut();

    let element = tokio::task::spawn_blocking(move || MpvElement::spawn(mpv_binary, &[]))
        .await?
        .context("Failed to start mpv")?;
    let mut events = element.observe().await?;
    let mut sync = PlayheadSync::new(Some(element));

    sync.attach_source(&source)?;
    if let Some(start) = start {
        clock.seek(TimeUs::from_seconds(start));
    }
    clock.play();
    sync.apply(clock)?;
    println!("Playing {} ({})", file.display(), clock.duration());

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    tracing::info!("mpv went away");
                    break;
                };
                let ended = matches!(event, MediaEvent::Ended);
                sync.handle_event(clock, event)?;
                if ended {
                    println!("Reached the end, playhead back at {}", format_clock(clock.current()));
                    break;
                }
                tracing::debug!(playhead = %format_clock(clock.current()), "tick");
            }
            _ = tokio::signal::ctrl_c() => {
                println!("Stopped at {}", format_clock(clock.current()));
                break;
            }
        }
    }

    sync.detach()?;
    Ok(())
}
