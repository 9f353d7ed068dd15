use cutline_core::types::{MediaProbe, MediaSource, OverlayType};
use cutline_core::Editor;
use std::sync::Mutex;
use uuid::Uuid;

use crate::error::Result;
use crate::lock_editor;
use crate::probe::MediaProber;

async fn probe_or_degrade(prober: &dyn MediaProber, source: &MediaSource) -> Option<MediaProbe> {
    match prober.probe(source).await {
        Ok(probe) => Some(probe),
        Err(e) => {
            tracing::warn!(name = %source.name, "probe failed: {}", e);
            None
        }
    }
}

/// Add a video to the video track right away, then fill in its duration and thumbnail
/// once probing finishes. If the item was removed in the meantime the probe result is
/// dropped.
pub async fn import_video(
    editor: &Mutex<Editor>,
    prober: &dyn MediaProber,
    source: MediaSource,
) -> Result<Uuid> {
    let pending = source.clone();
    let id = lock_editor(editor)?.store_mut().add_video(source);
    let probe = probe_or_degrade(prober, &pending).await;
    lock_editor(editor)?.store_mut().apply_probe(id, probe);
    Ok(id)
}

/// Probe an audio file and add it spanning its duration.
pub async fn import_audio(
    editor: &Mutex<Editor>,
    prober: &dyn MediaProber,
    source: MediaSource,
) -> Result<Uuid> {
    let probe = probe_or_degrade(prober, &source).await;
    let id = lock_editor(editor)?.store_mut().add_audio(source, probe);
    Ok(id)
}

/// Add an image or gif overlay. No probing is needed.
pub fn import_visual(editor: &Mutex<Editor>, source: MediaSource) -> Result<Uuid> {
    let mut editor = lock_editor(editor)?;
    let id = if is_gif(&source) {
        editor.store_mut().add_gif(source)
    } else {
        editor.store_mut().add_image(source)
    };
    Ok(id)
}

/// Route an upload to the matching import by its MIME type. A `.gif` name wins over a
/// generic MIME type.
pub async fn import_file(
    editor: &Mutex<Editor>,
    prober: &dyn MediaProber,
    source: MediaSource,
) -> Result<(OverlayType, Uuid)> {
    let mime = source.mime.to_ascii_lowercase();
    if mime.starts_with("audio/") {
        return Ok((OverlayType::Audio, import_audio(editor, prober, source).await?));
    }
    if is_gif(&source) {
        return Ok((OverlayType::Gif, import_visual(editor, source)?));
    }
    if mime.starts_with("image/") {
        return Ok((OverlayType::Image, import_visual(editor, source)?));
    }
    Ok((OverlayType::Video, import_video(editor, prober, source).await?))
}

fn is_gif(source: &MediaSource) -> bool {
    source.mime.eq_ignore_ascii_case("image/gif") || source.name.to_ascii_lowercase().ends_with(".gif")
}
