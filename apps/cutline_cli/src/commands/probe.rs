//! Show what ffprobe reports about a media file.

use std::path::PathBuf;

use anyhow::Context;
use cutline_core::config::EditorSettings;
use cutline_core::types::OverlayType;
use cutline_render::{detect_overlay_type, FfprobeProber, StreamInfo};
use serde::Serialize;

use super::mime_for;

#[derive(Serialize)]
struct ProbeReport<'a> {
    name: String,
    mime: &'a str,
    kind: OverlayType,
    duration: String,
    #[serde(flatten)]
    info: StreamInfo,
}

pub async fn run(settings: &EditorSettings, file: PathBuf) -> anyhow::Result<()> {
    let prober = FfprobeProber::new(&settings.media);
    let info = prober
        .inspect_path(&file)
        .await
        .with_context(|| format!("Failed to probe {}", file.display()))?;

    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let report = ProbeReport {
        kind: detect_overlay_type(&name, &info),
        mime: mime_for(&file),
        duration: info.duration_us.to_string(),
        name,
        info,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
