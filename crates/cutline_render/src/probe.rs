use async_trait::async_trait;
use cutline_core::config::MediaSettings;
use cutline_core::types::{MediaProbe, MediaSource, OverlayType, TimeUs};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::engine::FfmpegEngine;
use crate::error::{RenderError, Result};
use crate::thumbnails::video_thumbnail;

// ---------------------------------------------------------------------------
// ffprobe JSON output structures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    streams: Vec<FfprobeStream>,
    format: FfprobeFormat,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    channels: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

/// What ffprobe reports about an asset.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StreamInfo {
    pub duration_us: TimeUs,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub codec: String,
    pub audio_channels: u32,
}

impl StreamInfo {
    pub fn has_video(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

// ---------------------------------------------------------------------------
// Prober seam
// ---------------------------------------------------------------------------

/// Reads duration and thumbnail metadata from an asset.
#[async_trait]
pub trait MediaProber: Send + Sync {
    async fn probe(&self, source: &MediaSource) -> Result<MediaProbe>;
}

/// ffprobe for metadata, ffmpeg for the video thumbnail.
pub struct FfprobeProber {
    ffprobe: PathBuf,
    thumbnails: FfmpegEngine,
    thumbnail_at: TimeUs,
}

impl FfprobeProber {
    pub fn new(settings: &MediaSettings) -> Self {
        Self {
            ffprobe: settings.ffprobe.clone(),
            thumbnails: FfmpegEngine::new(&settings.ffmpeg),
            thumbnail_at: settings.thumbnail_offset_us,
        }
    }

    /// Run ffprobe over the source's bytes.
    pub async fn inspect(&self, source: &MediaSource) -> Result<StreamInfo> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(&source.data)?;
        file.flush()?;
        self.inspect_path(file.path()).await
    }

    pub async fn inspect_path(&self, path: &Path) -> Result<StreamInfo> {
        let output = tokio::process::Command::new(&self.ffprobe)
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .output()
            .await
            .map_err(|e| RenderError::FfprobeExec(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RenderError::FfprobeFailed(stderr.into_owned()));
        }

        let probe: FfprobeOutput = serde_json::from_slice(&output.stdout)?;
        Ok(parse_probe_output(&probe))
    }
}

#[async_trait]
impl MediaProber for FfprobeProber {
    async fn probe(&self, source: &MediaSource) -> Result<MediaProbe> {
        let info = self.inspect(source).await?;
        let thumbnail_url = if info.has_video() {
            match video_thumbnail(&self.thumbnails, source, self.thumbnail_at).await {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::warn!(name = %source.name, "thumbnail extraction failed: {}", e);
                    None
                }
            }
        } else {
            None
        };
        Ok(MediaProbe {
            duration_us: info.duration_us,
            thumbnail_url,
        })
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn parse_probe_output(probe: &FfprobeOutput) -> StreamInfo {
    let video_stream = probe.streams.iter().find(|s| s.codec_type == "video");
    let audio_stream = probe.streams.iter().find(|s| s.codec_type == "audio");

    let duration_us = probe
        .format
        .duration
        .as_deref()
        .and_then(|d| d.parse::<f64>().ok())
        .map(TimeUs::from_seconds)
        .unwrap_or(TimeUs::ZERO);

    StreamInfo {
        duration_us,
        width: video_stream.and_then(|s| s.width).unwrap_or(0),
        height: video_stream.and_then(|s| s.height).unwrap_or(0),
        fps: video_stream
            .and_then(|s| s.r_frame_rate.as_deref())
            .and_then(parse_frame_rate)
            .unwrap_or(0.0),
        codec: video_stream
            .and_then(|s| s.codec_name.clone())
            .or_else(|| audio_stream.and_then(|s| s.codec_name.clone()))
            .unwrap_or_default(),
        audio_channels: audio_stream.and_then(|s| s.channels).unwrap_or(0),
    }
}

/// Parse ffprobe frame rate string like "30000/1001" or "30/1" into f64.
fn parse_frame_rate(rate: &str) -> Option<f64> {
    if let Some((num, den)) = rate.split_once('/') {
        let n: f64 = num.parse().ok()?;
        let d: f64 = den.parse().ok()?;
        if d == 0.0 {
            return None;
        }
        Some(n / d)
    } else {
        rate.parse().ok()
    }
}

/// Decide which overlay kind an uploaded file becomes, by extension first and
/// stream layout second.
pub fn detect_overlay_type(name: &str, info: &StreamInfo) -> OverlayType {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "gif" => OverlayType::Gif,
        "png" | "jpg" | "jpeg" | "bmp" | "webp" | "tiff" | "svg" => OverlayType::Image,
        "mp3" | "wav" | "flac" | "aac" | "ogg" | "m4a" | "wma" => OverlayType::Audio,
        _ if info.has_video() => OverlayType::Video,
        _ if info.audio_channels > 0 => OverlayType::Audio,
        _ => OverlayType::Video,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ffprobe_available() -> bool {
        std::process::Command::new("ffprobe")
            .arg("-version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    #[test]
    fn frame_rate_fraction_and_plain() {
        assert!((parse_frame_rate("30000/1001").unwrap() - 29.97).abs() < 0.01);
        assert!((parse_frame_rate("24/1").unwrap() - 24.0).abs() < f64::EPSILON);
        assert!((parse_frame_rate("29.97").unwrap() - 29.97).abs() < 0.01);
        assert!(parse_frame_rate("30/0").is_none());
    }

    #[test]
    fn parse_video_with_audio() {
        let json = r#"{
            "streams": [
                {
                    "codec_type": "video",
                    "codec_name": "h264",
                    "width": 1280,
                    "height": 720,
                    "r_frame_rate": "30/1"
                },
                { "codec_type": "audio", "codec_name": "aac", "channels": 2 }
            ],
            "format": { "duration": "12.4" }
        }"#;
        let output: FfprobeOutput = serde_json::from_str(json).unwrap();
        let info = parse_probe_output(&output);

        assert!(info.has_video());
        assert_eq!((info.width, info.height), (1280, 720));
        assert_eq!(info.codec, "h264");
        assert_eq!(info.audio_channels, 2);
        assert_eq!(info.duration_us, TimeUs(12_400_000));
    }

    #[test]
    fn parse_audio_only() {
        let json = r#"{
            "streams": [ { "codec_type": "audio", "codec_name": "mp3", "channels": 2 } ],
            "format": { "duration": "20.0" }
        }"#;
        let output: FfprobeOutput = serde_json::from_str(json).unwrap();
        let info = parse_probe_output(&output);
        assert!(!info.has_video());
        assert_eq!(info.codec, "mp3");
        assert_eq!(info.duration_us, TimeUs(20_000_000));
    }

    #[test]
    fn parse_missing_everything_degrades_to_zero() {
        let output: FfprobeOutput =
            serde_json::from_str(r#"{ "streams": [], "format": {} }"#).unwrap();
        assert_eq!(parse_probe_output(&output), StreamInfo::default());
    }

    #[test]
    fn overlay_type_by_extension_then_streams() {
        let none = StreamInfo::default();
        assert_eq!(detect_overlay_type("party.GIF", &none), OverlayType::Gif);
        assert_eq!(detect_overlay_type("logo.png", &none), OverlayType::Image);
        assert_eq!(detect_overlay_type("song.mp3", &none), OverlayType::Audio);

        let video = StreamInfo {
            width: 1920,
            height: 1080,
            ..Default::default()
        };
        assert_eq!(detect_overlay_type("clip.mkv", &video), OverlayType::Video);

        let audio = StreamInfo {
            audio_channels: 2,
            ..Default::default()
        };
        assert_eq!(detect_overlay_type("track.bin", &audio), OverlayType::Audio);
    }

    #[tokio::test]
    async fn garbage_bytes_fail_to_probe() {
        if !ffprobe_available() {
            eprintln!("ffprobe not installed, skipping");
            return;
        }
        let prober = FfprobeProber::new(&MediaSettings::default());
        let src = MediaSource::new("junk.mp4", "video/mp4", b"definitely not media".to_vec());
        assert!(prober.probe(&src).await.is_err());
    }

    #[tokio::test]
    async fn missing_ffprobe_is_an_exec_error() {
        let settings = MediaSettings {
            ffprobe: PathBuf::from("/nonexistent/cutline-ffprobe"),
            ..Default::default()
        };
        let prober = FfprobeProber::new(&settings);
        let src = MediaSource::new("a.mp3", "audio/mpeg", vec![0u8; 8]);
        assert!(matches!(
            prober.probe(&src).await,
            Err(RenderError::FfprobeExec(_))
        ));
    }
}
