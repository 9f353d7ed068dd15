use crate::error::Result;
use crate::types::TimeUs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Editor-wide settings, read from a JSON file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditorSettings {
    /// Timeline length outside trim mode.
    pub timeline_window_us: TimeUs,
    /// Preview surface size in pixels; spatial drags are clamped to it.
    pub surface_width: f64,
    pub surface_height: f64,
    pub media: MediaSettings,
    pub logging: LoggingSettings,
}

/// External media tooling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MediaSettings {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
    /// Player used for the preview window.
    pub mpv: PathBuf,
    /// Font file handed to drawtext.
    pub font_path: PathBuf,
    /// Name the font is exposed under inside every engine job.
    pub font_name: String,
    /// Where in a video its timeline thumbnail is taken.
    pub thumbnail_offset_us: TimeUs,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive, e.g. "info" or "cutline_render=debug,warn".
    pub level: String,
    pub json: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            timeline_window_us: TimeUs(30_000_000),
            surface_width: 640.0,
            surface_height: 360.0,
            media: MediaSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
            mpv: PathBuf::from("mpv"),
            font_path: PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"),
            font_name: "arial.ttf".to_string(),
            thumbnail_offset_us: TimeUs(100_000),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl EditorSettings {
    /// Load settings from `path`, falling back to defaults when the file is missing or
    /// cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match Self::try_load(path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Failed to load settings at {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn try_load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Write settings as pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn defaults() {
        let s = EditorSettings::default();
        assert_eq!(s.timeline_window_us, TimeUs(30_000_000));
        assert_eq!((s.surface_width, s.surface_height), (640.0, 360.0));
        assert_eq!(s.media.font_name, "arial.ttf");
        assert_eq!(s.media.thumbnail_offset_us, TimeUs(100_000));
        assert_eq!(s.logging.level, "info");
        assert!(!s.logging.json);
    }

    #[test]
    fn save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut s = EditorSettings::default();
        s.surface_width = 1280.0;
        s.media.ffmpeg = PathBuf::from("/opt/ffmpeg/bin/ffmpeg");
        s.logging.json = true;
        s.save(&path).unwrap();

        assert_eq!(EditorSettings::load(&path), s);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = EditorSettings::load(dir.path().join("absent.json"));
        assert_eq!(s, EditorSettings::default());
    }

    #[test]
    fn invalid_file_falls_back_but_try_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert_eq!(EditorSettings::load(&path), EditorSettings::default());
        assert!(matches!(EditorSettings::try_load(&path), Err(CoreError::Json(_))));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "surface_width": 1920.0, "logging": { "level": "debug" } }"#)
            .unwrap();

        let s = EditorSettings::load(&path);
        assert_eq!(s.surface_width, 1920.0);
        assert_eq!(s.surface_height, 360.0);
        assert_eq!(s.logging.level, "debug");
        assert_eq!(s.media, MediaSettings::default());
    }
}
