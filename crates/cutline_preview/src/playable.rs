use std::path::{Path, PathBuf};

use cutline_core::types::MediaSource;
use tempfile::TempDir;

use crate::error::{PreviewError, Result};

/// Scratch directory that turns in-memory sources into files the player can open.
///
/// Only the most recently resolved source is kept on disk; resolving another one
/// replaces it. Everything is removed when this is dropped.
pub struct PlayableFiles {
    dir: TempDir,
    current: Option<(String, PathBuf)>,
}

impl PlayableFiles {
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("cutline-preview").tempdir()?;
        Ok(Self { dir, current: None })
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Path to a file holding `source`'s bytes, written on first use.
    pub fn resolve(&mut self, source: &MediaSource) -> Result<PathBuf> {
        if let Some((handle, path)) = &self.current {
            if *handle == source.url {
                return Ok(path.clone());
            }
        }
        if source.is_empty() {
            return Err(PreviewError::EmptySource(source.name.clone()));
        }
        self.release();

        let path = self.dir.path().join(file_name(source));
        std::fs::write(&path, &source.data[..])?;
        tracing::debug!(name = %source.name, path = %path.display(), bytes = source.len(), "source written for playback");
        self.current = Some((source.url.clone(), path.clone()));
        Ok(path)
    }

    /// Delete the file of the current source, if any.
    pub fn release(&mut self) {
        if let Some((_, path)) = self.current.take() {
            if let Err(e) = std::fs::remove_file(&path) {
                tracing::warn!(path = %path.display(), "failed to remove playback file: {}", e);
            }
        }
    }
}

/// The handle's id keeps names unique; the extension lets the player pick a demuxer.
fn file_name(source: &MediaSource) -> String {
    let stem: String = source
        .url
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    let stem = if stem.is_empty() { "source".to_string() } else { stem };
    match Path::new(&source.name).extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem,
    }
}
