use crate::error::{RenderError, Result};
use async_trait::async_trait;
use cutline_core::config::MediaSettings;
use cutline_core::types::{MediaSource, TimeUs};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A named in-memory file handed to the engine.
#[derive(Clone)]
pub struct VirtualFile {
    pub name: String,
    pub data: Arc<[u8]>,
}

impl VirtualFile {
    pub fn new(name: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Expose a source's bytes under `name` without copying them.
    pub fn from_source(name: impl Into<String>, source: &MediaSource) -> Self {
        Self {
            name: name.into(),
            data: Arc::clone(&source.data),
        }
    }
}

impl std::fmt::Debug for VirtualFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualFile")
            .field("name", &self.name)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// One invocation of the media-processing engine: named inputs, an ordered argument
/// list that refers to them by name, and the file to read back.
#[derive(Debug, Clone)]
pub struct EngineJob {
    pub inputs: Vec<VirtualFile>,
    pub args: Vec<String>,
    pub output: String,
    /// Expected output length, for progress percentages.
    pub duration: Option<TimeUs>,
}

/// Progress update while a job runs, read from ffmpeg's status lines.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EngineProgress {
    /// How much of the output has been written.
    pub position: TimeUs,
    /// Expected output length, when the job knows it.
    pub total: Option<TimeUs>,
    pub frame: u64,
    /// Encoding speed as a multiple of real time; 0 when ffmpeg has not reported it.
    pub speed: f64,
}

impl EngineProgress {
    /// Share of the expected output written so far, 0 to 100.
    pub fn percent(&self) -> f64 {
        match self.total {
            Some(total) if total > TimeUs::ZERO => {
                (self.position.0 as f64 / total.0 as f64 * 100.0).clamp(0.0, 100.0)
            }
            _ => 0.0,
        }
    }

    /// Wall time left at the current speed.
    pub fn eta(&self) -> Option<TimeUs> {
        let total = self.total?;
        if self.speed <= 0.0 || total <= self.position {
            return None;
        }
        Some(TimeUs::from_seconds((total - self.position).as_seconds() / self.speed))
    }
}

#[async_trait]
pub trait MediaEngine: Send + Sync {
    /// Run `job` and return the bytes of its output file.
    async fn run(&self, job: EngineJob) -> Result<Vec<u8>>;
}

/// Runs jobs through the ffmpeg binary, each in a fresh scratch directory.
pub struct FfmpegEngine {
    binary: PathBuf,
    font: Option<VirtualFile>,
    progress: Option<tokio::sync::watch::Sender<EngineProgress>>,
}

impl FfmpegEngine {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            font: None,
            progress: None,
        }
    }

    /// Build an engine from settings, loading the font once so every job can use it.
    pub fn from_settings(settings: &MediaSettings) -> Result<Self> {
        Self::new(&settings.ffmpeg).with_font(&settings.font_path, &settings.font_name)
    }

    /// Read the font at `path` and expose it to every job as `name`.
    pub fn with_font(mut self, path: impl AsRef<Path>, name: impl Into<String>) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        let name = name.into();
        tracing::debug!(font = %name, bytes = data.len(), "font loaded");
        self.font = Some(VirtualFile::new(name, data));
        Ok(self)
    }

    pub fn with_progress(mut self, tx: tokio::sync::watch::Sender<EngineProgress>) -> Self {
        self.progress = Some(tx);
        self
    }

    pub fn font_name(&self) -> Option<&str> {
        self.font.as_ref().map(|f| f.name.as_str())
    }
}

#[async_trait]
impl MediaEngine for FfmpegEngine {
    async fn run(&self, job: EngineJob) -> Result<Vec<u8>> {
        use std::process::Stdio;
        use tokio::io::{AsyncBufReadExt, BufReader};
        use tokio::process::Command;

        let dir = tempfile::tempdir()?;
        for file in job.inputs.iter().chain(self.font.iter()) {
            let path = scratch_path(dir.path(), &file.name)?;
            tokio::fs::write(path, &file.data).await?;
        }
        let output_path = scratch_path(dir.path(), &job.output)?;

        tracing::debug!(args = ?job.args, output = %job.output, "running ffmpeg");
        let mut child = Command::new(&self.binary)
            .current_dir(dir.path())
            .arg("-y")
            .args(&job.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    RenderError::FfmpegNotFound
                } else {
                    RenderError::Io(e)
                }
            })?;

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| RenderError::FfmpegFailed("stderr not captured".into()))?;
        let mut lines = BufReader::new(stderr).lines();
        let mut last_line = String::new();

        while let Ok(Some(line)) = lines.next_line().await {
            if let Some(progress) = parse_progress(&line, job.duration) {
                if let Some(tx) = &self.progress {
                    let _ = tx.send(progress);
                }
            } else if !line.trim().is_empty() {
                last_line = line;
            }
        }

        let status = child.wait().await.map_err(RenderError::Io)?;
        if !status.success() {
            tracing::warn!(%status, %last_line, "ffmpeg failed");
            return Err(RenderError::FfmpegFailed(format!(
                "ffmpeg exited with {status}: {last_line}"
            )));
        }

        match tokio::fs::read(&output_path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(RenderError::MissingOutput(job.output))
            }
            Err(e) => Err(RenderError::Io(e)),
        }
    }
}

/// Resolve a virtual file name inside the scratch directory. Names must be plain file
/// names.
fn scratch_path(dir: &Path, name: &str) -> Result<PathBuf> {
    let plain = Path::new(name)
        .file_name()
        .map(|n| n == std::ffi::OsStr::new(name))
        .unwrap_or(false);
    if !plain {
        return Err(RenderError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("virtual file name must be a plain file name: {name:?}"),
        )));
    }
    Ok(dir.join(name))
}

/// Parse an ffmpeg stderr status line.
///
/// Example line: `frame=  123 fps= 60 ... time=00:01:02.05 speed=1.50x`
pub fn parse_progress(line: &str, total: Option<TimeUs>) -> Option<EngineProgress> {
    if !line.contains("time=") {
        return None;
    }

    let frame = extract_value(line, "frame=")
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0);

    let speed = extract_value(line, "speed=")
        .and_then(|v| v.trim_end_matches('x').parse::<f64>().ok())
        .filter(|s| s.is_finite())
        .unwrap_or(0.0);

    // `time=N/A` shows up before the first frame is written.
    let position = extract_value(line, "time=")
        .and_then(|v| parse_timestamp(&v))
        .unwrap_or(TimeUs::ZERO);

    Some(EngineProgress {
        position,
        total,
        frame,
        speed,
    })
}

fn extract_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let start = line.find(key)? + key.len();
    let rest = line[start..].trim_start();
    let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    Some(&rest[..end]).filter(|v| !v.is_empty())
}

/// `HH:MM:SS.cc` as a time.
fn parse_timestamp(s: &str) -> Option<TimeUs> {
    let mut parts = s.split(':');
    let hours: u32 = parts.next()?.parse().ok()?;
    let mins: u32 = parts.next()?.parse().ok()?;
    let secs: f64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || !(0.0..60.0).contains(&secs) {
        return None;
    }
    let whole = TimeUs(i64::from(hours) * 3_600_000_000 + i64::from(mins) * 60_000_000);
    Some(whole + TimeUs::from_seconds(secs))
}
