use cutline_core::types::TimeUs;
use serde_json::{json, Value};
use std::ffi::OsString;
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::element::{MediaElement, MediaEvent};
use crate::error::{PreviewError, Result};

const TIME_POS_OBSERVER: u64 = 1;

/// An mpv player driven over its JSON IPC socket.
pub struct MpvElement {
    process: Option<Child>,
    socket_path: PathBuf,
    next_request: AtomicU64,
}

impl MpvElement {
    /// Talk to an mpv that is already listening on `socket_path`.
    pub fn connect(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            process: None,
            socket_path: socket_path.into(),
            next_request: AtomicU64::new(1),
        }
    }

    /// Start an idle mpv with its IPC server on a per-process socket and wait for it.
    pub fn spawn(binary: impl Into<OsString>, extra_args: &[String]) -> Result<Self> {
        let socket_path =
            std::env::temp_dir().join(format!("cutline-mpv-{}", std::process::id()));
        let _ = std::fs::remove_file(&socket_path);

        let child = Command::new(binary.into())
            .args([
                "--idle=yes",
                "--keep-open=yes",
                "--pause",
                "--osc=no",
                "--osd-level=0",
                "--title=cutline-preview",
            ])
            .arg(format!("--input-ipc-server={}", socket_path.display()))
            .args(extra_args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(PreviewError::Spawn)?;

        let mut element = Self::connect(socket_path);
        element.process = Some(child);

        for _ in 0..50 {
            if element.socket_path.exists() {
                tracing::info!(socket = %element.socket_path.display(), "mpv started");
                return Ok(element);
            }
            std::thread::sleep(Duration::from_millis(100));
        }
        element.stop();
        Err(PreviewError::SocketTimeout)
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    pub fn is_running(&self) -> bool {
        self.process.is_some()
    }

    /// Send one command and wait for its reply, skipping any events mpv interleaves.
    fn send_command(&self, command: Value) -> Result<Value> {
        let request_id = self.next_request.fetch_add(1, Ordering::Relaxed);
        let mut stream = UnixStream::connect(&self.socket_path).map_err(PreviewError::Connect)?;
        stream.set_read_timeout(Some(Duration::from_secs(2)))?;

        let msg = json!({ "command": command, "request_id": request_id });
        stream.write_all(format!("{msg}\n").as_bytes())?;

        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                return Err(PreviewError::Io(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "mpv closed the connection",
                )));
            }
            let reply: Value = serde_json::from_str(&line)?;
            if reply.get("request_id").and_then(Value::as_u64) != Some(request_id) {
                continue;
            }
            return match reply.get("error").and_then(Value::as_str) {
                Some("success") | None => Ok(reply),
                Some(reason) => Err(PreviewError::Rejected {
                    command: command.to_string(),
                    reason: reason.to_string(),
                }),
            };
        }
    }

    /// Current playback position as reported by mpv.
    pub fn position(&self) -> Result<Option<TimeUs>> {
        let reply = self.send_command(json!(["get_property", "time-pos"]))?;
        Ok(reply
            .get("data")
            .and_then(Value::as_f64)
            .map(TimeUs::from_seconds))
    }

    /// Subscribe to playback time and end-of-file notifications. Events arrive on the
    /// returned channel until mpv goes away or the receiver is dropped.
    pub async fn observe(&self) -> Result<tokio::sync::mpsc::Receiver<MediaEvent>> {
        use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

        let stream = tokio::net::UnixStream::connect(&self.socket_path)
            .await
            .map_err(PreviewError::Connect)?;
        let (read_half, mut write_half) = stream.into_split();
        let msg = json!({ "command": ["observe_property", TIME_POS_OBSERVER, "time-pos"] });
        write_half.write_all(format!("{msg}\n").as_bytes()).await?;

        let (tx, rx) = tokio::sync::mpsc::channel(64);
        tokio::spawn(async move {
            // The write half must stay open for mpv to keep the subscription.
            let _write_half = write_half;
            let mut lines = BufReader::new(read_half).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if let Some(event) = parse_event(&line) {
                    if tx.send(event).await.is_err() {
                        break;
                    }
                }
            }
            tracing::debug!("mpv event stream closed");
        });
        Ok(rx)
    }

    pub fn stop(&mut self) {
        if let Some(mut child) = self.process.take() {
            let _ = child.kill();
            let _ = child.wait();
            let _ = std::fs::remove_file(&self.socket_path);
        }
    }
}

impl MediaElement for MpvElement {
    fn load(&mut self, url: &str) -> Result<()> {
        self.send_command(json!(["loadfile", url, "replace"]))?;
        Ok(())
    }

    fn unload(&mut self) -> Result<()> {
        self.send_command(json!(["stop"]))?;
        Ok(())
    }

    fn set_time(&mut self, t: TimeUs) -> Result<()> {
        self.send_command(json!(["seek", t.as_seconds(), "absolute"]))?;
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        self.send_command(json!(["set_property", "pause", false]))?;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.send_command(json!(["set_property", "pause", true]))?;
        Ok(())
    }
}

impl Drop for MpvElement {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Map one line of mpv's event stream to a [`MediaEvent`].
pub fn parse_event(line: &str) -> Option<MediaEvent> {
    let value: Value = serde_json::from_str(line).ok()?;
    match value.get("event")?.as_str()? {
        "property-change" if value.get("name")?.as_str()? == "time-pos" => value
            .get("data")?
            .as_f64()
            .map(|secs| MediaEvent::TimeUpdate(TimeUs::from_seconds(secs))),
        "end-file" => match value.get("reason").and_then(Value::as_str) {
            Some("eof") | None => Some(MediaEvent::Ended),
            Some(_) => None,
        },
        _ => None,
    }
}
