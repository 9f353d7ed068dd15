//! Check that the external media tools are installed.

use std::path::Path;
use std::process::{Command, Stdio};

use cutline_core::config::EditorSettings;

struct Tool<'a> {
    binary: &'a Path,
    purpose: &'static str,
    version_flag: &'static str,
    required: bool,
}

fn available(binary: &Path, version_flag: &str) -> bool {
    Command::new(binary)
        .arg(version_flag)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

pub fn run(settings: &EditorSettings) -> anyhow::Result<()> {
    let media = &settings.media;
    let tools = [
        Tool {
            binary: &media.ffmpeg,
            purpose: "trimming and rendering",
            version_flag: "-version",
            required: true,
        },
        Tool {
            binary: &media.ffprobe,
            purpose: "media file analysis",
            version_flag: "-version",
            required: true,
        },
        Tool {
            binary: &media.mpv,
            purpose: "preview playback",
            version_flag: "--version",
            required: false,
        },
    ];

    println!("Cutline System Check");
    println!("{}", "=".repeat(50));

    let mut missing_required = Vec::new();
    for tool in &tools {
        if available(tool.binary, tool.version_flag) {
            println!("[OK] {} ({})", tool.binary.display(), tool.purpose);
        } else if tool.required {
            println!("[MISSING] {} ({})", tool.binary.display(), tool.purpose);
            missing_required.push(tool.binary.display().to_string());
        } else {
            println!("[WARN] {} not found ({})", tool.binary.display(), tool.purpose);
        }
    }

    if media.font_path.is_file() {
        println!("[OK] Font: {}", media.font_path.display());
    } else {
        println!(
            "[WARN] Font {} not found; text rendering will fail",
            media.font_path.display()
        );
    }

    println!();
    if missing_required.is_empty() {
        println!("All required tools are available.");
        Ok(())
    } else {
        println!("Install with:");
        println!("  sudo apt install ffmpeg");
        anyhow::bail!("Missing required tools: {}", missing_required.join(", "))
    }
}
