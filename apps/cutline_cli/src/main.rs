//! Cutline CLI: drive the overlay editor model against real media.
//!
//! Usage:
//!   cutline probe <FILE>                       Show what an asset contains
//!   cutline trim <FILE> --start --end -o OUT   Cut an audio or video file
//!   cutline render <VIDEO> --text ... -o OUT   Burn a text overlay into a video
//!   cutline preview <FILE>                     Play a file through the playhead clock
//!   cutline check                              Check external tools

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cutline_core::config::{EditorSettings, LoggingSettings};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "cutline", about = "Timeline overlay editing from the command line", version)]
struct Cli {
    /// Settings file (JSON)
    #[arg(short, long, global = true, default_value = "cutline.json")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe a media file and print its stream information
    Probe {
        /// Path to the media file
        file: PathBuf,
    },

    /// Trim an audio or video file to a time range
    Trim {
        /// Path to the media file
        file: PathBuf,

        /// Range start (seconds)
        #[arg(long, default_value = "0")]
        start: f64,

        /// Range end (seconds); defaults to the end of the file
        #[arg(long)]
        end: Option<f64>,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Render a video with an optional text overlay
    Render {
        /// Path to the video file
        video: PathBuf,

        /// Text to draw over the video
        #[arg(long)]
        text: Option<String>,

        /// Text position (pixels)
        #[arg(long, default_value = "50")]
        x: f64,
        #[arg(long, default_value = "50")]
        y: f64,

        /// Font size
        #[arg(long, default_value = "24")]
        size: u32,

        /// Text color as #RRGGBB
        #[arg(long, default_value = "#ffffff")]
        color: String,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Play a file in mpv, keeping the editor clock in step
    Preview {
        /// Path to the media file
        file: PathBuf,

        /// Start position (seconds)
        #[arg(long)]
        start: Option<f64>,
    },

    /// Check that ffmpeg, ffprobe and mpv are available
    Check,
}

fn init_logging(settings: &LoggingSettings, verbose: bool) {
    let fallback = if verbose {
        "debug".to_string()
    } else {
        settings.level.clone()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if settings.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = EditorSettings::load(&cli.config);
    if cli.json_logs {
        settings.logging.json = true;
    }
    init_logging(&settings.logging, cli.verbose);

    match cli.command {
        Commands::Probe { file } => commands::probe::run(&settings, file).await,
        Commands::Trim {
            file,
            start,
            end,
            output,
        } => commands::trim::run(settings, file, start, end, output).await,
        Commands::Render {
            video,
            text,
            x,
            y,
            size,
            color,
            output,
        } => {
            let text = text.map(|content| commands::render::TextSpec {
                content,
                x,
                y,
                size,
                color,
            });
            commands::render::run(settings, video, text, output).await
        }
        Commands::Preview { file, start } => commands::preview::run(settings, file, start).await,
        Commands::Check => commands::check::run(&settings),
    }
}
