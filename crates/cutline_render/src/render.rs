use cutline_core::store::OverlayStore;
use cutline_core::types::*;
use cutline_core::Editor;
use serde::Serialize;
use std::sync::Mutex;

use crate::engine::{EngineJob, MediaEngine, VirtualFile};
use crate::error::{RenderError, Result};
use crate::lock_editor;

const RENDER_INPUT: &str = "input.mp4";
const RENDER_OUTPUT: &str = "output.mp4";

/// One filter operation handed to the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RenderOp {
    DrawText {
        text: String,
        x: f64,
        y: f64,
        size: u32,
        /// Already in the engine's `0xRRGGBB` form.
        color: String,
    },
    /// Nothing to draw: copy the input through.
    PassThrough,
}

/// A snapshot of what a render needs: the base video and the ordered filter list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPlan {
    pub input: MediaSource,
    pub input_duration: TimeUs,
    pub ops: Vec<RenderOp>,
}

/// How a plan is turned into engine arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Virtual name the engine exposes the font under.
    pub font_name: String,
    /// Scale the input to this width before drawing, so overlay coordinates taken on a
    /// preview surface of the same width land where they were placed.
    pub scale_width: Option<u32>,
}

impl RenderOptions {
    pub fn from_editor(editor: &Editor) -> Self {
        let settings = editor.settings();
        let width = settings.surface_width.round();
        Self {
            font_name: settings.media.font_name.clone(),
            scale_width: (width >= 1.0).then_some(width as u32),
        }
    }
}

/// Project the store onto render instructions: one `DrawText` per text overlay, in
/// overlay-track order, or a single `PassThrough` when there is no text.
pub fn build_render_plan(store: &OverlayStore) -> Result<RenderPlan> {
    let (input, input_duration) = store
        .video_track()
        .iter()
        .find_map(|item| match &item.kind {
            OverlayKind::Video(v) => Some((v.source.clone(), v.duration_us)),
            _ => None,
        })
        .ok_or(RenderError::NoClips)?;

    let mut ops: Vec<RenderOp> = store
        .overlays()
        .iter()
        .filter_map(|item| match &item.kind {
            OverlayKind::Text(t) => Some(RenderOp::DrawText {
                text: t.content.clone(),
                x: t.x,
                y: t.y,
                size: t.size,
                color: engine_color(&t.color),
            }),
            _ => None,
        })
        .collect();

    if ops.is_empty() {
        ops.push(RenderOp::PassThrough);
    }

    Ok(RenderPlan {
        input,
        input_duration,
        ops,
    })
}

/// `#RRGGBB` becomes `0xRRGGBB`. Anything else (named colors) is passed through.
pub fn engine_color(color: &str) -> String {
    match color.strip_prefix('#') {
        Some(hex) => format!("0x{hex}"),
        None => color.to_string(),
    }
}

/// Escape single quotes for a quoted drawtext value.
fn escape_text(text: &str) -> String {
    text.replace('\'', "'\\''")
}

/// Turn a plan into an engine job.
pub fn render_job(plan: &RenderPlan, options: &RenderOptions) -> EngineJob {
    let mut args = vec!["-i".to_string(), RENDER_INPUT.to_string()];

    let draws: Vec<String> = plan
        .ops
        .iter()
        .filter_map(|op| match op {
            RenderOp::DrawText {
                text,
                x,
                y,
                size,
                color,
            } => Some(format!(
                "drawtext=fontfile={}:text='{}':x={x}:y={y}:fontsize={size}:fontcolor={color}",
                options.font_name,
                escape_text(text)
            )),
            RenderOp::PassThrough => None,
        })
        .collect();

    if draws.is_empty() {
        args.extend(["-c".to_string(), "copy".to_string()]);
    } else {
        let mut filters = Vec::with_capacity(draws.len() + 1);
        if let Some(width) = options.scale_width {
            filters.push(format!("scale={width}:-2"));
        }
        filters.extend(draws);
        args.push("-vf".to_string());
        args.push(filters.join(","));
    }
    args.push(RENDER_OUTPUT.to_string());

    EngineJob {
        inputs: vec![VirtualFile::from_source(RENDER_INPUT, &plan.input)],
        args,
        output: RENDER_OUTPUT.to_string(),
        duration: Some(plan.input_duration),
    }
}

/// Render the current editor state. The plan is snapshotted under the lock; the engine
/// runs without it.
pub async fn render(editor: &Mutex<Editor>, engine: &dyn MediaEngine) -> Result<MediaSource> {
    let (plan, options) = {
        let editor = lock_editor(editor)?;
        (
            build_render_plan(editor.store())?,
            RenderOptions::from_editor(&editor),
        )
    };
    tracing::info!(ops = plan.ops.len(), input = %plan.input.name, "render started");

    let bytes = engine.run(render_job(&plan, &options)).await.map_err(|e| {
        tracing::warn!("render failed: {}", e);
        e
    })?;

    tracing::info!(bytes = bytes.len(), "render finished");
    Ok(MediaSource::new(RENDER_OUTPUT, "video/mp4", bytes))
}
