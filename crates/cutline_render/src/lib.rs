pub mod engine;
pub mod error;
pub mod import;
pub mod probe;
pub mod render;
pub mod thumbnails;
pub mod trim;

#[cfg(test)]
pub(crate) mod testing;

pub use engine::{EngineJob, EngineProgress, FfmpegEngine, MediaEngine, VirtualFile};
pub use error::{RenderError, Result};
pub use import::{import_audio, import_file, import_video, import_visual};
pub use probe::{detect_overlay_type, FfprobeProber, MediaProber, StreamInfo};
pub use render::{build_render_plan, render, render_job, RenderOp, RenderOptions, RenderPlan};
pub use trim::{commit_trim, trim_job};

use cutline_core::Editor;
use std::sync::{Mutex, MutexGuard};

/// Lock the shared editor. Callers keep the guard for synchronous work only and never
/// across an await.
pub(crate) fn lock_editor(editor: &Mutex<Editor>) -> Result<MutexGuard<'_, Editor>> {
    editor.lock().map_err(|_| RenderError::StatePoisoned)
}
