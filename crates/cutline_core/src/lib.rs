pub mod clock;
pub mod config;
pub mod editor;
pub mod error;
pub mod interaction;
pub mod store;
pub mod timeline;
pub mod trim;
pub mod types;

pub use clock::{format_clock, Clock, Tick};
pub use config::EditorSettings;
pub use editor::Editor;
pub use error::{CoreError, Result};
pub use interaction::{Edge, Gesture};
pub use store::OverlayStore;
pub use timeline::{Point, Rect, TimelineGeometry, TimelineSpan};
pub use trim::{TrimMode, TrimRequest, TrimSession};
pub use types::*;
