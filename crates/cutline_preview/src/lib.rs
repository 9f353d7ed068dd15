pub mod element;
pub mod error;
pub mod mpv;
pub mod playable;
pub mod sync;

pub use element::{MediaElement, MediaEvent};
pub use error::{PreviewError, Result};
pub use mpv::MpvElement;
pub use playable::PlayableFiles;
pub use sync::PlayheadSync;
