use cutline_core::types::TimeUs;

use crate::error::Result;

/// Notification from the playing media element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaEvent {
    TimeUpdate(TimeUs),
    Ended,
}

/// The one external player the preview drives.
pub trait MediaElement {
    /// Replace whatever is loaded with `url`.
    fn load(&mut self, url: &str) -> Result<()>;
    fn unload(&mut self) -> Result<()>;
    fn set_time(&mut self, t: TimeUs) -> Result<()>;
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self) -> Result<()>;
}
