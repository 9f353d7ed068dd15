use cutline_core::clock::Clock;
use cutline_core::types::{MediaSource, TimeUs};
use cutline_core::Editor;
use uuid::Uuid;

use crate::element::{MediaElement, MediaEvent};
use crate::error::Result;
use crate::playable::PlayableFiles;

/// Keeps one media element in step with the editor clock.
///
/// Seeks flow clock → element as one-shot targets; time flows element → clock through
/// [`MediaEvent`]s. Without an element every operation is skipped.
pub struct PlayheadSync<E: MediaElement> {
    element: Option<E>,
    source: Option<String>,
    playing: bool,
    files: Option<PlayableFiles>,
    /// Handle of the `MediaSource` behind `source`, when it came from one.
    handle: Option<String>,
    /// Item whose trim session put the current source in place.
    trim_item: Option<Uuid>,
}

impl<E: MediaElement> Default for PlayheadSync<E> {
    fn default() -> Self {
        Self {
            element: None,
            source: None,
            playing: false,
            files: None,
            handle: None,
            trim_item: None,
        }
    }
}

impl<E: MediaElement> PlayheadSync<E> {
    pub fn new(element: Option<E>) -> Self {
        Self {
            element,
            ..Self::default()
        }
    }

    pub fn element(&self) -> Option<&E> {
        self.element.as_ref()
    }

    pub fn element_mut(&mut self) -> Option<&mut E> {
        self.element.as_mut()
    }

    /// Swap the underlying element, returning the old one.
    pub fn replace_element(&mut self, element: Option<E>) -> Option<E> {
        self.source = None;
        self.handle = None;
        self.trim_item = None;
        self.playing = false;
        std::mem::replace(&mut self.element, element)
    }

    /// URL currently loaded into the element.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Hand the element to a new item: tear down the old source, then load `url`.
    pub fn attach(&mut self, url: &str) -> Result<()> {
        let Some(element) = self.element.as_mut() else {
            tracing::debug!(%url, "no media element, attach skipped");
            return Ok(());
        };
        if self.source.is_some() {
            element.unload()?;
            self.source = None;
        }
        element.load(url)?;
        self.playing = false;
        self.source = Some(url.to_string());
        self.handle = None;
        self.trim_item = None;
        tracing::debug!(%url, "media element attached");
        Ok(())
    }

    /// Attach an in-memory source. Its bytes are written to a scratch file the element
    /// can open, since the source's own handle is only meaningful inside the editor.
    pub fn attach_source(&mut self, source: &MediaSource) -> Result<()> {
        if self.element.is_none() {
            tracing::debug!(name = %source.name, "no media element, attach skipped");
            return Ok(());
        }
        if self.handle.as_deref() == Some(source.url.as_str()) {
            return Ok(());
        }
        if self.files.is_none() {
            self.files = Some(PlayableFiles::new()?);
        }
        let path = match self.files.as_mut() {
            Some(files) => files.resolve(source)?,
            None => return Ok(()),
        };
        self.attach(&path.to_string_lossy())?;
        self.handle = Some(source.url.clone());
        Ok(())
    }

    /// Give the element to the item being trimmed while a trim session is open, and
    /// release it once the session ends. Call after anything that may start or end one.
    pub fn follow_trim(&mut self, editor: &Editor) -> Result<()> {
        let target = editor.trim_session().and_then(|session| {
            let source = editor.store().get(session.item_id())?.source()?;
            Some((session.item_id(), source))
        });
        match target {
            Some((item_id, source)) => {
                self.attach_source(source)?;
                if self.handle.is_some() {
                    self.trim_item = Some(item_id);
                }
                Ok(())
            }
            None if self.trim_item.is_some() => {
                tracing::debug!("trim ended, releasing media element");
                self.detach()
            }
            None => Ok(()),
        }
    }

    /// Release the element's source.
    pub fn detach(&mut self) -> Result<()> {
        self.handle = None;
        self.trim_item = None;
        if let Some(files) = self.files.as_mut() {
            files.release();
        }
        let Some(element) = self.element.as_mut() else {
            return Ok(());
        };
        if self.source.take().is_some() {
            element.unload()?;
        }
        self.playing = false;
        Ok(())
    }

    /// Push clock state to the element: a pending seek first, then play/pause intent.
    pub fn apply(&mut self, clock: &mut Clock) -> Result<()> {
        let Some(element) = self.element.as_mut() else {
            return Ok(());
        };
        let seeked = match clock.take_seek() {
            Some(t) => {
                element.set_time(t)?;
                true
            }
            None => false,
        };
        let want = clock.is_playing();
        if want && (seeked || !self.playing) {
            element.play()?;
        } else if !want && self.playing {
            element.pause()?;
        }
        self.playing = want;
        Ok(())
    }

    /// Feed an element notification into the clock.
    pub fn handle_event(&mut self, clock: &mut Clock, event: MediaEvent) -> Result<()> {
        match event {
            MediaEvent::TimeUpdate(t) => clock.on_media_time(t),
            MediaEvent::Ended => {
                clock.reset_to_start();
                if let Some(element) = self.element.as_mut() {
                    element.pause()?;
                    element.set_time(TimeUs::ZERO)?;
                }
                self.playing = false;
            }
        }
        Ok(())
    }
}
