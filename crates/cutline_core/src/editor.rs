use crate::clock::Clock;
use crate::config::EditorSettings;
use crate::error::{CoreError, Result};
use crate::interaction::Gesture;
use crate::store::OverlayStore;
use crate::timeline::{span, Rect, TimelineSpan};
use crate::trim::{TrimMode, TrimRequest, TrimSession};
use crate::types::*;
use uuid::Uuid;

/// Everything one editing session owns: the overlay store, the playhead, the active
/// gesture slot, the optional trim session and the visible panel.
///
/// Front ends and async flows hold it behind a single lock and go through these methods.
#[derive(Debug, Clone)]
pub struct Editor {
    pub(crate) store: OverlayStore,
    pub(crate) clock: Clock,
    pub(crate) gesture: Option<Gesture>,
    pub(crate) trim: Option<TrimSession>,
    pub(crate) panel: Panel,
    pub(crate) settings: EditorSettings,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}

impl Editor {
    pub fn new(settings: EditorSettings) -> Self {
        Self {
            store: OverlayStore::new(),
            clock: Clock::new(settings.timeline_window_us),
            gesture: None,
            trim: None,
            panel: Panel::Media,
            settings,
        }
    }

    pub fn store(&self) -> &OverlayStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut OverlayStore {
        &mut self.store
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn panel(&self) -> Panel {
        self.panel
    }

    /// The preview surface, used to bound spatial drags.
    pub fn surface(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            self.settings.surface_width,
            self.settings.surface_height,
        )
    }

    /// Select an item and route it to its kind's active id and panel. Video items are
    /// selected but open no panel.
    pub fn click_item(&mut self, id: Uuid) -> bool {
        let Some(kind) = self.store.get(id).map(|item| item.overlay_type()) else {
            tracing::debug!(%id, "click on unknown overlay ignored");
            return false;
        };
        self.store.select(Some(id));
        let panel = match kind {
            OverlayType::Text => Some(Panel::Text),
            OverlayType::Image => Some(Panel::Image),
            OverlayType::Gif => Some(Panel::Gif),
            OverlayType::Audio => Some(Panel::Audio),
            OverlayType::Video => None,
        };
        if let Some(panel) = panel {
            self.store.set_active(kind, Some(id));
            self.panel = panel;
        }
        true
    }

    /// Spans for the timeline strip: the video track first, then the overlay track.
    pub fn timeline_spans(&self) -> Vec<TimelineSpan> {
        let duration = self.clock.duration();
        self.store.items().map(|item| span(item, duration)).collect()
    }

    // -----------------------------------------------------------------------
    // trim session
    // -----------------------------------------------------------------------

    pub fn trim_session(&self) -> Option<&TrimSession> {
        self.trim.as_ref()
    }

    pub fn trim_session_mut(&mut self) -> Option<&mut TrimSession> {
        self.trim.as_mut()
    }

    /// Start trimming the selected item. Only video and audio can be trimmed; any other
    /// selection leaves the editor as it was.
    pub fn enter_trim(&mut self) -> bool {
        let Some(item) = self.store.selected() else {
            tracing::debug!("trim requested with nothing selected");
            return false;
        };
        let Some(mode) = TrimMode::for_type(item.overlay_type()) else {
            tracing::debug!(id = %item.id, "selected overlay cannot be trimmed");
            return false;
        };
        let duration = item.media_duration_us().unwrap_or(TimeUs::ZERO);
        let session = TrimSession::new(item.id, mode, duration);

        self.end_gesture();
        self.clock.set_duration_basis(duration);
        self.panel = Panel::Trim;
        tracing::info!(id = %session.item_id(), ?mode, %duration, "trim started");
        self.trim = Some(session);
        true
    }

    /// Snapshot what the transcode needs. The session and store are left untouched.
    pub fn trim_request(&self) -> Result<TrimRequest> {
        let session = self.trim.as_ref().ok_or(CoreError::NoTrimSession)?;
        let source = self
            .store
            .get(session.item_id())
            .and_then(|item| item.source())
            .ok_or(CoreError::ItemNotFound(session.item_id()))?;
        Ok(session.request(source.clone()))
    }

    /// Apply a finished transcode: swap source and duration in place, then leave trim mode.
    ///
    /// The result must belong to the current session. A result from a cancelled or
    /// replaced session is rejected and neither the store nor the session is touched.
    pub fn finish_trim(&mut self, session_id: Uuid, source: MediaSource, duration: TimeUs) -> Result<()> {
        let item_id = match &self.trim {
            Some(session) if session.id() == session_id => session.item_id(),
            Some(session) => {
                return Err(CoreError::InvalidOperation(format!(
                    "trim result from session {session_id} does not match the active session {}",
                    session.id()
                )))
            }
            None => return Err(CoreError::NoTrimSession),
        };
        let replaced = self.store.replace_source(item_id, source, duration);
        self.leave_trim();
        self.panel = Panel::Media;
        if !replaced {
            tracing::warn!(%item_id, "trimmed overlay was removed before the transcode finished");
            return Err(CoreError::ItemNotFound(item_id));
        }
        tracing::info!(%item_id, %duration, "trim committed");
        Ok(())
    }

    /// Abandon the trim session without touching the store.
    pub fn cancel_trim(&mut self) -> bool {
        if self.trim.is_none() {
            return false;
        }
        self.leave_trim();
        self.panel = Panel::Media;
        tracing::debug!("trim cancelled");
        true
    }

    fn leave_trim(&mut self) {
        self.end_gesture();
        self.trim = None;
        self.clock.set_duration_basis(self.settings.timeline_window_us);
    }
}
