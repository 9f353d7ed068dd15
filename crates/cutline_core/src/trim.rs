use crate::types::{MediaSource, OverlayType, TimeUs};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which re-encode a trim performs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TrimMode {
    /// Re-encode video and audio into mp4.
    Video,
    /// Drop video, re-encode audio into mp3.
    Audio,
}

impl TrimMode {
    /// Only media items can be trimmed.
    pub fn for_type(kind: OverlayType) -> Option<Self> {
        match kind {
            OverlayType::Video => Some(TrimMode::Video),
            OverlayType::Audio => Some(TrimMode::Audio),
            _ => None,
        }
    }

    pub fn output_name(self) -> &'static str {
        match self {
            TrimMode::Video => "output.mp4",
            TrimMode::Audio => "output.mp3",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            TrimMode::Video => "video/mp4",
            TrimMode::Audio => "audio/mp3",
        }
    }
}

/// In/out selection on one media item. Exists only while trimming.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrimSession {
    id: Uuid,
    item_id: Uuid,
    mode: TrimMode,
    media_duration: TimeUs,
    start: TimeUs,
    end: TimeUs,
}

impl TrimSession {
    /// A session selecting the whole item.
    pub fn new(item_id: Uuid, mode: TrimMode, media_duration: TimeUs) -> Self {
        let media_duration = media_duration.max(TimeUs::ZERO);
        Self {
            id: Uuid::new_v4(),
            item_id,
            mode,
            media_duration,
            start: TimeUs::ZERO,
            end: media_duration,
        }
    }

    /// Unique per session, so a transcode started before a cancel cannot land on a
    /// later session for the same item.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn item_id(&self) -> Uuid {
        self.item_id
    }

    pub fn mode(&self) -> TrimMode {
        self.mode
    }

    pub fn media_duration(&self) -> TimeUs {
        self.media_duration
    }

    pub fn start(&self) -> TimeUs {
        self.start
    }

    pub fn end(&self) -> TimeUs {
        self.end
    }

    /// Move the in marker, held inside `[0, end]`.
    pub fn set_start(&mut self, t: TimeUs) {
        self.start = t.clamp(TimeUs::ZERO, self.end);
    }

    /// Move the out marker, held inside `[start, media_duration]`.
    pub fn set_end(&mut self, t: TimeUs) {
        self.end = t.clamp(self.start, self.media_duration);
    }

    pub fn selected_duration(&self) -> TimeUs {
        self.end - self.start
    }

    pub fn request(&self, source: MediaSource) -> TrimRequest {
        TrimRequest {
            session_id: self.id,
            item_id: self.item_id,
            mode: self.mode,
            source,
            start_us: self.start,
            end_us: self.end,
        }
    }
}

/// Everything a transcode needs, detached from the editor so no lock is held while it runs.
#[derive(Debug, Clone, PartialEq)]
pub struct TrimRequest {
    pub session_id: Uuid,
    pub item_id: Uuid,
    pub mode: TrimMode,
    pub source: MediaSource,
    pub start_us: TimeUs,
    pub end_us: TimeUs,
}

impl TrimRequest {
    pub fn duration(&self) -> TimeUs {
        self.end_us - self.start_us
    }
}
