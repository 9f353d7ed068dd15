use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::sync::Arc;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// TimeUs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeUs(pub i64);

impl TimeUs {
    pub const ZERO: Self = Self(0);

    /// Resolution of pointer-driven edits on the timeline (0.1 s).
    pub const TENTH: Self = Self(100_000);

    pub fn from_seconds(s: f64) -> Self {
        if !s.is_finite() {
            return Self::ZERO;
        }
        Self((s * 1_000_000.0).round() as i64)
    }

    pub fn as_seconds(&self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    /// Round to the nearest multiple of `step`.
    pub fn round_to(self, step: TimeUs) -> Self {
        if step.0 <= 0 {
            return self;
        }
        let half = step.0 / 2;
        let q = if self.0 >= 0 {
            self.0.saturating_add(half) / step.0
        } else {
            self.0.saturating_sub(half) / step.0
        };
        Self(q.saturating_mul(step.0))
    }

    pub fn clamp(self, lo: TimeUs, hi: TimeUs) -> Self {
        if hi < lo {
            return lo;
        }
        Self(self.0.clamp(lo.0, hi.0))
    }
}

// Saturating: pointer math can produce times at the edge of the range.
impl Add for TimeUs {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for TimeUs {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for TimeUs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_us = self.0.unsigned_abs();
        let total_ms = total_us / 1_000;
        let ms = total_ms % 1_000;
        let total_secs = total_ms / 1_000;
        let secs = total_secs % 60;
        let total_mins = total_secs / 60;
        let mins = total_mins % 60;
        let hours = total_mins / 60;
        if self.0 < 0 {
            write!(f, "-{:02}:{:02}:{:02}.{:03}", hours, mins, secs, ms)
        } else {
            write!(f, "{:02}:{:02}:{:02}.{:03}", hours, mins, secs, ms)
        }
    }
}

// ---------------------------------------------------------------------------
// MediaSource
// ---------------------------------------------------------------------------

/// An uploaded or generated binary asset plus the playable handle derived from it.
///
/// The bytes are immutable and reference counted: a duplicated overlay shares them
/// read-only, and they are released once no item refers to them any more.
#[derive(Clone, Serialize, Deserialize)]
pub struct MediaSource {
    pub name: String,
    pub mime: String,
    pub url: String,
    #[serde(skip, default = "empty_bytes")]
    pub data: Arc<[u8]>,
}

fn empty_bytes() -> Arc<[u8]> {
    Arc::from(Vec::new())
}

impl MediaSource {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            url: format!("blob:cutline/{}", Uuid::new_v4()),
            data: data.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Debug for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaSource")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("url", &self.url)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl PartialEq for MediaSource {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url && self.name == other.name && self.mime == other.mime
    }
}

// ---------------------------------------------------------------------------
// MediaProbe
// ---------------------------------------------------------------------------

/// Metadata read from a media asset when it is added.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaProbe {
    pub duration_us: TimeUs,
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProbeStatus {
    Pending,
    Ready,
    Failed,
}

// ---------------------------------------------------------------------------
// Overlay payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OverlayType {
    Text,
    Image,
    Gif,
    Audio,
    Video,
}

impl OverlayType {
    /// Which track collection holds items of this kind.
    pub fn track(self) -> TrackKind {
        match self {
            OverlayType::Video => TrackKind::Video,
            OverlayType::Text | OverlayType::Image | OverlayType::Gif | OverlayType::Audio => {
                TrackKind::Overlay
            }
        }
    }

    pub fn is_media(self) -> bool {
        matches!(self, OverlayType::Video | OverlayType::Audio)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextOverlay {
    pub content: String,
    pub x: f64,
    pub y: f64,
    pub size: u32,
    pub color: String,
    pub end_us: TimeUs,
}

/// Image and gif overlays share the same shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VisualOverlay {
    pub source: MediaSource,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub end_us: TimeUs,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AudioOverlay {
    pub source: MediaSource,
    pub duration_us: TimeUs,
    pub end_us: TimeUs,
    pub probe: ProbeStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoClip {
    pub source: MediaSource,
    pub duration_us: TimeUs,
    pub thumbnail_url: Option<String>,
    pub probe: ProbeStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OverlayKind {
    Text(TextOverlay),
    Image(VisualOverlay),
    Gif(VisualOverlay),
    Audio(AudioOverlay),
    Video(VideoClip),
}

// ---------------------------------------------------------------------------
// OverlayItem
// ---------------------------------------------------------------------------

/// One addressable element on the timeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverlayItem {
    pub id: Uuid,
    pub start_us: TimeUs,
    #[serde(flatten)]
    pub kind: OverlayKind,
}

impl OverlayItem {
    pub fn overlay_type(&self) -> OverlayType {
        match &self.kind {
            OverlayKind::Text(_) => OverlayType::Text,
            OverlayKind::Image(_) => OverlayType::Image,
            OverlayKind::Gif(_) => OverlayType::Gif,
            OverlayKind::Audio(_) => OverlayType::Audio,
            OverlayKind::Video(_) => OverlayType::Video,
        }
    }

    /// Effective end on the timeline. Video derives it from its duration.
    pub fn end_us(&self) -> TimeUs {
        match &self.kind {
            OverlayKind::Text(t) => t.end_us,
            OverlayKind::Image(v) | OverlayKind::Gif(v) => v.end_us,
            OverlayKind::Audio(a) => a.end_us,
            OverlayKind::Video(v) => self.start_us + v.duration_us,
        }
    }

    /// Probed media duration, for the kinds that have one.
    pub fn media_duration_us(&self) -> Option<TimeUs> {
        match &self.kind {
            OverlayKind::Audio(a) => Some(a.duration_us),
            OverlayKind::Video(v) => Some(v.duration_us),
            _ => None,
        }
    }

    pub fn source(&self) -> Option<&MediaSource> {
        match &self.kind {
            OverlayKind::Text(_) => None,
            OverlayKind::Image(v) | OverlayKind::Gif(v) => Some(&v.source),
            OverlayKind::Audio(a) => Some(&a.source),
            OverlayKind::Video(v) => Some(&v.source),
        }
    }

    /// Top-left position on the preview surface, for visual kinds.
    pub fn position(&self) -> Option<(f64, f64)> {
        match &self.kind {
            OverlayKind::Text(t) => Some((t.x, t.y)),
            OverlayKind::Image(v) | OverlayKind::Gif(v) => Some((v.x, v.y)),
            OverlayKind::Audio(_) | OverlayKind::Video(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// OverlayPatch
// ---------------------------------------------------------------------------

/// Partial update merged into an item. Fields a kind does not carry are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OverlayPatch {
    pub start_us: Option<TimeUs>,
    pub end_us: Option<TimeUs>,
    pub content: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub size: Option<u32>,
    pub color: Option<String>,
}

impl OverlayPatch {
    pub fn start(t: TimeUs) -> Self {
        Self {
            start_us: Some(t),
            ..Default::default()
        }
    }

    pub fn end(t: TimeUs) -> Self {
        Self {
            end_us: Some(t),
            ..Default::default()
        }
    }

    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    pub fn content(text: impl Into<String>) -> Self {
        Self {
            content: Some(text.into()),
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Tracks and selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TrackKind {
    Video,
    Overlay,
}

/// Kind-scoped editing focus. These reference items but never own them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ActiveIds {
    pub text: Option<Uuid>,
    pub image: Option<Uuid>,
    pub audio: Option<Uuid>,
    pub gif: Option<Uuid>,
}

/// Editing panel currently shown next to the preview.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Panel {
    #[default]
    Media,
    Text,
    Image,
    Gif,
    Audio,
    Trim,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
