use crate::types::{OverlayItem, OverlayKind, TimeUs};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Horizontal placement of the timeline strip in pointer space (pixels).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TimelineGeometry {
    pub left: f64,
    pub width: f64,
}

impl TimelineGeometry {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    /// Map a pointer x coordinate to a time in `[0, duration]`.
    pub fn pointer_to_time(&self, x: f64, duration: TimeUs) -> TimeUs {
        if self.width <= 0.0 || !self.width.is_finite() {
            return TimeUs::ZERO;
        }
        let ratio = (x - self.left) / self.width;
        TimeUs::from_seconds(ratio * duration.as_seconds()).clamp(TimeUs::ZERO, duration)
    }

    /// Convert a horizontal pointer displacement into a time displacement, never more
    /// than `duration` either way.
    pub fn delta_to_time(&self, dx: f64, duration: TimeUs) -> TimeUs {
        if self.width <= 0.0 || !self.width.is_finite() {
            return TimeUs::ZERO;
        }
        let limit = duration.max(TimeUs::ZERO);
        TimeUs::from_seconds(dx / self.width * duration.as_seconds())
            .clamp(TimeUs::ZERO - limit, limit)
    }
}

/// Horizontal span of one item, in percent of the timeline width.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineSpan {
    pub id: Uuid,
    pub left_pct: f64,
    pub width_pct: f64,
}

/// Project an item onto a timeline of `duration`.
pub fn span(item: &OverlayItem, duration: TimeUs) -> TimelineSpan {
    let length = match &item.kind {
        OverlayKind::Video(v) => v.duration_us,
        _ => item.end_us() - item.start_us,
    };
    TimelineSpan {
        id: item.id,
        left_pct: percent(item.start_us, duration),
        width_pct: percent(length, duration),
    }
}

fn percent(t: TimeUs, duration: TimeUs) -> f64 {
    if duration.0 <= 0 {
        return 0.0;
    }
    t.0 as f64 / duration.0 as f64 * 100.0
}

/// A point on the preview surface.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned box in preview-surface pixels.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}
