//! Pointer gestures on the timeline and the preview surface.
//!
//! One gesture slot per editor. Starting a gesture replaces whatever was in the slot,
//! and releasing the pointer anywhere clears it unconditionally.

use crate::editor::Editor;
use crate::timeline::{Point, Rect, TimelineGeometry};
use crate::types::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Edge {
    Start,
    End,
}

/// The gesture currently holding the pointer.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    /// Live reorder of a media item; `index` follows the item as it moves.
    Reorder { track: TrackKind, index: usize },
    /// Dragging one time bound of an item.
    Resize {
        id: Uuid,
        edge: Edge,
        geometry: TimelineGeometry,
    },
    /// Moving a visual overlay on the preview surface.
    Spatial {
        id: Uuid,
        offset: Point,
        size: (f64, f64),
        container: Rect,
    },
    Scrub { geometry: TimelineGeometry },
    /// Dragging a trim marker, tracked as a delta from where the drag began.
    TrimMarker {
        edge: Edge,
        origin_x: f64,
        origin_time: TimeUs,
        geometry: TimelineGeometry,
    },
}

impl Editor {
    pub fn gesture(&self) -> Option<&Gesture> {
        self.gesture.as_ref()
    }

    fn begin_gesture(&mut self, gesture: Gesture) {
        if let Some(previous) = self.gesture.replace(gesture) {
            tracing::debug!(?previous, "gesture replaced before pointer release");
        }
    }

    pub(crate) fn end_gesture(&mut self) -> Option<Gesture> {
        self.gesture.take()
    }

    /// Pointer released anywhere: whatever gesture was running is over. Writes made
    /// during the drag are already committed.
    pub fn pointer_up(&mut self) -> Option<Gesture> {
        self.end_gesture()
    }

    // -----------------------------------------------------------------------
    // reorder
    // -----------------------------------------------------------------------

    /// Start a drag-reorder. Only video and audio items take part.
    pub fn begin_reorder(&mut self, id: Uuid) -> bool {
        let Some(item) = self.store.get(id) else {
            return false;
        };
        if !item.overlay_type().is_media() {
            tracing::debug!(%id, "reorder drag ignored for non-media overlay");
            return false;
        }
        let Some((track, index)) = self.store.find_item_location(id) else {
            return false;
        };
        self.begin_gesture(Gesture::Reorder { track, index });
        true
    }

    /// The dragged item hovers over `over`. The move happens immediately and the tracked
    /// index follows it.
    pub fn reorder_hover(&mut self, over: Uuid) -> bool {
        let Some(Gesture::Reorder { track, index }) = self.gesture.clone() else {
            return false;
        };
        let Some(target) = self.store.get(over) else {
            return false;
        };
        if !target.overlay_type().is_media() {
            return false;
        }
        let Some((over_track, over_index)) = self.store.find_item_location(over) else {
            return false;
        };
        if over_track != track || over_index == index {
            return false;
        }
        if !self.store.reorder(track, index, over_index) {
            return false;
        }
        self.gesture = Some(Gesture::Reorder {
            track,
            index: over_index,
        });
        true
    }

    // -----------------------------------------------------------------------
    // bound resize
    // -----------------------------------------------------------------------

    /// Grab the start or end handle of an item. Video has no editable end, so it has
    /// no handles.
    pub fn begin_resize(&mut self, id: Uuid, edge: Edge, geometry: TimelineGeometry) -> bool {
        match self.store.get(id).map(|item| item.overlay_type()) {
            Some(OverlayType::Video) | None => {
                tracing::debug!(%id, "resize ignored");
                false
            }
            Some(_) => {
                self.begin_gesture(Gesture::Resize { id, edge, geometry });
                true
            }
        }
    }

    // -----------------------------------------------------------------------
    // spatial
    // -----------------------------------------------------------------------

    /// Grab a visual overlay at `pointer`. `element` is its box and `container` the
    /// preview surface, both in pointer coordinates.
    pub fn begin_spatial(&mut self, id: Uuid, pointer: Point, element: Rect, container: Rect) -> bool {
        if self.store.get(id).and_then(|item| item.position()).is_none() {
            return false;
        }
        self.begin_gesture(Gesture::Spatial {
            id,
            offset: Point::new(pointer.x - element.x, pointer.y - element.y),
            size: (element.width, element.height),
            container,
        });
        true
    }

    // -----------------------------------------------------------------------
    // scrub
    // -----------------------------------------------------------------------

    /// Press on the ruler: seek right away and keep seeking while the pointer moves.
    pub fn begin_scrub(&mut self, geometry: TimelineGeometry, x: f64) {
        self.begin_gesture(Gesture::Scrub { geometry });
        self.scrub_to(geometry, x);
    }

    fn scrub_to(&mut self, geometry: TimelineGeometry, x: f64) {
        let t = geometry.pointer_to_time(x, self.clock.duration());
        self.clock.seek(t);
    }

    // -----------------------------------------------------------------------
    // trim markers
    // -----------------------------------------------------------------------

    pub fn begin_trim_marker(&mut self, edge: Edge, x: f64, geometry: TimelineGeometry) -> bool {
        let Some(session) = &self.trim else {
            tracing::debug!("trim marker grabbed outside trim mode");
            return false;
        };
        let origin_time = match edge {
            Edge::Start => session.start(),
            Edge::End => session.end(),
        };
        self.begin_gesture(Gesture::TrimMarker {
            edge,
            origin_x: x,
            origin_time,
            geometry,
        });
        true
    }

    // -----------------------------------------------------------------------
    // move
    // -----------------------------------------------------------------------

    /// Feed a pointer move to the active gesture. Returns false when nothing is dragging.
    pub fn pointer_move(&mut self, pointer: Point) -> bool {
        let Some(gesture) = self.gesture.clone() else {
            return false;
        };
        match gesture {
            // Reorder advances on hover, not on raw movement.
            Gesture::Reorder { .. } => true,
            Gesture::Resize { id, edge, geometry } => {
                let duration = self.clock.duration();
                let t = geometry
                    .pointer_to_time(pointer.x, duration)
                    .round_to(TimeUs::TENTH)
                    .clamp(TimeUs::ZERO, duration);
                let patch = match edge {
                    Edge::Start => OverlayPatch::start(t),
                    Edge::End => OverlayPatch::end(t),
                };
                if !self.store.update(id, &patch) {
                    self.end_gesture();
                    return false;
                }
                self.clock.seek(t);
                true
            }
            Gesture::Spatial {
                id,
                offset,
                size,
                container,
            } => {
                let x = clamp_axis(pointer.x - container.x - offset.x, container.width - size.0);
                let y = clamp_axis(pointer.y - container.y - offset.y, container.height - size.1);
                if !self.store.update(id, &OverlayPatch::position(x, y)) {
                    self.end_gesture();
                    return false;
                }
                true
            }
            Gesture::Scrub { geometry } => {
                self.scrub_to(geometry, pointer.x);
                true
            }
            Gesture::TrimMarker {
                edge,
                origin_x,
                origin_time,
                geometry,
            } => {
                let Some(session) = self.trim.as_mut() else {
                    self.end_gesture();
                    return false;
                };
                let delta = geometry.delta_to_time(pointer.x - origin_x, session.media_duration());
                match edge {
                    Edge::Start => session.set_start(origin_time + delta),
                    Edge::End => session.set_end(origin_time + delta),
                }
                let start = session.start();
                self.clock.seek(start);
                true
            }
        }
    }
}

/// Keep an element inside `[0, room]`; a container smaller than the element pins it at 0.
fn clamp_axis(v: f64, room: f64) -> f64 {
    v.min(room).max(0.0)
}
