use crate::types::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default lifetime of a freshly added text, image or gif overlay.
pub const DEFAULT_OVERLAY_SPAN: TimeUs = TimeUs(10_000_000);
pub const DEFAULT_TEXT_SIZE: u32 = 24;
pub const DEFAULT_TEXT_COLOR: &str = "#ffffff";
pub const TEXT_SIZE_MIN: u32 = 1;
pub const TEXT_SIZE_MAX: u32 = 200;
const DEFAULT_TEXT_POS: (f64, f64) = (50.0, 50.0);
const DEFAULT_VISUAL_POS: (f64, f64) = (10.0, 10.0);
const DEFAULT_VISUAL_SIZE: f64 = 100.0;

/// The authoritative collection of overlay items.
///
/// Items live in exactly one of two tracks: video items in the video track, everything
/// else in the overlay track. All routing happens here; callers never pick a track by
/// inspecting items themselves. Lookups by id tolerate ids that no longer exist, since
/// probes and transcodes routinely complete after the user removed their target.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OverlayStore {
    video: Vec<OverlayItem>,
    overlays: Vec<OverlayItem>,
    selected: Option<Uuid>,
    active: ActiveIds,
}

impl OverlayStore {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // add
    // -----------------------------------------------------------------------

    /// Add an empty text overlay and make it the active text.
    pub fn add_text(&mut self) -> Uuid {
        let id = Uuid::new_v4();
        self.insert(OverlayItem {
            id,
            start_us: TimeUs::ZERO,
            kind: OverlayKind::Text(TextOverlay {
                content: String::new(),
                x: DEFAULT_TEXT_POS.0,
                y: DEFAULT_TEXT_POS.1,
                size: DEFAULT_TEXT_SIZE,
                color: DEFAULT_TEXT_COLOR.to_string(),
                end_us: DEFAULT_OVERLAY_SPAN,
            }),
        });
        self.active.text = Some(id);
        id
    }

    pub fn add_image(&mut self, source: MediaSource) -> Uuid {
        let id = Uuid::new_v4();
        self.insert(OverlayItem {
            id,
            start_us: TimeUs::ZERO,
            kind: OverlayKind::Image(default_visual(source)),
        });
        id
    }

    pub fn add_gif(&mut self, source: MediaSource) -> Uuid {
        let id = Uuid::new_v4();
        self.insert(OverlayItem {
            id,
            start_us: TimeUs::ZERO,
            kind: OverlayKind::Gif(default_visual(source)),
        });
        id
    }

    /// Add an audio overlay spanning its probed duration. A failed probe (`None`)
    /// still adds the item, with zero duration.
    pub fn add_audio(&mut self, source: MediaSource, probe: Option<MediaProbe>) -> Uuid {
        let id = Uuid::new_v4();
        let (duration_us, status) = match probe {
            Some(p) => (p.duration_us.max(TimeUs::ZERO), ProbeStatus::Ready),
            None => {
                tracing::warn!(name = %source.name, "audio probe failed, adding with zero duration");
                (TimeUs::ZERO, ProbeStatus::Failed)
            }
        };
        self.insert(OverlayItem {
            id,
            start_us: TimeUs::ZERO,
            kind: OverlayKind::Audio(AudioOverlay {
                source,
                duration_us,
                end_us: duration_us,
                probe: status,
            }),
        });
        self.active.audio = Some(id);
        id
    }

    /// Append a video to the video track. Duration and thumbnail start as placeholders
    /// until [`OverlayStore::apply_probe`] fills them in.
    pub fn add_video(&mut self, source: MediaSource) -> Uuid {
        let id = Uuid::new_v4();
        self.insert(OverlayItem {
            id,
            start_us: TimeUs::ZERO,
            kind: OverlayKind::Video(VideoClip {
                source,
                duration_us: TimeUs::ZERO,
                thumbnail_url: None,
                probe: ProbeStatus::Pending,
            }),
        });
        id
    }

    fn insert(&mut self, item: OverlayItem) {
        tracing::debug!(id = %item.id, kind = ?item.overlay_type(), "overlay added");
        self.track_mut(item.overlay_type().track()).push(item);
    }

    // -----------------------------------------------------------------------
    // update
    // -----------------------------------------------------------------------

    /// Merge a probe result into a media item. `None` marks the probe as failed and
    /// leaves a zero duration. Returns false when the item is gone.
    pub fn apply_probe(&mut self, id: Uuid, probe: Option<MediaProbe>) -> bool {
        let Some(item) = self.get_mut(id) else {
            tracing::debug!(%id, "probe finished for a removed item");
            return false;
        };
        let start = item.start_us;
        match (&mut item.kind, probe) {
            (OverlayKind::Video(v), Some(p)) => {
                v.duration_us = p.duration_us.max(TimeUs::ZERO);
                v.thumbnail_url = p.thumbnail_url;
                v.probe = ProbeStatus::Ready;
            }
            (OverlayKind::Video(v), None) => {
                tracing::warn!(%id, "video probe failed, keeping placeholder metadata");
                v.duration_us = TimeUs::ZERO;
                v.probe = ProbeStatus::Failed;
            }
            (OverlayKind::Audio(a), Some(p)) => {
                a.duration_us = p.duration_us.max(TimeUs::ZERO);
                a.end_us = start + a.duration_us;
                a.probe = ProbeStatus::Ready;
            }
            (OverlayKind::Audio(a), None) => {
                a.duration_us = TimeUs::ZERO;
                a.probe = ProbeStatus::Failed;
            }
            _ => return false,
        }
        true
    }

    /// Merge `patch` into the item with `id`, wherever it lives. Unknown ids are a no-op.
    pub fn update(&mut self, id: Uuid, patch: &OverlayPatch) -> bool {
        let Some(item) = self.get_mut(id) else {
            tracing::debug!(%id, "update for unknown overlay ignored");
            return false;
        };
        merge_patch(item, patch);
        true
    }

    /// Swap the asset behind a media item, together with its duration. Both fields
    /// change in one step or not at all.
    pub fn replace_source(&mut self, id: Uuid, source: MediaSource, duration_us: TimeUs) -> bool {
        let Some(item) = self.get_mut(id) else {
            tracing::debug!(%id, "source replacement for unknown overlay ignored");
            return false;
        };
        let start = item.start_us;
        match &mut item.kind {
            OverlayKind::Video(v) => {
                v.source = source;
                v.duration_us = duration_us;
                v.probe = ProbeStatus::Ready;
            }
            OverlayKind::Audio(a) => {
                a.source = source;
                a.duration_us = duration_us;
                a.end_us = start + duration_us;
                a.probe = ProbeStatus::Ready;
            }
            OverlayKind::Image(v) | OverlayKind::Gif(v) => {
                v.source = source;
            }
            OverlayKind::Text(_) => return false,
        }
        tracing::info!(%id, duration = %duration_us, "overlay source replaced");
        true
    }

    // -----------------------------------------------------------------------
    // remove / duplicate / reorder
    // -----------------------------------------------------------------------

    /// Delete the selected item. Nothing happens when no item is selected.
    pub fn remove_selected(&mut self) -> Option<OverlayItem> {
        let id = self.selected?;
        let removed = self.remove(id);
        self.selected = None;
        removed
    }

    /// Remove an item by id from whichever track holds it.
    pub fn remove(&mut self, id: Uuid) -> Option<OverlayItem> {
        let (track, idx) = self.find_item_location(id)?;
        let removed = self.track_mut(track).remove(idx);
        tracing::debug!(%id, "overlay removed");
        Some(removed)
    }

    /// Clone the selected item to the end of its own track under a fresh id.
    pub fn duplicate_selected(&mut self) -> Option<Uuid> {
        let id = self.selected?;
        self.duplicate(id)
    }

    pub fn duplicate(&mut self, id: Uuid) -> Option<Uuid> {
        let mut copy = self.get(id)?.clone();
        copy.id = Uuid::new_v4();
        let new_id = copy.id;
        self.insert(copy);
        Some(new_id)
    }

    /// Move the item at `from` to `to` within one track. Times are left untouched.
    pub fn reorder(&mut self, track: TrackKind, from: usize, to: usize) -> bool {
        let items = self.track_mut(track);
        if from >= items.len() || to >= items.len() {
            tracing::debug!(?track, from, to, len = items.len(), "reorder out of range ignored");
            return false;
        }
        if from == to {
            return true;
        }
        let item = items.remove(from);
        items.insert(to, item);
        true
    }

    // -----------------------------------------------------------------------
    // queries
    // -----------------------------------------------------------------------

    pub fn get(&self, id: Uuid) -> Option<&OverlayItem> {
        self.video
            .iter()
            .chain(self.overlays.iter())
            .find(|item| item.id == id)
    }

    fn get_mut(&mut self, id: Uuid) -> Option<&mut OverlayItem> {
        self.video
            .iter_mut()
            .chain(self.overlays.iter_mut())
            .find(|item| item.id == id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.get(id).is_some()
    }

    pub fn track(&self, track: TrackKind) -> &[OverlayItem] {
        match track {
            TrackKind::Video => &self.video,
            TrackKind::Overlay => &self.overlays,
        }
    }

    fn track_mut(&mut self, track: TrackKind) -> &mut Vec<OverlayItem> {
        match track {
            TrackKind::Video => &mut self.video,
            TrackKind::Overlay => &mut self.overlays,
        }
    }

    pub fn video_track(&self) -> &[OverlayItem] {
        &self.video
    }

    pub fn overlays(&self) -> &[OverlayItem] {
        &self.overlays
    }

    /// Every item: the video track first, then the overlay track.
    pub fn items(&self) -> impl Iterator<Item = &OverlayItem> {
        self.video.iter().chain(self.overlays.iter())
    }

    pub fn len(&self) -> usize {
        self.video.len() + self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Locate an item as (track, index within that track).
    pub fn find_item_location(&self, id: Uuid) -> Option<(TrackKind, usize)> {
        if let Some(idx) = self.video.iter().position(|i| i.id == id) {
            return Some((TrackKind::Video, idx));
        }
        self.overlays
            .iter()
            .position(|i| i.id == id)
            .map(|idx| (TrackKind::Overlay, idx))
    }

    // -----------------------------------------------------------------------
    // selection
    // -----------------------------------------------------------------------

    pub fn select(&mut self, id: Option<Uuid>) {
        self.selected = id;
    }

    pub fn selected_id(&self) -> Option<Uuid> {
        self.selected
    }

    /// The selected item, or `None` if nothing is selected or it has been removed.
    pub fn selected(&self) -> Option<&OverlayItem> {
        self.selected.and_then(|id| self.get(id))
    }

    pub fn set_active(&mut self, kind: OverlayType, id: Option<Uuid>) {
        match kind {
            OverlayType::Text => self.active.text = id,
            OverlayType::Image => self.active.image = id,
            OverlayType::Audio => self.active.audio = id,
            OverlayType::Gif => self.active.gif = id,
            OverlayType::Video => {}
        }
    }

    /// The active item for `kind`, tolerating a stale id.
    pub fn active(&self, kind: OverlayType) -> Option<&OverlayItem> {
        let id = match kind {
            OverlayType::Text => self.active.text,
            OverlayType::Image => self.active.image,
            OverlayType::Audio => self.active.audio,
            OverlayType::Gif => self.active.gif,
            OverlayType::Video => None,
        }?;
        self.get(id).filter(|item| item.overlay_type() == kind)
    }

    pub fn active_ids(&self) -> &ActiveIds {
        &self.active
    }
}

fn default_visual(source: MediaSource) -> VisualOverlay {
    VisualOverlay {
        source,
        x: DEFAULT_VISUAL_POS.0,
        y: DEFAULT_VISUAL_POS.1,
        width: DEFAULT_VISUAL_SIZE,
        height: DEFAULT_VISUAL_SIZE,
        end_us: DEFAULT_OVERLAY_SPAN,
    }
}

fn merge_patch(item: &mut OverlayItem, patch: &OverlayPatch) {
    if let Some(start) = patch.start_us {
        item.start_us = start.max(TimeUs::ZERO);
    }
    match &mut item.kind {
        OverlayKind::Text(t) => {
            if let Some(end) = patch.end_us {
                t.end_us = end;
            }
            if let Some(content) = &patch.content {
                t.content = content.clone();
            }
            if let Some(x) = patch.x {
                t.x = x;
            }
            if let Some(y) = patch.y {
                t.y = y;
            }
            if let Some(size) = patch.size {
                t.size = size.clamp(TEXT_SIZE_MIN, TEXT_SIZE_MAX);
            }
            if let Some(color) = &patch.color {
                t.color = color.clone();
            }
        }
        OverlayKind::Image(v) | OverlayKind::Gif(v) => {
            if let Some(end) = patch.end_us {
                v.end_us = end;
            }
            if let Some(x) = patch.x {
                v.x = x;
            }
            if let Some(y) = patch.y {
                v.y = y;
            }
            if let Some(w) = patch.width {
                v.width = w.max(0.0);
            }
            if let Some(h) = patch.height {
                v.height = h.max(0.0);
            }
        }
        OverlayKind::Audio(a) => {
            if let Some(end) = patch.end_us {
                a.end_us = end;
            }
        }
        // Video end follows its duration.
        OverlayKind::Video(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn source(name: &str) -> MediaSource {
        MediaSource::new(name, "application/octet-stream", vec![7u8; 16])
    }

    fn probe(secs: f64) -> Option<MediaProbe> {
        Some(MediaProbe {
            duration_us: TimeUs::from_seconds(secs),
            thumbnail_url: Some("data:image/png;base64,AAAA".into()),
        })
    }

    fn text_of(store: &OverlayStore, id: Uuid) -> TextOverlay {
        match &store.get(id).unwrap().kind {
            OverlayKind::Text(t) => t.clone(),
            other => panic!("expected text, got {other:?}"),
        }
    }

    // -----------------------------------------------------------------------
    // add
    // -----------------------------------------------------------------------

    #[test]
    fn add_text_uses_defaults() {
        let mut store = OverlayStore::new();
        let id = store.add_text();

        assert_eq!(store.overlays().len(), 1);
        assert!(store.video_track().is_empty());
        let item = store.get(id).unwrap();
        assert_eq!(item.overlay_type(), OverlayType::Text);
        assert_eq!(item.start_us, TimeUs::ZERO);
        assert_eq!(item.end_us(), TimeUs(10_000_000));

        let text = text_of(&store, id);
        assert_eq!((text.x, text.y), (50.0, 50.0));
        assert_eq!(text.size, 24);
        assert_eq!(text.color, "#ffffff");
        assert_eq!(store.active_ids().text, Some(id));
    }

    #[test]
    fn update_content_leaves_other_fields() {
        let mut store = OverlayStore::new();
        let id = store.add_text();
        let before = store.get(id).unwrap().clone();

        assert!(store.update(id, &OverlayPatch::content("Hello")));

        let after = store.get(id).unwrap();
        assert_eq!(text_of(&store, id).content, "Hello");
        assert_eq!(after.start_us, before.start_us);
        assert_eq!(after.end_us(), before.end_us());
        assert_eq!(after.position(), before.position());
        let text = text_of(&store, id);
        assert_eq!(text.size, 24);
        assert_eq!(text.color, "#ffffff");
    }

    #[test]
    fn add_image_and_gif_defaults() {
        let mut store = OverlayStore::new();
        let img = store.add_image(source("a.png"));
        let gif = store.add_gif(source("b.gif"));

        for id in [img, gif] {
            let item = store.get(id).unwrap();
            match &item.kind {
                OverlayKind::Image(v) | OverlayKind::Gif(v) => {
                    assert_eq!((v.x, v.y, v.width, v.height), (10.0, 10.0, 100.0, 100.0));
                }
                other => panic!("unexpected {other:?}"),
            }
            assert_eq!(item.end_us(), item.start_us + DEFAULT_OVERLAY_SPAN);
        }
        assert_eq!(store.overlays().len(), 2);
    }

    #[test]
    fn add_audio_ends_at_probed_duration() {
        let mut store = OverlayStore::new();
        let id = store.add_audio(source("a.mp3"), probe(20.0));
        let item = store.get(id).unwrap();
        assert_eq!(item.end_us(), TimeUs(20_000_000));
        assert_eq!(item.media_duration_us(), Some(TimeUs(20_000_000)));
        assert_eq!(store.active_ids().audio, Some(id));
    }

    #[test]
    fn add_audio_with_failed_probe_is_degraded() {
        let mut store = OverlayStore::new();
        let id = store.add_audio(source("broken.mp3"), None);
        match &store.get(id).unwrap().kind {
            OverlayKind::Audio(a) => {
                assert_eq!(a.duration_us, TimeUs::ZERO);
                assert_eq!(a.probe, ProbeStatus::Failed);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn add_videos_append_to_video_track() {
        let mut store = OverlayStore::new();
        let first = store.add_video(source("one.mp4"));
        assert!(store.apply_probe(first, probe(12.4)));

        assert_eq!(store.video_track().len(), 1);
        let item = store.get(first).unwrap();
        assert_eq!(item.start_us, TimeUs::ZERO);
        assert!((item.media_duration_us().unwrap().as_seconds() - 12.4).abs() < 1e-6);

        let snapshot = item.clone();
        let second = store.add_video(source("two.mp4"));
        assert_eq!(store.video_track().len(), 2);
        assert_eq!(store.video_track()[1].id, second);
        assert_eq!(store.get(first).unwrap(), &snapshot);
        assert!(store.overlays().is_empty());
    }

    #[test]
    fn video_is_visible_before_probe_resolves() {
        let mut store = OverlayStore::new();
        let id = store.add_video(source("clip.mp4"));
        match &store.get(id).unwrap().kind {
            OverlayKind::Video(v) => {
                assert_eq!(v.probe, ProbeStatus::Pending);
                assert_eq!(v.duration_us, TimeUs::ZERO);
                assert!(v.thumbnail_url.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn failed_video_probe_degrades() {
        let mut store = OverlayStore::new();
        let id = store.add_video(source("clip.mp4"));
        assert!(store.apply_probe(id, None));
        match &store.get(id).unwrap().kind {
            OverlayKind::Video(v) => assert_eq!(v.probe, ProbeStatus::Failed),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn probe_for_removed_item_is_noop() {
        let mut store = OverlayStore::new();
        let id = store.add_video(source("clip.mp4"));
        store.remove(id);
        assert!(!store.apply_probe(id, probe(3.0)));
        assert!(store.is_empty());
    }

    #[test]
    fn ids_are_never_reused() {
        let mut store = OverlayStore::new();
        let mut seen = HashSet::new();
        for round in 0..20 {
            let id = match round % 4 {
                0 => store.add_text(),
                1 => store.add_image(source("i.png")),
                2 => store.add_video(source("v.mp4")),
                _ => store.add_audio(source("a.mp3"), probe(1.0)),
            };
            assert!(seen.insert(id), "id {id} reused");
            if round % 3 == 0 {
                store.remove(id);
            }
        }
    }

    // -----------------------------------------------------------------------
    // update
    // -----------------------------------------------------------------------

    #[test]
    fn update_unknown_id_is_noop() {
        let mut store = OverlayStore::new();
        store.add_text();
        let before = store.clone();
        assert!(!store.update(Uuid::new_v4(), &OverlayPatch::content("x")));
        assert_eq!(store, before);
    }

    #[test]
    fn update_clamps_text_size() {
        let mut store = OverlayStore::new();
        let id = store.add_text();
        store.update(id, &OverlayPatch { size: Some(500), ..Default::default() });
        assert_eq!(text_of(&store, id).size, TEXT_SIZE_MAX);
        store.update(id, &OverlayPatch { size: Some(0), ..Default::default() });
        assert_eq!(text_of(&store, id).size, TEXT_SIZE_MIN);
    }

    #[test]
    fn update_ignores_fields_a_kind_lacks() {
        let mut store = OverlayStore::new();
        let id = store.add_video(source("v.mp4"));
        store.apply_probe(id, probe(4.0));
        store.update(
            id,
            &OverlayPatch {
                end_us: Some(TimeUs(99_000_000)),
                content: Some("nope".into()),
                ..Default::default()
            },
        );
        assert_eq!(store.get(id).unwrap().end_us(), TimeUs(4_000_000));
    }

    #[test]
    fn update_never_moves_start_below_zero() {
        let mut store = OverlayStore::new();
        let id = store.add_text();
        store.update(id, &OverlayPatch::start(TimeUs(-3)));
        assert_eq!(store.get(id).unwrap().start_us, TimeUs::ZERO);
    }

    #[test]
    fn replace_source_updates_source_and_duration_together() {
        let mut store = OverlayStore::new();
        let id = store.add_audio(source("a.mp3"), probe(20.0));
        let trimmed = source("trimmed-output.mp3");
        assert!(store.replace_source(id, trimmed.clone(), TimeUs(6_000_000)));
        let item = store.get(id).unwrap();
        assert_eq!(item.source(), Some(&trimmed));
        assert_eq!(item.media_duration_us(), Some(TimeUs(6_000_000)));
        assert_eq!(item.end_us(), TimeUs(6_000_000));
    }

    // -----------------------------------------------------------------------
    // remove / duplicate / reorder
    // -----------------------------------------------------------------------

    #[test]
    fn remove_without_selection_is_noop() {
        let mut store = OverlayStore::new();
        store.add_text();
        store.add_video(source("v.mp4"));
        let before = store.clone();
        assert!(store.remove_selected().is_none());
        assert_eq!(store, before);
    }

    #[test]
    fn remove_selected_from_either_track() {
        let mut store = OverlayStore::new();
        let text = store.add_text();
        let video = store.add_video(source("v.mp4"));

        store.select(Some(video));
        assert_eq!(store.remove_selected().map(|i| i.id), Some(video));
        assert!(store.video_track().is_empty());
        assert_eq!(store.selected_id(), None);

        store.select(Some(text));
        store.remove_selected();
        assert!(store.is_empty());
    }

    #[test]
    fn duplicate_text_copies_fields_under_new_id() {
        let mut store = OverlayStore::new();
        let id = store.add_text();
        store.update(id, &OverlayPatch::content("X"));
        store.select(Some(id));

        let copy = store.duplicate_selected().unwrap();
        assert_ne!(copy, id);
        assert_eq!(store.len(), 2);
        assert_eq!(store.overlays()[1].id, copy);

        let a = text_of(&store, id);
        let b = text_of(&store, copy);
        assert_eq!(a.content, b.content);
        assert_eq!((a.x, a.y), (b.x, b.y));

        store.update(copy, &OverlayPatch::position(300.0, 200.0));
        assert_eq!(text_of(&store, id).x, 50.0);
    }

    #[test]
    fn duplicate_video_stays_in_video_track_and_shares_bytes() {
        let mut store = OverlayStore::new();
        let id = store.add_video(source("v.mp4"));
        let copy = store.duplicate(id).unwrap();
        assert_eq!(store.video_track().len(), 2);
        let a = store.get(id).unwrap().source().unwrap();
        let b = store.get(copy).unwrap().source().unwrap();
        assert!(std::sync::Arc::ptr_eq(&a.data, &b.data));
    }

    #[test]
    fn duplicate_without_selection_is_none() {
        let mut store = OverlayStore::new();
        store.add_text();
        assert!(store.duplicate_selected().is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn reorder_preserves_ids_and_times() {
        let mut store = OverlayStore::new();
        let ids: Vec<Uuid> = (0..4).map(|_| store.add_text()).collect();
        for (i, id) in ids.iter().enumerate() {
            store.update(*id, &OverlayPatch::start(TimeUs(i as i64 * 1_000_000)));
        }
        let before = store.overlays().to_vec();

        assert!(store.reorder(TrackKind::Overlay, 0, 2));
        let order: Vec<Uuid> = store.overlays().iter().map(|i| i.id).collect();
        assert_eq!(order, vec![ids[1], ids[2], ids[0], ids[3]]);

        for item in &before {
            assert_eq!(store.get(item.id).unwrap(), item);
        }
    }

    #[test]
    fn reorder_round_trip_restores_order() {
        let mut store = OverlayStore::new();
        for _ in 0..3 {
            store.add_video(source("v.mp4"));
        }
        let before = store.video_track().to_vec();
        store.reorder(TrackKind::Video, 1, 2);
        store.reorder(TrackKind::Video, 2, 1);
        assert_eq!(store.video_track(), before.as_slice());
    }

    #[test]
    fn reorder_out_of_range_is_noop() {
        let mut store = OverlayStore::new();
        store.add_text();
        let before = store.clone();
        assert!(!store.reorder(TrackKind::Overlay, 0, 5));
        assert!(!store.reorder(TrackKind::Video, 0, 0));
        assert_eq!(store, before);
    }

    // -----------------------------------------------------------------------
    // selection
    // -----------------------------------------------------------------------

    #[test]
    fn dangling_selection_and_active_ids_read_as_none() {
        let mut store = OverlayStore::new();
        let id = store.add_text();
        store.select(Some(id));
        store.remove(id);
        assert!(store.selected().is_none());
        assert!(store.active(OverlayType::Text).is_none());
        assert_eq!(store.active_ids().text, Some(id));
    }

    #[test]
    fn active_ids_are_kind_scoped() {
        let mut store = OverlayStore::new();
        let text = store.add_text();
        let image = store.add_image(source("a.png"));
        store.set_active(OverlayType::Image, Some(image));
        assert_eq!(store.active(OverlayType::Text).map(|i| i.id), Some(text));
        assert_eq!(store.active(OverlayType::Image).map(|i| i.id), Some(image));

        store.set_active(OverlayType::Gif, Some(text));
        assert!(store.active(OverlayType::Gif).is_none());
    }
}
