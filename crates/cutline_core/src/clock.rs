use crate::types::TimeUs;
use serde::{Deserialize, Serialize};

/// Length of the timeline outside trim mode.
pub const DEFAULT_TIMELINE_WINDOW: TimeUs = TimeUs(30_000_000);

/// Outcome of advancing the clock by one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Paused; nothing moved.
    Idle,
    Advanced(TimeUs),
    /// Reached the end while playing and wrapped back to a paused start.
    Looped,
}

/// The shared playhead.
///
/// `current` advances continuously while playing. A scrub or bound drag sets a one-shot
/// seek target instead, which the preview layer consumes with [`Clock::take_seek`] and
/// pushes to the media element. While a seek is pending, time reported back by the
/// element is ignored so readback cannot fight the drag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Clock {
    current: TimeUs,
    duration: TimeUs,
    playing: bool,
    seek: Option<TimeUs>,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(DEFAULT_TIMELINE_WINDOW)
    }
}

impl Clock {
    pub fn new(duration: TimeUs) -> Self {
        Self {
            current: TimeUs::ZERO,
            duration: duration.max(TimeUs::ZERO),
            playing: false,
            seek: None,
        }
    }

    pub fn current(&self) -> TimeUs {
        self.current
    }

    pub fn duration(&self) -> TimeUs {
        self.duration
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn pending_seek(&self) -> Option<TimeUs> {
        self.seek
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Jump the playhead and arm a one-shot seek for the media element.
    pub fn seek(&mut self, t: TimeUs) {
        let t = t.clamp(TimeUs::ZERO, self.duration);
        self.current = t;
        self.seek = Some(t);
    }

    /// Consume the pending seek target, if any.
    pub fn take_seek(&mut self) -> Option<TimeUs> {
        self.seek.take()
    }

    /// Apply a time notification from the media element.
    pub fn on_media_time(&mut self, t: TimeUs) {
        if self.seek.is_some() {
            tracing::debug!(%t, "media time ignored while a seek is pending");
            return;
        }
        self.current = t.clamp(TimeUs::ZERO, self.duration);
    }

    /// Swap the duration basis (timeline window vs. trimmed media). The playhead returns
    /// to zero and playback stops so it can never sit outside the new range.
    pub fn set_duration_basis(&mut self, duration: TimeUs) {
        self.duration = duration.max(TimeUs::ZERO);
        self.current = TimeUs::ZERO;
        self.playing = false;
        self.seek = None;
    }

    /// Loop-to-start: pause at zero and forget any pending seek.
    pub fn reset_to_start(&mut self) {
        self.playing = false;
        self.current = TimeUs::ZERO;
        self.seek = None;
    }

    /// Advance by the wall time elapsed since the previous frame.
    pub fn tick(&mut self, elapsed: TimeUs) -> Tick {
        if !self.playing {
            return Tick::Idle;
        }
        let next = self.current + elapsed.max(TimeUs::ZERO);
        if next >= self.duration {
            self.reset_to_start();
            tracing::debug!("playhead reached the end, looping to start");
            return Tick::Looped;
        }
        self.current = next;
        Tick::Advanced(next)
    }
}

/// `SS:CC`: whole seconds and hundredths, both zero padded to two digits.
pub fn format_clock(t: TimeUs) -> String {
    let us = t.0.max(0);
    let seconds = us / 1_000_000;
    let hundredths = (us % 1_000_000) / 10_000;
    format!("{seconds:02}:{hundredths:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: TimeUs = TimeUs(16_667);

    #[test]
    fn default_window_is_thirty_seconds() {
        let clock = Clock::default();
        assert_eq!(clock.duration(), TimeUs(30_000_000));
        assert_eq!(clock.current(), TimeUs::ZERO);
        assert!(!clock.is_playing());
    }

    #[test]
    fn paused_tick_is_idle() {
        let mut clock = Clock::default();
        assert_eq!(clock.tick(FRAME), Tick::Idle);
        assert_eq!(clock.current(), TimeUs::ZERO);
    }

    #[test]
    fn playing_tick_advances_by_elapsed() {
        let mut clock = Clock::default();
        clock.play();
        assert_eq!(clock.tick(FRAME), Tick::Advanced(FRAME));
        assert_eq!(clock.tick(FRAME), Tick::Advanced(TimeUs(33_334)));
    }

    #[test]
    fn reaching_end_loops_exactly_once() {
        let mut clock = Clock::new(TimeUs(5_000_000));
        clock.seek(TimeUs(5_000_000 - 1));
        clock.play();

        assert_eq!(clock.tick(FRAME), Tick::Looped);
        assert!(!clock.is_playing());
        assert_eq!(clock.current(), TimeUs::ZERO);
        assert_eq!(clock.pending_seek(), None);

        for _ in 0..10 {
            assert_eq!(clock.tick(FRAME), Tick::Idle);
        }
        assert_eq!(clock.current(), TimeUs::ZERO);
    }

    #[test]
    fn huge_elapsed_loops_instead_of_overflowing() {
        let mut clock = Clock::default();
        clock.seek(TimeUs(1_000_000));
        clock.play();
        assert_eq!(clock.tick(TimeUs(i64::MAX)), Tick::Looped);
        assert_eq!(clock.current(), TimeUs::ZERO);
    }

    #[test]
    fn negative_elapsed_does_not_rewind() {
        let mut clock = Clock::default();
        clock.play();
        clock.tick(TimeUs(-1_000_000));
        assert_eq!(clock.current(), TimeUs::ZERO);
    }

    #[test]
    fn seek_is_clamped_and_one_shot() {
        let mut clock = Clock::new(TimeUs(10_000_000));
        clock.seek(TimeUs(12_000_000));
        assert_eq!(clock.current(), TimeUs(10_000_000));
        assert_eq!(clock.take_seek(), Some(TimeUs(10_000_000)));
        assert_eq!(clock.take_seek(), None);

        clock.seek(TimeUs(-4));
        assert_eq!(clock.current(), TimeUs::ZERO);
    }

    #[test]
    fn media_time_ignored_while_seek_pending() {
        let mut clock = Clock::default();
        clock.seek(TimeUs(4_000_000));
        clock.on_media_time(TimeUs(1_000_000));
        assert_eq!(clock.current(), TimeUs(4_000_000));

        clock.take_seek();
        clock.on_media_time(TimeUs(4_250_000));
        assert_eq!(clock.current(), TimeUs(4_250_000));
    }

    #[test]
    fn switching_basis_resets_playhead() {
        let mut clock = Clock::default();
        clock.seek(TimeUs(25_000_000));
        clock.play();
        clock.set_duration_basis(TimeUs(8_000_000));
        assert_eq!(clock.duration(), TimeUs(8_000_000));
        assert_eq!(clock.current(), TimeUs::ZERO);
        assert_eq!(clock.pending_seek(), None);
        assert!(!clock.is_playing());
    }

    #[test]
    fn format_clock_seconds_and_hundredths() {
        assert_eq!(format_clock(TimeUs::ZERO), "00:00");
        assert_eq!(format_clock(TimeUs::from_seconds(3.456)), "03:45");
        assert_eq!(format_clock(TimeUs::from_seconds(75.0)), "75:00");
        assert_eq!(format_clock(TimeUs(-5)), "00:00");
    }
}
