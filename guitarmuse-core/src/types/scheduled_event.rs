//! Playback events: one note sounding over a window of the audio clock.
//!
//! Start and end are seconds on the output device's clock, never wall-clock
//! time, so chained scheduling calls compose regardless of when they run.

use crate::types::note::Note;
use std::cmp::Ordering;

/// A single note scheduled against the audio clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackEvent {
    pub note: Note,
    /// Audio-clock time the note starts (seconds)
    pub start: f64,
    /// Audio-clock time the note has fully released (seconds)
    pub end: f64,
}

impl PlaybackEvent {
    pub fn new(note: Note, start: f64, end: f64) -> Self {
        Self { note, start, end }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn frequency(&self) -> f64 {
        self.note.frequency()
    }

    /// Whether the note is inside its window at `time`
    pub fn is_sounding_at(&self, time: f64) -> bool {
        time >= self.start && time < self.end
    }
}

impl PartialOrd for PlaybackEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PlaybackEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap behavior (earliest first)
        other
            .start
            .partial_cmp(&self.start)
            .unwrap_or(Ordering::Equal)
    }
}

impl Eq for PlaybackEvent {}

/// Latest end time of a batch of events, if any
pub fn last_end(events: &[PlaybackEvent]) -> Option<f64> {
    events.iter().map(|e| e.end).reduce(f64::max)
}
