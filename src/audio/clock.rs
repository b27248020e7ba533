//! Sample-counting audio clock.
//!
//! The output callback advances the clock by the number of frames it renders,
//! so clock time is exactly the position of the next frame to be played and
//! does not move while the stream is paused.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared frame counter. Clones observe the same clock.
#[derive(Debug, Clone)]
pub struct SampleClock {
    frames: Arc<AtomicU64>,
    sample_rate: u32,
}

impl SampleClock {
    pub fn new(sample_rate: u32) -> Self {
        SampleClock {
            frames: Arc::new(AtomicU64::new(0)),
            sample_rate: sample_rate.max(1),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Frames rendered so far
    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Acquire)
    }

    /// Clock position in seconds
    pub fn seconds(&self) -> f64 {
        self.seconds_at(self.frames())
    }

    /// Time of an absolute frame index
    pub fn seconds_at(&self, frame: u64) -> f64 {
        frame as f64 / self.sample_rate as f64
    }

    /// Advance after rendering a buffer
    pub fn advance(&self, frames: u64) {
        self.frames.fetch_add(frames, Ordering::AcqRel);
    }
}
