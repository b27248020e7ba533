//! Tone generator: one pitched voice shaped by the note envelope.
//!
//! The timbre is a triangle wave, brighter than a sine and close enough to a
//! plucked string for chord previews. Amplitude comes from
//! [`Envelope::gain_at`] evaluated on the audio clock, so the release always
//! lands on zero at the event's end time.

use guitarmuse_core::{Envelope, PlaybackEvent};

/// Per-note oscillator state
#[derive(Debug, Clone)]
pub struct ToneGenerator {
    frequency: f64,
    phase: f64,
    sample_rate: f64,
    start: f64,
    end: f64,
    envelope: Envelope,
}

impl ToneGenerator {
    pub fn new(event: &PlaybackEvent, envelope: Envelope, sample_rate: u32) -> Self {
        Self {
            frequency: event.frequency(),
            phase: 0.0,
            sample_rate: sample_rate.max(1) as f64,
            start: event.start,
            end: event.end,
            envelope,
        }
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Whether the voice is silent from `time` on
    pub fn is_finished(&self, time: f64) -> bool {
        time >= self.end
    }

    /// Generate the sample for clock time `time` and advance the phase.
    /// The phase only advances while the note is inside its window.
    pub fn next_sample(&mut self, time: f64) -> f32 {
        let gain = self.envelope.gain_at(self.start, self.end, time);
        if gain <= 0.0 {
            return 0.0;
        }

        let value = triangle(self.phase);

        self.phase += self.frequency / self.sample_rate;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        (value * gain) as f32
    }
}

/// Triangle wave: linear ramp up then down
#[inline]
fn triangle(phase: f64) -> f64 {
    if phase < 0.5 {
        4.0 * phase - 1.0
    } else {
        3.0 - 4.0 * phase
    }
}
