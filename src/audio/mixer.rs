//! Sums every sounding voice into one output signal.
//!
//! Pending events wait in a min-heap keyed by start time; a voice is created
//! when its start time is reached and dropped once its window has passed.

use super::tone::ToneGenerator;
use guitarmuse_core::{Envelope, PlaybackEvent};
use std::collections::BinaryHeap;

/// Per-voice level before the master gain, leaving headroom for six strings
pub const VOICE_GAIN: f32 = 0.2;

pub struct Mixer {
    sample_rate: u32,
    envelope: Envelope,
    pending: BinaryHeap<PlaybackEvent>,
    voices: Vec<ToneGenerator>,
}

impl Mixer {
    pub fn new(sample_rate: u32, envelope: Envelope) -> Self {
        Self {
            sample_rate,
            envelope,
            pending: BinaryHeap::new(),
            voices: Vec::new(),
        }
    }

    pub fn schedule(&mut self, event: PlaybackEvent) {
        self.pending.push(event);
    }

    /// Nothing sounding and nothing waiting
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty() && self.voices.is_empty()
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    /// One mono sample at clock time `time`, scaled by `master_gain`
    pub fn next_sample(&mut self, time: f64, master_gain: f32) -> f32 {
        while let Some(event) = self.pending.peek() {
            if event.start > time {
                break;
            }
            if let Some(event) = self.pending.pop() {
                if time >= event.end {
                    // Arrived after its window closed
                    continue;
                }
                self.voices
                    .push(ToneGenerator::new(&event, self.envelope, self.sample_rate));
            }
        }

        let mut sum = 0.0;
        for voice in &mut self.voices {
            sum += voice.next_sample(time) * VOICE_GAIN;
        }
        self.voices.retain(|voice| !voice.is_finished(time));

        (sum * master_gain).clamp(-1.0, 1.0)
    }

    /// Render `frames` mono samples starting at clock time `start`
    pub fn render(&mut self, start: f64, frames: usize, master_gain: f32) -> Vec<f32> {
        let rate = self.sample_rate as f64;
        (0..frames)
            .map(|i| self.next_sample(start + i as f64 / rate, master_gain))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guitarmuse_core::Note;

    const SAMPLE_RATE: u32 = 8_000;

    fn note(name: &str) -> Note {
        name.parse().unwrap()
    }

    #[test]
    fn test_silent_until_first_event() {
        let mut mixer = Mixer::new(SAMPLE_RATE, Envelope::PLUCKED);
        mixer.schedule(PlaybackEvent::new(note("A4"), 0.5, 1.0));

        let samples = mixer.render(0.0, 4_000, 1.0);
        assert!(samples.iter().all(|s| *s == 0.0));
        assert!(!mixer.is_idle());
    }

    #[test]
    fn test_voices_come_and_go() {
        let mut mixer = Mixer::new(SAMPLE_RATE, Envelope::PLUCKED);
        mixer.schedule(PlaybackEvent::new(note("E2"), 0.0, 1.0));
        mixer.schedule(PlaybackEvent::new(note("B2"), 0.0, 1.0));
        mixer.schedule(PlaybackEvent::new(note("E3"), 0.5, 1.0));

        mixer.next_sample(0.0, 1.0);
        assert_eq!(mixer.active_voices(), 2);
        mixer.next_sample(0.5, 1.0);
        assert_eq!(mixer.active_voices(), 3);
        mixer.next_sample(1.0, 1.0);
        assert!(mixer.is_idle());
    }

    #[test]
    fn test_master_gain_scales_output() {
        let render = |gain: f32| {
            let mut mixer = Mixer::new(SAMPLE_RATE, Envelope::PLUCKED);
            mixer.schedule(PlaybackEvent::new(note("A4"), 0.0, 1.0));
            mixer.render(0.0, 8_000, gain)
        };
        let full = render(1.0);
        let half = render(0.5);
        let muted = render(0.0);

        let peak = |samples: &[f32]| samples.iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(peak(&full) > 0.0);
        assert!((peak(&half) - peak(&full) / 2.0).abs() < 1e-6);
        assert_eq!(peak(&muted), 0.0);
    }

    #[test]
    fn test_output_is_clamped() {
        let mut mixer = Mixer::new(SAMPLE_RATE, Envelope::PLUCKED);
        for _ in 0..20 {
            mixer.schedule(PlaybackEvent::new(note("A4"), 0.0, 1.0));
        }
        for sample in mixer.render(0.0, 8_000, 1.0) {
            assert!((-1.0..=1.0).contains(&sample));
        }
    }

    #[test]
    fn test_late_event_is_skipped() {
        let mut mixer = Mixer::new(SAMPLE_RATE, Envelope::PLUCKED);
        mixer.schedule(PlaybackEvent::new(note("A4"), 0.0, 0.5));
        assert_eq!(mixer.next_sample(2.0, 1.0), 0.0);
        assert!(mixer.is_idle());
    }
}
