//! Four-stage amplitude envelope with linear segments.
//!
//! For a note sounding from `start` to `end`:
//! - attack: 0 -> 1 over `attack` seconds
//! - decay: 1 -> `sustain` over `decay` seconds
//! - sustain: hold `sustain` until the release starts
//! - release: starts at `max(start + attack + decay, end - release)` and
//!   reaches exactly 0 at `end`
//!
//! A note shorter than attack + decay has its release start clamped to `end`,
//! so it is cut at the end of its window instead of ringing past it.

/// Envelope shape. Times are seconds; `sustain` is a level (0.0-1.0).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Envelope {
    pub attack: f64,
    pub decay: f64,
    pub sustain: f64,
    pub release: f64,
}

impl Envelope {
    /// The process-wide plucked-string envelope
    pub const PLUCKED: Envelope = Envelope {
        attack: 0.01,
        decay: 0.1,
        sustain: 0.7,
        release: 0.5,
    };

    /// Custom envelope; negative times become 0 and sustain is clamped
    pub fn new(attack: f64, decay: f64, sustain: f64, release: f64) -> Self {
        Self {
            attack: attack.max(0.0),
            decay: decay.max(0.0),
            sustain: sustain.clamp(0.0, 1.0),
            release: release.max(0.0),
        }
    }

    /// Absolute time at which the release ramp begins
    pub fn release_start(&self, start: f64, end: f64) -> f64 {
        (start + self.attack + self.decay)
            .max(end - self.release)
            .min(end)
    }

    /// Amplitude (0.0-1.0) at absolute `time` for a note spanning `start..end`
    pub fn gain_at(&self, start: f64, end: f64, time: f64) -> f64 {
        if time < start || time >= end {
            return 0.0;
        }

        let release_start = self.release_start(start, end);
        if time < release_start {
            return self.held_gain(time - start);
        }

        let level = self.held_gain(release_start - start);
        let span = end - release_start;
        if span <= 0.0 {
            return 0.0;
        }
        level * (end - time) / span
    }

    /// Attack/decay/sustain curve, ignoring the release
    fn held_gain(&self, elapsed: f64) -> f64 {
        if elapsed < self.attack {
            elapsed / self.attack
        } else if elapsed < self.attack + self.decay {
            let progress = (elapsed - self.attack) / self.decay;
            1.0 - (1.0 - self.sustain) * progress
        } else {
            self.sustain
        }
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::PLUCKED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_plucked_constants() {
        let env = Envelope::default();
        assert_eq!(env.attack, 0.01);
        assert_eq!(env.decay, 0.1);
        assert_eq!(env.sustain, 0.7);
        assert_eq!(env.release, 0.5);
    }

    #[test]
    fn test_release_start_for_long_note() {
        let env = Envelope::PLUCKED;
        assert!((env.release_start(0.0, 2.0) - 1.5).abs() < EPS);
        assert!((env.release_start(10.0, 12.0) - 11.5).abs() < EPS);
    }

    #[test]
    fn test_release_start_for_short_note() {
        let env = Envelope::PLUCKED;
        // 0.24s arpeggio note: attack+decay (0.11) wins over end-release (-0.26)
        assert!((env.release_start(0.0, 0.24) - 0.11).abs() < EPS);
        // Shorter than attack+decay: clamped to the end
        assert_eq!(env.release_start(0.0, 0.05), 0.05);
    }

    #[test]
    fn test_gain_shape() {
        let env = Envelope::PLUCKED;
        let (start, end) = (1.0, 3.0);

        assert_eq!(env.gain_at(start, end, 0.5), 0.0);
        assert_eq!(env.gain_at(start, end, start), 0.0);
        assert!((env.gain_at(start, end, start + 0.005) - 0.5).abs() < EPS);
        assert!((env.gain_at(start, end, start + 0.01) - 1.0).abs() < EPS);
        assert!((env.gain_at(start, end, start + 0.06) - 0.85).abs() < EPS);
        assert!((env.gain_at(start, end, start + 0.11) - 0.7).abs() < EPS);
        assert!((env.gain_at(start, end, 2.0) - 0.7).abs() < EPS);
        assert!((env.gain_at(start, end, 2.75) - 0.35).abs() < EPS);
        assert_eq!(env.gain_at(start, end, end), 0.0);
    }

    #[test]
    fn test_release_reaches_zero_at_end() {
        let env = Envelope::PLUCKED;
        let gain = env.gain_at(0.0, 0.24, 0.24 - 1e-6);
        assert!(gain > 0.0 && gain < 1e-4);
    }

    #[test]
    fn test_output_range() {
        let env = Envelope::PLUCKED;
        for i in 0..=3000 {
            let t = i as f64 / 1000.0;
            let gain = env.gain_at(0.0, 2.5, t);
            assert!((0.0..=1.0).contains(&gain), "gain {} at {}", gain, t);
        }
    }

    #[test]
    fn test_new_clamps() {
        let env = Envelope::new(-1.0, -1.0, 1.5, -0.2);
        assert_eq!(env.attack, 0.0);
        assert_eq!(env.release, 0.0);
        assert_eq!(env.sustain, 1.0);
        // Zero attack starts straight at full level
        assert_eq!(env.gain_at(0.0, 1.0, 0.0), 1.0);
    }
}
