//! Tempo and musical durations.

/// Slowest accepted tempo
pub const MIN_BPM: f64 = 40.0;
/// Fastest accepted tempo
pub const MAX_BPM: f64 = 240.0;
/// Tempo used when none has been set
pub const DEFAULT_BPM: f64 = 120.0;
/// Each progression chord lasts one 4/4 bar
pub const BEATS_PER_CHORD: f64 = 4.0;

/// Clamp a tempo into [`MIN_BPM`, `MAX_BPM`]. NaN becomes [`DEFAULT_BPM`].
pub fn clamp_tempo(bpm: f64) -> f64 {
    if bpm.is_nan() {
        return DEFAULT_BPM;
    }
    bpm.clamp(MIN_BPM, MAX_BPM)
}

/// Clamp a volume into [0, 1]. NaN becomes silence.
pub fn clamp_volume(volume: f64) -> f64 {
    if volume.is_nan() {
        return 0.0;
    }
    volume.clamp(0.0, 1.0)
}

/// Musical duration representation
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Duration {
    /// Duration in beats (quarter notes in 4/4 time)
    Beats(f64),
    /// Absolute duration in seconds
    Seconds(f64),
    /// Duration in bars (measures, assuming 4/4 time)
    Bars(f64),
}

impl Duration {
    /// Convert to seconds at the given tempo
    pub fn to_seconds(&self, bpm: f64) -> f64 {
        match self {
            Duration::Beats(beats) => beats * beat_seconds(bpm),
            Duration::Seconds(secs) => *secs,
            Duration::Bars(bars) => bars * BEATS_PER_CHORD * beat_seconds(bpm),
        }
    }

    /// Convert to std::time::Duration; negative or non-finite values become zero
    pub fn to_std_duration(&self, bpm: f64) -> std::time::Duration {
        let secs = self.to_seconds(bpm);
        if secs.is_finite() && secs > 0.0 {
            std::time::Duration::from_secs_f64(secs)
        } else {
            std::time::Duration::ZERO
        }
    }
}

/// Length of one beat in seconds
pub fn beat_seconds(bpm: f64) -> f64 {
    60.0 / bpm
}

/// Length of one progression chord (one bar) in seconds
pub fn chord_seconds(bpm: f64) -> f64 {
    Duration::Bars(1.0).to_seconds(bpm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tempo_clamping() {
        assert_eq!(clamp_tempo(10.0), 40.0);
        assert_eq!(clamp_tempo(500.0), 240.0);
        assert_eq!(clamp_tempo(96.0), 96.0);
        assert_eq!(clamp_tempo(f64::NAN), DEFAULT_BPM);
    }

    #[test]
    fn test_volume_clamping() {
        assert_eq!(clamp_volume(-5.0), 0.0);
        assert_eq!(clamp_volume(5.0), 1.0);
        assert_eq!(clamp_volume(0.25), 0.25);
        assert_eq!(clamp_volume(f64::NAN), 0.0);
    }

    #[test]
    fn test_chord_length() {
        // 120 BPM: 0.5s beats, 2.0s chords
        assert_eq!(beat_seconds(120.0), 0.5);
        assert_eq!(chord_seconds(120.0), 2.0);
        assert_eq!(chord_seconds(60.0), 4.0);
    }

    #[test]
    fn test_duration_conversion() {
        assert_eq!(Duration::Beats(2.0).to_seconds(120.0), 1.0);
        assert_eq!(Duration::Bars(1.0).to_seconds(120.0), 2.0);
        assert_eq!(Duration::Seconds(1.5).to_seconds(120.0), 1.5);
        assert_eq!(
            Duration::Beats(1.0).to_std_duration(60.0),
            std::time::Duration::from_secs(1)
        );
        assert_eq!(
            Duration::Seconds(-1.0).to_std_duration(60.0),
            std::time::Duration::ZERO
        );
    }
}
