//! Playback configuration.
//!
//! Pure data, shared by the native output device and any other front end.
//! Every setter clamps, so a config value is always playable.

use crate::types::envelope::Envelope;
use crate::types::time::{clamp_tempo, clamp_volume, DEFAULT_BPM};

/// Defaults for a playback scheduler
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlaybackConfig {
    /// Master volume (0.0-1.0)
    pub volume: f64,
    /// Tempo for progressions when none is given (BPM)
    pub tempo: f64,
    /// How long a single chord rings (seconds)
    pub chord_duration: f64,
    /// Gap between arpeggio notes (seconds)
    pub note_spacing: f64,
    /// How long a single plucked string rings (seconds)
    pub string_duration: f64,
    pub envelope: Envelope,
}

impl PlaybackConfig {
    pub fn new() -> Self {
        Self {
            volume: 0.7,
            tempo: DEFAULT_BPM,
            chord_duration: 2.0,
            note_spacing: 0.2,
            string_duration: 1.5,
            envelope: Envelope::PLUCKED,
        }
    }

    /// Set the master volume
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = clamp_volume(volume);
        self
    }

    /// Set the default tempo
    pub fn with_tempo(mut self, bpm: f64) -> Self {
        self.tempo = clamp_tempo(bpm);
        self
    }

    /// Set the default chord duration
    pub fn with_chord_duration(mut self, secs: f64) -> Self {
        if secs.is_finite() && secs > 0.0 {
            self.chord_duration = secs;
        }
        self
    }

    /// Set the default arpeggio spacing
    pub fn with_note_spacing(mut self, secs: f64) -> Self {
        if secs.is_finite() && secs > 0.0 {
            self.note_spacing = secs;
        }
        self
    }

    /// Set the envelope applied to every note
    pub fn with_envelope(mut self, envelope: Envelope) -> Self {
        self.envelope = envelope;
        self
    }

    /// Re-apply every clamp, e.g. after deserializing
    pub fn sanitized(self) -> Self {
        let defaults = Self::new();
        let envelope = self.envelope;
        Self {
            string_duration: if self.string_duration.is_finite() && self.string_duration > 0.0 {
                self.string_duration
            } else {
                defaults.string_duration
            },
            ..defaults
        }
        .with_volume(self.volume)
        .with_tempo(self.tempo)
        .with_chord_duration(self.chord_duration)
        .with_note_spacing(self.note_spacing)
        .with_envelope(Envelope::new(
            envelope.attack,
            envelope.decay,
            envelope.sustain,
            envelope.release,
        ))
    }

    /// Read a config from JSON; missing fields take their defaults
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let config: PlaybackConfig = serde_json::from_str(json)
            .map_err(|e| anyhow::anyhow!("Invalid playback config: {}", e))?;
        Ok(config.sanitized())
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self::new()
    }
}
