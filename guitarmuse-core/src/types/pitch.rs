//! Pitch table: 12-tone equal temperament referenced to A4 = 440 Hz.
//!
//! Frequencies are computed on demand from the closed-form formula, so every
//! octave and every enharmonic spelling is covered without a lookup table.

use crate::diagnostic::Diagnostic;
use crate::types::note::{Note, PitchClass};

/// Concert pitch in Hz
pub const REFERENCE_FREQUENCY: f64 = 440.0;

/// The note sounding at [`REFERENCE_FREQUENCY`]
pub const REFERENCE_NOTE: Note = Note::new(PitchClass::A, 4);

impl Note {
    /// Frequency in Hz: `440 * 2^((12*(octave-4) + (index-9)) / 12)`.
    ///
    /// The octave factor is applied as an exact power of two so that raising
    /// a note by an octave exactly doubles its frequency.
    pub fn frequency(&self) -> f64 {
        let octave_factor = 2.0_f64.powi(self.octave().saturating_sub(4));
        let semitones_from_a = (self.pitch_class().index() - PitchClass::A.index()) as f64;
        REFERENCE_FREQUENCY * octave_factor * 2.0_f64.powf(semitones_from_a / 12.0)
    }
}

/// Result of looking up a note string
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyLookup {
    pub hz: f64,
    pub diagnostic: Option<Diagnostic>,
}

/// Frequency for a note string such as `"A4"` or `"Bb3"`.
///
/// Unparseable names degrade to [`REFERENCE_FREQUENCY`] and carry an
/// [`Diagnostic::UnknownNote`].
pub fn frequency_of(name: &str) -> FrequencyLookup {
    match name.parse::<Note>() {
        Ok(note) => FrequencyLookup {
            hz: note.frequency(),
            diagnostic: None,
        },
        Err(_) => FrequencyLookup {
            hz: REFERENCE_FREQUENCY,
            diagnostic: Some(Diagnostic::UnknownNote(name.to_string()).emit()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4_is_exactly_reference() {
        assert_eq!(REFERENCE_NOTE.frequency(), 440.0);
    }

    #[test]
    fn test_known_frequencies() {
        let cases = [("C4", 261.63), ("E2", 82.41), ("E4", 329.63), ("A#4", 466.16)];
        for (name, expected) in cases {
            let note: Note = name.parse().unwrap();
            assert!(
                (note.frequency() - expected).abs() < 0.01,
                "{} expected {} got {}",
                name,
                expected,
                note.frequency()
            );
        }
    }

    #[test]
    fn test_octave_doubles_frequency() {
        for pitch_class in PitchClass::all() {
            for octave in 0..=8 {
                let note = Note::new(pitch_class, octave);
                assert_eq!(note.transpose(12).frequency(), 2.0 * note.frequency());
            }
        }
    }

    #[test]
    fn test_semitone_ratio() {
        let a4 = REFERENCE_NOTE;
        let ratio = a4.transpose(1).frequency() / a4.frequency();
        assert!((ratio - 2.0_f64.powf(1.0 / 12.0)).abs() < 1e-12);
    }

    #[test]
    fn test_frequency_of_known_and_flat_names() {
        let lookup = frequency_of("Bb3");
        assert!(lookup.diagnostic.is_none());
        assert_eq!(lookup.hz, frequency_of("A#3").hz);
    }

    #[test]
    fn test_frequency_of_unknown_falls_back() {
        let lookup = frequency_of("Xa3");
        assert_eq!(lookup.hz, REFERENCE_FREQUENCY);
        assert_eq!(
            lookup.diagnostic,
            Some(Diagnostic::UnknownNote("Xa3".to_string()))
        );
    }
}
