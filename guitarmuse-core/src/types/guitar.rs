//! Standard six-string guitar tuning.

use crate::error::InputError;
use crate::types::note::{Note, PitchClass};

/// Number of strings on the instrument
pub const STRING_COUNT: usize = 6;

/// Highest fret on the neck
pub const MAX_FRET: u32 = 24;

/// Open-string notes, low to high: E2 A2 D3 G3 B3 E4.
/// Index 0 is the low E string.
pub const STANDARD_TUNING: [Note; STRING_COUNT] = [
    Note::new(PitchClass::E, 2),
    Note::new(PitchClass::A, 2),
    Note::new(PitchClass::D, 3),
    Note::new(PitchClass::G, 3),
    Note::new(PitchClass::B, 3),
    Note::new(PitchClass::E, 4),
];

/// Open-string note for a string index (0 = low E, 5 = high E)
pub fn open_string(index: usize) -> Result<Note, InputError> {
    STANDARD_TUNING
        .get(index)
        .copied()
        .ok_or(InputError::InvalidString(index))
}

/// Note sounded by pressing `fret` on string `index`
pub fn fretted_note(index: usize, fret: u32) -> Result<Note, InputError> {
    let open = open_string(index)?;
    match i32::try_from(fret) {
        Ok(semitones) if fret <= MAX_FRET => Ok(open.transpose(semitones)),
        _ => Err(InputError::InvalidFret(fret)),
    }
}

/// Open-string notes in the order diagrams are written: high E first
pub fn diagram_order() -> impl Iterator<Item = Note> {
    STANDARD_TUNING.into_iter().rev()
}
