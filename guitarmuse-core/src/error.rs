use crate::types::guitar::MAX_FRET;
use std::fmt;

/// Caller errors: arguments that indicate a bug upstream rather than bad
/// musical data. These are rejected outright, never clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputError {
    /// Guitar string index outside 0..=5
    InvalidString(usize),
    /// Fret above the highest fret on the neck
    InvalidFret(u32),
    /// Non-finite or non-positive note/chord duration (seconds)
    InvalidDuration(f64),
    /// Non-finite or non-positive arpeggio note spacing (seconds)
    InvalidSpacing(f64),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::InvalidString(index) => write!(
                f,
                "Invalid string number {}. Must be between 0 and 5.",
                index
            ),
            InputError::InvalidFret(fret) => write!(
                f,
                "Invalid fret {}. Must be between 0 and {}.",
                fret, MAX_FRET
            ),
            InputError::InvalidDuration(secs) => {
                write!(f, "Invalid duration {}s. Must be a positive number.", secs)
            }
            InputError::InvalidSpacing(secs) => {
                write!(f, "Invalid note spacing {}s. Must be a positive number.", secs)
            }
        }
    }
}

impl std::error::Error for InputError {}

/// Accept only finite, strictly positive durations
pub fn validate_duration(secs: f64) -> Result<f64, InputError> {
    if secs.is_finite() && secs > 0.0 {
        Ok(secs)
    } else {
        Err(InputError::InvalidDuration(secs))
    }
}

/// Accept only finite, strictly positive arpeggio spacings
pub fn validate_spacing(secs: f64) -> Result<f64, InputError> {
    if secs.is_finite() && secs > 0.0 {
        Ok(secs)
    } else {
        Err(InputError::InvalidSpacing(secs))
    }
}
