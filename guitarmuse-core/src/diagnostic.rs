//! Recoverable lookup misses.
//!
//! Nothing in the core aborts playback because a note or chord name was not
//! recognized. Instead the lookup falls back to an audible approximation and
//! records a [`Diagnostic`], which is also forwarded to the `log` facade.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A note string could not be parsed; the reference pitch was used
    UnknownNote(String),
    /// Chord name not in the voicing dictionary; a triad was built instead
    ApproximatedChord { name: String },
    /// No root could be read from the chord name; the reference pitch was used
    UnknownChordRoot { name: String },
    /// A diagram produced no sounding strings; the reference pitch was used
    SilentDiagram,
}

impl Diagnostic {
    /// Log this diagnostic at warn level and hand it back for recording
    pub(crate) fn emit(self) -> Self {
        log::warn!("{}", self);
        self
    }

    /// True when the resolved notes are a guess rather than a known voicing
    pub fn is_approximation(&self) -> bool {
        !matches!(self, Diagnostic::UnknownNote(_))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownNote(name) => {
                write!(f, "note {:?} not recognized, using reference pitch", name)
            }
            Diagnostic::ApproximatedChord { name } => {
                write!(f, "no predefined notes for chord {:?}, using approximation", name)
            }
            Diagnostic::UnknownChordRoot { name } => {
                write!(f, "cannot read a root from chord {:?}, using reference pitch", name)
            }
            Diagnostic::SilentDiagram => {
                write!(f, "diagram has no sounding strings, using reference pitch")
            }
        }
    }
}
