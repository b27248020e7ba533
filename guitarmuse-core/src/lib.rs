//! # GuitarMuse Core
//!
//! Music theory and playback planning for GuitarMuse, with no audio I/O.
//! Turns note names, chord symbols, and text chord diagrams into frequencies
//! and timed [`PlaybackEvent`]s that an output device renders.
//!
//! ## Features
//!
//! - **serde**: JSON playback config and decoding of generated progressions
//!
//! ## Example
//!
//! ```
//! use guitarmuse_core::types::{ChordDescriptor, ChordResolver};
//!
//! let chord = ChordResolver::new().resolve(&ChordDescriptor::name("Am"));
//! assert_eq!(chord.to_string(), "[A2, E3, A3, C4, E4]");
//! ```

pub mod diagnostic;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use diagnostic::Diagnostic;
pub use error::InputError;
pub use types::{
    ChordDescriptor, ChordResolver, Envelope, Note, PitchClass, PlaybackConfig, PlaybackEvent,
    ResolvedChord,
};
