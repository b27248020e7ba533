pub mod audio_config;
pub mod chord;
pub mod diagram;
pub mod envelope;
pub mod guitar;
pub mod note;
pub mod pitch;
#[cfg(feature = "serde")]
pub mod progression;
pub mod scheduled_event;
pub mod time;

pub use audio_config::PlaybackConfig;
pub use chord::{ChordDescriptor, ChordResolver, ResolvedChord, Voicing};
pub use diagram::{Diagram, StringMarking};
pub use envelope::Envelope;
pub use guitar::{fretted_note, open_string, MAX_FRET, STANDARD_TUNING, STRING_COUNT};
pub use note::{Note, PitchClass};
pub use pitch::{frequency_of, FrequencyLookup, REFERENCE_FREQUENCY, REFERENCE_NOTE};
#[cfg(feature = "serde")]
pub use progression::{ChordEntry, GeneratedProgression, GenerationFailure, GeneratorResponse};
pub use scheduled_event::{last_end, PlaybackEvent};
pub use time::{
    beat_seconds, chord_seconds, clamp_tempo, clamp_volume, Duration, DEFAULT_BPM, MAX_BPM,
    MIN_BPM,
};
