use anyhow::{anyhow, Result};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// One of the twelve letter-classes of an octave, sharp-spelled.
/// 0=C, 1=C#, 2=D, 3=D#, 4=E, 5=F, 6=F#, 7=G, 8=G#, 9=A, 10=A#, 11=B
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PitchClass {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

const ALL_PITCH_CLASSES: [PitchClass; 12] = [
    PitchClass::C,
    PitchClass::CSharp,
    PitchClass::D,
    PitchClass::DSharp,
    PitchClass::E,
    PitchClass::F,
    PitchClass::FSharp,
    PitchClass::G,
    PitchClass::GSharp,
    PitchClass::A,
    PitchClass::ASharp,
    PitchClass::B,
];

impl PitchClass {
    /// All twelve letter-classes in ascending order starting at C
    pub fn all() -> [PitchClass; 12] {
        ALL_PITCH_CLASSES
    }

    /// 0-based position in the chromatic ordering starting at C
    pub const fn index(self) -> i32 {
        self as i32
    }

    /// Letter-class for any integer, wrapping modulo 12 (floor semantics)
    pub fn from_index(index: i32) -> PitchClass {
        ALL_PITCH_CLASSES[index.rem_euclid(12) as usize]
    }

    /// Sharp spelling of this letter-class
    pub fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::CSharp => "C#",
            PitchClass::D => "D",
            PitchClass::DSharp => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::FSharp => "F#",
            PitchClass::G => "G",
            PitchClass::GSharp => "G#",
            PitchClass::A => "A",
            PitchClass::ASharp => "A#",
            PitchClass::B => "B",
        }
    }

    /// Parse a letter-class name. Flats (Db, Eb, Gb, Ab, Bb) resolve to the
    /// enharmonic sharp. Case-insensitive; the legacy `S` suffix means sharp.
    pub fn from_name(name: &str) -> Option<PitchClass> {
        let pitch_class = match name.trim().to_uppercase().as_str() {
            "C" => PitchClass::C,
            "D" => PitchClass::D,
            "E" => PitchClass::E,
            "F" => PitchClass::F,
            "G" => PitchClass::G,
            "A" => PitchClass::A,
            "B" => PitchClass::B,

            "C#" | "CS" | "DB" => PitchClass::CSharp,
            "D#" | "DS" | "EB" => PitchClass::DSharp,
            "F#" | "FS" | "GB" => PitchClass::FSharp,
            "G#" | "GS" | "AB" => PitchClass::GSharp,
            "A#" | "AS" | "BB" => PitchClass::ASharp,

            _ => return None,
        };
        Some(pitch_class)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A letter-class paired with an octave in scientific pitch notation (4 = middle C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Note {
    pitch_class: PitchClass,
    octave: i32,
}

impl Note {
    pub const fn new(pitch_class: PitchClass, octave: i32) -> Self {
        Note {
            pitch_class,
            octave,
        }
    }

    pub fn pitch_class(&self) -> PitchClass {
        self.pitch_class
    }

    pub fn octave(&self) -> i32 {
        self.octave
    }

    /// Absolute semitone number counted from C0, saturating at the i32 range
    pub fn semitone(&self) -> i32 {
        self.octave
            .saturating_mul(12)
            .saturating_add(self.pitch_class.index())
    }

    /// Transpose the note by any number of semitones.
    ///
    /// Uses floor division so negative and multi-octave offsets carry into
    /// the octave correctly: C4 - 1 = B3, C4 + 25 = C#6. Offsets far outside
    /// the audible range saturate the octave instead of overflowing.
    pub fn transpose(self, semitones: i32) -> Note {
        let shifted = i64::from(self.pitch_class.index()) + i64::from(semitones);
        let octave = i64::from(self.octave) + shifted.div_euclid(12);

        Note {
            pitch_class: PitchClass::from_index(shifted.rem_euclid(12) as i32),
            octave: octave.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32,
        }
    }
}

impl FromStr for Note {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let mut chars = s.char_indices().peekable();

        // First char is always the letter
        let mut name_end = match chars.next() {
            Some((_, c)) if c.is_ascii_alphabetic() => 1,
            _ => return Err(anyhow!("Invalid note name: {:?}", s)),
        };

        // Optional accidental: '#', 'b', or the legacy 'S'
        if let Some(&(idx, c)) = chars.peek() {
            if matches!(c, '#' | 'b' | 'B' | 's' | 'S') {
                name_end = idx + c.len_utf8();
            }
        }

        let (name_part, octave_part) = s.split_at(name_end);
        let pitch_class = PitchClass::from_name(name_part)
            .ok_or_else(|| anyhow!("Invalid note name: {}", name_part))?;

        let octave = if octave_part.is_empty() {
            4
        } else {
            octave_part
                .parse::<i32>()
                .map_err(|_| anyhow!("Invalid octave: {}", octave_part))?
        };

        Ok(Note::new(pitch_class, octave))
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch_class.name(), self.octave)
    }
}

impl PartialOrd for Note {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Note {
    fn cmp(&self, other: &Self) -> Ordering {
        self.semitone().cmp(&other.semitone())
    }
}

// Arithmetic operations for transposition
impl Add<i32> for Note {
    type Output = Note;

    fn add(self, semitones: i32) -> Self::Output {
        self.transpose(semitones)
    }
}

impl Sub<i32> for Note {
    type Output = Note;

    fn sub(self, semitones: i32) -> Self::Output {
        self.transpose(semitones.saturating_neg())
    }
}

// Signed distance in semitones between two notes
impl Sub<Note> for Note {
    type Output = i32;

    fn sub(self, other: Note) -> Self::Output {
        self.semitone().saturating_sub(other.semitone())
    }
}
