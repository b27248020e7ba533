//! Chord resolution: turning a chord descriptor into the notes to sound.
//!
//! Decision order:
//! 1. A text diagram is parsed string by string against standard tuning.
//! 2. A name found in the voicing dictionary returns its hand-voiced notes.
//! 3. Any other name is approximated as a root-position triad at octave 3.
//!
//! Resolution never fails. The worst case is a single reference note with a
//! [`Diagnostic`] explaining why.

use crate::diagnostic::Diagnostic;
use crate::types::diagram::Diagram;
use crate::types::note::{Note, PitchClass};
use crate::types::note::PitchClass::{A, B, C, CSharp, D, E, F, FSharp, G, GSharp};
use crate::types::pitch::REFERENCE_NOTE;
use std::fmt;

/// What the caller knows about a chord
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChordDescriptor {
    /// A chord symbol such as `"Am7"` or `"D/F#"`
    ByName(String),
    /// Raw diagram text, one line per string, high E first
    ByDiagram(String),
}

impl ChordDescriptor {
    pub fn name(name: impl Into<String>) -> Self {
        ChordDescriptor::ByName(name.into())
    }

    pub fn diagram(diagram: impl Into<String>) -> Self {
        ChordDescriptor::ByDiagram(diagram.into())
    }

    /// Build a descriptor from partial chord data. A non-blank diagram takes
    /// precedence; with neither field the descriptor is an empty name, which
    /// resolves to the reference pitch.
    pub fn from_parts(name: Option<&str>, diagram: Option<&str>) -> Self {
        match (name, diagram) {
            (_, Some(diagram)) if !diagram.trim().is_empty() => Self::diagram(diagram),
            (Some(name), _) => Self::name(name),
            _ => Self::name(""),
        }
    }
}

impl fmt::Display for ChordDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChordDescriptor::ByName(name) => write!(f, "{}", name),
            ChordDescriptor::ByDiagram(_) => write!(f, "<diagram>"),
        }
    }
}

/// Which path produced a resolved chord
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Voicing {
    Diagram,
    Dictionary,
    Approximation,
    Fallback,
}

/// The notes to sound for one descriptor, low to high. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedChord {
    notes: Vec<Note>,
    voicing: Voicing,
    diagnostics: Vec<Diagnostic>,
}

impl ResolvedChord {
    fn new(notes: Vec<Note>, voicing: Voicing) -> Self {
        ResolvedChord {
            notes,
            voicing,
            diagnostics: Vec::new(),
        }
    }

    fn fallback(diagnostic: Diagnostic) -> Self {
        ResolvedChord {
            notes: vec![REFERENCE_NOTE],
            voicing: Voicing::Fallback,
            diagnostics: vec![diagnostic.emit()],
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn into_notes(self) -> Vec<Note> {
        self.notes
    }

    pub fn voicing(&self) -> Voicing {
        self.voicing
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// True when the notes are a guess rather than a known voicing
    pub fn is_approximation(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_approximation)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

impl fmt::Display for ResolvedChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.notes.iter().map(Note::to_string).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

const fn n(pitch_class: PitchClass, octave: i32) -> Note {
    Note::new(pitch_class, octave)
}

/// Hand-voiced open-position shapes for common chords
const VOICINGS: &[(&str, &[Note])] = &[
    // Major
    ("A", &[n(A, 2), n(E, 3), n(A, 3), n(CSharp, 4), n(E, 4)]),
    ("C", &[n(C, 3), n(E, 3), n(G, 3), n(C, 4), n(E, 4)]),
    ("D", &[n(D, 3), n(A, 3), n(D, 4), n(FSharp, 4)]),
    ("E", &[n(E, 2), n(B, 2), n(E, 3), n(GSharp, 3), n(B, 3), n(E, 4)]),
    ("G", &[n(G, 2), n(B, 2), n(D, 3), n(G, 3), n(B, 3), n(G, 4)]),
    // Minor
    ("Am", &[n(A, 2), n(E, 3), n(A, 3), n(C, 4), n(E, 4)]),
    ("Dm", &[n(D, 3), n(A, 3), n(D, 4), n(F, 4)]),
    ("Em", &[n(E, 2), n(B, 2), n(E, 3), n(G, 3), n(B, 3), n(E, 4)]),
    // Seventh
    ("A7", &[n(A, 2), n(E, 3), n(G, 3), n(CSharp, 4), n(E, 4)]),
    ("E7", &[n(E, 2), n(B, 2), n(D, 3), n(GSharp, 3), n(B, 3), n(E, 4)]),
    ("G7", &[n(G, 2), n(B, 2), n(D, 3), n(F, 3), n(G, 3), n(B, 3)]),
];

/// Octave the approximated triad's root is placed in
const APPROXIMATION_OCTAVE: i32 = 3;

const MINOR_THIRD: i32 = 3;
const MAJOR_THIRD: i32 = 4;
const PERFECT_FIFTH: i32 = 7;

/// Resolves chord descriptors to notes. Stateless; every call recomputes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChordResolver;

impl ChordResolver {
    pub fn new() -> Self {
        ChordResolver
    }

    pub fn resolve(&self, descriptor: &ChordDescriptor) -> ResolvedChord {
        match descriptor {
            ChordDescriptor::ByDiagram(text) => Self::resolve_diagram(text),
            ChordDescriptor::ByName(name) => Self::resolve_name(name),
        }
    }

    /// Hand-voiced notes for a dictionary chord, if known
    pub fn voicing(name: &str) -> Option<&'static [Note]> {
        VOICINGS
            .iter()
            .find(|(symbol, _)| *symbol == name)
            .map(|(_, notes)| *notes)
    }

    fn resolve_diagram(text: &str) -> ResolvedChord {
        let notes = Diagram::parse(text).notes();
        if notes.is_empty() {
            return ResolvedChord::fallback(Diagnostic::SilentDiagram);
        }
        ResolvedChord::new(notes, Voicing::Diagram)
    }

    fn resolve_name(name: &str) -> ResolvedChord {
        let name = name.trim();
        if let Some(notes) = Self::voicing(name) {
            return ResolvedChord::new(notes.to_vec(), Voicing::Dictionary);
        }

        match approximate_triad(name) {
            Some(notes) => {
                let mut resolved = ResolvedChord::new(notes, Voicing::Approximation);
                resolved.diagnostics.push(
                    Diagnostic::ApproximatedChord {
                        name: name.to_string(),
                    }
                    .emit(),
                );
                resolved
            }
            None => ResolvedChord::fallback(Diagnostic::UnknownChordRoot {
                name: name.to_string(),
            }),
        }
    }
}

/// Split a chord symbol into its root and the quality text after it.
/// Anything after `/` (a slash-chord bass) is dropped.
fn split_symbol(name: &str) -> Option<(PitchClass, &str)> {
    let symbol = name.split('/').next().unwrap_or("").trim();
    let mut chars = symbol.char_indices();

    let (_, letter) = chars.next()?;
    if !matches!(letter.to_ascii_uppercase(), 'A'..='G') {
        return None;
    }

    let mut root_end = letter.len_utf8();
    if let Some((idx, c)) = chars.next() {
        if c == '#' || c == 'b' {
            root_end = idx + c.len_utf8();
        }
    }

    // An unsupported accidental (Cb, E#) falls back to the bare letter
    let (root, quality) = match PitchClass::from_name(&symbol[..root_end]) {
        Some(root) => (root, &symbol[root_end..]),
        None => (
            PitchClass::from_name(&symbol[..letter.len_utf8()])?,
            &symbol[letter.len_utf8()..],
        ),
    };
    Some((root, quality))
}

/// Minor when the quality mentions `m`/`min` outside a `maj` marker
fn is_minor(quality: &str) -> bool {
    quality.replace("maj", "").contains('m')
}

/// Root, third, and fifth with the root at octave 3
fn approximate_triad(name: &str) -> Option<Vec<Note>> {
    let (root, quality) = split_symbol(name)?;
    let root = Note::new(root, APPROXIMATION_OCTAVE);
    let third = if is_minor(quality) {
        MINOR_THIRD
    } else {
        MAJOR_THIRD
    };
    Some(vec![root, root + third, root + PERFECT_FIFTH])
}
