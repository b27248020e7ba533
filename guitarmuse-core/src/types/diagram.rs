//! Text chord diagrams.
//!
//! One line per string, written high E first:
//!
//! ```text
//! e|--0--
//! B|--1--
//! G|--2--
//! D|--2--
//! A|--0--
//! E|--x--
//! ```
//!
//! A line containing `x`/`X` is a muted string. Otherwise the first run of
//! digits bounded by separators (`-` or `|`) is the fret; no such run means
//! the string is played open. Runs above the highest fret are not frets.

use crate::types::guitar::{diagram_order, MAX_FRET, STRING_COUNT};
use crate::types::note::Note;

/// What a single diagram line says about its string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringMarking {
    Muted,
    Fretted(u32),
}

impl StringMarking {
    /// Read one diagram line
    pub fn parse_line(line: &str) -> StringMarking {
        if line.contains(['x', 'X']) {
            return StringMarking::Muted;
        }
        StringMarking::Fretted(fret_number(line).unwrap_or(0))
    }
}

/// A parsed diagram, strings in written order (high pitch first)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagram {
    strings: Vec<StringMarking>,
}

impl Diagram {
    /// Parse diagram text. Blank lines are skipped and lines past the sixth
    /// string are ignored.
    pub fn parse(text: &str) -> Diagram {
        let strings = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .take(STRING_COUNT)
            .map(StringMarking::parse_line)
            .collect();
        Diagram { strings }
    }

    pub fn strings(&self) -> &[StringMarking] {
        &self.strings
    }

    /// Sounding notes ordered low to high. Muted strings contribute nothing.
    pub fn notes(&self) -> Vec<Note> {
        let mut notes: Vec<Note> = self
            .strings
            .iter()
            .zip(diagram_order())
            .filter_map(|(marking, open)| match marking {
                StringMarking::Muted => None,
                StringMarking::Fretted(fret) => Some(open.transpose(fret_semitones(*fret))),
            })
            .collect();
        notes.reverse();
        notes
    }
}

/// `fret` is at most `MAX_FRET` for parsed diagrams
fn fret_semitones(fret: u32) -> i32 {
    i32::try_from(fret.min(MAX_FRET)).unwrap_or(0)
}

fn is_separator(c: u8) -> bool {
    c == b'-' || c == b'|'
}

/// First digit run with a separator on both sides
fn fret_number(line: &str) -> Option<u32> {
    let bytes = line.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        let bounded_left = start > 0 && is_separator(bytes[start - 1]);
        let bounded_right = i < bytes.len() && is_separator(bytes[i]);
        if bounded_left && bounded_right {
            // digits are ASCII, so the slice is valid UTF-8
            match line[start..i].parse::<u32>() {
                Ok(fret) if fret <= MAX_FRET => return Some(fret),
                _ => log::debug!("ignoring fret run {:?}", &line[start..i]),
            }
        }
    }
    None
}
