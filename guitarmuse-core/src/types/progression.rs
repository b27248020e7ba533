//! Decoding the progression generator's response.
//!
//! The generator is a language model asked for JSON shaped like
//!
//! ```json
//! {
//!   "progression": [
//!     { "name": "Am", "diagram": "...", "function": "i", "alternatives": ["Am7"] }
//!   ],
//!   "description": "...",
//!   "playingTips": "..."
//! }
//! ```
//!
//! but it may wrap the JSON in prose, use `chords` instead of `progression`,
//! emit bare strings for chords, or fail outright. Decoding keeps whatever
//! chord data survives and never panics.

use crate::types::chord::ChordDescriptor;
use serde_json::{Map, Value};

/// One chord as described by the generator
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ChordEntry {
    pub name: Option<String>,
    pub diagram: Option<String>,
    pub function: Option<String>,
    pub alternatives: Vec<String>,
}

impl ChordEntry {
    /// Tagged descriptor for the resolver (diagram preferred over name)
    pub fn descriptor(&self) -> ChordDescriptor {
        ChordDescriptor::from_parts(self.name.as_deref(), self.diagram.as_deref())
    }

    /// Display label: the name, or a placeholder
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("?")
    }

    fn from_value(value: &Value) -> ChordEntry {
        match value {
            Value::String(name) => ChordEntry {
                name: Some(name.clone()),
                ..ChordEntry::default()
            },
            Value::Object(fields) => ChordEntry {
                name: string_field(fields, "name"),
                diagram: string_field(fields, "diagram"),
                function: string_field(fields, "function"),
                alternatives: fields
                    .get("alternatives")
                    .and_then(Value::as_array)
                    .map(|alts| {
                        alts.iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            other => {
                log::warn!("ignoring malformed chord entry: {}", other);
                ChordEntry::default()
            }
        }
    }
}

/// A successfully decoded progression
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct GeneratedProgression {
    pub chords: Vec<ChordEntry>,
    pub description: Option<String>,
    pub playing_tips: Option<String>,
}

impl GeneratedProgression {
    pub fn descriptors(&self) -> Vec<ChordDescriptor> {
        self.chords.iter().map(ChordEntry::descriptor).collect()
    }
}

/// The generator answered, but not with a usable progression
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct GenerationFailure {
    pub message: String,
    pub raw_response: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub enum GeneratorResponse {
    Progression(GeneratedProgression),
    Failure(GenerationFailure),
}

impl GeneratorResponse {
    /// Decode the generator's raw text
    pub fn parse(raw: &str) -> GeneratorResponse {
        match Self::decode(raw) {
            Ok(progression) => GeneratorResponse::Progression(progression),
            Err(message) => {
                log::error!("Error parsing progression response: {}", message);
                GeneratorResponse::Failure(GenerationFailure {
                    message,
                    raw_response: raw.to_string(),
                })
            }
        }
    }

    pub fn progression(&self) -> Option<&GeneratedProgression> {
        match self {
            GeneratorResponse::Progression(progression) => Some(progression),
            GeneratorResponse::Failure(_) => None,
        }
    }

    fn decode(raw: &str) -> Result<GeneratedProgression, String> {
        let json = extract_json(raw).ok_or("Could not extract JSON from response")?;
        let value: Value = serde_json::from_str(json).map_err(|e| e.to_string())?;
        let fields = value.as_object().ok_or("Response is not a JSON object")?;

        if fields.get("error").and_then(Value::as_bool) == Some(true) {
            let message = string_field(fields, "message")
                .unwrap_or_else(|| "Generator reported an error".to_string());
            return Err(message);
        }

        let chords = fields
            .get("progression")
            .or_else(|| fields.get("chords"))
            .and_then(Value::as_array)
            .ok_or("Invalid progression format")?;

        Ok(GeneratedProgression {
            chords: chords.iter().map(ChordEntry::from_value).collect(),
            description: string_field(fields, "description"),
            playing_tips: string_field(fields, "playingTips")
                .or_else(|| string_field(fields, "playing_tips")),
        })
    }
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Text from the first `{` to the last `}`
fn extract_json(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (start < end).then(|| &raw[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::chord::ChordResolver;

    #[test]
    fn test_well_formed_response() {
        let raw = r#"{
            "progression": [
                { "name": "Am", "diagram": "e|--0--\nB|--1--\nG|--2--\nD|--2--\nA|--0--\nE|--x--", "function": "i", "alternatives": ["Am7"] },
                { "name": "F", "function": "VI" }
            ],
            "description": "Moody",
            "playingTips": "Let it ring"
        }"#;

        let response = GeneratorResponse::parse(raw);
        let progression = response.progression().unwrap();
        assert_eq!(progression.chords.len(), 2);
        assert_eq!(progression.chords[0].alternatives, ["Am7"]);
        assert_eq!(progression.description.as_deref(), Some("Moody"));
        assert_eq!(progression.playing_tips.as_deref(), Some("Let it ring"));

        let descriptors = progression.descriptors();
        assert!(matches!(descriptors[0], ChordDescriptor::ByDiagram(_)));
        assert_eq!(descriptors[1], ChordDescriptor::name("F"));
    }

    #[test]
    fn test_json_wrapped_in_prose() {
        let raw = "Sure! Here you go:\n{\"chords\": [\"G\", \"D\"]}\nEnjoy.";
        let progression = GeneratorResponse::parse(raw).progression().cloned().unwrap();
        assert_eq!(progression.chords[0].label(), "G");
        assert_eq!(progression.chords[1].label(), "D");
    }

    #[test]
    fn test_malformed_entries_still_resolve() {
        let raw = r#"{"progression": [42, {"name": 7, "diagram": null}, {"function": "V"}, "Em"]}"#;
        let progression = GeneratorResponse::parse(raw).progression().cloned().unwrap();
        assert_eq!(progression.chords.len(), 4);

        let resolver = ChordResolver::new();
        for descriptor in progression.descriptors() {
            assert!(!resolver.resolve(&descriptor).is_empty());
        }
    }

    #[test]
    fn test_failures_keep_raw_text() {
        for raw in [
            "I cannot help with that.",
            "{ not json }",
            r#"{"description": "no chords"}"#,
            r#"{"error": true, "message": "Failed to parse response", "rawResponse": "..."}"#,
        ] {
            match GeneratorResponse::parse(raw) {
                GeneratorResponse::Failure(failure) => assert_eq!(failure.raw_response, raw),
                other => panic!("expected failure for {:?}, got {:?}", raw, other),
            }
        }
    }
}
