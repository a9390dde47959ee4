//! Turn a wire payload into the human-readable multi-line definition text
//! that gets persisted on a vocabulary entry.

use crate::dto::EntryDto;
use std::fmt::Write;

/// Fixed fallback when the payload has no usable meanings.
pub const NO_DEFINITION_SENTINEL: &str = "No definition found.";

/// Only the first few definitions per part of speech are worth showing.
const MAX_DEFINITIONS_PER_MEANING: usize = 3;

/// Format the first entry of a lookup response.
///
/// Output contract: one `[part-of-speech]` header per meaning group,
/// definitions numbered from 1 (capped at three per group), each example
/// quoted on an indented `Ex:` line beneath its definition, and a blank
/// line between groups. An empty payload yields
/// [`NO_DEFINITION_SENTINEL`].
pub fn format_definition(entries: &[EntryDto]) -> String {
    let mut out = String::new();
    if let Some(entry) = entries.first() {
        for (index, meaning) in entry.meanings.iter().enumerate() {
            if index > 0 {
                out.push_str("\n\n");
            }
            // Infallible: writing into a String cannot fail.
            _ = write!(out, "[{}]\n", meaning.part_of_speech);
            let shown = meaning.definitions.len().min(MAX_DEFINITIONS_PER_MEANING);
            for (def_index, definition) in meaning.definitions.iter().take(shown).enumerate() {
                _ = write!(out, "{}. {}", def_index + 1, definition.definition);
                if let Some(example) = &definition.example {
                    _ = write!(out, "\n   Ex: \"{}\"", example);
                }
                if def_index < shown - 1 {
                    out.push('\n');
                }
            }
        }
    }
    if out.is_empty() { NO_DEFINITION_SENTINEL.to_string() } else { out }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::{DefinitionDto, MeaningDto};

    fn entry(meanings: Vec<MeaningDto>) -> EntryDto {
        EntryDto { word: "hello".to_string(), phonetic: None, meanings }
    }

    fn definition(text: &str, example: Option<&str>) -> DefinitionDto {
        DefinitionDto { definition: text.to_string(), example: example.map(str::to_string) }
    }

    #[test]
    fn test_numbers_definitions_without_examples() {
        let text = format_definition(&[entry(vec![MeaningDto {
            part_of_speech: "noun".to_string(),
            definitions: vec![definition("a greeting", None), definition("an utterance", None)],
        }])]);
        assert!(text.contains("[noun]"));
        assert!(text.contains("1. a greeting"));
        assert!(text.contains("2. an utterance"));
        assert!(!text.contains("Ex:"));
    }

    #[test]
    fn test_example_is_quoted_beneath_its_definition() {
        let text = format_definition(&[entry(vec![MeaningDto {
            part_of_speech: "verb".to_string(),
            definitions: vec![definition("to say hello", Some("he helloed across the street"))],
        }])]);
        assert_eq!(text, "[verb]\n1. to say hello\n   Ex: \"he helloed across the street\"");
    }

    #[test]
    fn test_caps_at_three_definitions_per_group() {
        let text = format_definition(&[entry(vec![MeaningDto {
            part_of_speech: "noun".to_string(),
            definitions: (1..=5).map(|n| definition(&format!("meaning {n}"), None)).collect(),
        }])]);
        assert!(text.contains("3. meaning 3"));
        assert!(!text.contains("4. meaning 4"));
    }

    #[test]
    fn test_groups_are_separated_by_a_blank_line() {
        let text = format_definition(&[entry(vec![
            MeaningDto {
                part_of_speech: "noun".to_string(),
                definitions: vec![definition("a greeting", None)],
            },
            MeaningDto {
                part_of_speech: "verb".to_string(),
                definitions: vec![definition("to greet", None)],
            },
        ])]);
        assert_eq!(text, "[noun]\n1. a greeting\n\n[verb]\n1. to greet");
    }

    #[test]
    fn test_empty_payload_yields_sentinel() {
        assert_eq!(format_definition(&[]), NO_DEFINITION_SENTINEL);
        assert_eq!(format_definition(&[entry(vec![])]), NO_DEFINITION_SENTINEL);
    }

    #[test]
    fn test_only_first_entry_is_formatted() {
        let first = entry(vec![MeaningDto {
            part_of_speech: "noun".to_string(),
            definitions: vec![definition("a greeting", None)],
        }]);
        let second = entry(vec![MeaningDto {
            part_of_speech: "interjection".to_string(),
            definitions: vec![definition("should not appear", None)],
        }]);
        let text = format_definition(&[first, second]);
        assert!(!text.contains("interjection"));
    }
}
