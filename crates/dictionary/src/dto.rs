//! Wire types for the free dictionary API.
//!
//! The endpoint returns a JSON array of entries; each entry groups its
//! definitions by part of speech. Only the fields we format are modelled,
//! everything else in the payload is ignored by serde.

use serde::Deserialize;

/// One dictionary entry for a looked-up word.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EntryDto {
    pub word: String,
    #[serde(default)]
    pub phonetic: Option<String>,
    #[serde(default)]
    pub meanings: Vec<MeaningDto>,
}

/// A part-of-speech group with its ordered definitions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeaningDto {
    pub part_of_speech: String,
    #[serde(default)]
    pub definitions: Vec<DefinitionDto>,
}

/// A single definition, optionally with a usage example.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DefinitionDto {
    pub definition: String,
    #[serde(default)]
    pub example: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_real_payload_shape() {
        let payload = r#"[
            {
                "word": "hello",
                "phonetic": "/həˈləʊ/",
                "meanings": [
                    {
                        "partOfSpeech": "noun",
                        "definitions": [
                            { "definition": "a greeting", "example": "she was met with a cheery hello" },
                            { "definition": "an utterance" }
                        ]
                    }
                ],
                "sourceUrls": ["https://en.wiktionary.org/wiki/hello"]
            }
        ]"#;
        let entries: Vec<EntryDto> = serde_json::from_str(payload).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].word, "hello");
        assert_eq!(entries[0].meanings[0].part_of_speech, "noun");
        assert_eq!(entries[0].meanings[0].definitions.len(), 2);
        assert!(entries[0].meanings[0].definitions[1].example.is_none());
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let entries: Vec<EntryDto> = serde_json::from_str(r#"[{ "word": "hi" }]"#).unwrap();
        assert!(entries[0].phonetic.is_none());
        assert!(entries[0].meanings.is_empty());
    }
}
