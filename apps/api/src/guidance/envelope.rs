//! JSON envelope extraction for model responses.
//!
//! Models routinely wrap JSON in markdown code fences and drop or mangle
//! individual fields. Top-level decode failure is a hard error (there is no
//! safe partial structure to fall back on); everything below the top level
//! is defaulted against a declared field schema.

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// The response was not a valid JSON document even after fence
    /// stripping. Carries both texts for diagnostics.
    #[error("model response is not valid JSON: {source}")]
    Json {
        raw: String,
        cleaned: String,
        #[source]
        source: serde_json::Error,
    },
}

/// One expected envelope field: its JSON key and a fallback entry builder
/// invoked with the request topic when the field is missing or unusable.
pub struct FieldSpec {
    pub key: &'static str,
    pub fallback: fn(&str) -> String,
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Strips fences and decodes the text as a JSON document.
pub fn decode_object(raw: &str) -> Result<Value, EnvelopeError> {
    let cleaned = strip_json_fences(raw);
    serde_json::from_str(cleaned).map_err(|source| EnvelopeError::Json {
        raw: raw.to_string(),
        cleaned: cleaned.to_string(),
        source,
    })
}

/// Extracts the declared fields from a model response.
///
/// Every key in `fields` is present in the result. A field that is absent,
/// not a list, or empty after dropping non-string entries is replaced by a
/// single fallback entry built from `topic`. Keys outside the schema are
/// dropped.
pub fn extract_envelope(
    raw: &str,
    fields: &[FieldSpec],
    topic: &str,
) -> Result<BTreeMap<&'static str, Vec<String>>, EnvelopeError> {
    let value = decode_object(raw)?;

    let mut out = BTreeMap::new();
    for field in fields {
        let items: Vec<String> = match value.get(field.key) {
            Some(Value::Array(entries)) => entries
                .iter()
                .filter_map(|e| e.as_str())
                .map(str::to_string)
                .collect(),
            Some(_) => {
                warn!("field '{}' in model response was not a list", field.key);
                Vec::new()
            }
            None => {
                warn!("field '{}' missing from model response", field.key);
                Vec::new()
            }
        };
        let items = if items.is_empty() {
            vec![(field.fallback)(topic)]
        } else {
            items
        };
        out.insert(field.key, items);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills_fallback(topic: &str) -> String {
        format!("Core skills relevant to {topic}")
    }

    fn paths_fallback(topic: &str) -> String {
        format!("Entry-level positions in {topic}")
    }

    const FIELDS: [FieldSpec; 2] = [
        FieldSpec {
            key: "keySkills",
            fallback: skills_fallback,
        },
        FieldSpec {
            key: "careerPaths",
            fallback: paths_fallback,
        },
    ];

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_fenced_and_unfenced_input_extract_identically() {
        let bare = r#"{"keySkills": ["SQL"], "careerPaths": ["Analyst"]}"#;
        let fenced = format!("```json\n{bare}\n```");
        let a = extract_envelope(bare, &FIELDS, "Statistics").unwrap();
        let b = extract_envelope(&fenced, &FIELDS, "Statistics").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_key_gets_single_fallback_entry() {
        let input = r#"{"keySkills": ["SQL", "R"]}"#;
        let out = extract_envelope(input, &FIELDS, "Statistics").unwrap();
        assert_eq!(out["keySkills"], vec!["SQL", "R"]);
        assert_eq!(out["careerPaths"], vec!["Entry-level positions in Statistics"]);
    }

    #[test]
    fn test_empty_list_gets_fallback() {
        let input = r#"{"keySkills": [], "careerPaths": ["Analyst"]}"#;
        let out = extract_envelope(input, &FIELDS, "Statistics").unwrap();
        assert_eq!(out["keySkills"], vec!["Core skills relevant to Statistics"]);
    }

    #[test]
    fn test_non_list_value_gets_fallback() {
        let input = r#"{"keySkills": "SQL", "careerPaths": {"x": 1}}"#;
        let out = extract_envelope(input, &FIELDS, "Statistics").unwrap();
        assert_eq!(out["keySkills"], vec!["Core skills relevant to Statistics"]);
        assert_eq!(out["careerPaths"], vec!["Entry-level positions in Statistics"]);
    }

    #[test]
    fn test_non_string_entries_are_dropped() {
        let input = r#"{"keySkills": [1, "SQL", null], "careerPaths": ["Analyst"]}"#;
        let out = extract_envelope(input, &FIELDS, "Statistics").unwrap();
        assert_eq!(out["keySkills"], vec!["SQL"]);
    }

    #[test]
    fn test_extra_keys_are_dropped() {
        let input = r#"{"keySkills": ["SQL"], "careerPaths": ["Analyst"], "noise": ["x"]}"#;
        let out = extract_envelope(input, &FIELDS, "Statistics").unwrap();
        assert_eq!(out.len(), 2);
        assert!(!out.contains_key("noise"));
    }

    #[test]
    fn test_invalid_json_is_an_error_carrying_both_texts() {
        let input = "```json\n{\"keySkills\": [\"SQL\"\n```";
        let err = extract_envelope(input, &FIELDS, "Statistics").unwrap_err();
        let EnvelopeError::Json { raw, cleaned, .. } = err;
        assert_eq!(raw, input);
        assert!(cleaned.starts_with("{\"keySkills\""));
    }
}
