//! Uploaded JSON templates: the export skeleton.
//!
//! A template is an ordered sequence of dynamically-shaped records. Only
//! two fields are interpreted: the `type` discriminator and, for
//! `"type": "text"` records, the `text` and `context` fields. Everything
//! else is opaque payload that passes through export untouched. The
//! template itself is never mutated in place; export always derives a
//! new sequence.

use crate::annotation::Annotation;
use serde_json::Value;
use thiserror::Error;

/// Template parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("Invalid JSON file")]
    InvalidJson,
}

/// A `"type": "text"` record: the one shape the merge understands.
///
/// The classified `text`/`context` view drives seeding and match lookup;
/// the record itself is kept verbatim so anything that doesn't get a
/// merge match passes through export byte-for-byte.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRecord {
    pub text: String,
    /// The record's `context` when it is a string, empty otherwise.
    pub context: String,
    raw: Value,
}

/// One element of a template: a recognized text record or opaque payload.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateRecord {
    Text(TextRecord),
    Other(Value),
}

impl TemplateRecord {
    /// Classify a JSON value. Only objects with `"type": "text"` and a
    /// string `text` field become [`TemplateRecord::Text`]; anything
    /// else, malformed text records included, stays opaque.
    fn classify(value: Value) -> Self {
        let Value::Object(obj) = &value else {
            return TemplateRecord::Other(value);
        };
        if obj.get("type").and_then(|t| t.as_str()) != Some("text") {
            return TemplateRecord::Other(value);
        }
        let Some(text) = obj.get("text").and_then(Value::as_str) else {
            return TemplateRecord::Other(value);
        };
        let text = text.to_string();
        let context = obj
            .get("context")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        TemplateRecord::Text(TextRecord {
            text,
            context,
            raw: value,
        })
    }

    /// The record as a JSON value, exactly as it was uploaded.
    fn to_value(&self) -> Value {
        match self {
            TemplateRecord::Text(rec) => rec.raw.clone(),
            TemplateRecord::Other(value) => value.clone(),
        }
    }
}

/// An uploaded template: the ordered record sequence used as the export
/// skeleton.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TemplateDocument {
    records: Vec<TemplateRecord>,
}

impl TemplateDocument {
    /// Parse template content.
    ///
    /// Malformed JSON is an error. Valid JSON that is not an array parses
    /// to `Ok(None)`: non-array inputs are treated as an absent template.
    pub fn from_json(content: &str) -> Result<Option<Self>, TemplateError> {
        let value: Value = serde_json::from_str(content).map_err(|e| {
            log::warn!("template parse failed: {}", e);
            TemplateError::InvalidJson
        })?;
        let Value::Array(elements) = value else {
            log::debug!("template is valid JSON but not an array; treating as absent");
            return Ok(None);
        };
        let records = elements.into_iter().map(TemplateRecord::classify).collect();
        Ok(Some(Self { records }))
    }

    /// The ordered records.
    pub fn records(&self) -> &[TemplateRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check whether the template holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Best-effort seed extraction: one annotation (fresh id) per text
    /// record with a non-empty `context`, in template order. Malformed
    /// elements were already demoted to opaque records and are skipped.
    pub fn extract_annotations(&self) -> Vec<Annotation> {
        self.records
            .iter()
            .filter_map(|record| match record {
                TemplateRecord::Text(rec) if !rec.context.is_empty() => {
                    Some(Annotation::new(rec.text.clone(), rec.context.clone()))
                }
                _ => None,
            })
            .collect()
    }

    /// Derive the export sequence: for every text record, the *first*
    /// annotation (scan order) whose `text` equals the record's `text`
    /// exactly overwrites the record's `context`. Records with no match,
    /// and opaque records, pass through unchanged.
    pub fn merge(&self, annotations: &[Annotation]) -> Vec<Value> {
        self.records
            .iter()
            .map(|record| match record {
                TemplateRecord::Text(rec) => {
                    match annotations.iter().find(|a| a.text == rec.text) {
                        Some(annotation) => {
                            // Only a match touches the record.
                            let mut merged = record.to_value();
                            if let Value::Object(obj) = &mut merged {
                                obj.insert(
                                    "context".into(),
                                    Value::String(annotation.context.clone()),
                                );
                            }
                            merged
                        }
                        None => record.to_value(),
                    }
                }
                TemplateRecord::Other(_) => record.to_value(),
            })
            .collect()
    }
}

/// Export shape when no template was uploaded: one minimal text record
/// per annotation, list order.
pub fn synthesize(annotations: &[Annotation]) -> Vec<Value> {
    annotations
        .iter()
        .map(|a| {
            serde_json::json!({
                "type": "text",
                "text": a.text,
                "context": a.context,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(content: &str) -> TemplateDocument {
        TemplateDocument::from_json(content)
            .expect("valid JSON")
            .expect("array input")
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert_eq!(
            TemplateDocument::from_json("{not json"),
            Err(TemplateError::InvalidJson)
        );
    }

    #[test]
    fn test_non_array_treated_as_absent() {
        assert_eq!(TemplateDocument::from_json("{\"type\":\"text\"}"), Ok(None));
        assert_eq!(TemplateDocument::from_json("42"), Ok(None));
    }

    #[test]
    fn test_classification() {
        let doc = template(
            r#"[
                {"type":"text","text":"Policy No.","context":""},
                {"type":"image","src":"logo.png"},
                {"type":"text","text":123},
                "loose string"
            ]"#,
        );
        assert_eq!(doc.len(), 4);
        assert!(matches!(doc.records()[0], TemplateRecord::Text(_)));
        assert!(matches!(doc.records()[1], TemplateRecord::Other(_)));
        // Non-string text field keeps the record opaque.
        assert!(matches!(doc.records()[2], TemplateRecord::Other(_)));
        assert!(matches!(doc.records()[3], TemplateRecord::Other(_)));
    }

    #[test]
    fn test_extract_skips_empty_context() {
        let doc = template(
            r#"[
                {"type":"text","text":"Policy No.","context":"PolicyNumber"},
                {"type":"text","text":"Effective Date","context":""},
                {"type":"text","text":"Policyholder"}
            ]"#,
        );
        let extracted = doc.extract_annotations();
        assert_eq!(extracted.len(), 1);
        assert_eq!(extracted[0].text, "Policy No.");
        assert_eq!(extracted[0].context, "PolicyNumber");
    }

    #[test]
    fn test_merge_overwrites_context_of_matching_text() {
        let doc = template(r#"[{"type":"text","text":"Policy No.","context":""}]"#);
        let annotations = vec![Annotation::new("Policy No.", "PolicyNumber")];

        let merged = doc.merge(&annotations);
        assert_eq!(
            merged,
            vec![serde_json::json!({
                "type": "text",
                "text": "Policy No.",
                "context": "PolicyNumber",
            })]
        );
    }

    #[test]
    fn test_merge_first_match_wins() {
        let doc = template(r#"[{"type":"text","text":"Policy No.","context":"old"}]"#);
        let annotations = vec![
            Annotation::new("Policy No.", "First"),
            Annotation::new("Policy No.", "Second"),
        ];

        let merged = doc.merge(&annotations);
        assert_eq!(merged[0]["context"], "First");
    }

    #[test]
    fn test_merge_passes_through_unmatched_and_opaque() {
        let doc = template(
            r#"[
                {"type":"text","text":"No match here","context":"keep"},
                {"type":"image","src":"logo.png"},
                {"type":"text","text":"Policy No.","context":"","page":2}
            ]"#,
        );
        let annotations = vec![Annotation::new("Policy No.", "PolicyNumber")];

        let merged = doc.merge(&annotations);
        assert_eq!(merged[0]["context"], "keep");
        assert_eq!(merged[1], serde_json::json!({"type":"image","src":"logo.png"}));
        // Extra fields of matched records survive the merge.
        assert_eq!(merged[2]["page"], 2);
        assert_eq!(merged[2]["context"], "PolicyNumber");
    }

    #[test]
    fn test_merge_unmatched_records_pass_through_verbatim() {
        // No context field, and a non-string context: both survive
        // export exactly as uploaded when nothing matches them.
        let doc = template(
            r#"[
                {"type":"text","text":"X"},
                {"type":"text","text":"Y","context":5}
            ]"#,
        );
        let annotations = vec![Annotation::new("Policy No.", "PolicyNumber")];

        let merged = doc.merge(&annotations);
        assert_eq!(merged[0], serde_json::json!({"type":"text","text":"X"}));
        assert_eq!(
            merged[1],
            serde_json::json!({"type":"text","text":"Y","context":5})
        );
    }

    #[test]
    fn test_merge_does_not_mutate_template() {
        let doc = template(r#"[{"type":"text","text":"Policy No.","context":""}]"#);
        let annotations = vec![Annotation::new("Policy No.", "PolicyNumber")];

        let first = doc.merge(&annotations);
        let second = doc.merge(&annotations);
        assert_eq!(first, second);
        // The stored record still carries the original empty context.
        match &doc.records()[0] {
            TemplateRecord::Text(rec) => assert_eq!(rec.context, ""),
            other => panic!("unexpected record: {:?}", other),
        }
    }

    #[test]
    fn test_synthesize_preserves_order() {
        let annotations = vec![
            Annotation::new("A", "X"),
            Annotation::new("B", "Y"),
        ];
        let out = synthesize(&annotations);
        assert_eq!(
            out,
            vec![
                serde_json::json!({"type":"text","text":"A","context":"X"}),
                serde_json::json!({"type":"text","text":"B","context":"Y"}),
            ]
        );
    }
}
