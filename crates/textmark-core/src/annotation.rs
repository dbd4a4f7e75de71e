//! Annotation store: the set of recorded (excerpt, label) pairs plus the
//! transient selection and editing cursors.
//!
//! The list is append-only ordered; insertion order is the display order.
//! Label (`context`) uniqueness is enforced on manual add and rename with
//! a case-sensitive exact match. Bulk import through [`AnnotationStore::replace_all`]
//! deliberately skips that check: structured imports are trusted as-is.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for an annotation.
pub type AnnotationId = Uuid;

/// A recorded (excerpt, label) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Opaque unique identifier.
    pub id: AnnotationId,
    /// The captured excerpt.
    pub text: String,
    /// The user-chosen label.
    pub context: String,
}

impl Annotation {
    /// Create an annotation with a fresh id.
    pub fn new(text: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            context: context.into(),
        }
    }
}

/// The annotation currently being renamed, with its draft label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditingCursor {
    pub id: AnnotationId,
    pub draft: String,
}

/// Annotation store errors. All of them are recoverable input-validation
/// failures; the shell turns them into user notices.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
    #[error("Please select text from the document first")]
    NoSelection,
    #[error("Please enter an annotation name")]
    EmptyLabel,
    #[error("Annotation name already exists")]
    DuplicateLabel(String),
    #[error("No annotation with id {0}")]
    NotFound(AnnotationId),
}

/// Result type for annotation operations.
pub type AnnotationResult<T> = Result<T, AnnotationError>;

/// Owns the annotation list and the two transient cursors.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    annotations: Vec<Annotation>,
    /// Most recently captured, not-yet-annotated excerpt.
    pending: Option<String>,
    /// At most one annotation is being renamed at a time.
    editing: Option<EditingCursor>,
}

impl AnnotationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The ordered annotation list.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Number of annotations.
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    /// Check if the store holds no annotations.
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Look up an annotation by id.
    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    /// The pending selection, if any.
    pub fn pending_selection(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// The editing cursor, if any.
    pub fn editing(&self) -> Option<&EditingCursor> {
        self.editing.as_ref()
    }

    /// Capture a text selection reported by the viewer. Empty or
    /// whitespace-only reports are ignored; otherwise the previous
    /// pending value is overwritten.
    pub fn set_pending_selection(&mut self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        log::debug!("selected text: {}", text);
        self.pending = Some(text.to_string());
    }

    /// Bind the pending selection to `label` and append the result.
    /// On success the pending selection is cleared and the new id returned.
    pub fn add_annotation(&mut self, label: &str) -> AnnotationResult<AnnotationId> {
        let text = self.pending.as_ref().ok_or(AnnotationError::NoSelection)?;
        if label.is_empty() {
            return Err(AnnotationError::EmptyLabel);
        }
        if self.annotations.iter().any(|a| a.context == label) {
            return Err(AnnotationError::DuplicateLabel(label.to_string()));
        }

        let annotation = Annotation::new(text.clone(), label);
        let id = annotation.id;
        self.annotations.push(annotation);
        self.pending = None;
        Ok(id)
    }

    /// Remove the annotation with the given id.
    /// Returns whether an entry was actually removed; deleting a missing
    /// id is a distinguishable no-op.
    pub fn delete_annotation(&mut self, id: AnnotationId) -> bool {
        let before = self.annotations.len();
        self.annotations.retain(|a| a.id != id);
        if self.editing.as_ref().is_some_and(|e| e.id == id) {
            self.editing = None;
        }
        self.annotations.len() != before
    }

    /// Start renaming an annotation. Seeds the draft with the current label.
    pub fn begin_edit(&mut self, id: AnnotationId) -> AnnotationResult<()> {
        let current = self.get(id).ok_or(AnnotationError::NotFound(id))?;
        self.editing = Some(EditingCursor {
            id,
            draft: current.context.clone(),
        });
        Ok(())
    }

    /// Update the draft label while editing. No-op when not editing.
    pub fn set_draft(&mut self, text: &str) {
        if let Some(cursor) = self.editing.as_mut() {
            cursor.draft = text.to_string();
        }
    }

    /// Abandon the rename without touching the annotation.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Rename the annotation with the given id. Only the `context` field
    /// changes; `id` and `text` are preserved. The collision check
    /// excludes the entry being edited. Clears the editing cursor.
    pub fn commit_edit(&mut self, id: AnnotationId, new_label: &str) -> AnnotationResult<()> {
        if new_label.is_empty() {
            return Err(AnnotationError::EmptyLabel);
        }
        if self
            .annotations
            .iter()
            .any(|a| a.id != id && a.context == new_label)
        {
            return Err(AnnotationError::DuplicateLabel(new_label.to_string()));
        }
        let entry = self
            .annotations
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(AnnotationError::NotFound(id))?;
        entry.context = new_label.to_string();
        self.editing = None;
        Ok(())
    }

    /// Bulk-overwrite the annotation list, e.g. when importing from a
    /// template file. No uniqueness re-validation is performed. Both
    /// cursors are cleared since they referred to the old population.
    pub fn replace_all(&mut self, annotations: Vec<Annotation>) {
        self.annotations = annotations;
        self.pending = None;
        self.editing = None;
    }

    /// Drop all annotations and both cursors.
    pub fn clear(&mut self) {
        self.replace_all(Vec::new());
    }

    /// Display projection: case-insensitive substring match against
    /// either `text` or `context`. Never mutates the underlying list.
    pub fn filter<'a>(&'a self, query: &str) -> Vec<&'a Annotation> {
        let query = query.to_lowercase();
        self.annotations
            .iter()
            .filter(|a| {
                a.text.to_lowercase().contains(&query)
                    || a.context.to_lowercase().contains(&query)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_selection(text: &str) -> AnnotationStore {
        let mut store = AnnotationStore::new();
        store.set_pending_selection(text);
        store
    }

    #[test]
    fn test_add_requires_selection() {
        let mut store = AnnotationStore::new();
        let result = store.add_annotation("PolicyNumber");
        assert_eq!(result, Err(AnnotationError::NoSelection));
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_binds_selection_and_clears_it() {
        let mut store = store_with_selection("Policy No.");
        let id = store.add_annotation("PolicyNumber").unwrap();

        assert_eq!(store.len(), 1);
        let ann = store.get(id).unwrap();
        assert_eq!(ann.text, "Policy No.");
        assert_eq!(ann.context, "PolicyNumber");
        assert!(store.pending_selection().is_none());
    }

    #[test]
    fn test_whitespace_selection_ignored() {
        let mut store = AnnotationStore::new();
        store.set_pending_selection("   \n");
        assert!(store.pending_selection().is_none());

        store.set_pending_selection("Effective Date");
        store.set_pending_selection("Policyholder");
        // Latest non-empty selection wins.
        assert_eq!(store.pending_selection(), Some("Policyholder"));
    }

    #[test]
    fn test_duplicate_label_rejected() {
        let mut store = store_with_selection("Policy No.");
        store.add_annotation("PolicyNumber").unwrap();

        store.set_pending_selection("Effective Date: July 1, 2021");
        let result = store.add_annotation("PolicyNumber");

        assert_eq!(
            result,
            Err(AnnotationError::DuplicateLabel("PolicyNumber".into()))
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_distinct_labels_all_append_in_order() {
        let mut store = AnnotationStore::new();
        for (i, label) in ["A", "B", "C"].iter().enumerate() {
            store.set_pending_selection(&format!("excerpt {}", i));
            store.add_annotation(label).unwrap();
        }
        assert_eq!(store.len(), 3);
        let contexts: Vec<_> = store.annotations().iter().map(|a| a.context.as_str()).collect();
        assert_eq!(contexts, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_empty_label_rejected() {
        let mut store = store_with_selection("Policy No.");
        assert_eq!(store.add_annotation(""), Err(AnnotationError::EmptyLabel));
        // Selection survives the failed attempt.
        assert_eq!(store.pending_selection(), Some("Policy No."));
    }

    #[test]
    fn test_delete_is_distinguishable_noop_when_missing() {
        let mut store = store_with_selection("Policy No.");
        let id = store.add_annotation("PolicyNumber").unwrap();

        assert!(store.delete_annotation(id));
        assert!(!store.delete_annotation(id));
        assert!(store.is_empty());
    }

    #[test]
    fn test_commit_edit_preserves_id_and_text() {
        let mut store = store_with_selection("Policy No.");
        let id = store.add_annotation("PolicyNumber").unwrap();

        store.begin_edit(id).unwrap();
        assert_eq!(store.editing().unwrap().draft, "PolicyNumber");

        store.commit_edit(id, "GroupPolicy").unwrap();
        let ann = store.get(id).unwrap();
        assert_eq!(ann.id, id);
        assert_eq!(ann.text, "Policy No.");
        assert_eq!(ann.context, "GroupPolicy");
        assert!(store.editing().is_none());
    }

    #[test]
    fn test_commit_edit_rejects_collision_with_other_entry() {
        let mut store = store_with_selection("Policy No.");
        let first = store.add_annotation("PolicyNumber").unwrap();
        store.set_pending_selection("Effective Date");
        let second = store.add_annotation("EffectiveDate").unwrap();

        let result = store.commit_edit(second, "PolicyNumber");
        assert_eq!(
            result,
            Err(AnnotationError::DuplicateLabel("PolicyNumber".into()))
        );

        // Renaming to its own current label is fine.
        store.commit_edit(first, "PolicyNumber").unwrap();
    }

    #[test]
    fn test_cancel_edit_leaves_entry_untouched() {
        let mut store = store_with_selection("Policy No.");
        let id = store.add_annotation("PolicyNumber").unwrap();

        store.begin_edit(id).unwrap();
        store.set_draft("Something else");
        store.cancel_edit();

        assert_eq!(store.get(id).unwrap().context, "PolicyNumber");
        assert!(store.editing().is_none());
    }

    #[test]
    fn test_replace_all_accepts_duplicates() {
        let mut store = AnnotationStore::new();
        // Imported files are trusted: duplicate labels pass through.
        store.replace_all(vec![
            Annotation::new("a", "Label"),
            Annotation::new("b", "Label"),
        ]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_filter_matches_text_or_context_case_insensitively() {
        let mut store = AnnotationStore::new();
        store.replace_all(vec![
            Annotation::new("Group Policy No.", "PolicyNumber"),
            Annotation::new("Effective Date: July 1, 2021", "EffectiveDate"),
        ]);

        assert_eq!(store.filter("policy").len(), 1);
        assert_eq!(store.filter("DATE").len(), 1);
        assert_eq!(store.filter("").len(), 2);
        assert_eq!(store.filter("missing").len(), 0);
        // Projection does not mutate.
        assert_eq!(store.len(), 2);
    }
}
