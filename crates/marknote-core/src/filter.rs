//! Document filter composition.
//!
//! A [`DocumentFilter`] combines a free-text term, a tag-id selection, and
//! the archived/shared flags into one predicate, applied as a logical AND
//! of whatever dimensions are supplied. The same specification drives two
//! executions that must stay equivalent:
//!
//! - pushed into SQL by `marknote-db`'s filter query builder, and
//! - applied in memory over an already-loaded document set (this module),
//!   which is what a client uses to refine without a round trip.
//!
//! Output ordering is always `updated_at` descending, stable for ties.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Document;

/// Filter specification for listing documents.
///
/// All dimensions are optional; an unset dimension constrains nothing.
/// Within `tag_ids` the semantics are OR (any matching tag qualifies);
/// across dimensions the semantics are AND.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentFilter {
    /// Case-insensitive substring matched against title OR content.
    /// Whitespace-only terms are treated as absent.
    pub term: Option<String>,
    /// Keep documents carrying at least one of these tags.
    pub tag_ids: Vec<Uuid>,
    /// Keep documents whose archived flag equals this value.
    pub archived: Option<bool>,
    /// Keep documents whose shared flag equals this value.
    pub shared: Option<bool>,
}

impl DocumentFilter {
    /// Create an empty filter that matches every document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search term.
    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = Some(term.into());
        self
    }

    /// Require at least one of the given tags.
    pub fn with_tag_ids(mut self, tag_ids: Vec<Uuid>) -> Self {
        self.tag_ids = tag_ids;
        self
    }

    /// Require the archived flag to equal `archived`.
    pub fn archived(mut self, archived: bool) -> Self {
        self.archived = Some(archived);
        self
    }

    /// Require the shared flag to equal `shared`.
    pub fn shared(mut self, shared: bool) -> Self {
        self.shared = Some(shared);
        self
    }

    /// The search term with surrounding whitespace removed, if it is
    /// non-empty after trimming. A blank term constrains nothing.
    pub fn effective_term(&self) -> Option<&str> {
        self.term
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Whether no dimension of this filter constrains anything.
    pub fn is_empty(&self) -> bool {
        self.effective_term().is_none()
            && self.tag_ids.is_empty()
            && self.archived.is_none()
            && self.shared.is_none()
    }

    /// Evaluate this filter against a single document.
    pub fn matches(&self, doc: &Document) -> bool {
        if let Some(archived) = self.archived {
            if doc.archived != archived {
                return false;
            }
        }

        if let Some(shared) = self.shared {
            if doc.shared != shared {
                return false;
            }
        }

        if let Some(term) = self.effective_term() {
            let needle = term.to_lowercase();
            let in_title = doc.title.to_lowercase().contains(&needle);
            let in_content = doc.content.to_lowercase().contains(&needle);
            if !in_title && !in_content {
                return false;
            }
        }

        if !self.tag_ids.is_empty() {
            let any_tag = doc.tags.iter().any(|t| self.tag_ids.contains(&t.id));
            if !any_tag {
                return false;
            }
        }

        true
    }

    /// Apply this filter to a document set and order the survivors by
    /// `updated_at` descending. The sort is stable: documents with equal
    /// timestamps keep their relative input order.
    pub fn apply(&self, docs: Vec<Document>) -> Vec<Document> {
        let mut result: Vec<Document> = docs.into_iter().filter(|d| self.matches(d)).collect();
        result.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        result
    }
}
