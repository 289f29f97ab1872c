//! Core data models for marknote.
//!
//! These are the persisted entities of the note store: users own Markdown
//! documents, documents carry user-scoped tags through a join table. All
//! read paths return documents with their tag list already populated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user. Credential material is written at registration by the
/// authentication collaborator and never read back through this core.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user-scoped label with a display color.
///
/// `(owner_id, name)` is unique; the same name may exist for different
/// owners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    /// Free-form display color, typically a hex code like `#ff0000`.
    pub color: String,
    pub created_at: DateTime<Utc>,
}

/// A Markdown document owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub content: String,
    pub archived: bool,
    pub shared: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Tags attached to this document, ordered by name.
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// Request for creating a new document.
///
/// Title and content must be supplied (empty strings are tolerated);
/// richer validation is the HTTP layer's job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDocumentRequest {
    pub title: String,
    pub content: String,
}

/// Partial update for a document. Only populated fields are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDocumentRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl UpdateDocumentRequest {
    /// Whether the request carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

/// Request for creating a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    /// Opaque credential blob produced by the authentication collaborator.
    pub credential: String,
}

/// Result of converting an uploaded word-processor document to Markdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertedDocument {
    pub title: String,
    pub content: String,
    /// Non-fatal conversion messages (dropped images, unmapped styles).
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Generate a new UUIDv7 identifier.
///
/// UUIDv7 embeds a millisecond timestamp in the high bits, so ids sort in
/// creation order. Listing paths use this as the tiebreaker for equal
/// `updated_at` values.
#[inline]
pub fn new_v7() -> Uuid {
    Uuid::now_v7()
}
