//! Core traits for marknote abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability. Every
//! repository operation is owner-scoped: the caller supplies the
//! authenticated user's id, and rows belonging to anyone else behave
//! exactly like rows that do not exist.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::filter::DocumentFilter;
use crate::models::{
    ConvertedDocument, CreateDocumentRequest, CreateUserRequest, Document, Tag,
    UpdateDocumentRequest, User,
};

// =============================================================================
// USER REPOSITORY
// =============================================================================

/// Repository for user records.
///
/// Registration-time credential handling and session issuance live in the
/// authentication collaborator; this repository only stores the rows.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user. Fails with `Conflict` when the username or email
    /// is already taken.
    async fn create(&self, req: CreateUserRequest) -> Result<User>;

    /// Fetch a user by id.
    async fn get(&self, id: Uuid) -> Result<Option<User>>;

    /// Fetch a user by username (case-sensitive).
    async fn get_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Delete a user. Owned documents, tags, and associations are removed
    /// by the store's cascades. Returns whether a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

// =============================================================================
// DOCUMENT REPOSITORY
// =============================================================================

/// Repository for document CRUD and search.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Insert a new document (archived=false, shared=false, empty tag list).
    async fn create(&self, owner_id: Uuid, req: CreateDocumentRequest) -> Result<Document>;

    /// List the owner's documents matching `filter`, tags populated,
    /// ordered by `updated_at` descending.
    async fn list(&self, owner_id: Uuid, filter: &DocumentFilter) -> Result<Vec<Document>>;

    /// Fetch one document with its tags. `DocumentNotFound` when the id
    /// does not exist or belongs to another user.
    async fn get(&self, owner_id: Uuid, id: Uuid) -> Result<Document>;

    /// Partial update from the populated fields of `req`; refreshes
    /// `updated_at`. `InvalidInput` when no field is supplied.
    async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        req: UpdateDocumentRequest,
    ) -> Result<Document>;

    /// Delete a document and its tag associations. Returns whether a row
    /// was deleted (`false` = not found, not an error).
    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool>;

    /// Set the archived flag and refresh `updated_at`.
    async fn set_archived(&self, owner_id: Uuid, id: Uuid, archived: bool) -> Result<Document>;

    /// Set the shared flag and refresh `updated_at`.
    async fn set_shared(&self, owner_id: Uuid, id: Uuid, shared: bool) -> Result<Document>;

    /// Case-insensitive substring search over title OR content. A blank
    /// term lists everything, like `list` with an empty filter.
    async fn search(&self, owner_id: Uuid, term: &str) -> Result<Vec<Document>>;
}

// =============================================================================
// TAG REPOSITORY
// =============================================================================

/// Repository for tag CRUD and document associations.
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// List the owner's tags, ordered by name ascending.
    async fn list(&self, owner_id: Uuid) -> Result<Vec<Tag>>;

    /// Create a tag. `InvalidInput` for an empty name or color; `Conflict`
    /// when the owner already has a tag with this name.
    async fn create(&self, owner_id: Uuid, name: &str, color: &str) -> Result<Tag>;

    /// Rename/recolor a tag. `TagNotFound` when not owned by the caller;
    /// `Conflict` when another owned tag already has the target name (the
    /// original row is left untouched).
    async fn rename(&self, owner_id: Uuid, tag_id: Uuid, name: &str, color: &str) -> Result<Tag>;

    /// Delete a tag and its associations. Returns whether a row was deleted.
    async fn delete(&self, owner_id: Uuid, tag_id: Uuid) -> Result<bool>;

    /// Attach a tag to a document. Both must belong to `owner_id`.
    /// Attaching an already-attached tag is a silent success.
    async fn attach(&self, owner_id: Uuid, document_id: Uuid, tag_id: Uuid) -> Result<()>;

    /// Detach a tag from a document. Detaching a non-existent association
    /// is a silent success.
    async fn detach(&self, owner_id: Uuid, document_id: Uuid, tag_id: Uuid) -> Result<()>;

    /// Tags attached to one document, ordered by name.
    async fn get_for_document(&self, document_id: Uuid) -> Result<Vec<Tag>>;
}

// =============================================================================
// EXTERNAL COLLABORATORS
// =============================================================================

/// Authentication collaborator: resolves a session token to a user id.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Resolve a token to the authenticated user id, or `Unauthorized`.
    async fn resolve_user(&self, token: &str) -> Result<Uuid>;
}

/// Document conversion collaborator: turns an uploaded word-processor file
/// into Markdown, consumed before `DocumentRepository::create`.
#[async_trait]
pub trait DocumentConverter: Send + Sync {
    /// Convert raw file bytes to a title, Markdown content, and any
    /// non-fatal warnings. `Conversion` on unsupported or corrupt input.
    async fn convert(&self, data: &[u8], filename: &str) -> Result<ConvertedDocument>;
}
