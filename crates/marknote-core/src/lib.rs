//! # marknote-core
//!
//! Core types, traits, and abstractions for the marknote library.
//!
//! This crate provides the foundational data structures, the error
//! taxonomy, and the document filter engine that other marknote crates
//! depend on. It carries no database connectivity of its own; the
//! repository traits defined here are implemented by `marknote-db`.

pub mod error;
pub mod filter;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use filter::DocumentFilter;
pub use models::{
    new_v7, ConvertedDocument, CreateDocumentRequest, CreateUserRequest, Document, Tag,
    UpdateDocumentRequest, User,
};
pub use traits::{
    AuthProvider, DocumentConverter, DocumentRepository, TagRepository, UserRepository,
};
