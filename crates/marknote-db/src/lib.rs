//! # marknote-db
//!
//! PostgreSQL database layer for marknote.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for users, documents, and tags
//! - SQL predicate generation matching the in-memory document filter
//!
//! ## Example
//!
//! ```rust,ignore
//! use marknote_db::Database;
//! use marknote_core::{CreateDocumentRequest, DocumentRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/marknote").await?;
//!
//!     let doc = db.documents.create(owner_id, CreateDocumentRequest {
//!         title: "Meeting notes".to_string(),
//!         content: "# Agenda".to_string(),
//!     }).await?;
//!
//!     println!("Created document: {}", doc.id);
//!     Ok(())
//! }
//! ```

pub mod documents;
pub mod filter_query;
pub mod pool;
pub mod tags;
pub mod users;

// Test fixtures are always compiled so integration tests (in tests/) can
// use DEFAULT_TEST_DATABASE_URL and the shared setup helpers.
pub mod test_fixtures;

// Re-export core types
pub use marknote_core::*;

/// Escape LIKE/ILIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

// Re-export repository implementations
pub use documents::PgDocumentRepository;
pub use filter_query::{bind_params, FilterQueryBuilder, QueryParam};
pub use pool::PoolConfig;
pub use tags::PgTagRepository;
pub use users::PgUserRepository;

/// Combined database context with all repositories.
///
/// Constructed once at process startup and passed by reference to whatever
/// consumes it; there are no module-level service instances.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// User repository.
    pub users: PgUserRepository,
    /// Document repository for CRUD and search.
    pub documents: PgDocumentRepository,
    /// Tag repository for tag CRUD and associations.
    pub tags: PgTagRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            users: PgUserRepository::new(pool.clone()),
            documents: PgDocumentRepository::new(pool.clone()),
            tags: PgTagRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_config(url, PoolConfig::default()).await
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = config.connect(url).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}
