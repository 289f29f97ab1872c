//! Document repository implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use marknote_core::{
    new_v7, CreateDocumentRequest, Document, DocumentFilter, DocumentRepository, Error, Result,
    Tag, UpdateDocumentRequest,
};

use crate::filter_query::{bind_params, FilterQueryBuilder};

/// PostgreSQL implementation of DocumentRepository.
///
/// Every query is owner-scoped: the `(id, owner_id)` pair appears in each
/// WHERE clause, so a document belonging to another user behaves exactly
/// like a missing one.
pub struct PgDocumentRepository {
    pool: Pool<Postgres>,
}

const DOCUMENT_COLUMNS: &str =
    "d.id, d.owner_id, d.title, d.content, d.archived, d.shared, d.created_at, d.updated_at";

fn map_document_row(row: &PgRow) -> Document {
    Document {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        title: row.get("title"),
        content: row.get("content"),
        archived: row.get("archived"),
        shared: row.get("shared"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        tags: Vec::new(),
    }
}

impl PgDocumentRepository {
    /// Create a new PgDocumentRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Load tags for a batch of documents in one query, grouped by
    /// document id. Avoids a per-row query on list and search paths.
    async fn load_tags(&self, document_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<Tag>>> {
        if document_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query(
            "SELECT dt.document_id, t.id, t.owner_id, t.name, t.color, t.created_at
             FROM document_tags dt
             JOIN tags t ON t.id = dt.tag_id
             WHERE dt.document_id = ANY($1)
             ORDER BY t.name",
        )
        .bind(document_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let mut by_document: HashMap<Uuid, Vec<Tag>> = HashMap::new();
        for row in rows {
            let document_id: Uuid = row.get("document_id");
            by_document.entry(document_id).or_default().push(Tag {
                id: row.get("id"),
                owner_id: row.get("owner_id"),
                name: row.get("name"),
                color: row.get("color"),
                created_at: row.get("created_at"),
            });
        }
        Ok(by_document)
    }

    /// Attach tag lists to a batch of documents loaded from the store.
    async fn populate_tags(&self, mut docs: Vec<Document>) -> Result<Vec<Document>> {
        let ids: Vec<Uuid> = docs.iter().map(|d| d.id).collect();
        let mut by_document = self.load_tags(&ids).await?;
        for doc in &mut docs {
            doc.tags = by_document.remove(&doc.id).unwrap_or_default();
        }
        Ok(docs)
    }
}

#[async_trait]
impl DocumentRepository for PgDocumentRepository {
    async fn create(&self, owner_id: Uuid, req: CreateDocumentRequest) -> Result<Document> {
        let id = new_v7();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO documents (id, owner_id, title, content, archived, shared, created_at, updated_at)
             VALUES ($1, $2, $3, $4, false, false, $5, $5)",
        )
        .bind(id)
        .bind(owner_id)
        .bind(&req.title)
        .bind(&req.content)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "documents",
            op = "create",
            owner_id = %owner_id,
            document_id = %id,
            "Document created"
        );

        Ok(Document {
            id,
            owner_id,
            title: req.title,
            content: req.content,
            archived: false,
            shared: false,
            created_at: now,
            updated_at: now,
            tags: Vec::new(),
        })
    }

    async fn list(&self, owner_id: Uuid, filter: &DocumentFilter) -> Result<Vec<Document>> {
        // $1 = owner_id, filter placeholders start at $2. The id tiebreaker
        // keeps equal-timestamp rows in creation order (ids are v7).
        let (fragment, params) = FilterQueryBuilder::new(filter, 1).build();
        let sql = format!(
            "SELECT {} FROM documents d WHERE d.owner_id = $1 AND {} ORDER BY d.updated_at DESC, d.id",
            DOCUMENT_COLUMNS, fragment
        );

        let query = bind_params(sqlx::query(&sql).bind(owner_id), &params);
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        let docs: Vec<Document> = rows.iter().map(map_document_row).collect();

        debug!(
            subsystem = "database",
            component = "documents",
            op = "list",
            owner_id = %owner_id,
            result_count = docs.len(),
            "Documents listed"
        );

        self.populate_tags(docs).await
    }

    async fn get(&self, owner_id: Uuid, id: Uuid) -> Result<Document> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM documents d WHERE d.id = $1 AND d.owner_id = $2",
            DOCUMENT_COLUMNS
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        let doc = row
            .as_ref()
            .map(map_document_row)
            .ok_or(Error::DocumentNotFound(id))?;

        let mut docs = self.populate_tags(vec![doc]).await?;
        Ok(docs.remove(0))
    }

    async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        req: UpdateDocumentRequest,
    ) -> Result<Document> {
        if req.is_empty() {
            return Err(Error::InvalidInput(
                "no update fields supplied".to_string(),
            ));
        }

        // $1 = now, $2 = id, $3 = owner_id, dynamic fields start at $4.
        let now = Utc::now();
        let mut updates: Vec<String> = vec!["updated_at = $1".to_string()];
        let mut param_idx = 4;

        if req.title.is_some() {
            updates.push(format!("title = ${}", param_idx));
            param_idx += 1;
        }
        if req.content.is_some() {
            updates.push(format!("content = ${}", param_idx));
        }

        let sql = format!(
            "UPDATE documents SET {} WHERE id = $2 AND owner_id = $3",
            updates.join(", ")
        );

        let mut query = sqlx::query(&sql).bind(now).bind(id).bind(owner_id);
        if let Some(title) = &req.title {
            query = query.bind(title);
        }
        if let Some(content) = &req.content {
            query = query.bind(content);
        }

        let result = query.execute(&self.pool).await.map_err(Error::Database)?;
        if result.rows_affected() == 0 {
            return Err(Error::DocumentNotFound(id));
        }

        self.get(owner_id, id).await
    }

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        // Associations first; the owner check rides on the subquery so a
        // foreign document's links are never touched.
        sqlx::query(
            "DELETE FROM document_tags WHERE document_id IN
             (SELECT d.id FROM documents d WHERE d.id = $1 AND d.owner_id = $2)",
        )
        .bind(id)
        .bind(owner_id)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        let result = sqlx::query("DELETE FROM documents WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        tx.commit().await.map_err(Error::Database)?;

        let deleted = result.rows_affected() > 0;
        debug!(
            subsystem = "database",
            component = "documents",
            op = "delete",
            owner_id = %owner_id,
            document_id = %id,
            rows_affected = result.rows_affected(),
            "Document delete finished"
        );
        Ok(deleted)
    }

    async fn set_archived(&self, owner_id: Uuid, id: Uuid, archived: bool) -> Result<Document> {
        let result = sqlx::query(
            "UPDATE documents SET archived = $1, updated_at = $2 WHERE id = $3 AND owner_id = $4",
        )
        .bind(archived)
        .bind(Utc::now())
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::DocumentNotFound(id));
        }
        self.get(owner_id, id).await
    }

    async fn set_shared(&self, owner_id: Uuid, id: Uuid, shared: bool) -> Result<Document> {
        let result = sqlx::query(
            "UPDATE documents SET shared = $1, updated_at = $2 WHERE id = $3 AND owner_id = $4",
        )
        .bind(shared)
        .bind(Utc::now())
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::DocumentNotFound(id));
        }
        self.get(owner_id, id).await
    }

    async fn search(&self, owner_id: Uuid, term: &str) -> Result<Vec<Document>> {
        // A blank term degenerates to an unfiltered list; the filter
        // treats whitespace-only terms as absent.
        let filter = DocumentFilter::new().with_term(term);
        self.list(owner_id, &filter).await
    }
}
