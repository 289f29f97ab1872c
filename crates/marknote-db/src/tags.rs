//! Tag repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use marknote_core::{new_v7, Error, Result, Tag, TagRepository};

/// Validate a tag name and color.
///
/// Both must be non-empty after trimming; anything richer (palette
/// membership, name length limits) is the HTTP layer's concern.
fn validate_tag_input(name: &str, color: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidInput("tag name cannot be empty".to_string()));
    }
    if color.trim().is_empty() {
        return Err(Error::InvalidInput("tag color cannot be empty".to_string()));
    }
    Ok(())
}

/// Map a unique-constraint violation to `Conflict`, passing every other
/// database error through unchanged. The constraint is the authority for
/// uniqueness; callers never pre-check as their only guard.
fn conflict_on_unique(e: sqlx::Error, message: &str) -> Error {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return Error::Conflict(message.to_string());
        }
    }
    Error::Database(e)
}

/// PostgreSQL implementation of TagRepository.
pub struct PgTagRepository {
    pool: Pool<Postgres>,
}

impl PgTagRepository {
    /// Create a new PgTagRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn fetch_owned(&self, owner_id: Uuid, tag_id: Uuid) -> Result<Tag> {
        sqlx::query_as::<_, Tag>(
            "SELECT id, owner_id, name, color, created_at FROM tags
             WHERE id = $1 AND owner_id = $2",
        )
        .bind(tag_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or(Error::TagNotFound(tag_id))
    }
}

#[async_trait]
impl TagRepository for PgTagRepository {
    async fn list(&self, owner_id: Uuid) -> Result<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>(
            "SELECT id, owner_id, name, color, created_at FROM tags
             WHERE owner_id = $1 ORDER BY name",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(tags)
    }

    async fn create(&self, owner_id: Uuid, name: &str, color: &str) -> Result<Tag> {
        validate_tag_input(name, color)?;

        let id = new_v7();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO tags (id, owner_id, name, color, created_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(owner_id)
        .bind(name)
        .bind(color)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "a tag with this name already exists"))?;

        debug!(
            subsystem = "database",
            component = "tags",
            op = "create",
            owner_id = %owner_id,
            tag_id = %id,
            "Tag created"
        );

        Ok(Tag {
            id,
            owner_id,
            name: name.to_string(),
            color: color.to_string(),
            created_at: now,
        })
    }

    async fn rename(&self, owner_id: Uuid, tag_id: Uuid, name: &str, color: &str) -> Result<Tag> {
        validate_tag_input(name, color)?;

        let result = sqlx::query(
            "UPDATE tags SET name = $1, color = $2 WHERE id = $3 AND owner_id = $4",
        )
        .bind(name)
        .bind(color)
        .bind(tag_id)
        .bind(owner_id)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "a tag with this name already exists"))?;

        if result.rows_affected() == 0 {
            return Err(Error::TagNotFound(tag_id));
        }

        self.fetch_owned(owner_id, tag_id).await
    }

    async fn delete(&self, owner_id: Uuid, tag_id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        sqlx::query(
            "DELETE FROM document_tags WHERE tag_id IN
             (SELECT t.id FROM tags t WHERE t.id = $1 AND t.owner_id = $2)",
        )
        .bind(tag_id)
        .bind(owner_id)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        let result = sqlx::query("DELETE FROM tags WHERE id = $1 AND owner_id = $2")
            .bind(tag_id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        tx.commit().await.map_err(Error::Database)?;
        Ok(result.rows_affected() > 0)
    }

    async fn attach(&self, owner_id: Uuid, document_id: Uuid, tag_id: Uuid) -> Result<()> {
        // Both sides verified independently. The document check is
        // owner-scoped, so a foreign document reads as missing. The tag
        // check reads the actual owner to keep a foreign tag (ownership
        // mismatch) distinguishable from a tag that never existed; the
        // HTTP layer maps both to 404.
        let document_exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM documents WHERE id = $1 AND owner_id = $2)",
        )
        .bind(document_id)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        if !document_exists {
            return Err(Error::DocumentNotFound(document_id));
        }

        let tag_owner: Option<Uuid> = sqlx::query_scalar("SELECT owner_id FROM tags WHERE id = $1")
            .bind(tag_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        match tag_owner {
            None => return Err(Error::TagNotFound(tag_id)),
            Some(owner) if owner != owner_id => {
                return Err(Error::OwnershipMismatch(format!(
                    "tag {} belongs to another user",
                    tag_id
                )));
            }
            Some(_) => {}
        }

        // Idempotent: a second attach of the same pair is a no-op.
        sqlx::query(
            "INSERT INTO document_tags (id, document_id, tag_id, created_at)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (document_id, tag_id) DO NOTHING",
        )
        .bind(new_v7())
        .bind(document_id)
        .bind(tag_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "tags",
            op = "attach",
            owner_id = %owner_id,
            document_id = %document_id,
            tag_id = %tag_id,
            "Tag attached"
        );
        Ok(())
    }

    async fn detach(&self, owner_id: Uuid, document_id: Uuid, tag_id: Uuid) -> Result<()> {
        // Ownership rides on the subqueries; deleting a non-existent
        // association is a silent success.
        sqlx::query(
            "DELETE FROM document_tags
             WHERE document_id = $1 AND tag_id = $2
               AND EXISTS (SELECT 1 FROM documents d WHERE d.id = $1 AND d.owner_id = $3)
               AND EXISTS (SELECT 1 FROM tags t WHERE t.id = $2 AND t.owner_id = $3)",
        )
        .bind(document_id)
        .bind(tag_id)
        .bind(owner_id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(())
    }

    async fn get_for_document(&self, document_id: Uuid) -> Result<Vec<Tag>> {
        let rows = sqlx::query(
            "SELECT t.id, t.owner_id, t.name, t.color, t.created_at
             FROM tags t
             JOIN document_tags dt ON dt.tag_id = t.id
             WHERE dt.document_id = $1
             ORDER BY t.name",
        )
        .bind(document_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let tags = rows
            .into_iter()
            .map(|row| Tag {
                id: row.get("id"),
                owner_id: row.get("owner_id"),
                name: row.get("name"),
                color: row.get("color"),
                created_at: row.get("created_at"),
            })
            .collect();
        Ok(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_tag_input_rejects_empty() {
        assert!(matches!(
            validate_tag_input("", "#fff"),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            validate_tag_input("  ", "#fff"),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            validate_tag_input("work", ""),
            Err(Error::InvalidInput(_))
        ));
        assert!(validate_tag_input("work", "#ff0000").is_ok());
    }

    #[test]
    fn test_conflict_on_unique_passes_other_errors_through() {
        let err = conflict_on_unique(sqlx::Error::RowNotFound, "dup");
        assert!(matches!(err, Error::Database(_)));
    }
}
