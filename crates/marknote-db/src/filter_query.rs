//! Document filter query builder.
//!
//! Converts a [`DocumentFilter`] into a parameterized SQL WHERE fragment.
//! The generated predicates must stay semantically identical to the
//! in-memory evaluation in `marknote_core::filter` — both sides are
//! exercised against the same inputs by the filter equivalence tests.
//!
//! The fragment assumes the documents table is aliased `d` and the
//! association table is `document_tags`.

use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::Postgres;
use uuid::Uuid;

use marknote_core::DocumentFilter;

use crate::escape_like;

/// Type-safe parameter binding for generated SQL.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParam {
    /// Single UUID parameter.
    Uuid(Uuid),
    /// Array of UUIDs (for ANY operations).
    UuidArray(Vec<Uuid>),
    /// Boolean parameter.
    Bool(bool),
    /// String parameter.
    String(String),
}

/// Generates SQL WHERE clause fragments from a `DocumentFilter`.
///
/// All values are parameterized; only parameter indices vary between
/// invocations, so the statement text stays cacheable.
///
/// # Example
///
/// ```rust,ignore
/// let filter = DocumentFilter::new().with_term("banana").archived(false);
/// let (sql, params) = FilterQueryBuilder::new(&filter, 1).build();
/// // sql: "d.archived = $2 AND (d.title ILIKE $3 ESCAPE '\' OR d.content ILIKE $3 ESCAPE '\')"
/// // params: [Bool(false), String("%banana%")]
/// ```
pub struct FilterQueryBuilder<'a> {
    filter: &'a DocumentFilter,
    param_offset: usize,
}

impl<'a> FilterQueryBuilder<'a> {
    /// Create a new builder.
    ///
    /// `param_offset` is the number of parameters already present in the
    /// enclosing query; generated placeholders start at `offset + 1`.
    pub fn new(filter: &'a DocumentFilter, param_offset: usize) -> Self {
        Self {
            filter,
            param_offset,
        }
    }

    /// Build the WHERE clause fragment.
    ///
    /// Returns the SQL fragment (without the `WHERE` keyword) and the
    /// parameters in the order they appear. An empty filter yields
    /// `("TRUE", [])`.
    pub fn build(&self) -> (String, Vec<QueryParam>) {
        let mut clauses = Vec::new();
        let mut params = Vec::new();
        let mut param_idx = self.param_offset;

        if let Some(archived) = self.filter.archived {
            param_idx += 1;
            clauses.push(format!("d.archived = ${}", param_idx));
            params.push(QueryParam::Bool(archived));
        }

        if let Some(shared) = self.filter.shared {
            param_idx += 1;
            clauses.push(format!("d.shared = ${}", param_idx));
            params.push(QueryParam::Bool(shared));
        }

        // Case-insensitive substring over title OR content; one parameter
        // referenced twice. LIKE wildcards in the term are escaped so the
        // user input is matched literally.
        if let Some(term) = self.filter.effective_term() {
            param_idx += 1;
            clauses.push(format!(
                "(d.title ILIKE ${} ESCAPE '\\' OR d.content ILIKE ${} ESCAPE '\\')",
                param_idx, param_idx
            ));
            params.push(QueryParam::String(format!("%{}%", escape_like(term))));
        }

        // OR within the tag set: at least one attached tag must match.
        if !self.filter.tag_ids.is_empty() {
            param_idx += 1;
            clauses.push(format!(
                "EXISTS (SELECT 1 FROM document_tags dt WHERE dt.document_id = d.id AND dt.tag_id = ANY(${}::uuid[]))",
                param_idx
            ));
            params.push(QueryParam::UuidArray(self.filter.tag_ids.clone()));
        }

        let sql = if clauses.is_empty() {
            "TRUE".to_string()
        } else {
            clauses.join(" AND ")
        };

        (sql, params)
    }
}

/// Bind built parameters onto an sqlx query, in order.
pub fn bind_params<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &'q [QueryParam],
) -> Query<'q, Postgres, PgArguments> {
    for param in params {
        query = match param {
            QueryParam::Uuid(id) => query.bind(id),
            QueryParam::UuidArray(ids) => query.bind(ids),
            QueryParam::Bool(b) => query.bind(b),
            QueryParam::String(s) => query.bind(s),
        };
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use marknote_core::new_v7;

    #[test]
    fn test_empty_filter_returns_true() {
        let filter = DocumentFilter::new();
        let (sql, params) = FilterQueryBuilder::new(&filter, 0).build();

        assert_eq!(sql, "TRUE");
        assert!(params.is_empty());
    }

    #[test]
    fn test_blank_term_generates_no_clause() {
        let filter = DocumentFilter::new().with_term("   ");
        let (sql, params) = FilterQueryBuilder::new(&filter, 0).build();

        assert_eq!(sql, "TRUE");
        assert!(params.is_empty());
    }

    #[test]
    fn test_archived_clause() {
        let filter = DocumentFilter::new().archived(true);
        let (sql, params) = FilterQueryBuilder::new(&filter, 0).build();

        assert_eq!(sql, "d.archived = $1");
        assert_eq!(params, vec![QueryParam::Bool(true)]);
    }

    #[test]
    fn test_shared_clause() {
        let filter = DocumentFilter::new().shared(false);
        let (sql, params) = FilterQueryBuilder::new(&filter, 0).build();

        assert_eq!(sql, "d.shared = $1");
        assert_eq!(params, vec![QueryParam::Bool(false)]);
    }

    #[test]
    fn test_term_clause_reuses_one_parameter() {
        let filter = DocumentFilter::new().with_term("banana");
        let (sql, params) = FilterQueryBuilder::new(&filter, 0).build();

        assert_eq!(
            sql,
            "(d.title ILIKE $1 ESCAPE '\\' OR d.content ILIKE $1 ESCAPE '\\')"
        );
        assert_eq!(params, vec![QueryParam::String("%banana%".to_string())]);
    }

    #[test]
    fn test_term_is_trimmed_and_wildcards_escaped() {
        let filter = DocumentFilter::new().with_term("  50%_done  ");
        let (_, params) = FilterQueryBuilder::new(&filter, 0).build();

        assert_eq!(
            params,
            vec![QueryParam::String("%50\\%\\_done%".to_string())]
        );
    }

    #[test]
    fn test_tag_clause_uses_any_array() {
        let tag_a = new_v7();
        let tag_b = new_v7();
        let filter = DocumentFilter::new().with_tag_ids(vec![tag_a, tag_b]);
        let (sql, params) = FilterQueryBuilder::new(&filter, 0).build();

        assert_eq!(
            sql,
            "EXISTS (SELECT 1 FROM document_tags dt WHERE dt.document_id = d.id AND dt.tag_id = ANY($1::uuid[]))"
        );
        assert_eq!(params, vec![QueryParam::UuidArray(vec![tag_a, tag_b])]);
    }

    #[test]
    fn test_combined_clauses_join_with_and() {
        let tag = new_v7();
        let filter = DocumentFilter::new()
            .archived(false)
            .shared(true)
            .with_term("fruit")
            .with_tag_ids(vec![tag]);
        let (sql, params) = FilterQueryBuilder::new(&filter, 0).build();

        assert_eq!(params.len(), 4);
        assert!(sql.contains("d.archived = $1"));
        assert!(sql.contains("d.shared = $2"));
        assert!(sql.contains("ILIKE $3"));
        assert!(sql.contains("ANY($4::uuid[])"));
        // Three joins plus the AND inside the EXISTS subquery.
        assert_eq!(sql.matches(" AND ").count(), 4);

        // Parameter order mirrors clause order.
        assert_eq!(params[0], QueryParam::Bool(false));
        assert_eq!(params[1], QueryParam::Bool(true));
        assert_eq!(params[2], QueryParam::String("%fruit%".to_string()));
        assert_eq!(params[3], QueryParam::UuidArray(vec![tag]));
    }

    #[test]
    fn test_param_offset() {
        let filter = DocumentFilter::new().with_term("x");
        // Two parameters already in the enclosing query.
        let (sql, params) = FilterQueryBuilder::new(&filter, 2).build();

        assert!(sql.contains("$3"));
        assert!(!sql.contains("$1"));
        assert_eq!(params.len(), 1);
    }
}
