//! Tag repository integration tests: uniqueness conflicts, idempotent
//! attach, and association hygiene on delete.

use marknote_db::test_fixtures::TestDatabase;
use marknote_db::{CreateDocumentRequest, DocumentRepository, Error, TagRepository};
use uuid::Uuid;

async fn setup() -> TestDatabase {
    dotenvy::dotenv().ok();
    TestDatabase::new().await
}

async fn assoc_count(test_db: &TestDatabase, document_id: Uuid) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM document_tags WHERE document_id = $1")
        .bind(document_id)
        .fetch_one(&test_db.pool)
        .await
        .unwrap()
}

#[tokio::test]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_duplicate_tag_name_conflicts_per_owner_only() {
    let test_db = setup().await;
    let alice = test_db.create_user("alice").await;
    let bob = test_db.create_user("bob").await;

    test_db.db.tags.create(alice.id, "work", "#ff0000").await.unwrap();

    let err = test_db
        .db
        .tags
        .create(alice.id, "work", "#0000ff")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    // Same name under a different owner is fine.
    test_db.db.tags.create(bob.id, "work", "#00ff00").await.unwrap();

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_rename_conflict_leaves_original_unchanged() {
    let test_db = setup().await;
    let alice = test_db.create_user("alice").await;

    test_db
        .db
        .tags
        .create(alice.id, "personal", "#00ff00")
        .await
        .unwrap();
    let work = test_db.db.tags.create(alice.id, "work", "#ff0000").await.unwrap();

    let err = test_db
        .db
        .tags
        .rename(alice.id, work.id, "personal", "#00ff00")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    let tags = test_db.db.tags.list(alice.id).await.unwrap();
    let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["personal", "work"]);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_rename_foreign_tag_is_not_found() {
    let test_db = setup().await;
    let alice = test_db.create_user("alice").await;
    let bob = test_db.create_user("bob").await;

    let tag = test_db.db.tags.create(alice.id, "work", "#ff0000").await.unwrap();

    let err = test_db
        .db
        .tags
        .rename(bob.id, tag.id, "stolen", "#000000")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::TagNotFound(_)));

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_empty_name_or_color_is_invalid() {
    let test_db = setup().await;
    let alice = test_db.create_user("alice").await;

    assert!(matches!(
        test_db.db.tags.create(alice.id, "", "#fff").await,
        Err(Error::InvalidInput(_))
    ));
    assert!(matches!(
        test_db.db.tags.create(alice.id, "work", "").await,
        Err(Error::InvalidInput(_))
    ));

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_attach_is_idempotent() {
    let test_db = setup().await;
    let alice = test_db.create_user("alice").await;

    let doc = test_db
        .db
        .documents
        .create(
            alice.id,
            CreateDocumentRequest {
                title: "D".to_string(),
                content: String::new(),
            },
        )
        .await
        .unwrap();
    let tag = test_db.db.tags.create(alice.id, "work", "#ff0000").await.unwrap();

    test_db.db.tags.attach(alice.id, doc.id, tag.id).await.unwrap();
    // Second attach of the same pair succeeds and adds nothing.
    test_db.db.tags.attach(alice.id, doc.id, tag.id).await.unwrap();

    assert_eq!(assoc_count(&test_db, doc.id).await, 1);

    let doc_after = test_db.db.documents.get(alice.id, doc.id).await.unwrap();
    assert_eq!(doc_after.tags.len(), 1);
    assert_eq!(doc_after.tags[0].name, "work");

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_attach_missing_pieces() {
    let test_db = setup().await;
    let alice = test_db.create_user("alice").await;

    let doc = test_db
        .db
        .documents
        .create(
            alice.id,
            CreateDocumentRequest {
                title: "D".to_string(),
                content: String::new(),
            },
        )
        .await
        .unwrap();
    let tag = test_db.db.tags.create(alice.id, "work", "#ff0000").await.unwrap();

    assert!(matches!(
        test_db.db.tags.attach(alice.id, marknote_db::new_v7(), tag.id).await,
        Err(Error::DocumentNotFound(_))
    ));
    assert!(matches!(
        test_db.db.tags.attach(alice.id, doc.id, marknote_db::new_v7()).await,
        Err(Error::TagNotFound(_))
    ));

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_detach_scenario_and_silent_success() {
    let test_db = setup().await;
    let alice = test_db.create_user("alice").await;

    let doc = test_db
        .db
        .documents
        .create(
            alice.id,
            CreateDocumentRequest {
                title: "D".to_string(),
                content: String::new(),
            },
        )
        .await
        .unwrap();
    let tag = test_db.db.tags.create(alice.id, "work", "#ff0000").await.unwrap();
    test_db.db.tags.attach(alice.id, doc.id, tag.id).await.unwrap();

    let listed = test_db
        .db
        .documents
        .list(alice.id, &marknote_db::DocumentFilter::new())
        .await
        .unwrap();
    assert_eq!(listed[0].tags.len(), 1);
    assert_eq!(listed[0].tags[0].name, "work");

    test_db.db.tags.detach(alice.id, doc.id, tag.id).await.unwrap();
    // Detaching again is a silent success.
    test_db.db.tags.detach(alice.id, doc.id, tag.id).await.unwrap();

    let listed = test_db
        .db
        .documents
        .list(alice.id, &marknote_db::DocumentFilter::new())
        .await
        .unwrap();
    assert!(listed[0].tags.is_empty());

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_deletes_leave_no_orphaned_associations() {
    let test_db = setup().await;
    let alice = test_db.create_user("alice").await;

    let doc = test_db
        .db
        .documents
        .create(
            alice.id,
            CreateDocumentRequest {
                title: "D".to_string(),
                content: String::new(),
            },
        )
        .await
        .unwrap();
    let work = test_db.db.tags.create(alice.id, "work", "#ff0000").await.unwrap();
    let home = test_db.db.tags.create(alice.id, "home", "#00ff00").await.unwrap();
    test_db.db.tags.attach(alice.id, doc.id, work.id).await.unwrap();
    test_db.db.tags.attach(alice.id, doc.id, home.id).await.unwrap();

    // Deleting a tag removes its associations but not the others.
    assert!(test_db.db.tags.delete(alice.id, work.id).await.unwrap());
    assert_eq!(assoc_count(&test_db, doc.id).await, 1);

    // Deleting the document removes the rest.
    assert!(test_db.db.documents.delete(alice.id, doc.id).await.unwrap());
    assert_eq!(assoc_count(&test_db, doc.id).await, 0);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_list_orders_by_name_ascending() {
    let test_db = setup().await;
    let alice = test_db.create_user("alice").await;

    test_db.db.tags.create(alice.id, "zeta", "#111111").await.unwrap();
    test_db.db.tags.create(alice.id, "alpha", "#222222").await.unwrap();
    test_db.db.tags.create(alice.id, "mid", "#333333").await.unwrap();

    let tags = test_db.db.tags.list(alice.id).await.unwrap();
    let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "mid", "zeta"]);

    test_db.cleanup().await;
}
