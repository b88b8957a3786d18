//! Contract tests for ContentBackend using the in-memory fake.
//!
//! Any conforming backend must satisfy these behaviours; the pipeline tests
//! in postcycle-core rely on them.

use ghost_admin::fakes::{BackendCall, MemoryBackend};
use ghost_admin::{
    BackendError, ContentBackend, ContentItem, Filter, NotificationDirective, PostDraft,
    PostStatus, SourceFormat, Tag,
};

fn post(id: &str, status: PostStatus, tags: &[&str]) -> ContentItem {
    let mut item = ContentItem::new(id, &format!("Post {id}"));
    item.status = status;
    item.tags = tags.iter().map(|t| Tag::from_slug(t)).collect();
    item
}

fn seeded() -> MemoryBackend {
    MemoryBackend::with_posts(vec![
        post("a", PostStatus::Published, &["hold"]),
        post("b", PostStatus::Draft, &["hold"]),
        post("c", PostStatus::Published, &["other"]),
    ])
}

#[tokio::test]
async fn browse_by_tag_ignores_status() {
    let backend = seeded();
    let found = backend.browse(&Filter::new().tag("hold")).await.unwrap();
    let ids: Vec<_> = found.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[tokio::test]
async fn browse_by_tag_and_status() {
    let backend = seeded();
    let found = backend
        .browse(&Filter::new().tag("hold").status(PostStatus::Published))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "a");
}

#[tokio::test]
async fn browse_by_id_set() {
    let backend = seeded();
    let found = backend
        .browse(&Filter::new().ids(["a", "c"]))
        .await
        .unwrap();
    assert_eq!(found.len(), 2);
}

#[tokio::test]
async fn edit_replaces_stored_copy() {
    let backend = seeded();
    let mut a = backend.get("a").unwrap();
    a.set_field("featured", serde_json::json!(true));
    let saved = backend.edit(&a, None).await.unwrap();

    assert!(saved.updated_at.is_some());
    assert_eq!(
        backend.get("a").unwrap().extensions.get("featured"),
        Some(&serde_json::json!(true))
    );
}

#[tokio::test]
async fn edit_records_notification() {
    let backend = seeded();
    let a = backend.get("a").unwrap();
    let notify = NotificationDirective::new("default-newsletter", "all");
    backend.edit(&a, Some(&notify)).await.unwrap();

    assert_eq!(
        backend.edits_of("a"),
        vec![BackendCall::Edit {
            id: "a".to_string(),
            status: PostStatus::Published,
            notify: Some(notify),
        }]
    );
}

#[tokio::test]
async fn edit_unknown_post_is_not_found() {
    let backend = seeded();
    let ghost = ContentItem::new("zzz", "missing");
    let err = backend.edit(&ghost, None).await.unwrap_err();
    assert!(matches!(err, BackendError::NotFound(_)));
}

#[tokio::test]
async fn injected_failure_rejects_edit_and_keeps_store() {
    let backend = seeded();
    backend.fail_edits_for("a");
    let mut a = backend.get("a").unwrap();
    a.title = "changed".to_string();

    let err = backend.edit(&a, None).await.unwrap_err();
    assert!(matches!(err, BackendError::Rejected { .. }));
    assert_eq!(backend.get("a").unwrap().title, "Post a");
}

#[tokio::test]
async fn add_assigns_id_and_url() {
    let backend = MemoryBackend::new();
    let draft = PostDraft {
        title: "Announcement".to_string(),
        status: PostStatus::Draft,
        feature_image: Some("https://img.test/a.png".to_string()),
        html: "<p>hi</p>".to_string(),
        email_only: true,
    };
    let created = backend.add(&draft, SourceFormat::Html).await.unwrap();

    assert!(!created.id.is_empty());
    assert!(created.url.is_some());
    assert_eq!(created.status, PostStatus::Draft);
    assert!(created.published_at.is_none());
    assert_eq!(backend.posts().len(), 1);
}

#[tokio::test]
async fn publishing_sets_published_at() {
    let backend = seeded();
    let mut b = backend.get("b").unwrap();
    b.status = PostStatus::Published;
    let saved = backend.edit(&b, None).await.unwrap();
    assert!(saved.published_at.is_some());
}

#[tokio::test]
async fn injected_add_failure_stores_nothing() {
    let backend = MemoryBackend::new();
    backend.fail_adds();
    let draft = PostDraft {
        title: "Announcement".to_string(),
        status: PostStatus::Draft,
        feature_image: None,
        html: "<p>hi</p>".to_string(),
        email_only: true,
    };

    let err = backend.add(&draft, SourceFormat::Html).await.unwrap_err();

    assert!(matches!(err, BackendError::Api { status: 422, .. }));
    assert!(backend.posts().is_empty());
}
