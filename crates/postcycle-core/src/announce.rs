//! Announcement spawner
//!
//! Derives an email-only announcement post from a source post that has just
//! been made available, and drives it from draft to published with a
//! notification attached.

use ghost_admin::{ContentBackend, ContentItem, NotificationDirective, PostDraft, PostStatus};
use tracing::info;

use crate::error::Result;

/// Title of the announcement for a source post.
pub fn announcement_title(source_title: &str) -> String {
    format!("{source_title} is now available for all readers!")
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Build the draft announcing `source`.
///
/// `source` must be the copy returned by the backend after its own edit, so
/// the feature image and URL reflect that edit.
pub fn spawn_announcement(source: &ContentItem) -> PostDraft {
    let title = escape_html(&source.title);
    let html = match source.url.as_deref() {
        Some(url) => format!(
            "<p><a href=\"{}\">{}</a> is now available for all readers. Read it now!</p>",
            escape_html(url),
            title
        ),
        None => format!("<p>{title} is now available for all readers.</p>"),
    };

    PostDraft {
        title: announcement_title(&source.title),
        status: PostStatus::Draft,
        feature_image: source.feature_image.clone(),
        html,
        email_only: true,
    }
}

/// Publish `item` and email it according to `notify`.
pub async fn publish_with_notification(
    backend: &dyn ContentBackend,
    mut item: ContentItem,
    notify: &NotificationDirective,
) -> Result<ContentItem> {
    item.status = PostStatus::Published;
    info!(
        post = %item.id,
        newsletter = %notify.newsletter,
        segment = %notify.segment,
        "Publishing post \"{}\"",
        item.title
    );
    Ok(backend.edit(&item, Some(notify)).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghost_admin::fakes::{BackendCall, MemoryBackend};

    fn source() -> ContentItem {
        let mut item = ContentItem::new("src", "Deep Dive");
        item.status = PostStatus::Published;
        item.url = Some("https://blog.test/deep-dive/".to_string());
        item.feature_image = Some("https://img.test/dive.png".to_string());
        item
    }

    #[test]
    fn test_announcement_draft() {
        let draft = spawn_announcement(&source());
        assert_eq!(draft.title, "Deep Dive is now available for all readers!");
        assert_eq!(draft.status, PostStatus::Draft);
        assert!(draft.email_only);
        assert_eq!(
            draft.feature_image.as_deref(),
            Some("https://img.test/dive.png")
        );
        assert!(draft.html.contains("href=\"https://blog.test/deep-dive/\""));
    }

    #[test]
    fn test_announcement_escapes_title_in_body() {
        let mut src = source();
        src.title = "Rust <3 & you".to_string();
        let draft = spawn_announcement(&src);
        assert!(draft.html.contains("Rust &lt;3 &amp; you"));
        assert_eq!(draft.title, "Rust <3 & you is now available for all readers!");
    }

    #[test]
    fn test_announcement_without_url() {
        let mut src = source();
        src.url = None;
        let draft = spawn_announcement(&src);
        assert!(!draft.html.contains("href"));
    }

    #[tokio::test]
    async fn test_publish_with_notification() {
        let mut draft = source();
        draft.status = PostStatus::Draft;
        let backend = MemoryBackend::with_posts(vec![draft.clone()]);
        let notify = NotificationDirective::new("default-newsletter", "status:free");

        let published = publish_with_notification(&backend, draft, &notify)
            .await
            .unwrap();

        assert_eq!(published.status, PostStatus::Published);
        assert_eq!(
            backend.edits_of("src"),
            vec![BackendCall::Edit {
                id: "src".to_string(),
                status: PostStatus::Published,
                notify: Some(notify),
            }]
        );
    }
}
