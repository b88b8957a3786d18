//! In-memory fake backend (testing only)
//!
//! `MemoryBackend` satisfies the `ContentBackend` contract without any network
//! access. It evaluates filters locally, records every call with its
//! notification directive, and can be told to reject edits for given ids or
//! every add.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use crate::backend::{BackendResult, ContentBackend};
use crate::error::BackendError;
use crate::filter::Filter;
use crate::schema::{ContentItem, NotificationDirective, PostDraft, PostStatus, SourceFormat};

/// A call observed by the fake, in arrival order
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    Browse {
        filter: String,
    },
    Edit {
        id: String,
        status: PostStatus,
        notify: Option<NotificationDirective>,
    },
    Add {
        title: String,
        format: SourceFormat,
    },
}

/// In-memory post store backed by an ordered `Vec<ContentItem>`.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    posts: Mutex<Vec<ContentItem>>,
    calls: Mutex<Vec<BackendCall>>,
    failing_edits: Mutex<HashSet<String>>,
    failing_adds: Mutex<bool>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with posts, preserving their order.
    pub fn with_posts(posts: Vec<ContentItem>) -> Self {
        MemoryBackend {
            posts: Mutex::new(posts),
            ..Self::default()
        }
    }

    /// Make every subsequent edit of `id` fail with `BackendError::Rejected`.
    pub fn fail_edits_for(&self, id: &str) {
        lock(&self.failing_edits).insert(id.to_string());
    }

    /// Make every subsequent add fail with `BackendError::Api`.
    pub fn fail_adds(&self) {
        *lock(&self.failing_adds) = true;
    }

    /// Current copy of a stored post.
    pub fn get(&self, id: &str) -> Option<ContentItem> {
        lock(&self.posts).iter().find(|p| p.id == id).cloned()
    }

    /// Current copy of every stored post.
    pub fn posts(&self) -> Vec<ContentItem> {
        lock(&self.posts).clone()
    }

    /// Every call received so far.
    pub fn calls(&self) -> Vec<BackendCall> {
        lock(&self.calls).clone()
    }

    /// Edit calls received for one post, in order.
    pub fn edits_of(&self, id: &str) -> Vec<BackendCall> {
        lock(&self.calls)
            .iter()
            .filter(|c| matches!(c, BackendCall::Edit { id: edited, .. } if edited == id))
            .cloned()
            .collect()
    }

    fn record(&self, call: BackendCall) {
        lock(&self.calls).push(call);
    }
}

#[async_trait]
impl ContentBackend for MemoryBackend {
    async fn browse(&self, filter: &Filter) -> BackendResult<Vec<ContentItem>> {
        self.record(BackendCall::Browse {
            filter: filter.to_string(),
        });
        let posts = lock(&self.posts);
        Ok(posts.iter().filter(|p| filter.matches(p)).cloned().collect())
    }

    async fn edit(
        &self,
        item: &ContentItem,
        notify: Option<&NotificationDirective>,
    ) -> BackendResult<ContentItem> {
        self.record(BackendCall::Edit {
            id: item.id.clone(),
            status: item.status,
            notify: notify.cloned(),
        });

        // Let sibling edits interleave the way remote calls would.
        tokio::task::yield_now().await;

        if lock(&self.failing_edits).contains(&item.id) {
            return Err(BackendError::Rejected {
                id: item.id.clone(),
                reason: "edit rejected by fake backend".to_string(),
            });
        }

        let mut posts = lock(&self.posts);
        let stored = posts
            .iter_mut()
            .find(|p| p.id == item.id)
            .ok_or_else(|| BackendError::NotFound(item.id.clone()))?;

        let mut updated = item.clone();
        updated.updated_at = Some(Utc::now());
        if updated.status == PostStatus::Published && updated.published_at.is_none() {
            updated.published_at = Some(Utc::now());
        }
        *stored = updated.clone();
        Ok(updated)
    }

    async fn add(&self, draft: &PostDraft, format: SourceFormat) -> BackendResult<ContentItem> {
        self.record(BackendCall::Add {
            title: draft.title.clone(),
            format,
        });

        tokio::task::yield_now().await;

        if *lock(&self.failing_adds) {
            return Err(BackendError::Api {
                status: 422,
                body: "add rejected by fake backend".to_string(),
            });
        }

        let id = uuid::Uuid::new_v4().simple().to_string();
        let mut item = ContentItem::new(&id, &draft.title);
        item.status = draft.status;
        item.feature_image = draft.feature_image.clone();
        item.url = Some(format!("https://example.test/p/{id}/"));
        item.updated_at = Some(Utc::now());
        if draft.status == PostStatus::Published {
            item.published_at = Some(Utc::now());
        }
        item.extensions
            .insert("html".to_string(), serde_json::Value::String(draft.html.clone()));
        item.extensions
            .insert("email_only".to_string(), serde_json::Value::Bool(draft.email_only));

        lock(&self.posts).push(item.clone());
        Ok(item)
    }
}
