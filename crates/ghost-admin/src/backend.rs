//! Content backend trait
//!
//! The backend is the system of record for posts. The pipeline only ever
//! reads candidates, writes edited copies back and adds new posts; every call
//! is a remote operation that may fail.
//!
//! `AdminApiClient` implements this over HTTP; `fakes::MemoryBackend` is the
//! in-memory implementation used by tests.

use async_trait::async_trait;

use crate::error::BackendError;
use crate::filter::Filter;
use crate::schema::{ContentItem, NotificationDirective, PostDraft, SourceFormat};

/// Result type for backend operations
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Remote post store.
///
/// Guarantees expected of implementations:
/// - `browse` returns every post matching all clauses of the filter.
/// - `edit` replaces the stored post with the same id and returns the stored
///   result; the directive, when present, emails the post on publish.
/// - `add` creates a new post and returns it with its assigned id.
#[async_trait]
pub trait ContentBackend: Send + Sync {
    async fn browse(&self, filter: &Filter) -> BackendResult<Vec<ContentItem>>;

    async fn edit(
        &self,
        item: &ContentItem,
        notify: Option<&NotificationDirective>,
    ) -> BackendResult<ContentItem>;

    async fn add(&self, draft: &PostDraft, format: SourceFormat) -> BackendResult<ContentItem>;
}
