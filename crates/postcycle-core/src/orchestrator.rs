//! Lifecycle orchestrator
//!
//! One pipeline, three variants:
//!
//! - `DirectUpdate`: fetch → filter → update
//! - `UnpublishRepublish`: fetch → filter → unpublish → re-fetch → republish
//! - `TagSwapAnnounce`: fetch → filter → update + swap tags → announce
//!
//! Within a stage every ready post is handled concurrently and the stage ends
//! when all of them have settled. The first failure aborts the run; sibling
//! calls still in flight are dropped and nothing already written is undone.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::try_join_all;
use ghost_admin::{
    ContentBackend, ContentItem, Filter, NotificationDirective, PostStatus, SourceFormat,
};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::announce::{publish_with_notification, spawn_announcement};
use crate::clock::{Clock, SystemClock};
use crate::criteria::{SelectionCriteria, Variant};
use crate::eligibility::{select_eligible, Evaluation};
use crate::error::Result;
use crate::mutation::{apply_field_mutation, swap_tag};

/// What a run did
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub variant: Variant,
    #[serde(skip)]
    pub evaluations: Vec<Evaluation>,
    /// Posts written in the update stage (drafts, for `UnpublishRepublish`)
    pub updated: Vec<ContentItem>,
    pub republished: Vec<ContentItem>,
    pub announcements: Vec<ContentItem>,
}

impl RunReport {
    fn new(variant: Variant, evaluations: Vec<Evaluation>) -> Self {
        RunReport {
            variant,
            evaluations,
            updated: Vec::new(),
            republished: Vec::new(),
            announcements: Vec::new(),
        }
    }

    pub fn ready_count(&self) -> usize {
        self.evaluations.iter().filter(|e| e.is_ready()).count()
    }

    pub fn summary(&self) -> String {
        format!(
            "{}: {} evaluated, {} ready, {} updated, {} republished, {} announced",
            self.variant,
            self.evaluations.len(),
            self.ready_count(),
            self.updated.len(),
            self.republished.len(),
            self.announcements.len()
        )
    }
}

/// Runs the lifecycle pipeline against a backend
pub struct Orchestrator {
    backend: Arc<dyn ContentBackend>,
    clock: Arc<dyn Clock>,
    criteria: SelectionCriteria,
    notify: NotificationDirective,
}

impl Orchestrator {
    pub fn new(
        backend: Arc<dyn ContentBackend>,
        criteria: SelectionCriteria,
        notify: NotificationDirective,
    ) -> Self {
        Orchestrator {
            backend,
            clock: Arc::new(SystemClock),
            criteria,
            notify,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Execute one run.
    #[instrument(skip(self), fields(tag = %self.criteria.tag, variant = %self.criteria.variant()))]
    pub async fn run(&self) -> Result<RunReport> {
        self.criteria.validate()?;
        let variant = self.criteria.variant();

        let filter = self.criteria.candidate_filter();
        let candidates = self.backend.browse(&filter).await?;
        debug!(filter = %filter, count = candidates.len(), "fetched candidates");

        let selection = select_eligible(
            candidates,
            self.criteria.threshold_days,
            self.clock.as_ref(),
        );
        for evaluation in &selection.evaluations {
            info!("{}", evaluation);
        }

        let ready = selection.ready;
        let mut report = RunReport::new(variant, selection.evaluations);
        if ready.is_empty() {
            info!("No posts ready for {}", variant);
            return Ok(report);
        }

        match variant {
            Variant::DirectUpdate => {
                report.updated = try_join_all(ready.iter().map(|item| self.update(item))).await?;
            }
            Variant::UnpublishRepublish => {
                report.updated =
                    try_join_all(ready.iter().map(|item| self.unpublish(item))).await?;
                report.republished = self.republish(&report.updated).await?;
            }
            Variant::TagSwapAnnounce => {
                let pairs =
                    try_join_all(ready.iter().map(|item| self.swap_and_announce(item))).await?;
                for (source, announcement) in pairs {
                    report.updated.push(source);
                    report.announcements.push(announcement);
                }
            }
        }

        Ok(report)
    }

    fn mutated(&self, item: &ContentItem) -> ContentItem {
        apply_field_mutation(item.clone(), &self.criteria.field, &self.criteria.value)
    }

    async fn update(&self, item: &ContentItem) -> Result<ContentItem> {
        info!(post = %item.id, "Updating post \"{}\"", item.title);
        Ok(self.backend.edit(&self.mutated(item), None).await?)
    }

    async fn unpublish(&self, item: &ContentItem) -> Result<ContentItem> {
        let mut next = self.mutated(item);
        next.status = PostStatus::Draft;
        info!(post = %item.id, "Unpublishing post \"{}\"", item.title);
        Ok(self.backend.edit(&next, None).await?)
    }

    /// Re-read the unpublished posts as drafts and publish each with a
    /// notification. A post the re-read misses is republished from the copy
    /// its unpublish returned, so no post is left in draft.
    async fn republish(&self, unpublished: &[ContentItem]) -> Result<Vec<ContentItem>> {
        let ids: Vec<&str> = unpublished.iter().map(|p| p.id.as_str()).collect();
        let mut drafts = self
            .backend
            .browse(&Filter::new().ids(ids.iter().copied()).status(PostStatus::Draft))
            .await?;

        let returned: HashSet<String> = drafts.iter().map(|p| p.id.clone()).collect();
        let missing: Vec<ContentItem> = unpublished
            .iter()
            .filter(|p| !returned.contains(&p.id))
            .cloned()
            .collect();
        if !missing.is_empty() {
            let missing_ids: Vec<&str> = missing.iter().map(|p| p.id.as_str()).collect();
            warn!(
                missing = ?missing_ids,
                "re-read did not return unpublished posts as drafts, republishing written copies"
            );
            drafts.extend(missing);
        }

        let backend = self.backend.as_ref();
        try_join_all(
            drafts
                .into_iter()
                .map(|draft| publish_with_notification(backend, draft, &self.notify)),
        )
        .await
    }

    async fn swap_and_announce(&self, item: &ContentItem) -> Result<(ContentItem, ContentItem)> {
        let next = swap_tag(
            self.mutated(item),
            &self.criteria.tag,
            self.criteria.announce_tag.as_deref(),
        );
        info!(post = %item.id, "Updating and retagging post \"{}\"", item.title);
        let source = self.backend.edit(&next, None).await?;

        let draft = spawn_announcement(&source);
        info!(post = %source.id, "Creating announcement \"{}\"", draft.title);
        let created = self.backend.add(&draft, SourceFormat::Html).await?;

        let announcement =
            publish_with_notification(self.backend.as_ref(), created, &self.notify).await?;
        Ok((source, announcement))
    }
}
