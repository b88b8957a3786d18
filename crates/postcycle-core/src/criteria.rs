//! Selection criteria and workflow variants
//!
//! `SelectionCriteria` is read once per run and passed by reference to every
//! stage. Which optional fields are set decides the workflow variant.

use std::fmt;

use ghost_admin::{Filter, PostStatus};
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::mutation::FieldValue;

/// Workflow run for the ready posts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Set the field and write back
    DirectUpdate,
    /// Set the field, unpublish, then republish with a notification
    UnpublishRepublish,
    /// Set the field, swap tags, then publish an announcement post
    TagSwapAnnounce,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Variant::DirectUpdate => "direct-update",
            Variant::UnpublishRepublish => "unpublish-republish",
            Variant::TagSwapAnnounce => "tag-swap-announce",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionCriteria {
    /// Slug of the tag that selects candidates
    pub tag: String,
    /// Only consider published posts
    pub require_published: bool,
    /// Posts older than this many days are ready
    pub threshold_days: u32,
    /// Field written on ready posts
    pub field: String,
    pub value: FieldValue,
    /// Tag appended in place of `tag` before announcing
    pub announce_tag: Option<String>,
}

impl SelectionCriteria {
    /// Criteria for a direct update of every post tagged `tag`.
    pub fn new(tag: &str, threshold_days: u32, field: &str, value: FieldValue) -> Self {
        SelectionCriteria {
            tag: tag.to_string(),
            require_published: false,
            threshold_days,
            field: field.to_string(),
            value,
            announce_tag: None,
        }
    }

    pub fn published_only(mut self) -> Self {
        self.require_published = true;
        self
    }

    /// Announcing always works on published posts.
    pub fn with_announce_tag(mut self, slug: &str) -> Self {
        self.announce_tag = Some(slug.to_string());
        self.require_published = true;
        self
    }

    pub fn variant(&self) -> Variant {
        match (&self.announce_tag, self.require_published) {
            (Some(_), _) => Variant::TagSwapAnnounce,
            (None, true) => Variant::UnpublishRepublish,
            (None, false) => Variant::DirectUpdate,
        }
    }

    /// Filter used to fetch candidates.
    pub fn candidate_filter(&self) -> Filter {
        let filter = Filter::new().tag(&self.tag);
        if self.require_published || self.announce_tag.is_some() {
            filter.status(PostStatus::Published)
        } else {
            filter
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.tag.trim().is_empty() {
            return Err(PipelineError::InvalidCriteria("tag must not be empty".to_string()));
        }
        if self.field.trim().is_empty() {
            return Err(PipelineError::InvalidCriteria(
                "field must not be empty".to_string(),
            ));
        }
        if self.announce_tag.as_deref() == Some(self.tag.as_str()) {
            return Err(PipelineError::InvalidCriteria(
                "announce tag must differ from the selection tag".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> SelectionCriteria {
        SelectionCriteria::new("hold", 7, "featured", FieldValue::Bool(true))
    }

    #[test]
    fn test_variant_selection() {
        assert_eq!(base().variant(), Variant::DirectUpdate);
        assert_eq!(base().published_only().variant(), Variant::UnpublishRepublish);
        assert_eq!(
            base().with_announce_tag("live").variant(),
            Variant::TagSwapAnnounce
        );
    }

    #[test]
    fn test_candidate_filter() {
        assert_eq!(base().candidate_filter().to_string(), "tag:hold");
        assert_eq!(
            base().published_only().candidate_filter().to_string(),
            "tag:hold+status:published"
        );
        assert_eq!(
            base().with_announce_tag("live").candidate_filter().to_string(),
            "tag:hold+status:published"
        );
    }

    #[test]
    fn test_validate() {
        assert!(base().validate().is_ok());

        let mut empty_tag = base();
        empty_tag.tag = " ".to_string();
        assert!(empty_tag.validate().is_err());

        assert!(base().with_announce_tag("hold").validate().is_err());
    }
}
