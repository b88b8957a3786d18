//! Post schema for the Admin API
//!
//! Records:
//! - `ContentItem`: a post as returned by browse/edit/add
//! - `Tag`: tag reference attached to a post
//! - `PostDraft`: body of an add call
//! - `NotificationDirective`: newsletter + recipient segment for email delivery
//!
//! Every record keeps unknown JSON keys in an `extensions` map so a post read
//! from the backend can be written back without losing fields this crate does
//! not model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Publication status of a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
    Scheduled,
    Sent,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
            PostStatus::Scheduled => "scheduled",
            PostStatus::Sent => "sent",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            "scheduled" => Ok(PostStatus::Scheduled),
            "sent" => Ok(PostStatus::Sent),
            other => Err(format!("unknown post status: {other}")),
        }
    }
}

/// Tag reference on a post, identified by slug
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl Tag {
    /// Build a bare reference from a slug; the backend resolves the rest.
    pub fn from_slug(slug: &str) -> Self {
        Tag {
            slug: slug.to_string(),
            name: None,
            extensions: Map::new(),
        }
    }
}

/// A post as held by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default)]
    pub title: String,
    pub status: PostStatus,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub feature_image: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Fields not modelled above (custom flags, visibility, html, ...)
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl ContentItem {
    /// New item with the given id and title, in draft, with no tags.
    pub fn new(id: &str, title: &str) -> Self {
        ContentItem {
            id: id.to_string(),
            uuid: None,
            title: title.to_string(),
            status: PostStatus::Draft,
            published_at: None,
            updated_at: None,
            url: None,
            feature_image: None,
            tags: Vec::new(),
            extensions: Map::new(),
        }
    }

    pub fn has_tag(&self, slug: &str) -> bool {
        self.tags.iter().any(|t| t.slug == slug)
    }

    /// Read a field by its wire name, covering both typed and extension fields.
    pub fn field(&self, name: &str) -> Option<Value> {
        match name {
            "title" => Some(Value::String(self.title.clone())),
            "status" => Some(Value::String(self.status.to_string())),
            "feature_image" => self.feature_image.clone().map(Value::String),
            "url" => self.url.clone().map(Value::String),
            _ => self.extensions.get(name).cloned(),
        }
    }

    /// Assign a field by its wire name.
    ///
    /// Typed fields accept only values of their own shape; identity and
    /// timestamp fields are owned by the backend and never overwritten.
    /// Returns whether the assignment took effect.
    pub fn set_field(&mut self, name: &str, value: Value) -> bool {
        match (name, value) {
            ("title", Value::String(s)) => self.title = s,
            ("title", other) => self.title = other.to_string(),
            ("status", Value::String(s)) => match s.parse() {
                Ok(status) => self.status = status,
                Err(e) => {
                    warn!(post = %self.id, "ignoring status assignment: {}", e);
                    return false;
                }
            },
            ("feature_image", Value::String(s)) => self.feature_image = Some(s),
            ("feature_image", Value::Null) => self.feature_image = None,
            ("id" | "uuid" | "tags" | "published_at" | "updated_at" | "url" | "status"
            | "feature_image", _) => {
                warn!(post = %self.id, field = name, "field cannot be assigned this value");
                return false;
            }
            (_, value) => {
                self.extensions.insert(name.to_string(), value);
            }
        }
        true
    }
}

/// Body of an add call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub status: PostStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_image: Option<String>,
    pub html: String,
    /// Email-only posts are delivered by newsletter and hidden from listings
    #[serde(default)]
    pub email_only: bool,
}

/// Source format of the body supplied to an add call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Html,
}

impl SourceFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Html => "html",
        }
    }
}

/// Instruction to email a post when it is published
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationDirective {
    /// Newsletter slug (the delivery channel)
    pub newsletter: String,
    /// Member filter selecting recipients, e.g. `all` or `status:free`
    pub segment: String,
}

impl NotificationDirective {
    pub fn new(newsletter: &str, segment: &str) -> Self {
        NotificationDirective {
            newsletter: newsletter.to_string(),
            segment: segment.to_string(),
        }
    }
}
