//! Run configuration
//!
//! Inputs arrive as flat named strings, either as command-line flags or as CI
//! action inputs (`INPUT_<NAME>` variables). In local mode the short
//! variables from a `.env` file (`URL`, `KEY`, `TAG`, ...) take precedence.
//! Everything is resolved and validated once, before any backend call.

use clap::Parser;
use ghost_admin::{AdminApiConfig, NotificationDirective};
use postcycle_core::{FieldValue, SelectionCriteria};
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_NEWSLETTER: &str = "default-newsletter";
pub const DEFAULT_SEGMENT: &str = "all";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required input: {0}")]
    Missing(&'static str),

    #[error("input `days` must be a non-negative integer, got {0:?}")]
    InvalidDays(String),

    #[error("input `{name}` must be \"true\" or \"false\", got {value:?}")]
    InvalidFlag { name: &'static str, value: String },

    #[error("{0}")]
    Invalid(String),
}

#[derive(Parser, Debug)]
#[command(name = "postcycle")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Time-delayed lifecycle transitions for Ghost posts", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    pub json: bool,

    /// Read inputs from a .env file (also enabled by LOCAL_TEST)
    #[arg(long)]
    pub local: bool,

    /// .env file read in local mode
    #[arg(long, default_value = ".env")]
    pub env_file: PathBuf,

    /// Site URL of the Admin API
    #[arg(long, env = "INPUT_API-URL")]
    pub api_url: Option<String>,

    /// Admin API key `<id>:<secret>`
    #[arg(long, env = "INPUT_API-KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Tag slug selecting candidate posts
    #[arg(long, env = "INPUT_TAG")]
    pub tag: Option<String>,

    /// Tag slug swapped in before announcing
    #[arg(long, alias = "tag-post", env = "INPUT_TAGPOST")]
    pub announce_tag: Option<String>,

    /// Field written on ready posts
    #[arg(long, env = "INPUT_FIELD")]
    pub field: Option<String>,

    /// Value written to the field ("true"/"false" become booleans)
    #[arg(long, env = "INPUT_VALUE")]
    pub value: Option<String>,

    /// Days after publication before a post is ready
    #[arg(long, env = "INPUT_DAYS")]
    pub days: Option<String>,

    /// Only consider published posts and republish them with a notification
    #[arg(long, env = "INPUT_PUBLISHED-ONLY")]
    pub published_only: Option<String>,

    /// Newsletter used for notifications
    #[arg(long, env = "INPUT_NEWSLETTER")]
    pub newsletter: Option<String>,

    /// Member segment receiving notifications
    #[arg(long, env = "INPUT_EMAIL-SEGMENT")]
    pub email_segment: Option<String>,
}

impl Cli {
    pub fn inputs(&self) -> RawInputs {
        RawInputs {
            api_url: self.api_url.clone(),
            api_key: self.api_key.clone(),
            tag: self.tag.clone(),
            announce_tag: self.announce_tag.clone(),
            field: self.field.clone(),
            value: self.value.clone(),
            days: self.days.clone(),
            published_only: self.published_only.clone(),
            newsletter: self.newsletter.clone(),
            email_segment: self.email_segment.clone(),
        }
    }

    /// Local mode from the flag or a non-empty `LOCAL_TEST`.
    pub fn is_local(&self, lookup: impl Fn(&str) -> Option<String>) -> bool {
        self.local || lookup("LOCAL_TEST").is_some_and(|v| !v.is_empty() && v != "false")
    }
}

/// Unvalidated inputs; empty strings count as absent
#[derive(Debug, Clone, Default)]
pub struct RawInputs {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub tag: Option<String>,
    pub announce_tag: Option<String>,
    pub field: Option<String>,
    pub value: Option<String>,
    pub days: Option<String>,
    pub published_only: Option<String>,
    pub newsletter: Option<String>,
    pub email_segment: Option<String>,
}

/// Validated configuration for one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub backend: AdminApiConfig,
    pub criteria: SelectionCriteria,
    pub notify: NotificationDirective,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn required(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
    present(value).ok_or(ConfigError::Missing(name))
}

impl RawInputs {
    /// Let local short-name variables override inputs where they are set.
    pub fn overlay_local(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let slots: [(&str, &mut Option<String>); 7] = [
            ("URL", &mut self.api_url),
            ("KEY", &mut self.api_key),
            ("TAG", &mut self.tag),
            ("TAG_POST", &mut self.announce_tag),
            ("FIELD", &mut self.field),
            ("VALUE", &mut self.value),
            ("DAYS", &mut self.days),
        ];
        for (name, slot) in slots {
            if let Some(local) = present(lookup(name)) {
                *slot = Some(local);
            }
        }
        self
    }

    pub fn resolve(self) -> Result<RunConfig, ConfigError> {
        let api_url = required(self.api_url, "api-url")?;
        let api_key = required(self.api_key, "api-key")?;
        let tag = required(self.tag, "tag")?;
        let field = required(self.field, "field")?;
        let value = required(self.value, "value")?;
        let days = required(self.days, "days")?;

        let threshold_days = days
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidDays(days.clone()))?;

        let published_only = match present(self.published_only) {
            None => false,
            Some(raw) => match FieldValue::coerce(raw.trim()) {
                FieldValue::Bool(b) => b,
                FieldValue::Text(_) => {
                    return Err(ConfigError::InvalidFlag {
                        name: "published-only",
                        value: raw,
                    })
                }
            },
        };

        let mut criteria =
            SelectionCriteria::new(&tag, threshold_days, &field, FieldValue::coerce(&value));
        if published_only {
            criteria = criteria.published_only();
        }
        if let Some(announce) = present(self.announce_tag) {
            criteria = criteria.with_announce_tag(&announce);
        }
        criteria
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        let notify = NotificationDirective::new(
            &present(self.newsletter).unwrap_or_else(|| DEFAULT_NEWSLETTER.to_string()),
            &present(self.email_segment).unwrap_or_else(|| DEFAULT_SEGMENT.to_string()),
        );

        Ok(RunConfig {
            backend: AdminApiConfig::new(&api_url, &api_key),
            criteria,
            notify,
        })
    }
}
