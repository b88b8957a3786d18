//! Conjunctive filter expressions for browse calls
//!
//! A `Filter` is a list of clauses that must all hold. It renders to the
//! backend's `key:value+key:value` wire form and can be evaluated locally
//! against a `ContentItem`, which is how the in-memory fake answers browse.

use std::fmt;

use crate::schema::{ContentItem, PostStatus};

/// Single `key:value` clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    Tag(String),
    Status(PostStatus),
    Ids(Vec<String>),
}

impl Clause {
    fn matches(&self, item: &ContentItem) -> bool {
        match self {
            Clause::Tag(slug) => item.has_tag(slug),
            Clause::Status(status) => item.status == *status,
            Clause::Ids(ids) => ids.iter().any(|id| *id == item.id),
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Tag(slug) => write!(f, "tag:{slug}"),
            Clause::Status(status) => write!(f, "status:{status}"),
            Clause::Ids(ids) => write!(f, "id:[{}]", ids.join(",")),
        }
    }
}

/// Conjunction of clauses; an empty filter matches everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    clauses: Vec<Clause>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tag(mut self, slug: &str) -> Self {
        self.clauses.push(Clause::Tag(slug.to_string()));
        self
    }

    pub fn status(mut self, status: PostStatus) -> Self {
        self.clauses.push(Clause::Status(status));
        self
    }

    pub fn ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.clauses
            .push(Clause::Ids(ids.into_iter().map(Into::into).collect()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn matches(&self, item: &ContentItem) -> bool {
        self.clauses.iter().all(|c| c.matches(item))
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str("+")?;
            }
            write!(f, "{clause}")?;
        }
        Ok(())
    }
}
