//! Ghost-Admin: content backend layer for postcycle
//!
//! This crate is the system-of-record collaborator for the lifecycle
//! pipeline. It models posts and tags, renders browse filters, and talks to
//! the Admin API over HTTP.
//!
//! ## Layer 0 - Backend
//!
//! Focus: faithful round-trip of post records and authenticated transport.
//!
//! ## Key Components
//!
//! - `ContentBackend`: browse/edit/add trait consumed by the pipeline
//! - `AdminApiClient`: HTTP implementation with admin token signing
//! - `fakes::MemoryBackend`: in-memory implementation for tests

mod backend;
mod client;
mod error;
pub mod fakes;
mod filter;
mod schema;
mod token;

pub use backend::{BackendResult, ContentBackend};
pub use client::{notification_query, AdminApiClient, AdminApiConfig};
pub use error::BackendError;
pub use filter::{Clause, Filter};
pub use schema::{ContentItem, NotificationDirective, PostDraft, PostStatus, SourceFormat, Tag};
pub use token::{AdminClaims, AdminKey, ADMIN_AUDIENCE, TOKEN_TTL_SECS};
