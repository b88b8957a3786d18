//! Postcycle Core Library
//!
//! Time-delayed lifecycle transitions for posts: select posts by tag, measure
//! how long ago they were published, and once a threshold has passed, update
//! them and optionally cascade into a republish or an announcement.
//!
//! Pipeline stages, leaf first:
//!
//! - [`elapsed`]: whole days since a reference timestamp
//! - [`eligibility`]: ready vs pending partition
//! - [`mutation`]: field assignment and tag swap
//! - [`announce`]: announcement derivation and publish-with-notification
//! - [`orchestrator`]: fetch → filter → mutate → cascade

pub mod announce;
pub mod clock;
pub mod criteria;
pub mod elapsed;
pub mod eligibility;
pub mod error;
pub mod mutation;
pub mod orchestrator;
pub mod telemetry;

pub use announce::{announcement_title, publish_with_notification, spawn_announcement};
pub use clock::{Clock, FixedClock, SystemClock};
pub use criteria::{SelectionCriteria, Variant};
pub use elapsed::elapsed_days;
pub use eligibility::{evaluate, select_eligible, Evaluation, Outcome, Selection};
pub use error::{PipelineError, Result};
pub use mutation::{apply_field_mutation, swap_tag, FieldValue};
pub use orchestrator::{Orchestrator, RunReport};
pub use telemetry::init_tracing;
