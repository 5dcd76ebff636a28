//! Store adapters for the two relational backends.
//!
//! Each adapter is an explicitly constructed handle around its own
//! `PgPool`, injected into the route layer through axum state; there are no
//! process-wide singletons. This gateway re-exports the handles so sibling
//! modules only ever import from here (EMBP).

mod sensors;
mod users;

// ---

pub use sensors::SensorStore;
pub use users::{ProfileSaveOutcome, UserStore};
