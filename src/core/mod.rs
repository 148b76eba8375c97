//! Core session types and logic.
//!
//! This module contains the pure core of a datasource session:
//! - Records via the `Record` trait
//! - Update modes and the guards that govern them
//! - The serializable session snapshot
//! - Immutable mode history
//!
//! Nothing in this module performs I/O; the session layer drives it.

mod guard;
mod history;
mod mode;
mod record;
mod snapshot;

pub use guard::{Action, ModeRequirement, Rejection};
pub use history::{ModeHistory, ModeTransition};
pub use mode::UpdateMode;
pub use record::{validate_fields, DynRecord, FieldError, Record};
pub use snapshot::DatasourceState;
