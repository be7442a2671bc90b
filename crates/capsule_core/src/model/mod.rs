//! Domain model for capsule records and persisted settings.
//!
//! # Invariants
//! - Records carry no identity; position in the log is their identity.
//! - Settings are scalar and independent of the record log.

pub mod record;
pub mod setting;
