//! Retention cleanup for campsite bookings.
//!
//! `policy` decides which bookings are past retention; `cleanup` deletes or
//! anonymizes them through any [`campsite_db::BookingStore`]. `cli` is the
//! `clean-old-bookings` command line on top of both.

pub mod cleanup;
pub mod cli;
pub mod error;
pub mod policy;

pub use cleanup::{CleanupMode, CleanupReport, run_cleanup};
pub use error::CleanupError;
pub use policy::{DEFAULT_RETENTION_DAYS, RetentionPolicy};
