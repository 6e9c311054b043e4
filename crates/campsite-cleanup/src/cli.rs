//! Command-line surface of `clean-old-bookings`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use tracing::info;

use campsite_db::Database;

use crate::cleanup::{CleanupMode, CleanupReport, run_cleanup};
use crate::policy::{DEFAULT_RETENTION_DAYS, RetentionPolicy};

#[derive(Debug, Parser)]
#[command(
    name = "clean-old-bookings",
    about = "Delete or anonymize bookings older than the retention window",
    long_about = None
)]
pub struct Cli {
    /// Blank guest contact details instead of deleting the bookings
    #[arg(long)]
    pub anonymize: bool,

    /// Retention window in days
    #[arg(
        long,
        env = "CAMPSITE_RETENTION_DAYS",
        default_value_t = DEFAULT_RETENTION_DAYS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub retention_days: u32,

    /// Evaluate retention as of this RFC 3339 instant instead of now
    #[arg(long)]
    pub now: Option<DateTime<Utc>>,

    /// SQLite database holding the bookings
    #[arg(long, env = "CAMPSITE_DB_PATH", default_value = "campsite.db")]
    pub database: PathBuf,
}

impl Cli {
    pub fn mode(&self) -> CleanupMode {
        if self.anonymize {
            CleanupMode::Anonymize
        } else {
            CleanupMode::Delete
        }
    }

    pub fn policy(&self) -> RetentionPolicy {
        RetentionPolicy::days(self.retention_days)
    }
}

/// Open the database named on the command line and clean it up.
pub fn run(cli: &Cli) -> Result<CleanupReport> {
    let mode = cli.mode();
    let now = cli.now.unwrap_or_else(Utc::now);

    info!(
        "Retention: {} days, mode: {}, database: {}",
        cli.retention_days,
        mode,
        cli.database.display()
    );

    let db = Database::open_existing(&cli.database).context("booking store unavailable")?;
    let report = run_cleanup(&db, &cli.policy(), mode, now)?;
    Ok(report)
}
