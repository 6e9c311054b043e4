use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use campsite_db::BookingStore;
use campsite_types::ContactDetails;

use crate::error::CleanupError;
use crate::policy::RetentionPolicy;

/// What to do with a booking past retention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CleanupMode {
    #[default]
    Delete,
    /// Blank the contact fields and keep the rest of the record.
    Anonymize,
}

impl fmt::Display for CleanupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CleanupMode::Delete => f.write_str("delete"),
            CleanupMode::Anonymize => f.write_str("anonymize"),
        }
    }
}

impl FromStr for CleanupMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "delete" => Ok(CleanupMode::Delete),
            "anonymize" => Ok(CleanupMode::Anonymize),
            other => Err(format!("unknown cleanup mode '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    pub mode: CleanupMode,
    pub cutoff: DateTime<Utc>,
    /// Records actually deleted or changed.
    pub affected: usize,
    /// Stored rows that failed to decode and were left alone.
    pub skipped: usize,
}

impl fmt::Display for CleanupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.mode {
            CleanupMode::Delete => "deleted",
            CleanupMode::Anonymize => "anonymized",
        };
        write!(
            f,
            "{} booking(s) {} (cutoff {})",
            self.affected,
            verb,
            self.cutoff.date_naive()
        )?;
        if self.skipped > 0 {
            write!(f, ", {} invalid record(s) skipped", self.skipped)?;
        }
        Ok(())
    }
}

/// Delete or anonymize every booking `policy` considers expired at `now`.
///
/// Each record is mutated independently. A store failure stops the batch
/// and reports how many records were already processed; rerunning picks up
/// where it stopped.
pub fn run_cleanup<S>(
    store: &S,
    policy: &RetentionPolicy,
    mode: CleanupMode,
    now: DateTime<Utc>,
) -> Result<CleanupReport, CleanupError>
where
    S: BookingStore + ?Sized,
{
    let cutoff = policy.cutoff(now);
    let candidates = store
        .list_candidates(policy.cutoff_date(now))
        .map_err(|source| CleanupError::Store {
            processed: 0,
            source,
        })?;

    debug!(candidates = candidates.len(), %cutoff, %mode, "Scanning bookings");

    let mut affected = 0;
    let mut skipped = 0;

    for row in candidates {
        let record = match row.into_record() {
            Ok(record) => record,
            Err(invalid) => {
                warn!("Skipping {}", invalid);
                skipped += 1;
                continue;
            }
        };

        if !policy.is_eligible(now, &record) {
            continue;
        }

        let id = record.id.to_string();
        let changed = match mode {
            CleanupMode::Delete => store.delete_by_id(&id),
            CleanupMode::Anonymize if record.contact.is_blank() => Ok(false),
            CleanupMode::Anonymize => store.update_contact(&id, &ContactDetails::blank()),
        }
        .map_err(|source| CleanupError::Store {
            processed: affected,
            source,
        })?;

        if changed {
            affected += 1;
        }
    }

    info!(affected, skipped, %mode, "Booking cleanup finished");

    Ok(CleanupReport {
        mode,
        cutoff,
        affected,
        skipped,
    })
}
