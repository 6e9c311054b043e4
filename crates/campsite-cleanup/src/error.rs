use thiserror::Error;

use campsite_db::StoreError;

#[derive(Debug, Error)]
pub enum CleanupError {
    /// The store failed. `processed` records were already deleted or
    /// anonymized and stay that way.
    #[error("cleanup aborted after {processed} booking(s)")]
    Store {
        processed: usize,
        #[source]
        source: StoreError,
    },
}

impl CleanupError {
    pub fn processed(&self) -> usize {
        match self {
            CleanupError::Store { processed, .. } => *processed,
        }
    }
}
