use thiserror::Error;

/// Errors surfaced through the [`BookingStore`](crate::BookingStore) interface.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying database could not be reached or a statement failed.
    #[error("booking store unavailable: {0:#}")]
    Unavailable(anyhow::Error),

    #[error(transparent)]
    InvalidRecord(#[from] InvalidRecord),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Unavailable(e.into())
    }
}

/// A stored row that does not satisfy the booking invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid booking record '{id}': {reason}")]
pub struct InvalidRecord {
    pub id: String,
    pub reason: String,
}

impl InvalidRecord {
    pub fn new(id: &str, reason: impl std::fmt::Display) -> Self {
        Self {
            id: id.to_string(),
            reason: reason.to_string(),
        }
    }
}
