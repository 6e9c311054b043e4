use chrono::NaiveDate;

use campsite_types::ContactDetails;

use crate::Database;
use crate::error::StoreError;
use crate::models::BookingRow;

/// The narrow repository interface batch jobs run against.
///
/// Implementations only need per-record atomicity; callers never assume a
/// transaction spans several calls.
pub trait BookingStore {
    /// Rows whose checkout is before `cutoff` or that store no checkout.
    /// May return more rows than are actually eligible; callers re-check.
    fn list_candidates(&self, cutoff: NaiveDate) -> Result<Vec<BookingRow>, StoreError>;

    /// Returns whether a row was removed.
    fn delete_by_id(&self, id: &str) -> Result<bool, StoreError>;

    /// Returns whether the stored contact fields changed.
    fn update_contact(&self, id: &str, contact: &ContactDetails) -> Result<bool, StoreError>;
}

impl BookingStore for Database {
    fn list_candidates(&self, cutoff: NaiveDate) -> Result<Vec<BookingRow>, StoreError> {
        self.list_bookings_before(cutoff)
            .map_err(StoreError::Unavailable)
    }

    fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        self.delete_booking(id).map_err(StoreError::Unavailable)
    }

    fn update_contact(&self, id: &str, contact: &ContactDetails) -> Result<bool, StoreError> {
        self.set_contact(id, contact).map_err(StoreError::Unavailable)
    }
}
