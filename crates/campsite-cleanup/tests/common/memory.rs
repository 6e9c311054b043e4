use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use chrono::NaiveDate;

use campsite_db::{BookingRow, BookingStore, StoreError};
use campsite_types::ContactDetails;

/// In-memory [`BookingStore`] that can be told to fail after a number of
/// successful mutations.
#[derive(Default)]
pub struct MemoryStore {
    rows: RefCell<BTreeMap<String, BookingRow>>,
    fail_after: Option<usize>,
    mutations: Cell<usize>,
    unreachable: bool,
}

impl MemoryStore {
    pub fn new(rows: impl IntoIterator<Item = BookingRow>) -> Self {
        Self {
            rows: RefCell::new(rows.into_iter().map(|r| (r.id.clone(), r)).collect()),
            ..Self::default()
        }
    }

    pub fn failing_after(mut self, mutations: usize) -> Self {
        self.fail_after = Some(mutations);
        self
    }

    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    pub fn get(&self, id: &str) -> Option<BookingRow> {
        self.rows.borrow().get(id).cloned()
    }

    pub fn list_all(&self) -> Vec<BookingRow> {
        self.rows.borrow().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.rows.borrow().len()
    }

    fn check_mutation(&self) -> Result<(), StoreError> {
        match self.fail_after {
            Some(limit) if self.mutations.get() >= limit => {
                return Err(StoreError::Unavailable(anyhow::anyhow!("disk I/O error")));
            }
            _ => {}
        }
        self.mutations.set(self.mutations.get() + 1);
        Ok(())
    }
}

impl BookingStore for MemoryStore {
    fn list_candidates(&self, cutoff: NaiveDate) -> Result<Vec<BookingRow>, StoreError> {
        if self.unreachable {
            return Err(StoreError::Unavailable(anyhow::anyhow!("unable to open database file")));
        }
        let cutoff = cutoff.format("%Y-%m-%d").to_string();
        Ok(self
            .rows
            .borrow()
            .values()
            .filter(|r| r.check_out.as_ref().is_none_or(|out| *out < cutoff))
            .cloned()
            .collect())
    }

    fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        self.check_mutation()?;
        Ok(self.rows.borrow_mut().remove(id).is_some())
    }

    fn update_contact(&self, id: &str, contact: &ContactDetails) -> Result<bool, StoreError> {
        self.check_mutation()?;
        let mut rows = self.rows.borrow_mut();
        let Some(row) = rows.get_mut(id) else {
            return Ok(false);
        };
        let before = row.clone();
        row.last_name = contact.last_name.clone();
        row.first_name = contact.first_name.clone();
        row.email = contact.email.clone();
        row.phone = contact.phone.clone();
        row.address = contact.address.clone();
        row.postal_code = contact.postal_code.clone();
        row.city = contact.city.clone();
        row.message = contact.message.clone();
        Ok(*row != before)
    }
}
