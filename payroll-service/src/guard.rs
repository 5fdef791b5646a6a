//! Duplicate guard: at most one time record per employee per work date.
//!
//! The guard works on a snapshot read from the store. Nothing in the store
//! enforces uniqueness, so a writer that slips in between the read and the
//! create is not caught.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::models::TimeRecord;

#[derive(Debug, Clone, Default)]
pub struct DuplicateGuard {
    taken: HashSet<(String, NaiveDate)>,
}

impl DuplicateGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the guard with records that already exist
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a TimeRecord>) -> Self {
        let taken = records
            .into_iter()
            .map(|r| (r.employee_id.clone(), r.work_date))
            .collect();
        Self { taken }
    }

    pub fn contains(&self, employee_id: &str, work_date: NaiveDate) -> bool {
        self.taken.contains(&(employee_id.to_string(), work_date))
    }

    /// Reserve the slot. Returns `false` if it was already taken.
    pub fn claim(&mut self, employee_id: &str, work_date: NaiveDate) -> bool {
        self.taken.insert((employee_id.to_string(), work_date))
    }

    pub fn len(&self) -> usize {
        self.taken.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }
}
