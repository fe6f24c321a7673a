//! Lookup indexes over the immutable record table
//!
//! Built once next to the records. Both maps hold positions into the
//! record vector, which is sorted by (day, code, sex), so every position
//! list comes out already ordered.
//!
//! # Performance
//! - Map lookup (one day): O(log d + k) where k = departments
//! - Department lookup: O(1) + O(k) where k = rows of the department

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

use super::types::{DepartmentRecord, Sex};

#[derive(Debug, Clone, Default)]
pub struct DatasetIndex {
    /// Positions of the `all`-sex rows per day, ordered by department code
    by_day: BTreeMap<NaiveDate, Vec<usize>>,
    /// Positions of every row of a department, ordered by day then sex
    by_department: HashMap<String, Vec<usize>>,
}

impl DatasetIndex {
    /// Index records sorted by (day, code, sex)
    pub fn build(records: &[DepartmentRecord]) -> Self {
        let mut index = Self::default();

        for (pos, record) in records.iter().enumerate() {
            if record.sex == Sex::All {
                index.by_day.entry(record.day).or_default().push(pos);
            }
            index
                .by_department
                .entry(record.code.clone())
                .or_default()
                .push(pos);
        }

        index
    }

    pub fn day(&self, day: NaiveDate) -> &[usize] {
        self.by_day.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn department(&self, code: &str) -> &[usize] {
        self.by_department
            .get(code)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn day_count(&self) -> usize {
        self.by_day.len()
    }

    pub fn department_count(&self) -> usize {
        self.by_department.len()
    }
}
