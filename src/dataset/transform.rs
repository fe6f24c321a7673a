//! Data Transformer
//!
//! Turns raw feed records into the two derived tables. Steps run in a fixed
//! order because each relies on what the previous one guarantees:
//!
//! ```text
//!   drop incomplete → parse day → drop overseas
//!     → resolve name → recode sex → national totals
//! ```

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};

use super::error::{DataError, DataResult};
use super::types::{Counts, DepartmentRecord, NationalAggregate, Sex};
use crate::loader::{Boundaries, RawRecord};

/// Length of a metropolitan department code
pub const DEPARTMENT_CODE_LEN: usize = 2;

/// A raw record with every field present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteRow {
    pub line: u64,
    pub department: String,
    pub sex_code: u8,
    pub day: String,
    pub counts: Counts,
}

/// Row counts observed while transforming
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformStats {
    pub rows_read: usize,
    pub dropped_incomplete: usize,
    pub dropped_overseas: usize,
    pub rows_kept: usize,
    pub national_rows: usize,
}

impl std::fmt::Display for TransformStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "read={}, dropped_incomplete={}, dropped_overseas={}, kept={}, national={}",
            self.rows_read,
            self.dropped_incomplete,
            self.dropped_overseas,
            self.rows_kept,
            self.national_rows
        )
    }
}

/// Both derived tables plus the day bounds
#[derive(Debug, Clone)]
pub struct TransformOutput {
    pub records: Vec<DepartmentRecord>,
    pub national: Vec<NationalAggregate>,
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
    pub stats: TransformStats,
}

/// Step 1: keep only records with no missing value in any column
pub fn drop_incomplete(records: Vec<RawRecord>) -> Vec<CompleteRow> {
    records
        .into_iter()
        .filter_map(|r| {
            if r.extra_missing {
                return None;
            }
            Some(CompleteRow {
                line: r.line,
                department: r.department?,
                sex_code: r.sex_code?,
                day: r.day?,
                counts: Counts::new(
                    r.hospitalised?,
                    r.intensive_care?,
                    r.discharged?,
                    r.deaths?,
                ),
            })
        })
        .collect()
}

/// Step 2: parse a day in `YYYY-MM-DD` (has a hyphen) or `DD/MM/YYYY`
pub fn format_date(date_str: &str) -> DataResult<NaiveDate> {
    let date_str = date_str.trim();
    let format = if date_str.contains('-') {
        "%Y-%m-%d"
    } else {
        "%d/%m/%Y"
    };

    NaiveDate::parse_from_str(date_str, format)
        .map_err(|_| DataError::DateFormat(date_str.to_string()))
}

/// Step 3: overseas territories use 3-character codes
pub fn is_metropolitan(code: &str) -> bool {
    code.chars().count() == DEPARTMENT_CODE_LEN
}

/// Step 6: sum department rows per (day, sex)
///
/// Output is ordered by day, then sex. A sum that does not fit in a `u64`
/// is a parse error.
pub fn national_totals(records: &[DepartmentRecord]) -> DataResult<Vec<NationalAggregate>> {
    let mut totals: BTreeMap<(NaiveDate, Sex), Counts> = BTreeMap::new();

    for record in records {
        let total = totals.entry((record.day, record.sex)).or_default();
        *total = total.checked_add(&record.counts).ok_or_else(|| {
            DataError::Parse(format!(
                "National total overflows on {} ({}) at department {}",
                record.day, record.sex, record.code
            ))
        })?;
    }

    Ok(totals
        .into_iter()
        .map(|((day, sex), counts)| NationalAggregate { day, sex, counts })
        .collect())
}

/// Run every step over the raw records
pub fn transform(raw: Vec<RawRecord>, boundaries: &Boundaries) -> DataResult<TransformOutput> {
    let mut stats = TransformStats {
        rows_read: raw.len(),
        ..Default::default()
    };

    let complete = drop_incomplete(raw);
    stats.dropped_incomplete = stats.rows_read - complete.len();

    let mut dated = Vec::with_capacity(complete.len());
    for row in complete {
        let day = format_date(&row.day)?;
        dated.push((row, day));
    }

    let before_filter = dated.len();
    dated.retain(|(row, _)| is_metropolitan(&row.department));
    stats.dropped_overseas = before_filter - dated.len();

    let mut seen = HashSet::with_capacity(dated.len());
    let mut records = Vec::with_capacity(dated.len());
    for (row, day) in dated {
        let name = boundaries.name_of(&row.department)?.to_string();
        let sex = Sex::from_code(row.sex_code)?;

        if !seen.insert((row.department.clone(), sex, day)) {
            return Err(DataError::DuplicateRecord {
                code: row.department,
                sex: sex.to_string(),
                day,
            });
        }

        records.push(DepartmentRecord {
            code: row.department,
            name,
            sex,
            day,
            counts: row.counts,
        });
    }

    records.sort_by(|a, b| (a.day, &a.code, a.sex).cmp(&(b.day, &b.code, b.sex)));
    stats.rows_kept = records.len();

    let (first_day, last_day) = match (records.first(), records.last()) {
        (Some(first), Some(last)) => (first.day, last.day),
        _ => {
            return Err(DataError::EmptySelection(
                "no usable rows in the hospital data".to_string(),
            ))
        }
    };

    let national = national_totals(&records)?;
    stats.national_rows = national.len();

    tracing::info!("Transformed hospital data: {}", stats);

    Ok(TransformOutput {
        records,
        national,
        first_day,
        last_day,
        stats,
    })
}
