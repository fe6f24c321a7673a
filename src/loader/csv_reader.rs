//! Hospital CSV Reader
//!
//! Parses the semicolon-delimited feed into `RawRecord`s. Columns are
//! located by header name so column order and extra columns in the feed
//! do not matter.

use crate::dataset::{DataError, DataResult};

/// Required header names in the feed
pub const COL_DEPARTMENT: &str = "dep";
pub const COL_SEX: &str = "sexe";
pub const COL_DAY: &str = "jour";
pub const COL_HOSPITALISED: &str = "hosp";
pub const COL_INTENSIVE_CARE: &str = "rea";
pub const COL_DISCHARGED: &str = "rad";
pub const COL_DEATHS: &str = "dc";

/// One line of the feed, before any cleaning
///
/// A `None` field is a missing value (empty cell, `NA` or `NaN`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based line number in the source, header included
    pub line: u64,
    pub department: Option<String>,
    pub sex_code: Option<u8>,
    pub day: Option<String>,
    pub hospitalised: Option<u64>,
    pub intensive_care: Option<u64>,
    pub discharged: Option<u64>,
    pub deaths: Option<u64>,
    /// A column not used for values had a missing cell
    pub extra_missing: bool,
}

/// 2^64: floats at or above it do not fit in a count
const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;

/// Positions of the required columns in a header row
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    department: usize,
    sex: usize,
    day: usize,
    hospitalised: usize,
    intensive_care: usize,
    discharged: usize,
    deaths: usize,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> DataResult<Self> {
        let names: Vec<String> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let find = |name: &str| -> DataResult<usize> {
            names
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DataError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            department: find(COL_DEPARTMENT)?,
            sex: find(COL_SEX)?,
            day: find(COL_DAY)?,
            hospitalised: find(COL_HOSPITALISED)?,
            intensive_care: find(COL_INTENSIVE_CARE)?,
            discharged: find(COL_DISCHARGED)?,
            deaths: find(COL_DEATHS)?,
        })
    }

    fn is_value_column(&self, idx: usize) -> bool {
        [
            self.department,
            self.sex,
            self.day,
            self.hospitalised,
            self.intensive_care,
            self.discharged,
            self.deaths,
        ]
        .contains(&idx)
    }
}

fn is_missing(field: &str) -> bool {
    let field = field.trim();
    field.is_empty() || field.eq_ignore_ascii_case("na") || field.eq_ignore_ascii_case("nan")
}

fn text_field(record: &csv::StringRecord, idx: usize) -> Option<String> {
    record
        .get(idx)
        .filter(|f| !is_missing(f))
        .map(|f| f.trim().to_string())
}

/// Parse a count. Integral floats ("12.0") are accepted.
fn count_field(
    record: &csv::StringRecord,
    idx: usize,
    column: &str,
    line: u64,
) -> DataResult<Option<u64>> {
    let raw = match record.get(idx).filter(|f| !is_missing(f)) {
        Some(f) => f.trim(),
        None => return Ok(None),
    };

    if let Ok(value) = raw.parse::<u64>() {
        return Ok(Some(value));
    }

    match raw.parse::<f64>() {
        Ok(value)
            if value.is_finite() && value >= 0.0 && value < U64_LIMIT && value.fract() == 0.0 =>
        {
            Ok(Some(value as u64))
        }
        _ => Err(DataError::Parse(format!(
            "Line {}: invalid count in column {}: {:?}",
            line, column, raw
        ))),
    }
}

fn sex_field(record: &csv::StringRecord, idx: usize, line: u64) -> DataResult<Option<u8>> {
    match count_field(record, idx, COL_SEX, line)? {
        None => Ok(None),
        Some(code) => u8::try_from(code).map(Some).map_err(|_| {
            DataError::Parse(format!("Line {}: sex code out of range: {}", line, code))
        }),
    }
}

/// Read all records from a semicolon-delimited CSV document
pub fn read_records(data: &[u8]) -> DataResult<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let columns = ColumnMap::from_headers(&headers)?;
    let width = headers.len();

    let mut records = Vec::new();

    for (line_num, result) in reader.records().enumerate() {
        let line = line_num as u64 + 2;
        let record = result?;

        // Short lines are missing their trailing cells
        let extra_missing = record.len() < width
            || record
                .iter()
                .enumerate()
                .any(|(idx, field)| !columns.is_value_column(idx) && is_missing(field));

        records.push(RawRecord {
            line,
            department: text_field(&record, columns.department),
            sex_code: sex_field(&record, columns.sex, line)?,
            day: text_field(&record, columns.day),
            hospitalised: count_field(&record, columns.hospitalised, COL_HOSPITALISED, line)?,
            intensive_care: count_field(
                &record,
                columns.intensive_care,
                COL_INTENSIVE_CARE,
                line,
            )?,
            discharged: count_field(&record, columns.discharged, COL_DISCHARGED, line)?,
            deaths: count_field(&record, columns.deaths, COL_DEATHS, line)?,
            extra_missing,
        });
    }

    tracing::debug!("Read {} raw records ({} columns)", records.len(), width);

    Ok(records)
}
