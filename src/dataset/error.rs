//! Dataset error types
//!
//! Defines all errors that can occur while loading, transforming and
//! querying the hospital dataset.

use thiserror::Error;

/// Errors that can occur in the data pipeline
#[derive(Error, Debug)]
pub enum DataError {
    /// Network fetch failed or local file is missing
    #[error("Source unavailable: {source_name}: {reason}")]
    SourceUnavailable { source_name: String, reason: String },

    /// Malformed CSV or JSON
    #[error("Parse error: {0}")]
    Parse(String),

    /// A required CSV column is absent from the header row
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Day field matches neither `YYYY-MM-DD` nor `DD/MM/YYYY`
    #[error("Unrecognized date format: {0:?}")]
    DateFormat(String),

    /// Department code has no match in the boundary file
    #[error("Unknown department code: {0}")]
    UnknownDepartmentCode(String),

    /// Sex code outside {0, 1, 2}
    #[error("Unknown sex code: {0}")]
    UnknownSexCode(u8),

    /// Metric name not one of the four hospital counts
    #[error("Invalid metric: {0}. Use hospitalised, intensive-care, discharged, or deaths")]
    InvalidMetric(String),

    /// Two rows share the same department, sex category and day
    #[error("Duplicate record for department {code}, sex {sex}, day {day}")]
    DuplicateRecord {
        code: String,
        sex: String,
        day: chrono::NaiveDate,
    },

    /// Query or input produced no rows
    #[error("Empty selection: {0}")]
    EmptySelection(String),
}

impl DataError {
    pub fn unavailable(source_name: impl Into<String>, reason: impl ToString) -> Self {
        DataError::SourceUnavailable {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    /// True for errors a query may legitimately return after startup
    pub fn is_empty_selection(&self) -> bool {
        matches!(self, DataError::EmptySelection(_))
    }
}

impl From<csv::Error> for DataError {
    fn from(err: csv::Error) -> Self {
        DataError::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::Parse(err.to_string())
    }
}

/// Result type alias for dataset operations
pub type DataResult<T> = Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DataError::UnknownDepartmentCode("99".to_string());
        assert_eq!(err.to_string(), "Unknown department code: 99");

        let err = DataError::DateFormat("2020/03/18".to_string());
        assert_eq!(err.to_string(), "Unrecognized date format: \"2020/03/18\"");

        let err = DataError::unavailable("geoJson/map.json", "No such file");
        assert_eq!(
            err.to_string(),
            "Source unavailable: geoJson/map.json: No such file"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: DataError = json_err.into();
        assert!(matches!(err, DataError::Parse(_)));
        assert!(!err.is_empty_selection());
    }
}
