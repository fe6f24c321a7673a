//! API Routes
//!
//! Route handlers organized by functionality.

pub mod dashboard;
pub mod geojson;
pub mod health;
pub mod map;
pub mod options;
pub mod trend;

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::api::dto::OutputFormat;
use crate::api::error::{ApiError, ApiResult};
use crate::dataset::Metric;

/// Parse the `metric` parameter, defaulting to deaths
pub(crate) fn parse_metric(s: Option<&str>) -> ApiResult<Metric> {
    match s.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(Metric::default()),
        Some(s) => Ok(s.parse()?),
    }
}

/// Parse the `format` parameter, defaulting to chart
pub(crate) fn parse_format(s: Option<&str>) -> ApiResult<OutputFormat> {
    OutputFormat::parse(s).ok_or_else(|| {
        ApiError::Validation(format!(
            "Invalid format: {}. Use chart, json, or csv",
            s.unwrap_or_default()
        ))
    })
}

/// Serialize rows as a CSV response. `header` is written as-is when there
/// are no rows to derive it from.
pub(crate) fn csv_response<T: Serialize>(rows: &[T], header: &[&str]) -> ApiResult<Response> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if rows.is_empty() {
        writer
            .write_record(header)
            .map_err(|e| ApiError::Internal(format!("CSV encoding failed: {}", e)))?;
    }
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| ApiError::Internal(format!("CSV encoding failed: {}", e)))?;
    }
    let data = writer
        .into_inner()
        .map_err(|e| ApiError::Internal(format!("CSV encoding failed: {}", e)))?;

    Ok(([(header::CONTENT_TYPE, "text/csv")], data).into_response())
}

/// Message of the empty chart
pub(crate) const EMPTY_SELECTION_MESSAGE: &str = "No data for this selection";
