//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::dataset::{Metric, Sex};
use crate::query::{MapPoint, Region, TrendResult};

// ============================================
// QUERY PARAMETERS
// ============================================

/// Query string of `GET /api/v1/map`
#[derive(Debug, Default, Deserialize)]
pub struct MapParams {
    /// Metric name, defaults to deaths
    #[serde(default)]
    pub metric: Option<String>,
    /// Day as `YYYY-MM-DD` or `DD/MM/YYYY`, defaults to the last day
    #[serde(default)]
    pub date: Option<String>,
    /// Output format: chart, json, csv
    #[serde(default)]
    pub format: Option<String>,
}

/// Query string of `GET /api/v1/trend`
#[derive(Debug, Default, Deserialize)]
pub struct TrendParams {
    #[serde(default)]
    pub metric: Option<String>,
    /// Department code; absent or empty means nationwide
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
}

/// Representation of a query result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Plotly figure
    #[default]
    Chart,
    /// Raw query rows
    Json,
    Csv,
}

impl OutputFormat {
    pub fn parse(s: Option<&str>) -> Option<Self> {
        match s.map(|s| s.trim().to_lowercase()).as_deref() {
            None | Some("") | Some("chart") => Some(OutputFormat::Chart),
            Some("json") => Some(OutputFormat::Json),
            Some("csv") => Some(OutputFormat::Csv),
            _ => None,
        }
    }
}

// ============================================
// QUERY RESPONSES
// ============================================

/// Map query rows (`format=json`)
#[derive(Debug, Serialize)]
pub struct MapRowsResponse {
    pub metric: Metric,
    pub date: NaiveDate,
    pub rows: Vec<MapPoint>,
    pub row_count: usize,
}

/// Single row of a trend result
#[derive(Debug, Clone, Serialize)]
pub struct TrendRow {
    pub day: NaiveDate,
    pub sex: Sex,
    pub value: u64,
}

/// Trend query rows (`format=json`), female rows first
#[derive(Debug, Serialize)]
pub struct TrendRowsResponse {
    pub metric: Metric,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
    pub rows: Vec<TrendRow>,
    pub row_count: usize,
}

impl TrendRowsResponse {
    pub fn from_result(result: &TrendResult) -> Self {
        let rows: Vec<TrendRow> = result
            .series
            .iter()
            .flat_map(|series| {
                series.points.iter().map(move |p| TrendRow {
                    day: p.day,
                    sex: series.sex,
                    value: p.value,
                })
            })
            .collect();

        Self {
            metric: result.metric,
            region: result.region.clone(),
            row_count: rows.len(),
            rows,
        }
    }
}

// ============================================
// DASHBOARD OPTIONS
// ============================================

/// Entry of the metric dropdown
#[derive(Debug, Serialize)]
pub struct MetricOption {
    pub value: Metric,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct DepartmentDto {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct SexColor {
    pub sex: String,
    pub color: String,
}

/// Everything the dashboard needs to build its controls
#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub metrics: Vec<MetricOption>,
    pub default_metric: Metric,
    /// Date picker lower bound
    pub first_day: NaiveDate,
    /// Date picker upper bound and initial value
    pub last_day: NaiveDate,
    pub date_display_format: String,
    pub departments: Vec<DepartmentDto>,
    pub sex_colors: Vec<SexColor>,
    pub source_url: String,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy, degraded
    pub status: String,
    /// Dataset summary
    pub dataset: DatasetStatus,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct DatasetStatus {
    pub records: usize,
    pub national_rows: usize,
    pub departments: usize,
    pub days: usize,
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
    pub dropped_incomplete: usize,
    pub dropped_overseas: usize,
    pub loaded_at: DateTime<Utc>,
}
