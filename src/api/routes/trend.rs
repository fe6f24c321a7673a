//! Trend Routes
//!
//! Daily female/male bars for the whole country or one department.
//!
//! - GET /api/v1/trend?metric=&region=&format= - Bar figure or rows

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::{csv_response, parse_format, parse_metric, EMPTY_SELECTION_MESSAGE};
use crate::api::dto::{OutputFormat, TrendParams, TrendRowsResponse};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::chart;
use crate::query::{Region, TrendQuery};

const TREND_CSV_HEADER: [&str; 3] = ["day", "sex", "value"];

/// GET /api/v1/trend
///
/// An absent or empty `region` is the nationwide aggregate. A department
/// without data yields the empty chart, not an error; its rows response
/// still names the requested region.
pub async fn trend_figure(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TrendParams>,
) -> ApiResult<Response> {
    let metric = parse_metric(params.metric.as_deref())?;
    let format = parse_format(params.format.as_deref())?;
    let region = params
        .region
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let query = TrendQuery { metric, region };

    let (rows, figure) = match query.execute(&state.dataset) {
        Ok(result) => (
            TrendRowsResponse::from_result(&result),
            chart::trend_bars(&result),
        ),
        Err(e) if e.is_empty_selection() => {
            tracing::debug!(%metric, region = ?query.region, "Trend selection is empty");
            let region = query.region.map(|code| Region {
                name: state
                    .dataset
                    .boundaries()
                    .name_of(&code)
                    .unwrap_or_default()
                    .to_string(),
                code,
            });
            (
                TrendRowsResponse {
                    metric,
                    region,
                    rows: Vec::new(),
                    row_count: 0,
                },
                chart::empty(EMPTY_SELECTION_MESSAGE),
            )
        }
        Err(e) => return Err(e.into()),
    };

    match format {
        OutputFormat::Chart => Ok(Json(figure).into_response()),
        OutputFormat::Json => Ok(Json(rows).into_response()),
        OutputFormat::Csv => csv_response(&rows.rows, &TREND_CSV_HEADER),
    }
}
