//! Map Routes
//!
//! Choropleth of one metric on one day.
//!
//! - GET /api/v1/map?metric=&date=&format= - Map figure or rows

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::{csv_response, parse_format, parse_metric, EMPTY_SELECTION_MESSAGE};
use crate::api::dto::{MapParams, MapRowsResponse, OutputFormat};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::chart;
use crate::dataset::format_date;
use crate::query::{MapPoint, MapQuery};

const MAP_CSV_HEADER: [&str; 3] = ["code", "name", "value"];

/// GET /api/v1/map
///
/// Missing `metric` means deaths, missing `date` means the last day.
/// A day without data yields the empty chart, not an error.
pub async fn map_figure(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MapParams>,
) -> ApiResult<Response> {
    let metric = parse_metric(params.metric.as_deref())?;
    let format = parse_format(params.format.as_deref())?;

    let dataset = &state.dataset;
    let date = match params.date.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => format_date(s)?,
        None => dataset.last_day(),
    };

    let (rows, figure) = match MapQuery::new(metric, date).execute(dataset) {
        Ok(result) => {
            let figure = chart::choropleth(&result);
            (result.points, figure)
        }
        Err(e) if e.is_empty_selection() => {
            tracing::debug!(%metric, %date, "Map selection is empty");
            (Vec::<MapPoint>::new(), chart::empty(EMPTY_SELECTION_MESSAGE))
        }
        Err(e) => return Err(e.into()),
    };

    match format {
        OutputFormat::Chart => Ok(Json(figure).into_response()),
        OutputFormat::Json => Ok(Json(MapRowsResponse {
            metric,
            date,
            row_count: rows.len(),
            rows,
        })
        .into_response()),
        OutputFormat::Csv => csv_response(&rows, &MAP_CSV_HEADER),
    }
}
