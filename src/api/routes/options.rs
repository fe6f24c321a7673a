//! Options Routes
//!
//! - GET /api/v1/options - Metric choices, date bounds and departments for the controls

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::{DepartmentDto, MetricOption, OptionsResponse, SexColor};
use crate::api::state::AppState;
use crate::chart;
use crate::config::DATA_SOURCE_PAGE;
use crate::dataset::Metric;

/// GET /api/v1/options
pub async fn dashboard_options(State(state): State<Arc<AppState>>) -> Json<OptionsResponse> {
    let dataset = &state.dataset;

    let metrics = Metric::ALL
        .iter()
        .map(|&m| MetricOption {
            value: m,
            label: m.label().to_string(),
        })
        .collect();

    let departments = dataset
        .departments()
        .into_iter()
        .map(|(code, name)| DepartmentDto {
            code: code.to_string(),
            name: name.to_string(),
        })
        .collect();

    let sex_colors = chart::legend_colors()
        .into_iter()
        .map(|(sex, color)| SexColor {
            sex: sex.to_string(),
            color: color.to_string(),
        })
        .collect();

    Json(OptionsResponse {
        metrics,
        default_metric: Metric::default(),
        first_day: dataset.first_day(),
        last_day: dataset.last_day(),
        date_display_format: "DD-MM-YYYY".to_string(),
        departments,
        sex_colors,
        source_url: DATA_SOURCE_PAGE.to_string(),
    })
}
