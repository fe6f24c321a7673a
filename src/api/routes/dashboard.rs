//! Dashboard Route
//!
//! - GET / - Single-page dashboard (metric dropdown, date picker, map, bar chart)

use axum::response::Html;

const DASHBOARD_HTML: &str = include_str!("../../../static/index.html");

/// GET /
pub async fn index() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}
