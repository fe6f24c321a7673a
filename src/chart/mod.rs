//! Chart Specifications
//!
//! Builds plotly-compatible figure descriptions (`data` + `layout`) from
//! query results. The browser only renders what it receives.

use serde::Serialize;
use serde_json::{json, Value};

use crate::dataset::Sex;
use crate::query::{MapResult, TrendResult};

/// Where the browser fetches the department boundaries from
pub const GEOJSON_URL: &str = "/api/v1/geojson";

/// Choropleth colour scale: white → red → black
const COLOR_SCALE: [(f64, &str); 3] = [(0.0, "white"), (0.5, "red"), (1.0, "black")];

const BACKGROUND: &str = "rgb(17,17,17)";
const FOREGROUND: &str = "#f2f5fa";
const GRID: &str = "#283442";

/// A complete figure as consumed by `Plotly.react`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Value>,
    pub layout: Value,
}

impl Figure {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

fn dark_layout() -> Value {
    json!({
        "paper_bgcolor": BACKGROUND,
        "plot_bgcolor": BACKGROUND,
        "font": { "color": FOREGROUND },
    })
}

fn merge(base: &mut Value, extra: Value) {
    if let (Some(base), Value::Object(extra)) = (base.as_object_mut(), extra) {
        base.extend(extra);
    }
}

/// Choropleth of one metric on one day
pub fn choropleth(result: &MapResult) -> Figure {
    let locations: Vec<&str> = result.points.iter().map(|p| p.code.as_str()).collect();
    let values: Vec<u64> = result.points.iter().map(|p| p.value).collect();
    let names: Vec<&str> = result.points.iter().map(|p| p.name.as_str()).collect();
    let scale: Vec<Value> = COLOR_SCALE.iter().map(|(at, c)| json!([at, c])).collect();

    let trace = json!({
        "type": "choropleth",
        "geojson": GEOJSON_URL,
        "featureidkey": "properties.code",
        "locations": locations,
        "z": values,
        "text": names,
        "hovertemplate": "<b>%{text}</b><br>%{location}<br>%{z}<extra></extra>",
        "colorscale": scale,
        "colorbar": { "title": { "text": result.metric.as_str() } },
        "marker": { "line": { "color": GRID, "width": 0.5 } },
    });

    let mut layout = dark_layout();
    merge(
        &mut layout,
        json!({
            "geo": {
                "fitbounds": "locations",
                "visible": false,
                "projection": { "type": "mercator" },
                "bgcolor": BACKGROUND,
            },
            "margin": { "r": 10, "t": 0, "l": 0, "b": 0 },
            "clickmode": "event+select",
        }),
    );

    Figure {
        data: vec![trace],
        layout,
    }
}

/// Stacked bars of one metric per day, one trace per sex
pub fn trend_bars(result: &TrendResult) -> Figure {
    let data: Vec<Value> = result
        .series
        .iter()
        .map(|series| {
            let days: Vec<String> = series.points.iter().map(|p| p.day.to_string()).collect();
            let values: Vec<u64> = series.points.iter().map(|p| p.value).collect();
            json!({
                "type": "bar",
                "name": series.sex.as_str(),
                "x": days,
                "y": values,
                "marker": { "color": series.sex.color() },
            })
        })
        .collect();

    let title = match &result.region {
        Some(region) => format!("{} ({})", region.name, region.code),
        None => "France".to_string(),
    };

    let mut layout = dark_layout();
    merge(
        &mut layout,
        json!({
            "title": { "text": title },
            "barmode": "relative",
            "legend": { "title": { "text": "sex" }, "traceorder": "normal" },
            "xaxis": { "title": { "text": "day" }, "gridcolor": GRID },
            "yaxis": { "title": { "text": result.metric.as_str() }, "gridcolor": GRID },
        }),
    );

    Figure { data, layout }
}

/// Figure with no traces, shown when a selection has no data
pub fn empty(message: &str) -> Figure {
    let mut layout = dark_layout();
    merge(
        &mut layout,
        json!({
            "xaxis": { "visible": false },
            "yaxis": { "visible": false },
            "annotations": [{
                "text": message,
                "showarrow": false,
                "xref": "paper",
                "yref": "paper",
                "x": 0.5,
                "y": 0.5,
                "font": { "size": 16 },
            }],
        }),
    );

    Figure {
        data: Vec::new(),
        layout,
    }
}

/// Colour of each trend trace, in trace order
pub fn legend_colors() -> Vec<(&'static str, &'static str)> {
    Sex::PRESENTATION_ORDER
        .iter()
        .map(|s| (s.as_str(), s.color()))
        .collect()
}
