//! Dashboard Queries
//!
//! Read-only queries over the immutable `Dataset`:
//!
//! - **MapQuery**: one value per department for a metric on a day (choropleth)
//! - **TrendQuery**: daily female/male values, national or per department (bar chart)
//! - **Selection**: the dashboard's input state, driving both queries
//!
//! # Examples
//!
//! ```rust,ignore
//! use hospimap::query::{MapQuery, TrendQuery};
//! use hospimap::dataset::Metric;
//!
//! let map = MapQuery::new(Metric::Deaths, dataset.last_day()).execute(&dataset)?;
//! let national = TrendQuery::national(Metric::Hospitalised).execute(&dataset)?;
//! let paris = TrendQuery::department(Metric::Hospitalised, "75").execute(&dataset)?;
//! ```
//!
//! A query over a day or department without rows returns
//! `DataError::EmptySelection`; callers render an empty chart for it.

mod map;
mod selection;
mod trend;

pub use map::{MapPoint, MapQuery, MapResult};
pub use selection::Selection;
pub use trend::{Region, TrendPoint, TrendQuery, TrendResult, TrendSeries};
