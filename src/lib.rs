//! # Hospimap
//!
//! Dashboard of French COVID-19 hospital data: a choropleth of departments
//! and a female/male bar chart, served from tables built once at startup.
//!
//! ## Modules
//!
//! - [`loader`]: Fetches the CSV feed and the department GeoJSON
//! - [`dataset`]: Cleaning pipeline and the immutable `Dataset`
//! - [`query`]: Map and trend queries, dashboard selection state
//! - [`chart`]: Plotly figure specifications
//! - [`api`]: HTTP server with Axum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hospimap::config::SourceConfig;
//! use hospimap::dataset::{Dataset, Metric};
//! use hospimap::query::{MapQuery, TrendQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Fetch and clean the data
//!     let dataset = Dataset::load(&SourceConfig::default()).await?;
//!
//!     // Deaths per department on the last day
//!     let map = MapQuery::new(Metric::Deaths, dataset.last_day()).execute(&dataset)?;
//!     println!("{} departments", map.points.len());
//!
//!     // Hospitalisations in Paris by sex
//!     let paris = TrendQuery::department(Metric::Hospitalised, "75").execute(&dataset)?;
//!     for series in &paris.series {
//!         println!("{}: {} days", series.sex, series.points.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod chart;
pub mod config;
pub mod dataset;
pub mod loader;
pub mod query;

// Re-export top-level types for convenience
pub use dataset::{
    Counts, DataError, DataResult, Dataset, DepartmentRecord, Metric, NationalAggregate, Sex,
};

pub use loader::{Boundaries, DataSource, FileSource, HttpSource, RawRecord};

pub use query::{MapQuery, MapResult, Selection, TrendQuery, TrendResult};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{ApiConfig, Config, ConfigError, LoggingConfig, SourceConfig};
