//! Hospital Dataset
//!
//! This module turns the raw feed into the immutable tables the dashboard reads:
//!
//! - **types**: Core data structures (DepartmentRecord, NationalAggregate, Metric, Sex)
//! - **transform**: Cleaning pipeline from raw rows to the derived tables
//! - **index**: Point lookups by day and by department
//! - **context**: `Dataset`, the read-only context shared with the API
//! - **error**: Error types
//!
//! # Architecture
//!
//! ```text
//! Startup:
//!   CSV + GeoJSON → RawRecord → transform → Dataset (immutable)
//!
//! Read Path:
//!   MapQuery / TrendQuery → Index lookup → Result rows → Chart
//! ```

pub mod context;
pub mod error;
pub mod index;
pub mod transform;
pub mod types;

pub use context::Dataset;
pub use error::{DataError, DataResult};
pub use index::DatasetIndex;
pub use transform::{
    drop_incomplete, format_date, is_metropolitan, national_totals, transform, CompleteRow,
    TransformOutput, TransformStats,
};
pub use types::{Counts, DepartmentRecord, Metric, NationalAggregate, Sex};
