//! Dataset context
//!
//! The immutable tables built once at startup and shared read-only with the
//! HTTP layer. There is no write path: everything here takes `&self`.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;

use super::error::DataResult;
use super::index::DatasetIndex;
use super::transform::{transform, TransformStats};
use super::types::{DepartmentRecord, Metric, NationalAggregate};
use crate::config::SourceConfig;
use crate::loader::{self, Boundaries, RawData};
use crate::query::{MapQuery, MapResult, TrendQuery, TrendResult};

/// Cleaned department rows, national totals and boundaries
#[derive(Debug)]
pub struct Dataset {
    records: Vec<DepartmentRecord>,
    national: Vec<NationalAggregate>,
    index: DatasetIndex,
    boundaries: Boundaries,
    first_day: NaiveDate,
    last_day: NaiveDate,
    stats: TransformStats,
    loaded_at: DateTime<Utc>,
}

impl Dataset {
    /// Fetch both sources and build the dataset
    pub async fn load(config: &SourceConfig) -> DataResult<Self> {
        let raw = loader::load(config).await?;
        Self::build(raw)
    }

    /// Transform already-loaded sources
    pub fn build(raw: RawData) -> DataResult<Self> {
        let output = transform(raw.records, &raw.boundaries)?;
        let index = DatasetIndex::build(&output.records);

        tracing::info!(
            "Dataset ready: {} departments, {} days ({} to {})",
            index.department_count(),
            index.day_count(),
            output.first_day,
            output.last_day
        );

        Ok(Self {
            records: output.records,
            national: output.national,
            index,
            boundaries: raw.boundaries,
            first_day: output.first_day,
            last_day: output.last_day,
            stats: output.stats,
            loaded_at: Utc::now(),
        })
    }

    /// Department rows ordered by (day, code, sex)
    pub fn records(&self) -> &[DepartmentRecord] {
        &self.records
    }

    /// National totals ordered by (day, sex)
    pub fn national(&self) -> &[NationalAggregate] {
        &self.national
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    pub fn last_day(&self) -> NaiveDate {
        self.last_day
    }

    pub fn boundaries(&self) -> &Boundaries {
        &self.boundaries
    }

    pub fn stats(&self) -> TransformStats {
        self.stats
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// `all`-sex rows of one day, ordered by department code
    pub fn all_sex_on(&self, day: NaiveDate) -> impl Iterator<Item = &DepartmentRecord> {
        self.index.day(day).iter().map(|&pos| &self.records[pos])
    }

    /// Every row of one department, ordered by day
    pub fn department_rows(&self, code: &str) -> impl Iterator<Item = &DepartmentRecord> {
        self.index.department(code).iter().map(|&pos| &self.records[pos])
    }

    /// Departments present in the data, code → name
    pub fn departments(&self) -> BTreeMap<&str, &str> {
        self.records
            .iter()
            .map(|r| (r.code.as_str(), r.name.as_str()))
            .collect()
    }

    /// Number of distinct days with data
    pub fn day_count(&self) -> usize {
        self.index.day_count()
    }

    pub fn map(&self, metric: Metric, date: NaiveDate) -> DataResult<MapResult> {
        MapQuery::new(metric, date).execute(self)
    }

    /// National trend when `region` is `None`
    pub fn trend(&self, metric: Metric, region: Option<&str>) -> DataResult<TrendResult> {
        TrendQuery {
            metric,
            region: region.map(str::to_string),
        }
        .execute(self)
    }
}
