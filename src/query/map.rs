//! Map query: one value per department for a metric on a given day

use chrono::NaiveDate;
use serde::Serialize;

use crate::dataset::{DataError, DataResult, Dataset, Metric};

/// Value of `metric` on the `all` row of every department for `date`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapQuery {
    pub metric: Metric,
    pub date: NaiveDate,
}

/// One department on the choropleth
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapPoint {
    pub code: String,
    pub name: String,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapResult {
    pub metric: Metric,
    pub date: NaiveDate,
    /// Ordered by department code
    pub points: Vec<MapPoint>,
}

impl MapQuery {
    pub fn new(metric: Metric, date: NaiveDate) -> Self {
        Self { metric, date }
    }

    pub fn execute(&self, dataset: &Dataset) -> DataResult<MapResult> {
        let points: Vec<MapPoint> = dataset
            .all_sex_on(self.date)
            .map(|r| MapPoint {
                code: r.code.clone(),
                name: r.name.clone(),
                value: r.value(self.metric),
            })
            .collect();

        if points.is_empty() {
            return Err(DataError::EmptySelection(format!(
                "no department data on {}",
                self.date
            )));
        }

        Ok(MapResult {
            metric: self.metric,
            date: self.date,
            points,
        })
    }
}
