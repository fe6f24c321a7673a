//! Dashboard selection state
//!
//! Mirrors the three inputs of the dashboard: the metric dropdown, the date
//! picker and the department clicked on the map. Every query is recomputed
//! from scratch against the dataset.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::map::{MapQuery, MapResult};
use super::trend::{TrendQuery, TrendResult};
use crate::dataset::{DataResult, Dataset, Metric};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub metric: Metric,
    pub date: NaiveDate,
    /// Department selected on the map
    pub region: Option<String>,
}

impl Selection {
    /// Initial state: deaths on the last available day, whole country
    pub fn initial(dataset: &Dataset) -> Self {
        Self {
            metric: Metric::default(),
            date: dataset.last_day(),
            region: None,
        }
    }

    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Move the date, clamped to the picker bounds
    pub fn with_date(mut self, date: NaiveDate, dataset: &Dataset) -> Self {
        self.date = date.clamp(dataset.first_day(), dataset.last_day());
        self
    }

    /// Map click on a department
    pub fn select_region(&mut self, code: impl Into<String>) {
        self.region = Some(code.into());
    }

    /// Map selection cleared
    pub fn clear_region(&mut self) {
        self.region = None;
    }

    pub fn map_query(&self) -> MapQuery {
        MapQuery::new(self.metric, self.date)
    }

    pub fn trend_query(&self) -> TrendQuery {
        TrendQuery {
            metric: self.metric,
            region: self.region.clone(),
        }
    }

    pub fn map(&self, dataset: &Dataset) -> DataResult<MapResult> {
        self.map_query().execute(dataset)
    }

    pub fn trend(&self, dataset: &Dataset) -> DataResult<TrendResult> {
        self.trend_query().execute(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::context::tests::sample_dataset;

    #[test]
    fn test_initial_selection() {
        let dataset = sample_dataset();
        let selection = Selection::initial(&dataset);

        assert_eq!(selection.metric, Metric::Deaths);
        assert_eq!(selection.date, dataset.last_day());
        assert!(selection.region.is_none());
    }

    #[test]
    fn test_select_then_clear_returns_national() {
        let dataset = sample_dataset();
        let mut selection = Selection::initial(&dataset).with_metric(Metric::Hospitalised);

        let national = selection.trend(&dataset).unwrap();

        selection.select_region("75");
        let paris = selection.trend(&dataset).unwrap();
        assert_ne!(paris, national);
        assert_eq!(paris.region.as_ref().map(|r| r.code.as_str()), Some("75"));

        selection.clear_region();
        assert_eq!(selection.trend(&dataset).unwrap(), national);
    }

    #[test]
    fn test_region_does_not_affect_map() {
        let dataset = sample_dataset();
        let mut selection = Selection::initial(&dataset);

        let before = selection.map(&dataset).unwrap();
        selection.select_region("01");
        assert_eq!(selection.map(&dataset).unwrap(), before);
    }

    #[test]
    fn test_date_clamped_to_bounds() {
        let dataset = sample_dataset();
        let early = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();

        let selection = Selection::initial(&dataset).with_date(early, &dataset);
        assert_eq!(selection.date, dataset.first_day());
    }
}
