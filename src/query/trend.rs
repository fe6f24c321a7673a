//! Trend query: daily values split by sex, nationwide or for one department

use chrono::NaiveDate;
use serde::Serialize;

use crate::dataset::{DataError, DataResult, Dataset, Metric, Sex};

/// Daily female/male values of `metric`, for `region` or the whole country
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendQuery {
    pub metric: Metric,
    /// Department code; `None` means the national aggregate
    pub region: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub day: NaiveDate,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendSeries {
    pub sex: Sex,
    /// Ordered by day
    pub points: Vec<TrendPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Region {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendResult {
    pub metric: Metric,
    pub region: Option<Region>,
    /// Female first, then male
    pub series: Vec<TrendSeries>,
}

impl TrendResult {
    pub fn series(&self, sex: Sex) -> Option<&TrendSeries> {
        self.series.iter().find(|s| s.sex == sex)
    }
}

impl TrendQuery {
    pub fn national(metric: Metric) -> Self {
        Self {
            metric,
            region: None,
        }
    }

    pub fn department(metric: Metric, code: impl Into<String>) -> Self {
        Self {
            metric,
            region: Some(code.into()),
        }
    }

    pub fn execute(&self, dataset: &Dataset) -> DataResult<TrendResult> {
        match &self.region {
            None => Ok(self.national_trend(dataset)),
            Some(code) => self.department_trend(dataset, code),
        }
    }

    fn national_trend(&self, dataset: &Dataset) -> TrendResult {
        let series = Sex::PRESENTATION_ORDER
            .iter()
            .map(|&sex| TrendSeries {
                sex,
                points: dataset
                    .national()
                    .iter()
                    .filter(|n| n.sex == sex)
                    .map(|n| TrendPoint {
                        day: n.day,
                        value: n.value(self.metric),
                    })
                    .collect(),
            })
            .collect();

        TrendResult {
            metric: self.metric,
            region: None,
            series,
        }
    }

    fn department_trend(&self, dataset: &Dataset, code: &str) -> DataResult<TrendResult> {
        let name = match dataset.department_rows(code).next() {
            Some(record) => record.name.clone(),
            None => {
                return Err(DataError::EmptySelection(format!(
                    "no data for department {}",
                    code
                )))
            }
        };

        let series = Sex::PRESENTATION_ORDER
            .iter()
            .map(|&sex| TrendSeries {
                sex,
                points: dataset
                    .department_rows(code)
                    .filter(|r| r.sex == sex)
                    .map(|r| TrendPoint {
                        day: r.day,
                        value: r.value(self.metric),
                    })
                    .collect(),
            })
            .collect();

        Ok(TrendResult {
            metric: self.metric,
            region: Some(Region {
                code: code.to_string(),
                name,
            }),
            series,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::context::tests::sample_dataset;

    fn values(result: &TrendResult, sex: Sex) -> Vec<u64> {
        result
            .series(sex)
            .unwrap()
            .points
            .iter()
            .map(|p| p.value)
            .collect()
    }

    #[test]
    fn test_national_covers_every_day_female_first() {
        let dataset = sample_dataset();
        let result = TrendQuery::national(Metric::Hospitalised)
            .execute(&dataset)
            .unwrap();

        let sexes: Vec<Sex> = result.series.iter().map(|s| s.sex).collect();
        assert_eq!(sexes, vec![Sex::Female, Sex::Male]);

        let expected_days: Vec<NaiveDate> = dataset
            .first_day()
            .iter_days()
            .take_while(|d| *d <= dataset.last_day())
            .collect();

        for series in &result.series {
            let days: Vec<NaiveDate> = series.points.iter().map(|p| p.day).collect();
            assert_eq!(days, expected_days);
        }
        assert!(result.region.is_none());
    }

    #[test]
    fn test_national_values_are_sums() {
        let dataset = sample_dataset();
        let result = TrendQuery::national(Metric::Hospitalised)
            .execute(&dataset)
            .unwrap();

        let female = values(&result, Sex::Female);
        let male = values(&result, Sex::Male);

        assert_eq!(female, vec![6, 8, 9]);
        assert_eq!(male, vec![9, 11, 14]);
    }

    #[test]
    fn test_department_trend() {
        let dataset = sample_dataset();
        let result = TrendQuery::department(Metric::Deaths, "75")
            .execute(&dataset)
            .unwrap();

        assert_eq!(
            result.region,
            Some(Region {
                code: "75".to_string(),
                name: "Paris".to_string()
            })
        );

        let female = values(&result, Sex::Female);
        let male = values(&result, Sex::Male);
        assert_eq!(female, vec![1, 1, 2]);
        assert_eq!(male, vec![1, 2, 2]);
    }

    #[test]
    fn test_unknown_department_is_empty_selection() {
        let dataset = sample_dataset();

        let err = TrendQuery::department(Metric::Deaths, "2A")
            .execute(&dataset)
            .unwrap_err();
        assert!(err.is_empty_selection());
    }
}
