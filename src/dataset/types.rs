//! Core data types for the hospital dataset
//!
//! This module defines the fundamental types used throughout the pipeline:
//! - `Sex`: Sex category of a row (all, male, female)
//! - `Metric`: One of the four hospital counts a chart can display
//! - `Counts`: The four counts carried by every row
//! - `DepartmentRecord`: One row per (department, sex, day)
//! - `NationalAggregate`: One row per (day, sex), summed across departments

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::DataError;

/// Sex category as published in the feed's `sexe` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    All,
    Male,
    Female,
}

impl Sex {
    /// Order in which the trend chart stacks its series
    pub const PRESENTATION_ORDER: [Sex; 2] = [Sex::Female, Sex::Male];

    /// Map the feed's integer code: 0 = all, 1 = male, 2 = female
    pub fn from_code(code: u8) -> Result<Self, DataError> {
        match code {
            0 => Ok(Sex::All),
            1 => Ok(Sex::Male),
            2 => Ok(Sex::Female),
            other => Err(DataError::UnknownSexCode(other)),
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Sex::All => 0,
            Sex::Male => 1,
            Sex::Female => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::All => "all",
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }

    /// Bar colour used by the trend chart
    pub fn color(&self) -> &'static str {
        match self {
            Sex::All => "grey",
            Sex::Male => "blue",
            Sex::Female => "red",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hospital count selectable in the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    #[serde(rename = "hospitalised")]
    Hospitalised,
    #[serde(rename = "intensive-care", alias = "intensive care", alias = "intensive_care")]
    IntensiveCare,
    #[serde(rename = "discharged")]
    Discharged,
    #[default]
    #[serde(rename = "deaths")]
    Deaths,
}

impl Metric {
    /// Dropdown order of the dashboard
    pub const ALL: [Metric; 4] = [
        Metric::Deaths,
        Metric::Hospitalised,
        Metric::IntensiveCare,
        Metric::Discharged,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Hospitalised => "hospitalised",
            Metric::IntensiveCare => "intensive-care",
            Metric::Discharged => "discharged",
            Metric::Deaths => "deaths",
        }
    }

    /// Human-readable label shown in the metric selector
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Hospitalised => "Number of hospitalised people",
            Metric::IntensiveCare => "Number of people in intensive care",
            Metric::Discharged => "Cumulated number of recoveries",
            Metric::Deaths => "Cumulated number of deaths",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hospitalised" | "hospitalized" | "hosp" => Ok(Metric::Hospitalised),
            "intensive-care" | "intensive care" | "intensive_care" | "rea" => {
                Ok(Metric::IntensiveCare)
            }
            "discharged" | "rad" => Ok(Metric::Discharged),
            "deaths" | "dc" => Ok(Metric::Deaths),
            other => Err(DataError::InvalidMetric(other.to_string())),
        }
    }
}

/// The four hospital counts carried by a row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    /// Currently hospitalised
    pub hospitalised: u64,
    /// Currently in intensive care
    pub intensive_care: u64,
    /// Cumulative discharges
    pub discharged: u64,
    /// Cumulative deaths
    pub deaths: u64,
}

impl Counts {
    pub fn new(hospitalised: u64, intensive_care: u64, discharged: u64, deaths: u64) -> Self {
        Self {
            hospitalised,
            intensive_care,
            discharged,
            deaths,
        }
    }

    /// Value of a single metric
    pub fn get(&self, metric: Metric) -> u64 {
        match metric {
            Metric::Hospitalised => self.hospitalised,
            Metric::IntensiveCare => self.intensive_care,
            Metric::Discharged => self.discharged,
            Metric::Deaths => self.deaths,
        }
    }
}

impl Counts {
    /// Field-wise sum, `None` if any count overflows
    pub fn checked_add(&self, rhs: &Counts) -> Option<Counts> {
        Some(Counts {
            hospitalised: self.hospitalised.checked_add(rhs.hospitalised)?,
            intensive_care: self.intensive_care.checked_add(rhs.intensive_care)?,
            discharged: self.discharged.checked_add(rhs.discharged)?,
            deaths: self.deaths.checked_add(rhs.deaths)?,
        })
    }
}

/// One cleaned row of the feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentRecord {
    /// Two-character department code ("01", "2A", "75", ...)
    pub code: String,
    /// Department name resolved from the boundary file
    pub name: String,
    pub sex: Sex,
    pub day: NaiveDate,
    pub counts: Counts,
}

impl DepartmentRecord {
    pub fn value(&self, metric: Metric) -> u64 {
        self.counts.get(metric)
    }
}

/// Nationwide sum of all department rows for one day and sex category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NationalAggregate {
    pub day: NaiveDate,
    pub sex: Sex,
    pub counts: Counts,
}

impl NationalAggregate {
    pub fn value(&self, metric: Metric) -> u64 {
        self.counts.get(metric)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sex_from_code() {
        assert_eq!(Sex::from_code(0).unwrap(), Sex::All);
        assert_eq!(Sex::from_code(1).unwrap(), Sex::Male);
        assert_eq!(Sex::from_code(2).unwrap(), Sex::Female);
        assert!(matches!(
            Sex::from_code(3),
            Err(DataError::UnknownSexCode(3))
        ));
    }

    #[test]
    fn test_sex_code_roundtrip() {
        for sex in [Sex::All, Sex::Male, Sex::Female] {
            assert_eq!(Sex::from_code(sex.code()).unwrap(), sex);
        }
    }

    #[test]
    fn test_metric_parsing() {
        assert_eq!("deaths".parse::<Metric>().unwrap(), Metric::Deaths);
        assert_eq!(
            "intensive care".parse::<Metric>().unwrap(),
            Metric::IntensiveCare
        );
        assert_eq!(
            "Intensive-Care".parse::<Metric>().unwrap(),
            Metric::IntensiveCare
        );
        assert!("recovered".parse::<Metric>().is_err());
    }

    #[test]
    fn test_metric_serde_names() {
        let json = serde_json::to_string(&Metric::IntensiveCare).unwrap();
        assert_eq!(json, "\"intensive-care\"");

        let metric: Metric = serde_json::from_str("\"intensive care\"").unwrap();
        assert_eq!(metric, Metric::IntensiveCare);
    }

    #[test]
    fn test_counts_add_and_get() {
        let total = Counts::new(1, 2, 3, 4)
            .checked_add(&Counts::new(10, 20, 30, 40))
            .unwrap();

        assert_eq!(total.get(Metric::Hospitalised), 11);
        assert_eq!(total.get(Metric::IntensiveCare), 22);
        assert_eq!(total.get(Metric::Discharged), 33);
        assert_eq!(total.get(Metric::Deaths), 44);
    }

    #[test]
    fn test_counts_overflow() {
        let max = Counts::new(u64::MAX, 0, 0, 0);
        assert!(max.checked_add(&Counts::new(1, 0, 0, 0)).is_none());
        assert_eq!(max.checked_add(&Counts::default()), Some(max));
    }
}
