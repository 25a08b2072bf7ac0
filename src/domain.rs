use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct FlightNumber(u32);

impl FlightNumber {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for FlightNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FlightNumber {
    type Err = RegistryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim();
        let parsed = normalized
            .parse::<u32>()
            .map_err(|_| RegistryError::InvalidFlightNumber(value.to_string()))?;
        Ok(Self(parsed))
    }
}

/// A launch record. The flight number is the sole identity key; there is
/// no synthetic internal id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Launch {
    pub flight_number: FlightNumber,
    pub mission: String,
    pub rocket: String,
    pub launch_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub customers: Vec<String>,
    pub upcoming: bool,
    pub success: bool,
}

/// Client input for scheduling a new launch. `flight_number`, `customers`,
/// `upcoming` and `success` are not accepted from the client; the registry
/// assigns them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub mission: String,
    pub rocket: String,
    pub launch_date: String,
    pub target: String,
}

/// Field-equality constraints for `LaunchStore::find_one`. Unset fields
/// match anything.
#[derive(Debug, Clone, Default)]
pub struct LaunchFilter {
    pub flight_number: Option<FlightNumber>,
    pub mission: Option<String>,
    pub rocket: Option<String>,
    pub upcoming: Option<bool>,
}

impl LaunchFilter {
    pub fn by_flight_number(flight_number: FlightNumber) -> Self {
        Self {
            flight_number: Some(flight_number),
            ..Self::default()
        }
    }

    pub fn matches(&self, launch: &Launch) -> bool {
        if let Some(flight_number) = self.flight_number {
            if launch.flight_number != flight_number {
                return false;
            }
        }
        if let Some(mission) = &self.mission {
            if &launch.mission != mission {
                return false;
            }
        }
        if let Some(rocket) = &self.rocket {
            if &launch.rocket != rocket {
                return false;
            }
        }
        if let Some(upcoming) = self.upcoming {
            if launch.upcoming != upcoming {
                return false;
            }
        }
        true
    }
}

/// Partial field update applied by `LaunchStore::update`. Unset fields are
/// left unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct LaunchUpdate {
    pub upcoming: Option<bool>,
    pub success: Option<bool>,
}

impl LaunchUpdate {
    pub fn apply(&self, launch: &mut Launch) {
        if let Some(upcoming) = self.upcoming {
            launch.upcoming = upcoming;
        }
        if let Some(success) = self.success {
            launch.success = success;
        }
    }
}

/// Parses a client- or feed-supplied launch date. Accepts RFC 3339
/// timestamps, plain `YYYY-MM-DD` dates and long-form dates such as
/// `December 27, 2030`; dates without a time component are normalized to
/// midnight UTC.
pub fn parse_launch_date(value: &str) -> Result<DateTime<Utc>, RegistryError> {
    let trimmed = value.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d", "%B %d, %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            let midnight = date
                .and_hms_opt(0, 0, 0)
                .ok_or_else(|| RegistryError::InvalidLaunchDate(value.to_string()))?;
            return Ok(midnight.and_utc());
        }
    }
    Err(RegistryError::InvalidLaunchDate(value.to_string()))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn sample_launch() -> Launch {
        Launch {
            flight_number: FlightNumber::new(100),
            mission: "Kepler Exploration X".to_string(),
            rocket: "Explorer IS1".to_string(),
            launch_date: parse_launch_date("2030-12-27").unwrap(),
            target: Some("Kepler-442 b".to_string()),
            customers: vec!["ZTM".to_string(), "NASA".to_string()],
            upcoming: true,
            success: true,
        }
    }

    #[test]
    fn parse_flight_number_valid() {
        let number: FlightNumber = " 102 ".parse().unwrap();
        assert_eq!(number.as_u32(), 102);
    }

    #[test]
    fn parse_flight_number_invalid() {
        let err = "falcon".parse::<FlightNumber>().unwrap_err();
        assert_matches!(err, RegistryError::InvalidFlightNumber(_));
    }

    #[test]
    fn parse_launch_date_formats() {
        let rfc = parse_launch_date("2030-12-27T10:30:00+02:00").unwrap();
        assert_eq!(rfc.to_rfc3339(), "2030-12-27T08:30:00+00:00");

        let plain = parse_launch_date("2030-12-27").unwrap();
        let long_form = parse_launch_date("December 27, 2030").unwrap();
        assert_eq!(plain, long_form);
    }

    #[test]
    fn parse_launch_date_invalid() {
        let err = parse_launch_date("someday soon").unwrap_err();
        assert_matches!(err, RegistryError::InvalidLaunchDate(_));
    }

    #[test]
    fn filter_matches_natural_fields() {
        let launch = sample_launch();

        let filter = LaunchFilter {
            mission: Some("Kepler Exploration X".to_string()),
            rocket: Some("Explorer IS1".to_string()),
            ..LaunchFilter::default()
        };
        assert!(filter.matches(&launch));

        let miss = LaunchFilter {
            mission: Some("FalconSat".to_string()),
            ..LaunchFilter::default()
        };
        assert!(!miss.matches(&launch));

        assert!(LaunchFilter::by_flight_number(FlightNumber::new(100)).matches(&launch));
        assert!(!LaunchFilter::by_flight_number(FlightNumber::new(101)).matches(&launch));
    }

    #[test]
    fn update_applies_only_set_fields() {
        let mut launch = sample_launch();
        let update = LaunchUpdate {
            upcoming: Some(false),
            success: Some(false),
        };
        update.apply(&mut launch);
        assert!(!launch.upcoming);
        assert!(!launch.success);
        assert_eq!(launch.mission, "Kepler Exploration X");

        let noop = LaunchUpdate::default();
        noop.apply(&mut launch);
        assert!(!launch.upcoming);
    }
}
