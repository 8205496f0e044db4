/// Launch list filters: AND-composed, empty values place no constraint
use crate::domain::LaunchRecord;
use crate::errors::{ApiError, ApiResult};
use crate::utils::parse_timestamp;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Query keys understood as filters
pub const FILTER_KEYS: &[&str] = &[
    "mission_name",
    "launch_success",
    "rocket_name",
    "start_date",
    "end_date",
    "flight_number_min",
    "flight_number_max",
];

/// Query keys consumed by pagination rather than filtering
pub const PAGINATION_KEYS: &[&str] = &["limit", "offset"];

/// Active predicates for a list query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    /// Case-insensitive substring of `mission_name`
    pub mission_name: Option<String>,
    /// Exact outcome; records with an unknown outcome never match
    pub launch_success: Option<bool>,
    /// Case-insensitive substring of `rocket.rocket_name`
    pub rocket_name: Option<String>,
    /// Inclusive lower bound on `launch_date`
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `launch_date`
    pub end_date: Option<DateTime<Utc>>,
    pub flight_number_min: Option<u64>,
    pub flight_number_max: Option<u64>,
}

impl FilterSet {
    /// Build a filter set from raw query parameters.
    ///
    /// Pagination keys are skipped; any other unrecognized key is an error.
    pub fn from_params(params: &HashMap<String, String>) -> ApiResult<Self> {
        let mut filters = FilterSet::default();

        for (key, raw) in params {
            let value = raw.trim();
            let slot = match key.as_str() {
                k if PAGINATION_KEYS.contains(&k) => continue,
                _ if !FILTER_KEYS.contains(&key.as_str()) => {
                    return Err(ApiError::InvalidFilter(format!(
                        "unsupported filter '{}' (supported: {})",
                        key,
                        FILTER_KEYS.join(", ")
                    )))
                }
                _ if value.is_empty() => continue,
                name => name,
            };

            match slot {
                "mission_name" => filters.mission_name = Some(value.to_string()),
                "rocket_name" => filters.rocket_name = Some(value.to_string()),
                "launch_success" => filters.launch_success = Some(parse_bool(slot, value)?),
                "start_date" => filters.start_date = Some(parse_date(slot, value)?),
                "end_date" => filters.end_date = Some(parse_date(slot, value)?),
                "flight_number_min" => filters.flight_number_min = Some(parse_flight(slot, value)?),
                _ => filters.flight_number_max = Some(parse_flight(slot, value)?),
            }
        }

        filters.validate()?;
        Ok(filters)
    }

    /// Reject ranges that can never match
    pub fn validate(&self) -> ApiResult<()> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(ApiError::InvalidFilter(format!(
                    "start_date {} is after end_date {}",
                    start.to_rfc3339(),
                    end.to_rfc3339()
                )));
            }
        }
        if let (Some(min), Some(max)) = (self.flight_number_min, self.flight_number_max) {
            if min > max {
                return Err(ApiError::InvalidFilter(format!(
                    "flight_number_min {} is greater than flight_number_max {}",
                    min, max
                )));
            }
        }
        Ok(())
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        *self == FilterSet::default()
    }

    pub fn matches(&self, record: &LaunchRecord) -> bool {
        matches(record, self)
    }
}

/// Decide whether `record` satisfies every active predicate in `filters`
pub fn matches(record: &LaunchRecord, filters: &FilterSet) -> bool {
    if let Some(needle) = &filters.mission_name {
        if !contains_ignore_case(&record.mission_name, needle) {
            return false;
        }
    }

    if let Some(rocket) = &filters.rocket_name {
        if !contains_ignore_case(&record.rocket.rocket_name, rocket) {
            return false;
        }
    }

    if let Some(wanted) = filters.launch_success {
        if record.launch_success != Some(wanted) {
            return false;
        }
    }

    if filters.start_date.is_some() || filters.end_date.is_some() {
        let Some(date) = record.launch_date else {
            return false;
        };
        if filters.start_date.is_some_and(|start| date < start) {
            return false;
        }
        if filters.end_date.is_some_and(|end| date > end) {
            return false;
        }
    }

    if filters
        .flight_number_min
        .is_some_and(|min| record.flight_number < min)
    {
        return false;
    }
    if filters
        .flight_number_max
        .is_some_and(|max| record.flight_number > max)
    {
        return false;
    }

    true
}

/// Empty needles match everything
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn parse_bool(key: &str, value: &str) -> ApiResult<bool> {
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ApiError::InvalidFilter(format!(
            "{} must be 'true' or 'false', got '{}'",
            key, value
        )))
    }
}

fn parse_date(key: &str, value: &str) -> ApiResult<DateTime<Utc>> {
    parse_timestamp(value).ok_or_else(|| {
        ApiError::InvalidFilter(format!("{} is not a valid timestamp: '{}'", key, value))
    })
}

fn parse_flight(key: &str, value: &str) -> ApiResult<u64> {
    match value.parse::<u64>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(ApiError::InvalidFilter(format!(
            "{} must be a positive integer, got '{}'",
            key, value
        ))),
    }
}
