/// Record store adapter: maps raw store items to strict launch records
mod memory;
mod postgres;

pub use memory::MemoryLaunchStore;
pub use postgres::{init_db, PgLaunchStore};

use crate::domain::{LaunchFailureDetails, LaunchRecord, Rocket};
use crate::errors::{ApiError, ApiResult};
use crate::utils::{self, timestamp};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use tracing::warn;

/// Read access to the launch record store.
///
/// Implementations do no filtering or paging; any error they return other
/// than `NotFound` surfaces as `StoreUnavailable`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Read every launch in the store
    async fn fetch_all(&self) -> ApiResult<Vec<LaunchRecord>>;

    /// Point lookup by flight number
    async fn fetch_by_key(&self, flight_number: u64) -> ApiResult<LaunchRecord>;

    /// Cheap connectivity probe
    async fn ping(&self) -> ApiResult<()>;
}

pub(crate) fn malformed(msg: impl std::fmt::Display) -> ApiError {
    ApiError::StoreUnavailable(format!("malformed launch record: {}", msg))
}

pub(crate) fn not_found(flight_number: u64) -> ApiError {
    ApiError::NotFound(format!("launch {} not found", flight_number))
}

/// Decode a batch of items; one malformed item or a repeated flight number
/// fails the whole batch
pub fn decode_batch<'a, I>(items: I) -> ApiResult<Vec<LaunchRecord>>
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .map(|item| {
            let record = decode_launch(item)?;
            if !seen.insert(record.flight_number) {
                return Err(malformed(format_args!(
                    "flight {} appears more than once",
                    record.flight_number
                )));
            }
            Ok(record)
        })
        .collect()
}

/// Decode the item a point lookup returned for `flight_number`
pub fn decode_keyed(item: &Value, flight_number: u64) -> ApiResult<LaunchRecord> {
    let record = decode_launch(item)?;
    if record.flight_number != flight_number {
        return Err(malformed(format_args!(
            "item stored under flight {} carries flight_number {}",
            flight_number, record.flight_number
        )));
    }
    Ok(record)
}

/// Map one loosely-typed store item to a `LaunchRecord`
pub fn decode_launch(item: &Value) -> ApiResult<LaunchRecord> {
    let obj = item
        .as_object()
        .ok_or_else(|| malformed("item is not an object"))?;

    let flight_number = obj
        .get("flight_number")
        .and_then(utils::flight_number)
        .ok_or_else(|| malformed("missing or invalid flight_number"))?;

    let mission_name = match obj.get("mission_name") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => {
            return Err(malformed(format_args!(
                "flight {}: mission_name is not a string: {}",
                flight_number, other
            )))
        }
    };

    let launch_date = match obj.get("launch_date") {
        None | Some(Value::Null) => None,
        Some(v) => Some(timestamp(v).ok_or_else(|| {
            malformed(format_args!(
                "flight {}: unreadable launch_date {}",
                flight_number, v
            ))
        })?),
    };

    let rocket = match obj.get("rocket") {
        Some(Value::Object(nested)) => rocket_from(nested, flight_number)?,
        None | Some(Value::Null) => rocket_from(obj, flight_number)?,
        Some(other) => {
            return Err(malformed(format_args!(
                "flight {}: rocket is not an object: {}",
                flight_number, other
            )))
        }
    };

    let launch_success = match obj.get("launch_success") {
        Some(Value::Bool(b)) => Some(*b),
        None | Some(Value::Null) => outcome_from_status(obj),
        Some(other) => {
            return Err(malformed(format_args!(
                "flight {}: launch_success is not a boolean: {}",
                flight_number, other
            )))
        }
    };

    let failure = match obj.get("launch_failure_details") {
        None | Some(Value::Null) => None,
        Some(Value::Object(v)) => Some(LaunchFailureDetails {
            time: opt_seconds(v, "time", flight_number)?,
            altitude: opt_number(v, "altitude", flight_number)?,
            reason: opt_string(v, "reason", flight_number)?,
        }),
        Some(other) => {
            return Err(malformed(format_args!(
                "flight {}: launch_failure_details is not an object: {}",
                flight_number, other
            )))
        }
    };
    let launch_failure_details = match (launch_success, failure) {
        (Some(false), details) => details,
        (_, Some(_)) => {
            warn!(
                flight_number,
                "Dropping failure details on a launch that did not fail"
            );
            None
        }
        (_, None) => None,
    };

    let links = match obj.get("links") {
        Some(Value::Object(map)) => links_from(map),
        _ => BTreeMap::new(),
    };

    Ok(LaunchRecord {
        flight_number,
        mission_name,
        launch_date,
        rocket,
        launch_success,
        launch_failure_details,
        details: opt_string(obj, "details", flight_number)?,
        links,
    })
}

fn rocket_from(obj: &Map<String, Value>, flight_number: u64) -> ApiResult<Rocket> {
    Ok(Rocket {
        rocket_id: opt_string(obj, "rocket_id", flight_number)?.unwrap_or_default(),
        rocket_name: opt_string(obj, "rocket_name", flight_number)?.unwrap_or_default(),
        rocket_type: opt_string(obj, "rocket_type", flight_number)?.unwrap_or_default(),
    })
}

/// A field that must be a string when present
fn opt_string(obj: &Map<String, Value>, key: &str, flight_number: u64) -> ApiResult<Option<String>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(malformed(format_args!(
            "flight {}: {} is not a string: {}",
            flight_number, key, other
        ))),
    }
}

/// A field that must be a number when present
fn opt_number(obj: &Map<String, Value>, key: &str, flight_number: u64) -> ApiResult<Option<f64>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(other) => Err(malformed(format_args!(
            "flight {}: {} is not a number: {}",
            flight_number, key, other
        ))),
    }
}

/// Whole seconds; fractional values are rejected
fn opt_seconds(obj: &Map<String, Value>, key: &str, flight_number: u64) -> ApiResult<Option<i64>> {
    match opt_number(obj, key, flight_number)? {
        None => Ok(None),
        Some(t) if t.fract() == 0.0 && t.abs() <= i64::MAX as f64 => Ok(Some(t as i64)),
        Some(t) => Err(malformed(format_args!(
            "flight {}: {} is not a whole number of seconds: {}",
            flight_number, key, t
        ))),
    }
}

/// Older items carry a `status` string instead of `launch_success`
fn outcome_from_status(obj: &Map<String, Value>) -> Option<bool> {
    match obj.get("status").and_then(Value::as_str) {
        Some(s) if s.eq_ignore_ascii_case("success") => Some(true),
        Some(s) if s.eq_ignore_ascii_case("failed") => Some(false),
        _ => None,
    }
}

fn links_from(map: &Map<String, Value>) -> BTreeMap<String, Option<String>> {
    map.iter()
        .filter_map(|(name, value)| match value {
            Value::String(s) => Some((name.clone(), Some(s.clone()))),
            Value::Null => Some((name.clone(), None)),
            _ => None,
        })
        .collect()
}
