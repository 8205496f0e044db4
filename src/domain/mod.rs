/// Domain models for the application
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rocket that flew a launch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rocket {
    pub rocket_id: String,
    pub rocket_name: String,
    pub rocket_type: String,
}

/// Failure report, only present on launches that failed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaunchFailureDetails {
    pub time: Option<i64>,
    pub altitude: Option<f64>,
    pub reason: Option<String>,
}

/// One spaceflight launch attempt, keyed by `flight_number`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchRecord {
    pub flight_number: u64,
    pub mission_name: String,
    pub launch_date: Option<DateTime<Utc>>,
    pub rocket: Rocket,
    /// `None` means the outcome is unknown, which is not the same as a failure.
    pub launch_success: Option<bool>,
    pub launch_failure_details: Option<LaunchFailureDetails>,
    pub details: Option<String>,
    #[serde(default)]
    pub links: BTreeMap<String, Option<String>>,
}

/// Paginated list response
#[derive(Debug, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub data: Vec<LaunchRecord>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

/// Usage count for a single rocket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocketUsage {
    pub name: String,
    pub count: usize,
}

/// Aggregate statistics over the whole dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSummary {
    pub total_launches: usize,
    pub successful_launches: usize,
    pub failed_launches: usize,
    pub unknown_outcome_launches: usize,
    pub success_rate: f64,
    pub most_used_rockets: Vec<RocketUsage>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub version: &'static str,
    pub database: &'static str,
}
