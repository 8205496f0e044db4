/// Aggregate statistics over the full launch set
use crate::domain::{LaunchRecord, RocketUsage, StatisticsSummary};
use std::collections::HashMap;

/// Number of entries reported in `most_used_rockets`
pub const TOP_ROCKETS: usize = 10;

/// Summarize every record; filters never apply here.
pub fn summarize(records: &[LaunchRecord]) -> StatisticsSummary {
    let total_launches = records.len();
    let successful_launches = records
        .iter()
        .filter(|r| r.launch_success == Some(true))
        .count();
    let failed_launches = records
        .iter()
        .filter(|r| r.launch_success == Some(false))
        .count();

    StatisticsSummary {
        total_launches,
        successful_launches,
        failed_launches,
        unknown_outcome_launches: total_launches - successful_launches - failed_launches,
        success_rate: success_rate(successful_launches, total_launches),
        most_used_rockets: most_used_rockets(records, TOP_ROCKETS),
    }
}

/// Percentage rounded to one decimal; 0.0 for an empty set
pub fn success_rate(successful: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let pct = successful as f64 / total as f64 * 100.0;
    (pct * 10.0).round() / 10.0
}

/// Rockets by launch count, descending, ties broken by name ascending
pub fn most_used_rockets(records: &[LaunchRecord], top: usize) -> Vec<RocketUsage> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.rocket.rocket_name.as_str()).or_insert(0) += 1;
    }

    let mut usage: Vec<RocketUsage> = counts
        .into_iter()
        .map(|(name, count)| RocketUsage {
            name: name.to_string(),
            count,
        })
        .collect();
    usage.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    usage.truncate(top);
    usage
}
