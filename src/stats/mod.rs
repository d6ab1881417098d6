//! Search-history statistics
//!
//! Pure aggregation over a user's search records. The caller fetches the
//! records; nothing here pages, streams, caches, or logs. Equal counts are
//! broken alphabetically so rankings are stable across runs and backends.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::SearchRecord;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CityCount {
    pub city: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConditionCount {
    pub condition: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    pub top_cities: Vec<CityCount>,
    pub recent_searches: Vec<SearchRecord>,
    pub weather_distribution: Vec<ConditionCount>,
}

/// Compute all three views over one record collection.
pub fn snapshot(records: &[SearchRecord], limit: usize) -> StatisticsSnapshot {
    StatisticsSnapshot {
        top_cities: top_cities(records, limit),
        recent_searches: recent_searches(records, limit),
        weather_distribution: weather_distribution(records),
    }
}

/// The `n` most searched cities, count descending, ties alphabetical.
/// City names compare exactly (case-sensitive).
pub fn top_cities(records: &[SearchRecord], n: usize) -> Vec<CityCount> {
    let mut counts: HashMap<&str, i64> = HashMap::new();
    for record in records {
        *counts.entry(record.city.as_str()).or_insert(0) += 1;
    }

    let mut ranked: Vec<CityCount> = counts
        .into_iter()
        .map(|(city, count)| CityCount {
            city: city.to_string(),
            count,
        })
        .collect();

    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.city.cmp(&b.city)));
    ranked.truncate(n);
    ranked
}

/// The `n` most recent searches, newest first. Timestamp ties keep the
/// input's relative order (stable sort).
pub fn recent_searches(records: &[SearchRecord], n: usize) -> Vec<SearchRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| b.searched_at.cmp(&a.searched_at));
    sorted.truncate(n);
    sorted
}

/// How often each weather condition was seen, count descending, ties
/// alphabetical. Records with an empty condition are excluded.
pub fn weather_distribution(records: &[SearchRecord]) -> Vec<ConditionCount> {
    let mut counts: HashMap<&str, i64> = HashMap::new();
    for record in records {
        if record.condition.is_empty() {
            continue;
        }
        *counts.entry(record.condition.as_str()).or_insert(0) += 1;
    }

    let mut ranked: Vec<ConditionCount> = counts
        .into_iter()
        .map(|(condition, count)| ConditionCount {
            condition: condition.to_string(),
            count,
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.condition.cmp(&b.condition))
    });
    ranked
}
