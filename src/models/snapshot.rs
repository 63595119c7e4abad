//! Per-state snapshot reconciliation.
//!
//! Joins the current reporting period onto the prior one, derives clipped
//! daily deltas and attaches USPS codes.

use crate::models::regions;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// One upstream row, reduced to the fields the tracker needs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StateCounts {
    pub state: String,
    #[serde(default)]
    pub cases: Option<u64>,
    #[serde(default)]
    pub deaths: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionRecord {
    #[serde(rename = "state")]
    pub region_name: String,
    #[serde(rename = "cases_today")]
    pub cases_current: Option<u64>,
    #[serde(rename = "deaths_today")]
    pub deaths_current: Option<u64>,
    #[serde(rename = "cases_yest")]
    pub cases_prior: Option<u64>,
    #[serde(rename = "deaths_yest")]
    pub deaths_prior: Option<u64>,
    #[serde(rename = "todayCases")]
    pub new_cases: u64,
    #[serde(rename = "todayDeaths")]
    pub new_deaths: u64,
    #[serde(rename = "state_code")]
    pub region_code: &'static str,
}

/// Result of one snapshot fetch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub records: Vec<RegionRecord>,
    /// Names excluded because they have no region code.
    pub dropped: Vec<String>,
}

/// Difference between two cumulative counts, never negative.
///
/// | current | prior   | result                |
/// |---------|---------|-----------------------|
/// | Some(c) | Some(p) | `max(0, c - p)`       |
/// | Some(_) | None    | 0                     |
/// | None    | Some(_) | 0                     |
/// | None    | None    | 0                     |
pub fn safe_delta(current: Option<u64>, prior: Option<u64>) -> u64 {
    match (current, prior) {
        (Some(current), Some(prior)) => current.saturating_sub(prior),
        _ => 0,
    }
}

/// Left-join `current` onto `prior` by state name and build the snapshot.
///
/// Every current row is kept unless its name has no code; prior-only rows
/// are ignored.
pub fn reconcile(current: Vec<StateCounts>, prior: Vec<StateCounts>) -> Snapshot {
    let prior_by_name: HashMap<String, StateCounts> = prior
        .into_iter()
        .map(|row| (row.state.clone(), row))
        .collect();

    let mut seen = HashSet::new();
    let mut snapshot = Snapshot::default();

    for row in current {
        if !seen.insert(row.state.clone()) {
            warn!("Duplicate row for {} in current snapshot, keeping first", row.state);
            continue;
        }

        let Some(region_code) = regions::lookup(&row.state) else {
            snapshot.dropped.push(row.state);
            continue;
        };

        let previous = prior_by_name.get(&row.state);
        let cases_prior = previous.and_then(|p| p.cases);
        let deaths_prior = previous.and_then(|p| p.deaths);

        snapshot.records.push(RegionRecord {
            new_cases: safe_delta(row.cases, cases_prior),
            new_deaths: safe_delta(row.deaths, deaths_prior),
            region_name: row.state,
            cases_current: row.cases,
            deaths_current: row.deaths,
            cases_prior,
            deaths_prior,
            region_code,
        });
    }

    if !snapshot.dropped.is_empty() {
        debug!(
            "Dropped {} regions without a code: {}",
            snapshot.dropped.len(),
            snapshot.dropped.join(", ")
        );
    }

    snapshot
}

impl Snapshot {
    pub fn states_reporting(&self) -> usize {
        self.records.len()
    }

    pub fn total_new_cases(&self) -> u64 {
        self.records.iter().map(|r| r.new_cases).sum()
    }

    pub fn total_new_deaths(&self) -> u64 {
        self.records.iter().map(|r| r.new_deaths).sum()
    }

    /// The `n` records with the most new cases, largest first.
    pub fn top_by_new_cases(&self, n: usize) -> Vec<&RegionRecord> {
        let mut ranked: Vec<&RegionRecord> = self.records.iter().collect();
        // stable sort: ties keep upstream order
        ranked.sort_by(|a, b| b.new_cases.cmp(&a.new_cases));
        ranked.truncate(n);
        ranked
    }

    pub fn get(&self, region_name: &str) -> Option<&RegionRecord> {
        self.records.iter().find(|r| r.region_name == region_name)
    }
}
