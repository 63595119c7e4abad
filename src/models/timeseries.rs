//! Daily cumulative series and derived new-case counts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DAYS: u32 = 180;
pub const MIN_DAYS: u32 = 60;
pub const MAX_DAYS: u32 = 365;

/// One upstream day, as served by the NYT historical endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub cases: u64,
    #[serde(default)]
    pub deaths: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    pub date: NaiveDate,
    #[serde(rename = "cases")]
    pub cumulative_cases: u64,
    #[serde(rename = "deaths", skip_serializing_if = "Option::is_none")]
    pub cumulative_deaths: Option<u64>,
    pub new_cases: u64,
}

/// Clamp a requested trend window into the range the dashboard offers.
pub fn clamp_days(requested: u32) -> u32 {
    requested.clamp(MIN_DAYS, MAX_DAYS)
}

/// Build an ascending series holding at most the last `days` dates.
///
/// Input order is not trusted. Repeated dates keep the first row seen.
pub fn build_series(mut rows: Vec<DailyCount>, days: u32) -> Vec<TimeSeriesPoint> {
    rows.sort_by_key(|row| row.date);
    rows.dedup_by_key(|row| row.date);

    let keep = days as usize;
    if rows.len() > keep {
        rows.drain(..rows.len() - keep);
    }

    let mut points: Vec<TimeSeriesPoint> = rows
        .into_iter()
        .map(|row| TimeSeriesPoint {
            date: row.date,
            cumulative_cases: row.cases,
            cumulative_deaths: row.deaths,
            new_cases: 0,
        })
        .collect();
    derive_new_cases(&mut points);
    points
}

/// First difference of cumulative cases, clipped at zero. The first point
/// has nothing to diff against and is always 0.
pub fn derive_new_cases(points: &mut [TimeSeriesPoint]) {
    let mut previous: Option<u64> = None;
    for point in points.iter_mut() {
        point.new_cases = match previous {
            Some(prev) => point.cumulative_cases.saturating_sub(prev),
            None => 0,
        };
        previous = Some(point.cumulative_cases);
    }
}
