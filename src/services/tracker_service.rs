use crate::api::disease_sh::{DiseaseShApi, Period};
use crate::api::http::{HttpClient, ReqwestClient};
use crate::config::Config;
use crate::error::{Result, TrackerError};
use crate::models::cache::{CacheKey, ResultCache};
use crate::models::snapshot::{self, Snapshot};
use crate::models::timeseries::{self, TimeSeriesPoint};
use std::time::Duration;
use tracing::{info, warn};

/// Entry point for the presentation layer: snapshot and trend fetches,
/// memoized for `Config::cache_ttl`.
pub struct TrackerService<C: HttpClient = ReqwestClient> {
    api: DiseaseShApi<C>,
    snapshots: ResultCache<Snapshot>,
    series: ResultCache<Vec<TimeSeriesPoint>>,
    ttl: Duration,
}

impl TrackerService<ReqwestClient> {
    pub fn new(config: &Config) -> Result<Self> {
        let http = ReqwestClient::new(config.request_timeout)?;
        Self::with_client(http, config)
    }
}

impl<C: HttpClient> TrackerService<C> {
    pub fn with_client(http: C, config: &Config) -> Result<Self> {
        Ok(Self {
            api: DiseaseShApi::new(http, &config.base_url)?,
            snapshots: ResultCache::new(),
            series: ResultCache::new(),
            ttl: config.cache_ttl,
        })
    }

    pub fn api(&self) -> &DiseaseShApi<C> {
        &self.api
    }

    /// Current per-state totals joined with the prior period.
    ///
    /// Both periods are requested concurrently; if either fails the whole
    /// call fails.
    pub async fn fetch_snapshot(&self) -> Result<Snapshot> {
        let key = CacheKey::new("fetch_snapshot", "");
        self.snapshots
            .get_or_compute(key, || self.load_snapshot(), self.ttl)
            .await
    }

    async fn load_snapshot(&self) -> Result<Snapshot> {
        let (current, prior) = tokio::try_join!(
            self.api.fetch_states(Period::Current),
            self.api.fetch_states(Period::Prior),
        )?;

        let snapshot = snapshot::reconcile(current, prior);
        if !snapshot.dropped.is_empty() {
            warn!(
                "{} regions have no state code and were left out",
                snapshot.dropped.len()
            );
        }
        info!(
            "Loaded snapshot: {} states, {} new cases, {} new deaths",
            snapshot.states_reporting(),
            snapshot.total_new_cases(),
            snapshot.total_new_deaths()
        );
        Ok(snapshot)
    }

    /// Daily series for the whole country (`region == None`) or one state,
    /// covering at most the last `days` days.
    pub async fn fetch_timeseries(
        &self,
        region: Option<&str>,
        days: u32,
    ) -> Result<Vec<TimeSeriesPoint>> {
        if days == 0 {
            return Err(TrackerError::InvalidDays(days));
        }
        // an empty name would address the all-states listing
        if let Some(name) = region {
            if name.trim().is_empty() {
                return Err(TrackerError::UnknownRegion(name.to_string()));
            }
        }

        let key = CacheKey::new("fetch_timeseries", format!("{:?},{}", region, days));
        self.series
            .get_or_compute(key, || self.load_timeseries(region, days), self.ttl)
            .await
    }

    async fn load_timeseries(
        &self,
        region: Option<&str>,
        days: u32,
    ) -> Result<Vec<TimeSeriesPoint>> {
        let rows = self.api.fetch_history(region, days).await?;
        let points = timeseries::build_series(rows, days);
        info!(
            "Loaded {} daily points for {}",
            points.len(),
            region.unwrap_or("United States")
        );
        Ok(points)
    }

    pub async fn fetch_national_timeseries(&self, days: u32) -> Result<Vec<TimeSeriesPoint>> {
        self.fetch_timeseries(None, days).await
    }

    pub async fn fetch_state_timeseries(
        &self,
        region_name: &str,
        days: u32,
    ) -> Result<Vec<TimeSeriesPoint>> {
        self.fetch_timeseries(Some(region_name), days).await
    }
}
