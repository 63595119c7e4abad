//! Client for the disease.sh COVID-19 endpoints.
//!
//! Four resources are used:
//!
//! - `{base}/states?allowNull=true` (current per-state totals)
//! - `{base}/states?yesterday=true&allowNull=true` (prior period)
//! - `{base}/nyt/usa?lastdays={N}` (national NYT history)
//! - `{base}/nyt/states/{state}?lastdays={N}` (per-state NYT history)

use crate::api::http::HttpClient;
use crate::error::{Result, TrackerError};
use crate::models::snapshot::StateCounts;
use crate::models::timeseries::DailyCount;
use chrono::NaiveDate;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Which reporting period a states request selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Current,
    Prior,
}

pub struct DiseaseShApi<C: HttpClient> {
    http: C,
    base_url: Url,
}

impl<C: HttpClient> DiseaseShApi<C> {
    pub fn new(http: C, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| TrackerError::Config(format!("invalid base URL {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(TrackerError::Config(format!(
                "{} cannot be used as a base URL",
                base_url
            )));
        }
        Ok(Self { http, base_url })
    }

    pub fn http(&self) -> &C {
        &self.http
    }

    pub fn states_url(&self, period: Period) -> Url {
        let mut query = Vec::with_capacity(2);
        if period == Period::Prior {
            query.push(("yesterday", "true".to_string()));
        }
        query.push(("allowNull", "true".to_string()));
        self.endpoint(&["states"], &query)
    }

    /// History endpoint for the whole country (`None`) or one state.
    pub fn history_url(&self, region: Option<&str>, days: u32) -> Url {
        let query = [("lastdays", days.to_string())];
        match region {
            None => self.endpoint(&["nyt", "usa"], &query),
            Some(name) => self.endpoint(&["nyt", "states", name], &query),
        }
    }

    fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Url {
        let mut url = self.base_url.clone();
        // checked in new()
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        url
    }

    pub async fn fetch_states(&self, period: Period) -> Result<Vec<StateCounts>> {
        let url = self.states_url(period);
        let rows: Vec<StateCounts> = self.get_decoded(&url).await?;
        debug!("Parsed {} state rows ({:?}) from {}", rows.len(), period, url);
        Ok(rows)
    }

    pub async fn fetch_history(&self, region: Option<&str>, days: u32) -> Result<Vec<DailyCount>> {
        let url = self.history_url(region, days);
        let json = match (self.http.get_json(url.as_str()).await, region) {
            (Err(TrackerError::Status { status: 404, .. }), Some(name)) => {
                return Err(TrackerError::UnknownRegion(name.to_string()));
            }
            (result, _) => result?,
        };

        // unknown names sometimes come back as 200 with {"message": ...}
        if let (Value::Object(body), Some(name)) = (&json, region) {
            if body.contains_key("message") {
                return Err(TrackerError::UnknownRegion(name.to_string()));
            }
        }

        let rows: Vec<DailyCount> = decode(&url, json)?;
        check_unique_dates(&url, &rows)?;
        debug!("Parsed {} daily rows from {}", rows.len(), url);
        Ok(rows)
    }

    async fn get_decoded<T: DeserializeOwned>(&self, url: &Url) -> Result<T> {
        let json = self.http.get_json(url.as_str()).await?;
        decode(url, json)
    }
}

/// A date may repeat only with identical counts; anything else means the
/// payload mixes several series.
fn check_unique_dates(url: &Url, rows: &[DailyCount]) -> Result<()> {
    let mut seen: HashMap<NaiveDate, &DailyCount> = HashMap::with_capacity(rows.len());
    for row in rows {
        if let Some(previous) = seen.insert(row.date, row) {
            if previous != row {
                return Err(TrackerError::MalformedPayload {
                    url: url.to_string(),
                    reason: format!("conflicting rows for {}", row.date),
                });
            }
        }
    }
    Ok(())
}

fn decode<T: DeserializeOwned>(url: &Url, json: Value) -> Result<T> {
    serde_json::from_value(json).map_err(|e| TrackerError::MalformedPayload {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::http::tests::MockHttpClient;
    use serde_json::json;

    const BASE: &str = "https://disease.sh/v3/covid-19";

    fn api(mock: MockHttpClient) -> DiseaseShApi<MockHttpClient> {
        DiseaseShApi::new(mock, BASE).unwrap()
    }

    #[test]
    fn test_endpoint_urls() {
        let api = api(MockHttpClient::new());
        assert_eq!(
            api.states_url(Period::Current).as_str(),
            "https://disease.sh/v3/covid-19/states?allowNull=true"
        );
        assert_eq!(
            api.states_url(Period::Prior).as_str(),
            "https://disease.sh/v3/covid-19/states?yesterday=true&allowNull=true"
        );
        assert_eq!(
            api.history_url(None, 180).as_str(),
            "https://disease.sh/v3/covid-19/nyt/usa?lastdays=180"
        );
        assert_eq!(
            api.history_url(Some("New York"), 90).as_str(),
            "https://disease.sh/v3/covid-19/nyt/states/New%20York?lastdays=90"
        );
    }

    #[test]
    fn test_trailing_slash_base() {
        let api = DiseaseShApi::new(MockHttpClient::new(), "http://localhost:9000/api/").unwrap();
        assert_eq!(
            api.history_url(None, 60).as_str(),
            "http://localhost:9000/api/nyt/usa?lastdays=60"
        );
    }

    #[test]
    fn test_rejects_unusable_base() {
        assert!(matches!(
            DiseaseShApi::new(MockHttpClient::new(), "mailto:someone@example.com"),
            Err(TrackerError::Config(_))
        ));
        assert!(matches!(
            DiseaseShApi::new(MockHttpClient::new(), "nonsense"),
            Err(TrackerError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_states_keeps_needed_fields() {
        let mock = MockHttpClient::new().with_json(
            &format!("{BASE}/states?allowNull=true"),
            json!([
                {"state": "Texas", "cases": 100, "deaths": 5, "active": 12, "updated": 1},
                {"state": "Iowa", "cases": null, "deaths": null},
                {"state": "Ohio"}
            ]),
        );
        let rows = api(mock).fetch_states(Period::Current).await.unwrap();
        assert_eq!(
            rows,
            vec![
                StateCounts { state: "Texas".into(), cases: Some(100), deaths: Some(5) },
                StateCounts { state: "Iowa".into(), cases: None, deaths: None },
                StateCounts { state: "Ohio".into(), cases: None, deaths: None },
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_states_malformed() {
        let url = format!("{BASE}/states?yesterday=true&allowNull=true");
        let mock = MockHttpClient::new().with_json(&url, json!([{"cases": 1, "deaths": 0}]));
        let err = api(mock).fetch_states(Period::Prior).await.unwrap_err();
        assert!(matches!(err, TrackerError::MalformedPayload { url: ref u, .. } if *u == url));
    }

    #[tokio::test]
    async fn test_fetch_history() {
        let mock = MockHttpClient::new().with_json(
            &format!("{BASE}/nyt/usa?lastdays=2"),
            json!([
                {"date": "2023-03-22", "cases": 10, "deaths": 1},
                {"date": "2023-03-23", "cases": 12}
            ]),
        );
        let rows = api(mock).fetch_history(None, 2).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date.to_string(), "2023-03-22");
        assert_eq!(rows[0].deaths, Some(1));
        assert_eq!(rows[1].cases, 12);
        assert_eq!(rows[1].deaths, None);
    }

    #[tokio::test]
    async fn test_fetch_history_bad_date_is_malformed() {
        let mock = MockHttpClient::new().with_json(
            &format!("{BASE}/nyt/usa?lastdays=1"),
            json!([{"date": "yesterday", "cases": 10}]),
        );
        assert!(matches!(
            api(mock).fetch_history(None, 1).await,
            Err(TrackerError::MalformedPayload { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_history_conflicting_dates() {
        let url = format!("{BASE}/nyt/usa?lastdays=2");
        let mock = MockHttpClient::new().with_json(
            &url,
            json!([
                {"date": "2023-03-22", "cases": 10},
                {"date": "2023-03-22", "cases": 10},
                {"date": "2023-03-23", "cases": 12}
            ]),
        );
        let api = api(mock);
        assert_eq!(api.fetch_history(None, 2).await.unwrap().len(), 3);

        api.http().set_response(
            &url,
            Ok(json!([
                {"date": "2023-03-22", "state": "Alabama", "cases": 10},
                {"date": "2023-03-22", "state": "Alaska", "cases": 4}
            ])),
        );
        assert!(matches!(
            api.fetch_history(None, 2).await,
            Err(TrackerError::MalformedPayload { reason, .. }) if reason.contains("2023-03-22")
        ));
    }

    #[tokio::test]
    async fn test_unknown_region() {
        let mock = MockHttpClient::new().with_json(
            &format!("{BASE}/nyt/states/Narnia?lastdays=180"),
            json!({"message": "State not found or doesn't have any historical data"}),
        );
        let api = api(mock);
        assert_eq!(
            api.fetch_history(Some("Narnia"), 180).await,
            Err(TrackerError::UnknownRegion("Narnia".to_string()))
        );
        // unrouted URLs answer 404
        assert_eq!(
            api.fetch_history(Some("Atlantis"), 180).await,
            Err(TrackerError::UnknownRegion("Atlantis".to_string()))
        );
        assert_eq!(api.http().requests().len(), 2);
    }

    #[tokio::test]
    async fn test_national_404_is_status_error() {
        let api = api(MockHttpClient::new());
        assert!(matches!(
            api.fetch_history(None, 180).await,
            Err(TrackerError::Status { status: 404, .. })
        ));
    }
}
