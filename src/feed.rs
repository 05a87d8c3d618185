//! Retrieval of the Buienradar station feed.

use crate::errors::FetchError;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use std::time::Duration;

/// Buienradar JSON feed URL.
pub const DEFAULT_URL: &str = "https://data.buienradar.nl/2.0/feed/json";
/// Default bound on a single request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = concat!(
    "station-snapshot/",
    env!("CARGO_PKG_VERSION"),
    " (Rust)"
);

/// Anything that can produce the current feed contents.
pub trait SnapshotSource {
    /// Retrieve the current payload. Must not block indefinitely.
    fn fetch_snapshot(&mut self) -> Result<FeedPayload, FetchError>;
}

impl<F> SnapshotSource for F
where
    F: FnMut() -> Result<FeedPayload, FetchError>,
{
    fn fetch_snapshot(&mut self) -> Result<FeedPayload, FetchError> {
        self()
    }
}

/// Top level of the feed document. Only the parts we store are modelled.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct FeedPayload {
    /// Current observations, absent when the feed has nothing to report.
    #[serde(default)]
    pub actual: Option<FeedActual>,
}

/// The `actual` section of the feed.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct FeedActual {
    /// One record per station.
    #[serde(rename = "stationmeasurements", default)]
    pub station_measurements: Vec<FeedRecord>,
}

/// A station and its measurement, flattened the way the feed sends them.
#[allow(missing_docs)]
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
pub struct FeedRecord {
    #[serde(rename = "stationid")]
    pub station_id: Option<u32>,
    #[serde(rename = "stationname")]
    pub station_name: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    #[serde(rename = "regio")]
    pub region: Option<String>,
    /// Local time as sent by the feed, parsed during translation.
    pub timestamp: Option<String>,
    pub temperature: Option<f64>,
    #[serde(rename = "groundtemperature")]
    pub ground_temperature: Option<f64>,
    #[serde(rename = "feeltemperature")]
    pub feel_temperature: Option<f64>,
    #[serde(rename = "windgusts")]
    pub wind_gusts: Option<f64>,
    #[serde(rename = "windspeedBft")]
    pub wind_speed_bft: Option<u32>,
    pub humidity: Option<f64>,
    pub precipitation: Option<f64>,
    #[serde(rename = "sunpower")]
    pub sun_power: Option<f64>,
}

impl FeedPayload {
    /// Build a payload around a list of records.
    pub fn from_records(records: Vec<FeedRecord>) -> Self {
        FeedPayload {
            actual: Some(FeedActual {
                station_measurements: records,
            }),
        }
    }

    /// Parse a feed document.
    pub fn from_json(text: &str) -> Result<Self, FetchError> {
        Ok(serde_json::from_str(text)?)
    }

    /// The station records, empty if the feed left them out.
    pub fn records(&self) -> &[FeedRecord] {
        self.actual
            .as_ref()
            .map(|actual| actual.station_measurements.as_slice())
            .unwrap_or(&[])
    }
}

/// Blocking HTTP client for the Buienradar feed.
#[derive(Debug)]
pub struct BuienradarFeed {
    url: String,
    client: reqwest::blocking::Client,
}

impl BuienradarFeed {
    /// Create a client for `url` where every request is bounded by `timeout`.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            HeaderValue::from_static(USER_AGENT),
        );

        let client = reqwest::blocking::Client::builder()
            .gzip(true)
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|source| FetchError::Network {
                url: url.to_owned(),
                source,
            })?;

        Ok(BuienradarFeed {
            url: url.to_owned(),
            client,
        })
    }

    /// The URL this client reads from.
    pub fn url(&self) -> &str {
        &self.url
    }

    fn transport_error(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.url.clone())
        } else {
            FetchError::Network {
                url: self.url.clone(),
                source: err,
            }
        }
    }
}

impl SnapshotSource for BuienradarFeed {
    fn fetch_snapshot(&mut self) -> Result<FeedPayload, FetchError> {
        debug!("Requesting {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .send()
            .map_err(|err| self.transport_error(err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: self.url.clone(),
                status,
            });
        }

        let body = response.text().map_err(|err| self.transport_error(err))?;
        debug!("Received {} bytes from {}", body.len(), self.url);
        FeedPayload::from_json(&body)
    }
}
