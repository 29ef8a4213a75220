//! Digitransit GraphQL client.

use std::time::Duration;

use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, trace};

use crate::domain::{FetchOptions, StationCode};
use crate::error::{ConfigError, FetchError};

use super::query::departures_query;
use super::types::{GraphResponse, Stop, StopQueryResponse};

/// Default endpoint for the HSL routing API.
pub const DEFAULT_ENDPOINT: &str =
    "https://api.digitransit.fi/routing/v1/routers/hsl/index/graphql";

/// Header carrying the subscription key.
const AUTH_HEADER: &str = "digitransit-subscription-key";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Configuration for the transit client.
#[derive(Debug, Clone)]
pub struct TransitConfig {
    /// Subscription key for the API
    pub token: String,
    /// GraphQL endpoint
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl TransitConfig {
    /// Create a new config with the given subscription key.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom endpoint (for testing).
    pub fn with_endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Digitransit stop departures client.
#[derive(Debug, Clone)]
pub struct TransitClient {
    http: reqwest::Client,
    endpoint: String,
}

impl TransitClient {
    /// Create a new client with the given configuration.
    pub fn new(config: TransitConfig) -> Result<Self, ConfigError> {
        if config.token.is_empty() {
            return Err(ConfigError::MissingToken {
                var: "DIGITRANSIT_TOKEN",
            });
        }

        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.token).map_err(|_| ConfigError::InvalidToken)?;
        headers.insert(HeaderName::from_static(AUTH_HEADER), key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ConfigError::Client)?;

        Ok(Self {
            http,
            endpoint: config.endpoint,
        })
    }

    /// Fetch upcoming stop times for one stop.
    ///
    /// An unknown stop id comes back as `stop: null`, which is reported as
    /// [`FetchError::BackendReported`] rather than an empty board.
    pub async fn get_stop(
        &self,
        station: &StationCode,
        options: &FetchOptions,
    ) -> Result<Stop, FetchError> {
        let request = departures_query(station, options, Utc::now());

        debug!(stop = %station, rows = request.variables.num, "querying Digitransit");

        let response = self.http.post(&self.endpoint).json(&request).send().await?;

        let status = response.status();
        let body = response.text().await?;

        trace!(stop = %station, %status, bytes = body.len(), "Digitransit response received");

        parse_response(status, &body, station)
    }
}

fn parse_response(
    status: reqwest::StatusCode,
    body: &str,
    station: &StationCode,
) -> Result<Stop, FetchError> {
    let parsed = serde_json::from_str::<GraphResponse<StopQueryResponse>>(body);

    let response = match parsed {
        // GraphQL servers may report validation errors with a 4xx status
        Ok(response) if response.errors.as_ref().is_some_and(|e| !e.is_empty()) => response,
        _ if !status.is_success() => {
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }
        Ok(response) => response,
        Err(e) => return Err(FetchError::protocol(e, body)),
    };

    response
        .into_data()?
        .stop
        .ok_or_else(|| FetchError::BackendReported {
            messages: vec![format!("stop {station} not found")],
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::testing::Stub;
    use crate::transit::types::fixtures::{TRAM_STOP, UNKNOWN_STOP, VALIDATION_ERROR};
    use axum::http::StatusCode;

    fn stop() -> StationCode {
        StationCode::parse("HSL:1040129").unwrap()
    }

    fn client_for(stub: &Stub) -> TransitClient {
        TransitClient::new(TransitConfig::new("sub-key").with_endpoint(stub.url.clone())).unwrap()
    }

    #[test]
    fn config_defaults() {
        let config = TransitConfig::new("sub-key");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);

        let config = config.with_endpoint("http://localhost:1").with_timeout(9);
        assert_eq!(config.endpoint, "http://localhost:1");
        assert_eq!(config.timeout_secs, 9);
    }

    #[test]
    fn token_must_be_header_safe() {
        let err = TransitClient::new(TransitConfig::new("bad\nkey")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidToken));

        let err = TransitClient::new(TransitConfig::new("")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingToken { .. }));
    }

    #[tokio::test]
    async fn fetches_stop_with_auth_header() {
        let stub = Stub::start(StatusCode::OK, "application/json", TRAM_STOP).await;
        let client = client_for(&stub);

        let options = FetchOptions::new().with_rows(3);
        let stop_data = client.get_stop(&stop(), &options).await.unwrap();
        assert_eq!(stop_data.name, "Kaivopuisto");
        assert_eq!(stop_data.stop_times.len(), 2);

        let requests = stub.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.headers[AUTH_HEADER], "sub-key");
        assert_eq!(request.headers["content-type"], "application/json");

        let sent: serde_json::Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(sent["variables"]["stop"], "HSL:1040129");
        assert_eq!(sent["variables"]["num"], 3);
        assert!(sent["variables"].get("startTime").is_none());
        assert!(sent["variables"].get("timeRange").is_none());
    }

    #[tokio::test]
    async fn offset_and_window_are_sent() {
        let stub = Stub::start(StatusCode::OK, "application/json", TRAM_STOP).await;
        let client = client_for(&stub);

        let options = FetchOptions::new().with_offset(10).with_window(20);
        let before = Utc::now().timestamp() + 600;
        client.get_stop(&stop(), &options).await.unwrap();
        let after = Utc::now().timestamp() + 600;

        let sent: serde_json::Value = serde_json::from_str(&stub.requests()[0].body).unwrap();
        let start = sent["variables"]["startTime"].as_i64().unwrap();
        assert!(start >= before && start <= after);
        assert_eq!(sent["variables"]["timeRange"], 1200);
    }

    #[tokio::test]
    async fn errors_array_fails_station() {
        let stub = Stub::start(StatusCode::BAD_REQUEST, "application/json", VALIDATION_ERROR).await;
        let client = client_for(&stub);

        let err = client.get_stop(&stop(), &FetchOptions::new()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BackendReported);
    }

    #[tokio::test]
    async fn unknown_stop_fails_station() {
        let stub = Stub::start(StatusCode::OK, "application/json", UNKNOWN_STOP).await;
        let client = client_for(&stub);

        let err = client.get_stop(&stop(), &FetchOptions::new()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BackendReported);
        assert!(err.to_string().contains("HSL:1040129 not found"));
    }

    #[tokio::test]
    async fn html_body_is_protocol_error() {
        let stub = Stub::start(StatusCode::OK, "text/html", "<html></html>").await;
        let client = client_for(&stub);

        let err = client.get_stop(&stop(), &FetchOptions::new()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Protocol);
    }

    #[tokio::test]
    async fn server_error_is_transport_error() {
        let stub = Stub::start(StatusCode::BAD_GATEWAY, "text/plain", "upstream down").await;
        let client = client_for(&stub);

        let err = client.get_stop(&stop(), &FetchOptions::new()).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 502, .. }));
        assert_eq!(err.kind(), ErrorKind::Transport);
    }
}
