//! Darwin OpenLDBWS SOAP client.
//!
//! One POST per station. The access token travels inside the SOAP header,
//! not as an HTTP header.

use std::time::Duration;

use tracing::{debug, trace};

use crate::domain::{Crs, FetchOptions, StationCode};
use crate::error::{ConfigError, FetchError};

use super::envelope::departure_board_request;
use super::types::{Body, Envelope, StationBoard};

/// Default endpoint for the Darwin Lite SOAP API.
pub const DEFAULT_ENDPOINT: &str = "https://lite.realtime.nationalrail.co.uk/OpenLDBWS/ldb11.asmx";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Configuration for the Darwin client.
#[derive(Debug, Clone)]
pub struct DarwinConfig {
    /// Access token placed in the SOAP header
    pub token: String,
    /// SOAP endpoint (defaults to production Darwin)
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl DarwinConfig {
    /// Create a new config with the given token.
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

/// Darwin departure board client.
#[derive(Debug, Clone)]
pub struct DarwinClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl DarwinClient {
    /// Create a new Darwin client with the given configuration.
    pub fn new(config: DarwinConfig) -> Result<Self, ConfigError> {
        if config.token.is_empty() {
            return Err(ConfigError::MissingToken {
                var: "DARWIN_TOKEN",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ConfigError::Client)?;

        Ok(Self {
            http,
            endpoint: config.endpoint,
            token: config.token,
        })
    }

    /// Fetch the departure board for one station.
    ///
    /// The station must be a CRS code; lowercase is accepted. A SOAP fault
    /// is reported as [`FetchError::BackendReported`], never as an empty
    /// board.
    pub async fn get_departure_board(
        &self,
        station: &StationCode,
        options: &FetchOptions,
    ) -> Result<StationBoard, FetchError> {
        let crs = Crs::from_station(station)?;
        let payload = departure_board_request(&self.token, &crs, options);

        debug!(%crs, rows = options.effective_rows(), "requesting Darwin departure board");

        let response = self
            .http
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "text/xml")
            .body(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        trace!(%crs, %status, bytes = body.len(), "Darwin response received");

        parse_response(status, &body)
    }
}

/// Interpret a SOAP response body.
///
/// Faults are reported even when the HTTP status is an error, since Darwin
/// answers a bad token with a 500 carrying a fault.
fn parse_response(status: reqwest::StatusCode, body: &str) -> Result<StationBoard, FetchError> {
    let envelope = quick_xml::de::from_str::<Envelope>(body);

    match envelope {
        Ok(Envelope {
            body: Body {
                fault: Some(fault), ..
            },
        }) => Err(FetchError::BackendReported {
            messages: fault.messages(),
        }),
        _ if !status.is_success() => Err(FetchError::Status {
            status: status.as_u16(),
            message: body.chars().take(500).collect(),
        }),
        Ok(Envelope {
            body: Body {
                response: Some(response),
                ..
            },
        }) => Ok(response.result),
        Ok(_) => Err(FetchError::protocol(
            "SOAP body has no GetDepartureBoardResponse",
            body,
        )),
        Err(e) => Err(FetchError::protocol(e, body)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::darwin::types::fixtures::{EMPTY_BOARD, FAULT, KGX_BOARD};
    use crate::error::ErrorKind;
    use crate::testing::Stub;
    use axum::http::StatusCode;

    fn kgx() -> StationCode {
        StationCode::parse("KGX").unwrap()
    }

    async fn client_for(stub: &Stub) -> DarwinClient {
        DarwinClient::new(DarwinConfig::new("test-token").with_endpoint(stub.url.clone())).unwrap()
    }

    #[test]
    fn config_builder() {
        let config = DarwinConfig::new("test-token")
            .with_endpoint("http://localhost:8080")
            .with_timeout(60);

        assert_eq!(config.token, "test-token");
        assert_eq!(config.endpoint, "http://localhost:8080");
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn config_defaults() {
        let config = DarwinConfig::new("test-token");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn empty_token_rejected() {
        let err = DarwinClient::new(DarwinConfig::new("")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingToken { .. }));
    }

    #[tokio::test]
    async fn fetches_and_parses_board() {
        let stub = Stub::start(StatusCode::OK, "text/xml", KGX_BOARD).await;
        let client = client_for(&stub).await;

        let options = FetchOptions::new().with_rows(5).with_window(30);
        let board = client.get_departure_board(&kgx(), &options).await.unwrap();

        assert_eq!(board.location_name.as_deref(), Some("London Kings Cross"));
        assert_eq!(board.train_services().len(), 3);

        let requests = stub.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.headers["content-type"], "text/xml");
        assert!(request.body.contains("<typ:TokenValue>test-token</typ:TokenValue>"));
        assert!(request.body.contains("<ldb:numRows>5</ldb:numRows>"));
        assert!(request.body.contains("<ldb:timeWindow>30</ldb:timeWindow>"));
        assert!(!request.body.contains("timeOffset"));
    }

    #[tokio::test]
    async fn lowercase_station_is_sent_as_crs() {
        let stub = Stub::start(StatusCode::OK, "text/xml", EMPTY_BOARD).await;
        let client = client_for(&stub).await;

        let station = StationCode::parse("ely").unwrap();
        let board = client
            .get_departure_board(&station, &FetchOptions::new())
            .await
            .unwrap();

        assert!(board.train_services().is_empty());
        assert!(stub.requests()[0].body.contains("<ldb:crs>ELY</ldb:crs>"));
    }

    #[tokio::test]
    async fn invalid_station_never_hits_network() {
        let stub = Stub::start(StatusCode::OK, "text/xml", EMPTY_BOARD).await;
        let client = client_for(&stub).await;

        let station = StationCode::parse("HSL:1220409").unwrap();
        let err = client
            .get_departure_board(&station, &FetchOptions::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(stub.requests().is_empty());
    }

    #[tokio::test]
    async fn fault_is_backend_error() {
        let stub = Stub::start(StatusCode::INTERNAL_SERVER_ERROR, "text/xml", FAULT).await;
        let client = client_for(&stub).await;

        let err = client
            .get_departure_board(&kgx(), &FetchOptions::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::BackendReported);
        assert!(err.to_string().contains("Unauthorized"));
    }

    #[tokio::test]
    async fn non_xml_error_status_is_transport_error() {
        let stub = Stub::start(StatusCode::SERVICE_UNAVAILABLE, "text/html", "<html>down").await;
        let client = client_for(&stub).await;

        let err = client
            .get_departure_board(&kgx(), &FetchOptions::new())
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn garbage_body_is_protocol_error() {
        let stub = Stub::start(StatusCode::OK, "text/xml", "not xml at all").await;
        let client = client_for(&stub).await;

        let err = client
            .get_departure_board(&kgx(), &FetchOptions::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Protocol);
    }

    #[test]
    fn envelope_without_board_is_protocol_error() {
        let body = r#"<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope"><soap:Body></soap:Body></soap:Envelope>"#;
        let err = parse_response(reqwest::StatusCode::OK, body).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Protocol);
    }
}
