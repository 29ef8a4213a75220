//! Error types shared by the provider adapters and the aggregation pass.
//!
//! Nothing here is recovered internally: one failing station fails the
//! whole board. [`ErrorKind`] groups the variants into the categories a
//! caller cares about.

use std::time::Duration;

use crate::domain::{InvalidStation, StationCode, TimeError};

/// Broad category of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad invocation or missing credential; raised before any network call.
    Configuration,
    /// Connection failure, timeout, or non-success HTTP status.
    Transport,
    /// The response body did not have the expected shape.
    Protocol,
    /// A well-formed response carrying application-level errors.
    BackendReported,
    /// A field that must hold a time did not.
    Parse,
}

/// Error while mapping a provider record to a [`crate::domain::Departure`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A time field held something other than a time
    #[error("invalid {field} {value:?}: {source}")]
    InvalidTime {
        field: &'static str,
        value: String,
        source: TimeError,
    },
}

/// Errors from fetching a single station's board.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP request failed (network error, timeout inside the client, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The per-station deadline elapsed
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body could not be decoded
    #[error("unexpected response: {message}")]
    Protocol {
        message: String,
        body: Option<String>,
    },

    /// Response envelope carried an error list
    #[error("provider reported errors: {}", .messages.join("; "))]
    BackendReported { messages: Vec<String> },

    /// A record could not be normalized
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// The station code is not usable with this provider
    #[error(transparent)]
    InvalidStation(#[from] InvalidStation),
}

impl FetchError {
    /// Build a protocol error, keeping the head of the offending body.
    pub fn protocol(message: impl ToString, body: &str) -> Self {
        FetchError::Protocol {
            message: message.to_string(),
            body: Some(body.chars().take(500).collect()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Http(_) | FetchError::Timeout(_) | FetchError::Status { .. } => {
                ErrorKind::Transport
            }
            FetchError::Protocol { .. } => ErrorKind::Protocol,
            FetchError::BackendReported { .. } => ErrorKind::BackendReported,
            FetchError::Conversion(_) => ErrorKind::Parse,
            FetchError::InvalidStation(_) => ErrorKind::Configuration,
        }
    }
}

/// Errors detected while building the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No station codes were given
    #[error("no stations")]
    NoStations,

    /// The credential variable is unset or empty
    #[error("no token: set {var}")]
    MissingToken { var: &'static str },

    /// The credential cannot be sent as a header or XML text
    #[error("invalid token format")]
    InvalidToken,

    /// A station argument is malformed
    #[error(transparent)]
    InvalidStation(#[from] InvalidStation),

    /// An option is outside its accepted range
    #[error("invalid option {name}: {message}")]
    InvalidOption {
        name: &'static str,
        message: String,
    },

    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Top-level error for one invocation.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Fetching one station failed, so the whole board failed
    #[error("{station}: {source}")]
    Station {
        station: StationCode,
        source: FetchError,
    },

    #[error("failed to encode output: {0}")]
    Render(#[from] serde_json::Error),

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl BoardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BoardError::Config(_) => ErrorKind::Configuration,
            BoardError::Station { source, .. } => source.kind(),
            BoardError::Render(_) | BoardError::Io(_) => ErrorKind::Protocol,
        }
    }
}
