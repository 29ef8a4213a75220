//! Digitransit GraphQL response DTOs.

use serde::Deserialize;

use crate::error::FetchError;

/// The standard GraphQL response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<Vec<GraphError>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphError {
    pub message: String,
}

impl<T> GraphResponse<T> {
    /// Unwrap the data, treating any reported error as a failure.
    ///
    /// A response carrying both data and errors is still a failure: partial
    /// data would look like a quiet stop.
    pub fn into_data(self) -> Result<T, FetchError> {
        if let Some(errors) = self.errors.filter(|e| !e.is_empty()) {
            return Err(FetchError::BackendReported {
                messages: errors.into_iter().map(|e| e.message).collect(),
            });
        }

        self.data.ok_or_else(|| FetchError::Protocol {
            message: "GraphQL response has neither data nor errors".to_string(),
            body: None,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StopQueryResponse {
    /// `null` when the stop id is unknown.
    pub stop: Option<Stop>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub name: String,
    pub desc: Option<String>,
    pub code: Option<String>,
    /// "BUS", "TRAM", "RAIL", "SUBWAY", "FERRY", ...
    pub vehicle_mode: Option<String>,
    pub vehicle_type: Option<i32>,
    #[serde(rename = "stoptimesWithoutPatterns", default)]
    pub stop_times: Vec<StopTime>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopTime {
    pub trip: Option<Trip>,
    /// Seconds since the start of the service day.
    pub scheduled_arrival: u64,
    /// Seconds since the start of the service day.
    pub realtime_arrival: Option<u64>,
    pub arrival_delay: Option<i64>,
    /// "SCHEDULED", "UPDATED", "CANCELED", ...
    pub realtime_state: Option<String>,
    pub headsign: Option<String>,
    pub pickup_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub route: Option<Route>,
    pub service_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub short_name: Option<String>,
}
