//! Darwin SOAP response DTOs.
//!
//! These types map directly to the OpenLDBWS `GetDepartureBoard` response.
//! Element namespace prefixes (`soap:`, `lt4:`, `lt5:` ...) are ignored by
//! the deserializer, so only local names appear here. Darwin omits empty
//! elements rather than sending them, hence the liberal use of `Option`.

use serde::Deserialize;

/// SOAP envelope around either a board or a fault.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    #[serde(rename = "Body")]
    pub body: Body,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Body {
    #[serde(rename = "GetDepartureBoardResponse")]
    pub response: Option<DepartureBoardResponse>,

    #[serde(rename = "Fault")]
    pub fault: Option<Fault>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DepartureBoardResponse {
    #[serde(rename = "GetStationBoardResult")]
    pub result: StationBoard,
}

/// The departure board for one station.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationBoard {
    /// When this response was generated (ISO 8601 datetime).
    pub generated_at: Option<String>,

    /// Human-readable name of the station.
    pub location_name: Option<String>,

    /// CRS code of the station.
    pub crs: Option<String>,

    /// Network Rail communication messages.
    pub nrcc_messages: Option<NrccMessages>,

    /// Train services at this station.
    pub train_services: Option<ServiceList>,

    /// Bus replacement services.
    pub bus_services: Option<ServiceList>,
}

impl StationBoard {
    pub fn train_services(&self) -> &[ServiceItem] {
        self.train_services
            .as_ref()
            .map(|l| l.services.as_slice())
            .unwrap_or(&[])
    }

    pub fn bus_services(&self) -> &[ServiceItem] {
        self.bus_services
            .as_ref()
            .map(|l| l.services.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NrccMessages {
    #[serde(rename = "message", default)]
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceList {
    #[serde(rename = "service", default)]
    pub services: Vec<ServiceItem>,
}

/// A service on the departure board.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceItem {
    /// Scheduled time of departure from this station.
    pub std: Option<String>,

    /// Estimated time of departure from this station.
    /// May be "On time", "Delayed", "Cancelled", or a time like "10:15".
    pub etd: Option<String>,

    /// Platform number/letter.
    pub platform: Option<String>,

    /// Train operating company name.
    pub operator: Option<String>,

    /// Train operating company ATOC code.
    pub operator_code: Option<String>,

    /// Service type (train, bus, ferry).
    pub service_type: Option<String>,

    /// Train length in coaches.
    pub length: Option<String>,

    /// Ephemeral Darwin service ID.
    #[serde(rename = "serviceID")]
    pub service_id: Option<String>,

    pub origin: Option<LocationList>,

    pub destination: Option<LocationList>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationList {
    #[serde(rename = "location", default)]
    pub locations: Vec<ServiceLocation>,
}

/// Origin or destination location.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLocation {
    pub location_name: String,
    pub crs: Option<String>,
    /// "via" text (e.g., "via Bristol Parkway").
    pub via: Option<String>,
}

/// SOAP fault, in either the 1.2 (`Reason/Text`) or 1.1 (`faultstring`) shape.
#[derive(Debug, Clone, Deserialize)]
pub struct Fault {
    #[serde(rename = "Reason")]
    pub reason: Option<FaultReason>,

    #[serde(rename = "faultstring")]
    pub fault_string: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FaultReason {
    #[serde(rename = "Text", default)]
    pub texts: Vec<FaultText>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FaultText {
    #[serde(rename = "$text", default)]
    pub value: String,
}

impl Fault {
    /// All human-readable reasons carried by the fault.
    pub fn messages(&self) -> Vec<String> {
        let mut messages: Vec<String> = self
            .reason
            .iter()
            .flat_map(|r| r.texts.iter())
            .map(|t| t.value.trim().to_string())
            .chain(self.fault_string.iter().map(|s| s.trim().to_string()))
            .filter(|s| !s.is_empty())
            .collect();

        if messages.is_empty() {
            messages.push("SOAP fault".to_string());
        }
        messages
    }
}
