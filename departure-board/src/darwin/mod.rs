//! Darwin LDB (Live Departure Boards) rail adapter.
//!
//! Talks to the National Rail OpenLDBWS SOAP service. Key characteristics:
//! - Requests are SOAP 1.2 envelopes with the access token in the header
//! - Station codes are 3-letter CRS codes
//! - Times are "HH:MM" strings (UK local time); estimates may instead be a
//!   status word such as "Delayed" or "Cancelled"

mod client;
mod convert;
mod envelope;
mod types;

pub use client::{DEFAULT_ENDPOINT, DarwinClient, DarwinConfig};
pub use convert::{convert_service_item, convert_station_board};
pub use envelope::departure_board_request;
pub use types::{ServiceItem, ServiceLocation, StationBoard};

#[cfg(test)]
pub(crate) use types::fixtures;
