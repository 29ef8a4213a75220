//! Conversion from Darwin DTOs to canonical departures.

use chrono::NaiveTime;

use crate::domain::{Departure, Expected, ReferenceTime, StationCode, VehicleMode, parse_hhmm};
use crate::error::ConversionError;

use super::types::{ServiceItem, StationBoard};

/// Service label given to rail replacement buses.
const BUS_SERVICE: &str = "BUS";

/// Convert a departure board into canonical departures.
///
/// Train services come first, then bus services, each in board order.
/// A service with an unreadable scheduled time fails the whole board: its
/// sort position would be unknown.
pub fn convert_station_board(
    board: &StationBoard,
    station: &StationCode,
    reference: &ReferenceTime,
) -> Result<Vec<Departure>, ConversionError> {
    let trains = board
        .train_services()
        .iter()
        .map(|item| convert_service_item(item, VehicleMode::Rail, station, reference));

    let buses = board.bus_services().iter().map(|item| {
        convert_service_item(item, VehicleMode::Bus, station, reference)
            .map(|d| d.with_service(BUS_SERVICE))
    });

    trains.chain(buses).collect()
}

/// Convert a single service item.
pub fn convert_service_item(
    item: &ServiceItem,
    mode: VehicleMode,
    station: &StationCode,
    reference: &ReferenceTime,
) -> Result<Departure, ConversionError> {
    let std = item
        .std
        .as_deref()
        .ok_or(ConversionError::MissingField("std (scheduled departure)"))?;
    let scheduled = parse_hhmm(std).map_err(|source| ConversionError::InvalidTime {
        field: "std",
        value: std.to_string(),
        source,
    })?;

    let departure = Departure::new(station.clone(), scheduled, reference)
        .with_destination(parse_destination(item))
        .with_platform(item.platform.clone().unwrap_or_default())
        .with_mode(mode)
        .with_expected(parse_expected_time(item.etd.as_deref(), scheduled));

    Ok(departure)
}

/// Parse an expected time field, which may be a time or a status string.
///
/// Anything that is neither "On time" nor an "HH:MM" time is kept verbatim.
fn parse_expected_time(etd: Option<&str>, scheduled: NaiveTime) -> Expected {
    match etd.map(str::trim) {
        None | Some("") | Some("On time") => Expected::At(scheduled),
        Some(token) => match parse_hhmm(token) {
            Ok(time) => Expected::At(time),
            Err(_) => Expected::Status(token.to_string()),
        },
    }
}

/// Extract the destination name, joining split services with " & ".
fn parse_destination(item: &ServiceItem) -> String {
    let destinations = item
        .destination
        .as_ref()
        .map(|l| l.locations.as_slice())
        .unwrap_or(&[]);

    if destinations.is_empty() {
        return "Unknown".to_string();
    }

    destinations
        .iter()
        .map(|d| d.location_name.as_str())
        .collect::<Vec<_>>()
        .join(" & ")
}
