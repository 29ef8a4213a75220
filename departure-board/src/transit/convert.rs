//! Conversion from Digitransit stop times to canonical departures.

use chrono::NaiveTime;

use crate::domain::{
    Departure, Expected, ReferenceTime, StationCode, VehicleMode, from_service_day_seconds,
};
use crate::error::ConversionError;

use super::types::{Stop, StopTime};

/// Convert every stop time of a stop, preserving response order.
pub fn convert_stop(
    stop: &Stop,
    station: &StationCode,
    reference: &ReferenceTime,
) -> Result<Vec<Departure>, ConversionError> {
    let mode = stop
        .vehicle_mode
        .as_deref()
        .map(VehicleMode::from_provider)
        .unwrap_or(VehicleMode::Unknown);

    stop.stop_times
        .iter()
        .map(|st| convert_stop_time(st, mode, station, reference))
        .collect()
}

/// Convert a single stop time.
pub fn convert_stop_time(
    stop_time: &StopTime,
    mode: VehicleMode,
    station: &StationCode,
    reference: &ReferenceTime,
) -> Result<Departure, ConversionError> {
    let scheduled = time_of_day(
        "scheduledArrival",
        stop_time.scheduled_arrival,
        reference,
    )?;

    let expected = match stop_time.realtime_arrival {
        Some(seconds) if seconds != stop_time.scheduled_arrival => {
            Expected::At(time_of_day("realtimeArrival", seconds, reference)?)
        }
        _ => Expected::At(scheduled),
    };

    let service = stop_time
        .trip
        .as_ref()
        .and_then(|t| t.route.as_ref())
        .and_then(|r| r.short_name.clone())
        .unwrap_or_default();

    let destination = stop_time
        .headsign
        .clone()
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "Unknown".to_string());

    Ok(Departure::new(station.clone(), scheduled, reference)
        .with_service(service)
        .with_destination(destination)
        .with_mode(mode)
        .with_expected(expected))
}

fn time_of_day(
    field: &'static str,
    seconds: u64,
    reference: &ReferenceTime,
) -> Result<NaiveTime, ConversionError> {
    from_service_day_seconds(reference.service_day(), seconds)
        .map(|dt| dt.time())
        .map_err(|source| ConversionError::InvalidTime {
            field,
            value: seconds.to_string(),
            source,
        })
}
