//! Validated value types shared by both providers.
//!
//! Station codes, fetch options, and times are checked at construction, so
//! the adapters and the aggregator can take them at face value.

mod departure;
mod options;
mod station;
mod time;

pub use departure::{Departure, Expected, VehicleMode};
pub use options::{DEFAULT_ROWS, FetchOptions};
pub use station::{Crs, InvalidStation, StationCode};
pub use time::{
    MIDDAY_HOUR, ReferenceTime, TimeError, format_hhmm, from_service_day_seconds, parse_hhmm,
    same_minute, sort_key,
};
