//! The canonical departure record every provider is normalized into.

use std::fmt;

use chrono::NaiveTime;

use super::StationCode;
use super::time::{ReferenceTime, format_hhmm, same_minute, sort_key};

/// How a departure's live estimate is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expected {
    /// The departure is expected at this time of day.
    At(NaiveTime),
    /// A status annotation in place of a time, e.g. "Delayed" or "Cancelled".
    /// Kept verbatim.
    Status(String),
}

/// Vehicle type, shown as a single letter on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleMode {
    Rail,
    Tram,
    Metro,
    Bus,
    Ferry,
    Unknown,
}

impl VehicleMode {
    /// Map a provider's upper-case mode name.
    pub fn from_provider(mode: &str) -> Self {
        match mode {
            "RAIL" => VehicleMode::Rail,
            "TRAM" => VehicleMode::Tram,
            "METRO" | "SUBWAY" => VehicleMode::Metro,
            "BUS" => VehicleMode::Bus,
            "FERRY" => VehicleMode::Ferry,
            _ => VehicleMode::Unknown,
        }
    }

    /// Single-letter display code. Unknown modes get `?`.
    pub fn short_code(&self) -> char {
        match self {
            VehicleMode::Rail => 'R',
            VehicleMode::Tram => 'T',
            VehicleMode::Metro => 'M',
            VehicleMode::Bus => 'B',
            VehicleMode::Ferry => 'F',
            VehicleMode::Unknown => '?',
        }
    }
}

impl fmt::Display for VehicleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_code())
    }
}

/// A single upcoming departure from one of the queried stations.
///
/// `station` is always the code the caller asked for, never the name the
/// provider echoed back. The sort key is derived from the scheduled time at
/// construction and cannot be set directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    /// Line or route identifier; empty for rail services.
    pub service: String,
    /// Headsign or final destination.
    pub destination: String,
    /// The station code this departure was fetched for.
    pub station: StationCode,
    /// Platform or stand; empty if not applicable.
    pub platform: String,
    /// Vehicle type.
    pub mode: VehicleMode,
    /// Live estimate.
    pub expected: Expected,
    scheduled: NaiveTime,
    sort_key: u32,
}

impl Departure {
    /// Create a departure scheduled at `scheduled`, keyed against `reference`.
    ///
    /// The estimate starts out equal to the scheduled time.
    pub fn new(station: StationCode, scheduled: NaiveTime, reference: &ReferenceTime) -> Self {
        Self {
            service: String::new(),
            destination: String::new(),
            station,
            platform: String::new(),
            mode: VehicleMode::Unknown,
            expected: Expected::At(scheduled),
            scheduled,
            sort_key: sort_key(scheduled, reference),
        }
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = destination.into();
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    pub fn with_mode(mut self, mode: VehicleMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_expected(mut self, expected: Expected) -> Self {
        self.expected = expected;
        self
    }

    /// Scheduled time of day.
    pub fn scheduled(&self) -> NaiveTime {
        self.scheduled
    }

    /// Minutes-since-reference-midnight ordering key.
    pub fn sort_key(&self) -> u32 {
        self.sort_key
    }

    /// Whether the estimate matches the schedule to the minute.
    pub fn is_on_time(&self) -> bool {
        matches!(self.expected, Expected::At(t) if same_minute(t, self.scheduled))
    }

    /// Scheduled time as "HH:MM".
    pub fn due_label(&self) -> String {
        format_hhmm(self.scheduled)
    }

    /// "On time", an explicit "HH:MM", or the provider's status token.
    pub fn expected_label(&self) -> String {
        match &self.expected {
            Expected::At(_) if self.is_on_time() => "On time".to_string(),
            Expected::At(t) => format_hhmm(*t),
            Expected::Status(status) => status.clone(),
        }
    }
}
