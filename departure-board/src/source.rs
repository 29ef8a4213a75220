//! The single fetch capability the aggregator depends on.
//!
//! Each provider answers with its own raw shape. Those shapes form a closed
//! set ([`RawBoard`]) and are normalized in one place, so the rest of the
//! crate only ever sees [`Departure`].

use std::future::Future;

use crate::darwin::{self, DarwinClient, StationBoard};
use crate::domain::{Departure, FetchOptions, ReferenceTime, StationCode};
use crate::error::{ConversionError, FetchError};
use crate::transit::{self, Stop, TransitClient};

/// A provider's unnormalized answer for one station.
#[derive(Debug, Clone)]
pub enum RawBoard {
    Rail(StationBoard),
    Transit(Stop),
}

impl RawBoard {
    /// The provider's own name for the station, if it sent one.
    pub fn display_name(&self) -> Option<&str> {
        let name = match self {
            RawBoard::Rail(board) => board.location_name.as_deref(),
            RawBoard::Transit(stop) => Some(stop.name.as_str()),
        };
        name.filter(|name| !name.is_empty())
    }

    /// Map every record to a canonical departure for `station`.
    pub fn normalize(
        &self,
        station: &StationCode,
        reference: &ReferenceTime,
    ) -> Result<Vec<Departure>, ConversionError> {
        match self {
            RawBoard::Rail(board) => darwin::convert_station_board(board, station, reference),
            RawBoard::Transit(stop) => transit::convert_stop(stop, station, reference),
        }
    }
}

/// Fetches the raw board for one station.
///
/// Implementations must not share mutable state between calls: the
/// aggregator issues several fetches concurrently with the same options.
pub trait DepartureSource {
    fn fetch(
        &self,
        station: &StationCode,
        options: &FetchOptions,
    ) -> impl Future<Output = Result<RawBoard, FetchError>> + Send;
}

/// The configured upstream, chosen once at startup.
#[derive(Debug, Clone)]
pub enum Provider {
    Rail(DarwinClient),
    Transit(TransitClient),
}

impl DepartureSource for Provider {
    async fn fetch(
        &self,
        station: &StationCode,
        options: &FetchOptions,
    ) -> Result<RawBoard, FetchError> {
        match self {
            Provider::Rail(client) => client
                .get_departure_board(station, options)
                .await
                .map(RawBoard::Rail),
            Provider::Transit(client) => client.get_stop(station, options).await.map(RawBoard::Transit),
        }
    }
}
