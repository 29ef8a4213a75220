//! Multi-station fan-out, merge, and truncation.
//!
//! Stations are fetched with bounded concurrency, each under its own
//! deadline. Results are collected in station order no matter which call
//! finishes first, then stably sorted by sort key, so the final board is a
//! pure function of the responses.

use std::collections::BTreeMap;
use std::time::Duration;

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::debug;

use crate::domain::{Departure, FetchOptions, ReferenceTime, StationCode};
use crate::error::{BoardError, FetchError};
use crate::source::DepartureSource;

/// Default number of stations fetched at once.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// One station to fetch, with the options shared by the whole pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationQuery {
    pub station: StationCode,
    pub options: FetchOptions,
}

impl StationQuery {
    /// Pair every station with the same options, keeping request order.
    pub fn for_stations(stations: &[StationCode], options: FetchOptions) -> Vec<Self> {
        stations
            .iter()
            .map(|station| StationQuery {
                station: station.clone(),
                options,
            })
            .collect()
    }
}

/// A station that was queried, whether or not it had departures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueriedStation {
    pub code: StationCode,
    /// The provider's name for the station, when it supplied one.
    pub display_name: Option<String>,
}

/// The ordered, truncated outcome of one aggregation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet {
    /// Departures in sort-key order.
    pub departures: Vec<Departure>,
    /// Every queried station, in request order.
    pub stations: Vec<QueriedStation>,
    /// The offset in minutes the pass was run with.
    pub offset: i32,
}

impl ResultSet {
    pub fn is_empty(&self) -> bool {
        self.departures.is_empty()
    }

    /// Departures contributed per station, including stations with none.
    pub fn station_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts: BTreeMap<&str, usize> = self
            .stations
            .iter()
            .map(|s| (s.code.as_str(), 0))
            .collect();

        for departure in &self.departures {
            *counts.entry(departure.station.as_str()).or_default() += 1;
        }

        counts
    }

    /// Resolved display names as (code, name), sorted by name then code.
    ///
    /// Stations queried more than once appear once.
    pub fn display_names(&self) -> Vec<(&str, &str)> {
        let mut names: Vec<(&str, &str)> = self
            .stations
            .iter()
            .filter_map(|s| Some((s.code.as_str(), s.display_name.as_deref()?)))
            .collect();

        names.sort_by(|a, b| a.1.cmp(b.1).then(a.0.cmp(b.0)));
        names.dedup();
        names
    }
}

/// Departures fetched and normalized for one station.
struct StationDepartures {
    station: QueriedStation,
    departures: Vec<Departure>,
}

/// Runs aggregation passes against a single departure source.
#[derive(Debug, Clone)]
pub struct Aggregator<S> {
    source: S,
    timeout: Duration,
    concurrency: usize,
}

impl<S: DepartureSource> Aggregator<S> {
    /// Create an aggregator giving each station fetch up to `timeout`.
    pub fn new(source: S, timeout: Duration) -> Self {
        Self {
            source,
            timeout,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Set how many stations may be in flight at once (at least one).
    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    /// Aggregate with the reference time taken from the local clock.
    pub async fn aggregate(
        &self,
        queries: &[StationQuery],
        limit: usize,
    ) -> Result<ResultSet, BoardError> {
        let offset = pass_offset(queries);
        let reference = ReferenceTime::now_with_offset(offset);
        self.aggregate_at(queries, limit, &reference).await
    }

    /// Fetch every station, merge, sort, and keep the first `limit`.
    ///
    /// The first station to fail fails the pass; departures already fetched
    /// for other stations are discarded.
    pub async fn aggregate_at(
        &self,
        queries: &[StationQuery],
        limit: usize,
        reference: &ReferenceTime,
    ) -> Result<ResultSet, BoardError> {
        let per_station: Vec<StationDepartures> = stream::iter(queries)
            .map(|query| self.fetch_station(query, reference))
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        let mut stations = Vec::with_capacity(per_station.len());
        let mut departures = Vec::new();
        for result in per_station {
            stations.push(result.station);
            departures.extend(result.departures);
        }

        let available = departures.len();

        // Stable: ties keep station order, then response order
        departures.sort_by_key(Departure::sort_key);
        departures.truncate(limit.min(available));

        debug!(
            stations = stations.len(),
            available,
            kept = departures.len(),
            "merged departures"
        );

        Ok(ResultSet {
            departures,
            stations,
            offset: pass_offset(queries),
        })
    }

    async fn fetch_station(
        &self,
        query: &StationQuery,
        reference: &ReferenceTime,
    ) -> Result<StationDepartures, BoardError> {
        let station_error = |source: FetchError| BoardError::Station {
            station: query.station.clone(),
            source,
        };

        let raw = tokio::time::timeout(
            self.timeout,
            self.source.fetch(&query.station, &query.options),
        )
        .await
        .map_err(|_| FetchError::Timeout(self.timeout))
        .and_then(|result| result)
        .map_err(station_error)?;

        let departures = raw
            .normalize(&query.station, reference)
            .map_err(|e| station_error(e.into()))?;

        debug!(
            station = %query.station,
            departures = departures.len(),
            "station fetched"
        );

        Ok(StationDepartures {
            station: QueriedStation {
                code: query.station.clone(),
                display_name: raw.display_name().map(String::from),
            },
            departures,
        })
    }
}

/// The offset shared by a pass; every query carries the same options.
fn pass_offset(queries: &[StationQuery]) -> i32 {
    queries.first().map_or(0, |q| q.options.time_offset)
}
