//! Command-line arguments and the immutable configuration built from them.

use std::fmt;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::aggregate::{DEFAULT_CONCURRENCY, StationQuery};
use crate::darwin::{self, DarwinClient, DarwinConfig};
use crate::domain::{Crs, DEFAULT_ROWS, FetchOptions, StationCode};
use crate::error::ConfigError;
use crate::render::OutputFormat;
use crate::source::Provider;
use crate::transit::{self, TransitClient, TransitConfig};

/// Largest offset or window accepted, in minutes.
pub const MAX_SHIFT_MINUTES: i32 = 120;

/// Per-station timeout when none is given, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Which upstream answers the queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderKind {
    /// National Rail Darwin departure boards
    Rail,
    /// Digitransit (HSL) stop departures
    Transit,
}

impl ProviderKind {
    /// Environment variable holding the credential.
    pub fn token_var(&self) -> &'static str {
        match self {
            ProviderKind::Rail => "DARWIN_TOKEN",
            ProviderKind::Transit => "DIGITRANSIT_TOKEN",
        }
    }

    pub fn default_endpoint(&self) -> &'static str {
        match self {
            ProviderKind::Rail => darwin::DEFAULT_ENDPOINT,
            ProviderKind::Transit => transit::DEFAULT_ENDPOINT,
        }
    }
}

/// show upcoming departures for one or more stations
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// station codes, e.g. KGX or HSL:1040129
    pub stations: Vec<String>,

    /// seconds to wait for each station
    #[arg(short, long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// departures requested per station
    #[arg(short, long, default_value_t = DEFAULT_ROWS)]
    pub num: u32,

    /// minutes from now to start the board at
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    pub offset: i32,

    /// minutes of departures to search, 0 for the provider default
    #[arg(short, long, default_value_t = 0)]
    pub window: u32,

    /// print JSON instead of a table
    #[arg(short, long)]
    pub json: bool,

    /// upstream provider
    #[arg(short, long, value_enum, default_value_t = ProviderKind::Rail)]
    pub provider: ProviderKind,

    /// total departures to show, default rows times stations
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// stations fetched at once
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// override the provider endpoint URL
    #[arg(long)]
    pub endpoint: Option<String>,
}

/// Everything one invocation needs, fixed before any network call.
#[derive(Clone)]
pub struct Config {
    pub provider: ProviderKind,
    pub token: String,
    pub endpoint: String,
    /// Deadline for each station fetch.
    pub timeout: Duration,
    pub options: FetchOptions,
    /// Stations in request order, duplicates kept.
    pub stations: Vec<StationCode>,
    pub format: OutputFormat,
    /// Cap on the merged board.
    pub limit: usize,
    pub concurrency: usize,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("provider", &self.provider)
            .field("token", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("options", &self.options)
            .field("stations", &self.stations)
            .field("format", &self.format)
            .field("limit", &self.limit)
            .field("concurrency", &self.concurrency)
            .finish()
    }
}

impl Config {
    /// Validate arguments and look up the credential with `env`.
    ///
    /// Stations are checked first, then the credential, then the numeric
    /// options.
    pub fn from_args(
        args: Args,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if args.stations.is_empty() {
            return Err(ConfigError::NoStations);
        }

        let stations = args
            .stations
            .iter()
            .map(|s| StationCode::parse(s))
            .collect::<Result<Vec<_>, _>>()?;

        if args.provider == ProviderKind::Rail {
            for station in &stations {
                Crs::from_station(station)?;
            }
        }

        let var = args.provider.token_var();
        let token = env(var)
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken { var })?;

        if !(-MAX_SHIFT_MINUTES..=MAX_SHIFT_MINUTES).contains(&args.offset) {
            return Err(invalid(
                "offset",
                format!("{} is outside -{MAX_SHIFT_MINUTES}..={MAX_SHIFT_MINUTES}", args.offset),
            ));
        }
        if args.window > MAX_SHIFT_MINUTES.unsigned_abs() {
            return Err(invalid(
                "window",
                format!("{} is outside 0..={MAX_SHIFT_MINUTES}", args.window),
            ));
        }
        if args.timeout == 0 {
            return Err(invalid("timeout", "must be at least 1 second".to_string()));
        }
        if args.concurrency == 0 {
            return Err(invalid("concurrency", "must be at least 1".to_string()));
        }

        let options = FetchOptions::new()
            .with_rows(args.num)
            .with_offset(args.offset)
            .with_window(args.window);

        let limit = args
            .limit
            .unwrap_or(options.effective_rows() as usize * stations.len());

        Ok(Config {
            provider: args.provider,
            token,
            endpoint: args
                .endpoint
                .unwrap_or_else(|| args.provider.default_endpoint().to_string()),
            timeout: Duration::from_secs(args.timeout),
            options,
            stations,
            format: if args.json {
                OutputFormat::Json
            } else {
                OutputFormat::Table
            },
            limit,
            concurrency: args.concurrency,
        })
    }

    /// One query per station, all sharing the same options.
    pub fn queries(&self) -> Vec<StationQuery> {
        StationQuery::for_stations(&self.stations, self.options)
    }

    /// Build the client for the configured provider.
    pub fn build_provider(&self) -> Result<Provider, ConfigError> {
        let secs = self.timeout.as_secs();
        match self.provider {
            ProviderKind::Rail => DarwinClient::new(
                DarwinConfig::new(&self.token)
                    .with_endpoint(&self.endpoint)
                    .with_timeout(secs),
            )
            .map(Provider::Rail),
            ProviderKind::Transit => TransitClient::new(
                TransitConfig::new(&self.token)
                    .with_endpoint(&self.endpoint)
                    .with_timeout(secs),
            )
            .map(Provider::Transit),
        }
    }
}

fn invalid(name: &'static str, message: String) -> ConfigError {
    ConfigError::InvalidOption { name, message }
}
