//! Digitransit (HSL) GraphQL transit adapter.
//!
//! Key characteristics of the Digitransit routing API:
//! - One GraphQL POST per stop, authenticated by a subscription-key header
//! - Stop ids are feed-prefixed, e.g. "HSL:1040129"
//! - Times are seconds since the start of the service day, and run past
//!   86400 for trips continuing after midnight
//! - Application errors arrive in the `errors` array of the envelope

mod client;
mod convert;
mod query;
mod types;

pub use client::{DEFAULT_ENDPOINT, TransitClient, TransitConfig};
pub use convert::{convert_stop, convert_stop_time};
pub use query::{GraphRequest, StopVariables, departures_query};
pub use types::{GraphResponse, Stop, StopTime};

#[cfg(test)]
pub(crate) use types::fixtures;
