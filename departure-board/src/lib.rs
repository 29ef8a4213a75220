//! Departure board aggregator.
//!
//! Fetches upcoming departures for several stations from one upstream
//! provider, normalizes them into a single record type, merges them into
//! one ordered board, and renders it as a table or JSON.

pub mod aggregate;
pub mod app;
pub mod config;
pub mod darwin;
pub mod domain;
pub mod error;
pub mod render;
pub mod source;
pub mod transit;

#[cfg(test)]
mod testing;
