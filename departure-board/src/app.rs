//! One end-to-end invocation: fetch, merge, render.

use std::io::Write;

use tracing::info;

use crate::aggregate::Aggregator;
use crate::config::Config;
use crate::error::BoardError;
use crate::render::render;

/// Fetch every configured station and write the board to `out`.
///
/// Nothing is written when any station fails.
pub async fn run(config: &Config, out: &mut impl Write) -> Result<(), BoardError> {
    let provider = config.build_provider()?;
    let aggregator =
        Aggregator::new(provider, config.timeout).with_concurrency(config.concurrency);

    info!(
        provider = ?config.provider,
        stations = config.stations.len(),
        limit = config.limit,
        "fetching departures"
    );

    let result = aggregator.aggregate(&config.queries(), config.limit).await?;
    render(&result, config.format, out)
}
