//! GraphQL request construction for stop departures.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::domain::{FetchOptions, StationCode};

/// A GraphQL POST body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphRequest<V> {
    pub query: String,
    pub variables: V,
}

/// Variables for the stop departures query.
///
/// `startTime` and `timeRange` are left out of the JSON entirely when not
/// requested, matching the query text which does not declare them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopVariables {
    pub stop: String,
    pub num: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_range: Option<u32>,
}

/// Build the departures query for one stop.
///
/// `now` is only consulted when an offset is requested: the start time is
/// sent as Unix seconds of `now + offset`. The window is sent in seconds,
/// which is the unit `timeRange` takes.
pub fn departures_query(
    stop: &StationCode,
    options: &FetchOptions,
    now: DateTime<Utc>,
) -> GraphRequest<StopVariables> {
    let variables = StopVariables {
        stop: stop.as_str().to_string(),
        num: options.effective_rows(),
        start_time: options
            .offset()
            .map(|minutes| (now + Duration::minutes(minutes.into())).timestamp()),
        time_range: options.window().map(|minutes| minutes * 60),
    };

    GraphRequest {
        query: query_text(variables.start_time.is_some(), variables.time_range.is_some()),
        variables,
    }
}

fn query_text(with_start_time: bool, with_time_range: bool) -> String {
    let mut declarations = String::from("\n\t$stop: String!\n\t$num: Int");
    let mut arguments = String::from("\n\t\t\tnumberOfDepartures: $num");

    if with_start_time {
        declarations.push_str("\n\t$startTime: Long");
        arguments.push_str("\n\t\t\tstartTime: $startTime");
    }

    if with_time_range {
        declarations.push_str("\n\t$timeRange: Int");
        arguments.push_str("\n\t\t\ttimeRange: $timeRange");
    }

    format!(
        r#"query ({declarations}
) {{
  stop(id: $stop) {{
    name
    desc
    code
    vehicleMode
    vehicleType

    stoptimesWithoutPatterns({arguments}
    ) {{
      trip {{
        route {{
          shortName
        }}
        serviceId
      }}
      scheduledArrival
      realtimeArrival
      arrivalDelay
      realtimeState
      headsign
      pickupType
    }}
  }}
}}"#
    )
}
