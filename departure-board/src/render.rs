//! Table and JSON output for a finished [`ResultSet`].

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;

use crate::aggregate::ResultSet;
use crate::domain::Departure;
use crate::error::BoardError;

/// How the board is written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Printed instead of a header when nothing departs.
pub const EMPTY_BOARD: &str = "no departures";

/// Structured output document.
#[derive(Debug, Serialize)]
struct Page<'a> {
    offset: i32,
    stations: BTreeMap<&'a str, usize>,
    departures: Vec<Entry<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    names: Vec<(&'a str, &'a str)>,
}

/// One departure with the sort key stripped.
#[derive(Debug, Serialize)]
struct Entry<'a> {
    /// Destination
    dst: &'a str,
    /// Scheduled time
    due: String,
    /// Expected time, "On time", or a status word
    etd: String,
    /// Station code the departure was fetched for
    sta: &'a str,
    /// Line or route
    #[serde(skip_serializing_if = "is_blank")]
    srv: &'a str,
    /// Platform
    #[serde(skip_serializing_if = "is_blank")]
    pla: &'a str,
}

fn is_blank(s: &&str) -> bool {
    s.is_empty()
}

impl<'a> From<&'a Departure> for Entry<'a> {
    fn from(d: &'a Departure) -> Self {
        Entry {
            dst: &d.destination,
            due: d.due_label(),
            etd: d.expected_label(),
            sta: d.station.as_str(),
            srv: &d.service,
            pla: &d.platform,
        }
    }
}

fn table_line(
    when: &str,
    mode: &str,
    station: &str,
    service: &str,
    destination: &str,
    platform: &str,
    expected: &str,
) -> String {
    format!("{when:<5} {mode:<1} {station:<3} {service:<4} {destination:<20} {platform:>3} {expected:>9}")
}

/// Render a fixed-width table, one line per departure in result order.
pub fn render_table(result: &ResultSet) -> String {
    if result.is_empty() {
        return format!("{EMPTY_BOARD}\n");
    }

    let mut out = table_line("When", "M", "Sta", "Srv", "To", "Plt", "Expected");
    out.push('\n');

    for d in &result.departures {
        let line = table_line(
            &d.due_label(),
            &d.mode.to_string(),
            d.station.as_str(),
            &d.service,
            &d.destination,
            &d.platform,
            &d.expected_label(),
        );
        out.push_str(&line);
        out.push('\n');
    }

    out
}

/// Render the structured document as a single line of JSON.
pub fn render_json(result: &ResultSet) -> Result<String, serde_json::Error> {
    let page = Page {
        offset: result.offset,
        stations: result.station_counts(),
        departures: result.departures.iter().map(Entry::from).collect(),
        names: result.display_names(),
    };
    serde_json::to_string(&page)
}

/// Write `result` to `out` in the chosen format.
pub fn render(
    result: &ResultSet,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<(), BoardError> {
    match format {
        OutputFormat::Table => out.write_all(render_table(result).as_bytes())?,
        OutputFormat::Json => writeln!(out, "{}", render_json(result)?)?,
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::QueriedStation;
    use crate::domain::{Expected, ReferenceTime, StationCode, VehicleMode};
    use chrono::{NaiveDate, NaiveTime};
    use serde_json::{Value, json};

    fn reference() -> ReferenceTime {
        ReferenceTime::new(
            NaiveDate::from_ymd_opt(2024, 3, 15)
                .unwrap()
                .and_hms_opt(21, 0, 0)
                .unwrap(),
        )
    }

    fn hm(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn code(s: &str) -> StationCode {
        StationCode::parse(s).unwrap()
    }

    fn queried(s: &str, name: Option<&str>) -> QueriedStation {
        QueriedStation {
            code: code(s),
            display_name: name.map(String::from),
        }
    }

    fn sample() -> ResultSet {
        let r = reference();
        ResultSet {
            departures: vec![
                Departure::new(code("KGX"), hm(21, 45), &r)
                    .with_destination("Edinburgh")
                    .with_platform("9")
                    .with_mode(VehicleMode::Rail),
                Departure::new(code("KGX"), hm(22, 2), &r)
                    .with_destination("Cambridge")
                    .with_mode(VehicleMode::Rail)
                    .with_expected(Expected::At(hm(22, 9))),
                Departure::new(code("FPK"), hm(22, 30), &r)
                    .with_service("BUS")
                    .with_destination("Stevenage")
                    .with_mode(VehicleMode::Bus)
                    .with_expected(Expected::Status("Cancelled".into())),
            ],
            stations: vec![
                queried("KGX", Some("London Kings Cross")),
                queried("FPK", Some("Finsbury Park")),
                queried("ELY", None),
            ],
            offset: 5,
        }
    }

    #[test]
    fn table_layout() {
        let table = render_table(&sample());
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "When  M Sta Srv  To                   Plt  Expected");
        assert_eq!(lines[1], "21:45 R KGX      Edinburgh              9   On time");
        assert_eq!(lines[2], "22:02 R KGX      Cambridge                    22:09");
        assert_eq!(lines[3], "22:30 B FPK BUS  Stevenage                Cancelled");
        assert!(table.ends_with('\n'));
    }

    #[test]
    fn empty_table_says_so() {
        let result = ResultSet {
            departures: vec![],
            stations: vec![queried("KGX", None)],
            offset: 0,
        };
        assert_eq!(render_table(&result), "no departures\n");
    }

    #[test]
    fn json_document_shape() {
        let rendered = render_json(&sample()).unwrap();
        assert!(!rendered.contains('\n'));

        let value: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(
            value,
            json!({
                "offset": 5,
                "stations": {"ELY": 0, "FPK": 1, "KGX": 2},
                "departures": [
                    {"dst": "Edinburgh", "due": "21:45", "etd": "On time", "sta": "KGX", "pla": "9"},
                    {"dst": "Cambridge", "due": "22:02", "etd": "22:09", "sta": "KGX"},
                    {"dst": "Stevenage", "due": "22:30", "etd": "Cancelled", "sta": "FPK", "srv": "BUS"}
                ],
                "names": [["FPK", "Finsbury Park"], ["KGX", "London Kings Cross"]]
            })
        );
    }

    #[test]
    fn json_keys_in_documented_order() {
        let rendered = render_json(&sample()).unwrap();
        assert!(rendered.starts_with(r#"{"offset":5,"stations":{"ELY":0,"FPK":1,"KGX":2},"departures":[{"dst":"Edinburgh","due":"21:45","etd":"On time","sta":"KGX","pla":"9"}"#));
    }

    #[test]
    fn json_without_names_omits_table() {
        let result = ResultSet {
            departures: vec![],
            stations: vec![queried("AAA", None), queried("BBB", None)],
            offset: 0,
        };
        let value: Value = serde_json::from_str(&render_json(&result).unwrap()).unwrap();

        assert_eq!(value["stations"], json!({"AAA": 0, "BBB": 0}));
        assert_eq!(value["departures"], json!([]));
        assert!(value.get("names").is_none());
    }

    #[test]
    fn station_counts_round_trip() {
        let result = sample();
        let value: Value = serde_json::from_str(&render_json(&result).unwrap()).unwrap();

        for station in &result.stations {
            let tally = result
                .departures
                .iter()
                .filter(|d| d.station == station.code)
                .count();
            assert_eq!(value["stations"][station.code.as_str()], tally);
        }
    }

    #[test]
    fn on_time_only_when_minutes_match() {
        let r = reference();
        let late_seconds = Departure::new(code("KGX"), hm(21, 45), &r)
            .with_expected(Expected::At(NaiveTime::from_hms_opt(21, 45, 40).unwrap()));
        let late_minute =
            Departure::new(code("KGX"), hm(21, 45), &r).with_expected(Expected::At(hm(21, 46)));

        assert_eq!(Entry::from(&late_seconds).etd, "On time");
        assert_eq!(Entry::from(&late_minute).etd, "21:46");
    }

    #[test]
    fn render_writes_chosen_format() {
        let mut table = Vec::new();
        render(&sample(), OutputFormat::Table, &mut table).unwrap();
        assert!(String::from_utf8(table).unwrap().starts_with("When "));

        let mut json = Vec::new();
        render(&sample(), OutputFormat::Json, &mut json).unwrap();
        let json = String::from_utf8(json).unwrap();
        assert!(json.starts_with('{'));
        assert!(json.ends_with("}\n"));
    }
}
