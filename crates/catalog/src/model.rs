use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use freifahren_core::Coordinates;

/// `GET /v0/lines` response: ordered station sequence per line.
pub type RawLinesResponse = BTreeMap<String, Vec<String>>;

/// One entry of `GET /stations` / `GET /v0/stations/search`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawStationRecord {
    pub name: String,
    pub coordinates: Coordinates,
    pub lines: Vec<String>,
}

pub type RawStationsResponse = BTreeMap<String, RawStationRecord>;

/// `POST /basics/inspectors` body.
#[derive(Debug, Clone, Serialize)]
pub struct InspectorReportBody {
    pub timestamp: DateTime<Utc>,
    pub line: Option<String>,
    #[serde(rename = "stationId")]
    pub station_id: Option<String>,
    #[serde(rename = "directionId")]
    pub direction_id: Option<String>,
    pub author: i64,
    pub message: Option<String>,
}

/// Outcome of a name → id lookup. "Not found" is a normal answer from the
/// search endpoint, kept apart from transport failures so callers can
/// continue with the fields that did resolve.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupResult<T> {
    Resolved(T),
    NotFound,
}

/// Trims, lowercases and collapses internal whitespace so a human-typed
/// name compares equal to the catalog's canonical spelling.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
