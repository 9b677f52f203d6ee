use std::collections::{BTreeMap, BTreeSet};

use freifahren_core::{Coordinates, LineId};
use serde::{Deserialize, Serialize};

/// Mirrors the backend catalog's `GET /stations` response shape, since the
/// static topology files consumed at startup are produced by the same
/// data-prep pipeline that feeds the catalog.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawStationEntry {
    pub name: String,
    pub coordinates: Coordinates,
    pub lines: Vec<String>,
}

pub type RawStationsFile = BTreeMap<String, RawStationEntry>;

/// Mirrors `GET /v0/lines`: line id -> ordered station id sequence.
pub type RawLineFile = BTreeMap<String, Vec<String>>;

/// canonical station name -> list of alternative spellings.
pub type RawSynonymsFile = BTreeMap<String, BTreeSet<String>>;

/// The set of ring line ids, read once at startup alongside the topology
/// files (kept separate from `RiskConfig.ring_lines` so a deployment can
/// ship a default list with the topology data and still override it via
/// environment at runtime).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawRingLines(pub BTreeSet<LineId>);

impl Default for RawRingLines {
    fn default() -> Self {
        Self(BTreeSet::from([LineId::new("S41"), LineId::new("S42")]))
    }
}
