use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ids::{LineId, StationId};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A stop in the transit network. Attributes are immutable for the
/// process lifetime once the topology has loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub station_id: StationId,
    pub name: String,
    pub coordinates: Coordinates,
    pub lines: BTreeSet<LineId>,
}

impl Station {
    pub fn serves(&self, line: &LineId) -> bool {
        self.lines.contains(line)
    }
}
