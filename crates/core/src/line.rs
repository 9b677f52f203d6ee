use serde::{Deserialize, Serialize};

use crate::ids::{LineId, StationId};

/// Whether a line closes on itself or has two real termini.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineKind {
    /// Closed loop, no meaningful terminus (e.g. the Ringbahn).
    Ring,
    Standard,
}

/// A line's geographic traversal order, from one terminus to the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub line_id: LineId,
    pub kind: LineKind,
    /// Ordered station sequence; at least two entries.
    pub stations: Vec<StationId>,
}

impl Line {
    pub fn first_terminus(&self) -> Option<&StationId> {
        self.stations.first()
    }

    pub fn last_terminus(&self) -> Option<&StationId> {
        self.stations.last()
    }

    pub fn is_terminus(&self, station_id: &StationId) -> bool {
        self.first_terminus() == Some(station_id) || self.last_terminus() == Some(station_id)
    }

    pub fn contains(&self, station_id: &StationId) -> bool {
        self.stations.iter().any(|s| s == station_id)
    }

    pub fn is_ring(&self) -> bool {
        matches!(self.kind, LineKind::Ring)
    }
}
