use serde::{Deserialize, Serialize};

use crate::ids::{LineId, StationId};

/// A directed stretch of track between two adjacent stations on one line.
///
/// Identity is the string `<line_id>.<from_station_id>:<to_station_id>`.
/// Two segments are colocated iff their unordered endpoint pair matches —
/// they share physical track even if they belong to different lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub line_id: LineId,
    pub from_station_id: StationId,
    pub to_station_id: StationId,
    /// 0-based position of `from_station_id` in the line's station sequence.
    pub rank: usize,
}

impl Segment {
    pub fn sid(&self) -> String {
        format!(
            "{}.{}:{}",
            self.line_id, self.from_station_id, self.to_station_id
        )
    }

    /// Unordered endpoint pair, used to detect colocated segments.
    pub fn endpoint_key(&self) -> (StationId, StationId) {
        if self.from_station_id <= self.to_station_id {
            (self.from_station_id.clone(), self.to_station_id.clone())
        } else {
            (self.to_station_id.clone(), self.from_station_id.clone())
        }
    }

    pub fn has_endpoint(&self, station_id: &StationId) -> bool {
        &self.from_station_id == station_id || &self.to_station_id == station_id
    }
}
