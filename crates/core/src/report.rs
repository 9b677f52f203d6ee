use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{LineId, StationId};

/// A resolved inspector sighting, consumed by the risk engine. If
/// `station_id` is set it is expected to lie on every line in `lines`
/// (violations are tolerated — see the risk engine's failure semantics).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub station_id: Option<StationId>,
    /// UTC, minute-truncated.
    pub timestamp: DateTime<Utc>,
    pub direction_id: Option<StationId>,
    pub lines: Vec<LineId>,
}

impl Report {
    /// Truncates a timestamp to the minute, as the ingress layer must do
    /// before a report reaches the risk engine.
    pub fn truncate_to_minute(ts: DateTime<Utc>) -> DateTime<Utc> {
        ts.with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(ts)
    }

    pub fn has_direction(&self) -> bool {
        self.direction_id.is_some()
    }

    pub fn is_multi_line(&self) -> bool {
        self.lines.len() > 1
    }
}
