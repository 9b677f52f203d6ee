use crate::ids::{LineId, StationId};

/// Ephemeral per-message extraction result. Produced by the Extractor,
/// mutated in place by the Verifier, consumed by the Catalog Resolver.
/// Any subset of the three fields may be null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Candidate {
    pub line: Option<LineId>,
    pub station: Option<StationId>,
    pub direction: Option<StationId>,
}

impl Candidate {
    pub fn new(
        line: Option<LineId>,
        station: Option<StationId>,
        direction: Option<StationId>,
    ) -> Self {
        Self {
            line,
            station,
            direction,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.line.is_none() && self.station.is_none() && self.direction.is_none()
    }
}
