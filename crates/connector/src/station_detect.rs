use freifahren_core::{LineId, StationId};
use freifahren_topology::Topology;

use crate::fuzzy;
use crate::ner::NerTagger;

/// Result of running station detection over one piece of text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationDetection {
    pub station: Option<StationId>,
    /// The second NER span's resolution, if any — feeds the implicit
    /// direction fallback in candidate assembly.
    pub secondary: Option<StationId>,
}

/// Resolves the first NER span (and, if present, the second) against the
/// station/synonym candidate pool. `line` constrains the pool to stations
/// on that line when known.
pub fn detect_station(
    text: &str,
    line: Option<&LineId>,
    topology: &Topology,
    ner: &dyn NerTagger,
    fuzzy_threshold: u32,
) -> StationDetection {
    let spans = ner.tag(text);
    let mut result = StationDetection::default();

    // First span (in order) that resolves against the pool wins.
    for span in &spans {
        if let Some(station) = resolve_span(&span.text, line, topology, fuzzy_threshold) {
            result.station = Some(station);
            break;
        }
    }

    // The implicit-direction fallback always looks at the literal second
    // NER span, independent of which span resolved as the station.
    if let Some(second) = spans.get(1) {
        result.secondary = resolve_span(&second.text, line, topology, fuzzy_threshold);
    }
    result
}

fn resolve_span(
    span_text: &str,
    line: Option<&LineId>,
    topology: &Topology,
    fuzzy_threshold: u32,
) -> Option<StationId> {
    let pool = topology.station_pool(line);

    let mut candidates: Vec<(&str, StationId)> = Vec::new();
    for station in &pool {
        candidates.push((station.name.as_str(), station.station_id.clone()));
    }
    for (synonym, canonical) in topology.synonyms().iter() {
        if line.is_none_or_serves(topology, canonical) {
            candidates.push((synonym.as_str(), canonical.clone()));
        }
    }

    let names: Vec<&str> = candidates.iter().map(|(n, _)| *n).collect();
    let (best_name, _score) = fuzzy::best_match(span_text, names, fuzzy_threshold)?;
    candidates
        .into_iter()
        .find(|(n, _)| *n == best_name)
        .map(|(_, id)| id)
}

/// Small helper trait so `resolve_span` can stay a free function: when a
/// line constraint is active, only synonyms of stations on that line are
/// eligible.
trait LineConstraint {
    fn is_none_or_serves(&self, topology: &Topology, station_id: &StationId) -> bool;
}

impl LineConstraint for Option<&LineId> {
    fn is_none_or_serves(&self, topology: &Topology, station_id: &StationId) -> bool {
        match self {
            None => true,
            Some(line_id) => topology
                .station(station_id)
                .map(|s| s.serves(line_id))
                .unwrap_or(false),
        }
    }
}
