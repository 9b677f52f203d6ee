use std::collections::BTreeSet;

use freifahren_core::{Candidate, LineId};
use freifahren_extract::ner::NerTagger;
use freifahren_extract::station_detect::detect_station;
use freifahren_topology::Topology;

const GET_OFF_KEYWORDS: &[&str] = &[
    "ausgestiegen",
    "raus",
    "aussteigen",
    "got off",
    "get off",
    "getting off",
    "steigen aus",
];
const RING_KEYWORDS: &[&str] = &["ring", "ringbahn"];

/// Idempotent in-place refinement of a candidate, applying the topology-
/// aware correction rules in order. Never fails — ambiguity is resolved by
/// leaving fields null.
pub fn verify(
    candidate: &mut Candidate,
    text: &str,
    topology: &Topology,
    ner: &dyn NerTagger,
    fuzzy_threshold: u32,
    ring_lines: &BTreeSet<LineId>,
) {
    apply_get_off(candidate, text);
    apply_ring_implicit(candidate, text);
    apply_ring_directionless(candidate, ring_lines);
    apply_direction_as_name(candidate, text, topology, ner, fuzzy_threshold);
    apply_sole_line(candidate, topology);
}

/// A report of someone leaving the train carries no heading information —
/// only the station, if any, survives.
fn apply_get_off(candidate: &mut Candidate, text: &str) {
    let lower = text.to_lowercase();
    if GET_OFF_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        tracing::debug!("get-off keyword matched, clearing line and direction");
        candidate.line = None;
        candidate.direction = None;
    }
}

/// A bare mention of "ring"/"ringbahn" implies the Ringbahn line.
fn apply_ring_implicit(candidate: &mut Candidate, text: &str) {
    if candidate.line.is_some() {
        return;
    }
    let stripped: String = text.chars().filter(|&c| c != ',' && c != '.').collect();
    let lower = stripped.to_lowercase();
    if lower
        .split_whitespace()
        .any(|w| RING_KEYWORDS.contains(&w))
    {
        tracing::debug!("ring mention matched with no line set, inferring S41");
        candidate.line = Some(LineId::new("S41"));
    }
}

/// Ring lines have no meaningful terminus, hence no direction.
fn apply_ring_directionless(candidate: &mut Candidate, ring_lines: &BTreeSet<LineId>) {
    if let Some(line) = &candidate.line {
        if ring_lines.contains(line) {
            candidate.direction = None;
        }
    }
}

/// If the token right after the line's occurrence in the text resolves to
/// a terminus of that line, the "station" we found is really the
/// direction ("U8 Hermannstraße" reads as "U8 Richtung Hermannstraße");
/// swap them by re-running station detection with that token removed.
fn apply_direction_as_name(
    candidate: &mut Candidate,
    text: &str,
    topology: &Topology,
    ner: &dyn NerTagger,
    fuzzy_threshold: u32,
) {
    let (Some(station), Some(_direction), Some(line_id)) =
        (&candidate.station, &candidate.direction, &candidate.line)
    else {
        return;
    };
    let Some(line) = topology.line(line_id) else {
        return;
    };

    // Matching happens on the lowercased copy throughout; slicing the
    // original at an index found in the copy could split a multi-byte
    // character.
    let lower = text.to_lowercase();
    let line_id_lower = line_id.as_str().to_lowercase();
    let Some(line_pos) = lower.rfind(line_id_lower.as_str()) else {
        return;
    };
    let after = &lower[line_pos + line_id_lower.len()..];
    let Some(next_word) = after.split_whitespace().next() else {
        return;
    };

    let resolved = detect_station(next_word, Some(line_id), topology, ner, fuzzy_threshold);
    let Some(next_station) = resolved.station else {
        return;
    };
    if !line.is_terminus(&next_station) {
        return;
    }

    let without_direction = lower.replace(next_word, "");
    let retried = detect_station(&without_direction, Some(line_id), topology, ner, fuzzy_threshold);
    if let Some(true_station) = retried.station {
        if &true_station != station {
            candidate.station = Some(true_station);
            candidate.direction = Some(next_station);
        }
    }
}

/// If the station lies on exactly one line, infer that line.
fn apply_sole_line(candidate: &mut Candidate, topology: &Topology) {
    if candidate.line.is_some() {
        return;
    }
    let Some(station_id) = &candidate.station else {
        return;
    };
    let lines = topology.lines_for_station(station_id);
    if lines.len() == 1 {
        candidate.line = lines.into_iter().next();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use freifahren_core::StationId;
    use freifahren_extract::HeuristicNerTagger;
    use freifahren_topology::{RawLineFile, RawRingLines, RawStationEntry, RawStationsFile, RawSynonymsFile};

    fn topo_with_one_line() -> Topology {
        let mut stations = RawStationsFile::new();
        stations.insert(
            "a".into(),
            RawStationEntry {
                name: "Alpha".into(),
                coordinates: freifahren_core::Coordinates { latitude: 0.0, longitude: 0.0 },
                lines: vec!["U1".into()],
            },
        );
        stations.insert(
            "b".into(),
            RawStationEntry {
                name: "Beta".into(),
                coordinates: freifahren_core::Coordinates { latitude: 0.0, longitude: 0.0 },
                lines: vec!["U1".into()],
            },
        );
        let mut lines = RawLineFile::new();
        lines.insert("U1".into(), vec!["a".into(), "b".into()]);
        Topology::build(stations, lines, RawSynonymsFile::new(), &RawRingLines::default()).unwrap()
    }

    #[test]
    fn get_off_clears_line_and_direction() {
        let topo = topo_with_one_line();
        let ner = HeuristicNerTagger::new();
        let mut candidate = Candidate::new(
            Some(LineId::new("U1")),
            Some(StationId::new("a")),
            Some(StationId::new("b")),
        );
        verify(&mut candidate, "bin gerade ausgestiegen", &topo, &ner, 75, &Default::default());
        assert_eq!(candidate.line, None);
        assert_eq!(candidate.direction, None);
        assert_eq!(candidate.station, Some(StationId::new("a")));
    }

    #[test]
    fn ring_mention_sets_line_and_clears_direction() {
        let topo = topo_with_one_line();
        let ner = HeuristicNerTagger::new();
        let ring_lines = BTreeSet::from([LineId::new("S41"), LineId::new("S42")]);
        let mut candidate = Candidate::new(None, None, Some(StationId::new("a")));
        verify(&mut candidate, "im ring unterwegs", &topo, &ner, 75, &ring_lines);
        assert_eq!(candidate.line, Some(LineId::new("S41")));
        assert_eq!(candidate.direction, None);
    }

    #[test]
    fn sole_line_inference_sets_line() {
        let topo = topo_with_one_line();
        let ner = HeuristicNerTagger::new();
        let mut candidate = Candidate::new(None, Some(StationId::new("a")), None);
        verify(&mut candidate, "Alpha gesehen", &topo, &ner, 75, &Default::default());
        assert_eq!(candidate.line, Some(LineId::new("U1")));
    }

    #[test]
    fn ring_line_report_loses_its_direction() {
        let topo = topo_with_one_line();
        let ner = HeuristicNerTagger::new();
        let ring_lines = BTreeSet::from([LineId::new("S41"), LineId::new("S42")]);
        let mut candidate = Candidate::new(
            Some(LineId::new("S42")),
            Some(StationId::new("a")),
            Some(StationId::new("b")),
        );
        verify(&mut candidate, "S42 Alpha Richtung Beta", &topo, &ner, 75, &ring_lines);
        assert_eq!(candidate.line, Some(LineId::new("S42")));
        assert_eq!(candidate.direction, None);
    }

    #[test]
    fn station_after_line_that_is_a_terminus_becomes_the_direction() {
        let topo = topo_with_one_line();
        let ner = HeuristicNerTagger::new();
        // Beta is a terminus of U1; the mention right after the line code is
        // the heading, the other resolved station is where they are.
        let mut candidate = Candidate::new(
            Some(LineId::new("U1")),
            Some(StationId::new("b")),
            Some(StationId::new("a")),
        );
        verify(&mut candidate, "U1 Beta jetzt Alpha", &topo, &ner, 75, &Default::default());
        assert_eq!(candidate.station, Some(StationId::new("a")));
        assert_eq!(candidate.direction, Some(StationId::new("b")));
    }

    #[test]
    fn verify_is_idempotent() {
        let topo = topo_with_one_line();
        let ner = HeuristicNerTagger::new();
        let ring_lines = BTreeSet::from([LineId::new("S41")]);
        let mut candidate = Candidate::new(None, Some(StationId::new("a")), None);
        verify(&mut candidate, "Alpha gesehen", &topo, &ner, 75, &ring_lines);
        let once = candidate.clone();
        verify(&mut candidate, "Alpha gesehen", &topo, &ner, 75, &ring_lines);
        assert_eq!(candidate, once);
    }
}
