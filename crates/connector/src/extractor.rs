use freifahren_core::Candidate;
use freifahren_topology::Topology;

use crate::direction_detect::detect_direction;
use crate::line_detect::detect_line;
use crate::ner::NerTagger;
use crate::station_detect::detect_station;

/// Produces a `(line, station, direction)` candidate from a message, or
/// `None` if nothing was found. Pure over `(text, topology)` — no I/O.
pub struct Extractor<'a> {
    topology: &'a Topology,
    ner: &'a dyn NerTagger,
    fuzzy_threshold: u32,
}

impl<'a> Extractor<'a> {
    pub fn new(topology: &'a Topology, ner: &'a dyn NerTagger, fuzzy_threshold: u32) -> Self {
        Self {
            topology,
            ner,
            fuzzy_threshold,
        }
    }

    pub fn extract(&self, text: &str) -> Option<Candidate> {
        let line = detect_line(text, self.topology);
        let (mut direction, residual) =
            detect_direction(text, line.as_ref(), self.topology, self.ner, self.fuzzy_threshold);
        let station_result =
            detect_station(&residual, line.as_ref(), self.topology, self.ner, self.fuzzy_threshold);
        let station = station_result.station;

        if direction.is_none() {
            // Implicit direction: with no direction keyword present, a
            // second recognized station mention is read as the heading
            // ("Hermannplatz U8 Wittenau"). Skipped when the second span is
            // how the station itself was found, so a lone misspelled
            // station never doubles as its own direction.
            direction = station_result
                .secondary
                .filter(|secondary| Some(secondary) != station.as_ref());
        }

        if line.is_none() && station.is_none() && direction.is_none() {
            return None;
        }
        Some(Candidate::new(line, station, direction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ner::HeuristicNerTagger;
    use crate::test_support::fixture_topology;
    use freifahren_core::{LineId, StationId};

    #[test]
    fn extracts_line_station_and_direction() {
        let topo = fixture_topology();
        let ner = HeuristicNerTagger::new();
        let extractor = Extractor::new(&topo, &ner, 75);
        let candidate = extractor
            .extract("2x Hellblau U8 Hermannplatz Richtung Wittenau am Bahnsteig")
            .unwrap();
        assert_eq!(candidate.line, Some(LineId::new("U8")));
        assert_eq!(candidate.station, Some(StationId::new("hermannplatz")));
        assert_eq!(candidate.direction, Some(StationId::new("wittenau")));
    }

    #[test]
    fn extracts_ring_line_station_without_direction() {
        let topo = fixture_topology();
        let ner = HeuristicNerTagger::new();
        let extractor = Extractor::new(&topo, &ner, 75);
        let candidate = extractor.extract("S41 Tempelhof eingestiegen").unwrap();
        assert_eq!(candidate.line, Some(LineId::new("S41")));
        assert_eq!(candidate.station, Some(StationId::new("tempelhof")));
        assert_eq!(candidate.direction, None);
    }

    #[test]
    fn extracts_misspelled_station_via_fuzzy_match() {
        let topo = fixture_topology();
        let ner = HeuristicNerTagger::new();
        let extractor = Extractor::new(&topo, &ner, 75);
        let candidate = extractor
            .extract("U6 Schumacher-Platz 2 Controller merhingdam")
            .unwrap();
        assert_eq!(candidate.line, Some(LineId::new("U6")));
        assert_eq!(candidate.station, Some(StationId::new("mehringdamm")));
        assert_eq!(candidate.direction, None);
    }

    #[test]
    fn extracts_station_and_direction_without_line() {
        let topo = fixture_topology();
        let ner = HeuristicNerTagger::new();
        let extractor = Extractor::new(&topo, &ner, 75);
        let candidate = extractor
            .extract("Jetzt Zoo in der Bahn richtung Steglitz!")
            .unwrap();
        assert_eq!(candidate.line, None);
        assert_eq!(candidate.station, Some(StationId::new("zoologischer-garten")));
        assert_eq!(candidate.direction, Some(StationId::new("rathaus-steglitz")));
    }

    #[test]
    fn extracts_line_and_direction_without_station() {
        let topo = fixture_topology();
        let ner = HeuristicNerTagger::new();
        let extractor = Extractor::new(&topo, &ner, 75);
        let candidate = extractor
            .extract("2 Kontrolleure U9 Richtung Osloer")
            .unwrap();
        assert_eq!(candidate.line, Some(LineId::new("U9")));
        assert_eq!(candidate.station, None);
        assert_eq!(candidate.direction, Some(StationId::new("osloerstrasse")));
    }

    #[test]
    fn street_suffix_left_over_from_direction_is_not_a_station() {
        let topo = fixture_topology();
        let ner = HeuristicNerTagger::new();
        let extractor = Extractor::new(&topo, &ner, 75);
        let candidate = extractor
            .extract("2 Kontrolleure U9 Richtung Osloer Straße")
            .unwrap();
        assert_eq!(candidate.line, Some(LineId::new("U9")));
        assert_eq!(candidate.station, None);
        assert_eq!(candidate.direction, Some(StationId::new("osloerstrasse")));
    }

    #[test]
    fn repeated_station_mention_never_doubles_as_its_own_direction() {
        let topo = fixture_topology();
        let ner = HeuristicNerTagger::new();
        let extractor = Extractor::new(&topo, &ner, 75);
        let candidate = extractor.extract("Mehringdamm U6 Mehringdamm").unwrap();
        assert_eq!(candidate.station, Some(StationId::new("mehringdamm")));
        assert_eq!(candidate.direction, None);
    }

    #[test]
    fn returns_none_when_nothing_found() {
        let topo = fixture_topology();
        let ner = HeuristicNerTagger::new();
        let extractor = Extractor::new(&topo, &ner, 75);
        assert!(extractor.extract("einfach nur ein netter tag heute").is_none());
    }

    #[test]
    fn deterministic_for_identical_input() {
        let topo = fixture_topology();
        let ner = HeuristicNerTagger::new();
        let extractor = Extractor::new(&topo, &ner, 75);
        let text = "U8 Hermannplatz Richtung Wittenau";
        assert_eq!(extractor.extract(text), extractor.extract(text));
    }

    #[test]
    fn whitespace_normalization_does_not_change_extraction() {
        let topo = fixture_topology();
        let ner = HeuristicNerTagger::new();
        let extractor = Extractor::new(&topo, &ner, 75);
        let tight = extractor
            .extract("U8 Hermannplatz Richtung Wittenau")
            .unwrap();
        let loose = extractor
            .extract("  U8   Hermannplatz    Richtung   Wittenau  ")
            .unwrap();
        assert_eq!(tight, loose);
    }
}
