use freifahren_core::{LineId, StationId};
use freifahren_topology::Topology;

use crate::ner::NerTagger;
use crate::station_detect::detect_station;

const DIRECTION_KEYWORDS: &[&str] = &[
    "nach", "richtung", "bis", "zu", "to", "towards", "direction", "ri", "richtig",
];

/// Scans for a direction keyword and resolves the word following (or,
/// failing that, preceding) it to a station. Returns the resolved
/// direction and the text with the keyword and matched word removed, so
/// station detection does not consume the same word twice.
pub fn detect_direction(
    text: &str,
    line: Option<&LineId>,
    topology: &Topology,
    ner: &dyn NerTagger,
    fuzzy_threshold: u32,
) -> (Option<StationId>, String) {
    let orig_tokens: Vec<&str> = text.split_whitespace().collect();
    let normalized: Vec<String> = orig_tokens.iter().map(|t| normalize_token(t)).collect();

    // Positions in `orig_tokens` that survive the "standalone s/u" filter.
    let active: Vec<usize> = (0..orig_tokens.len())
        .filter(|&i| normalized[i] != "s" && normalized[i] != "u")
        .collect();

    let keyword_pos = active
        .iter()
        .position(|&i| DIRECTION_KEYWORDS.contains(&normalized[i].as_str()));

    let Some(kw_active_idx) = keyword_pos else {
        return (None, text.to_string());
    };
    let keyword_orig_idx = active[kw_active_idx];

    // Try words after the keyword, in order.
    for &orig_idx in &active[kw_active_idx + 1..] {
        let word = orig_tokens[orig_idx];
        let result = detect_station(word, line, topology, ner, fuzzy_threshold);
        if let Some(station) = result.station {
            return (
                Some(station),
                remove_tokens(&orig_tokens, &[keyword_orig_idx, orig_idx]),
            );
        }
    }

    // Fall back to the single word before the keyword.
    if kw_active_idx > 0 {
        let orig_idx = active[kw_active_idx - 1];
        let word = orig_tokens[orig_idx];
        let result = detect_station(word, line, topology, ner, fuzzy_threshold);
        if let Some(station) = result.station {
            return (
                Some(station),
                remove_tokens(&orig_tokens, &[keyword_orig_idx, orig_idx]),
            );
        }
    }

    (None, text.to_string())
}

fn normalize_token(token: &str) -> String {
    token
        .to_lowercase()
        .chars()
        .filter(|&c| c != '.' && c != ',')
        .collect()
}

fn remove_tokens(tokens: &[&str], drop_indices: &[usize]) -> String {
    tokens
        .iter()
        .enumerate()
        .filter(|(i, _)| !drop_indices.contains(i))
        .map(|(_, t)| *t)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ner::HeuristicNerTagger;
    use crate::test_support::fixture_topology;
    use freifahren_core::StationId;

    #[test]
    fn finds_direction_after_keyword() {
        let topo = fixture_topology();
        let ner = HeuristicNerTagger::new();
        let (direction, residual) = detect_direction(
            "U8 Hermannplatz Richtung Wittenau am Bahnsteig",
            Some(&LineId::new("U8")),
            &topo,
            &ner,
            75,
        );
        assert_eq!(direction, Some(StationId::new("wittenau")));
        assert!(!residual.to_lowercase().contains("wittenau"));
        assert!(!residual.to_lowercase().contains("richtung"));
    }

    #[test]
    fn no_keyword_returns_text_unchanged() {
        let topo = fixture_topology();
        let ner = HeuristicNerTagger::new();
        let (direction, residual) =
            detect_direction("Mehringdamm U6", None, &topo, &ner, 75);
        assert_eq!(direction, None);
        assert_eq!(residual, "Mehringdamm U6");
    }

    #[test]
    fn falls_back_to_word_before_keyword() {
        let topo = fixture_topology();
        let ner = HeuristicNerTagger::new();
        let (direction, _) =
            detect_direction("Wittenau richtung am Bahnsteig", Some(&LineId::new("U8")), &topo, &ner, 75);
        assert_eq!(direction, Some(StationId::new("wittenau")));
    }
}
