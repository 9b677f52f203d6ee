use std::collections::BTreeMap;

use freifahren_core::LineId;
use freifahren_topology::Topology;

/// Finds the line mentioned in `text`, if any. Tokens are compared
/// case-insensitively against the known line ids; pure-digit ids (tram
/// lines) only match when preceded by the literal `tram`, so a leading
/// count ("2 Kontrolleure") is never read as tram line 2.
pub fn detect_line(text: &str, topology: &Topology) -> Option<LineId> {
    let normalized = normalize(text);
    let tokens = fuse_prefixes(tokenize(&normalized));

    let mut known_lines: Vec<&LineId> = topology.lines().map(|l| &l.line_id).collect();
    known_lines.sort_by_key(|l| std::cmp::Reverse(l.as_str().len()));

    // Sorted map: tie-breaks below must not depend on hash order.
    let mut matches: BTreeMap<&str, Vec<&LineId>> = BTreeMap::new();
    for (i, token) in tokens.iter().enumerate() {
        for line_id in &known_lines {
            if !token.eq_ignore_ascii_case(line_id.as_str()) {
                continue;
            }
            if is_pure_digits(line_id.as_str()) {
                let prev_is_tram = i > 0 && tokens[i - 1].eq_ignore_ascii_case("tram");
                if !prev_is_tram {
                    continue;
                }
            }
            matches.entry(token.as_str()).or_default().push(line_id);
        }
    }

    if matches.is_empty() {
        return None;
    }

    if matches.len() == 1 {
        let (_, lines) = matches.iter().next().unwrap();
        return longest(lines);
    }

    // More than one token matched: pick the longest match among tokens
    // that matched more than one line.
    let ambiguous: Vec<&&LineId> = matches
        .values()
        .filter(|lines| lines.len() > 1)
        .flatten()
        .collect();
    if !ambiguous.is_empty() {
        return longest(&ambiguous.into_iter().copied().collect::<Vec<_>>());
    }

    // Multiple distinct tokens each matched exactly one, different line:
    // genuinely ambiguous, no line wins.
    None
}

fn longest(lines: &[&LineId]) -> Option<LineId> {
    lines
        .iter()
        .max_by_key(|l| l.as_str().len())
        .map(|l| (*l).clone())
}

fn is_pure_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| match c {
            ',' | '.' | '-' | '/' => ' ',
            other => other,
        })
        .collect()
}

fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(|s| s.to_string()).collect()
}

/// Merges a bare `s`/`u` token with the following token (`s` + `41` ->
/// `s41`), preserving the second token's case.
fn fuse_prefixes(tokens: Vec<String>) -> Vec<String> {
    let mut result = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter().peekable();
    while let Some(token) = iter.next() {
        if (token.eq_ignore_ascii_case("s") || token.eq_ignore_ascii_case("u")) && iter.peek().is_some()
        {
            let next = iter.next().unwrap();
            result.push(format!("{}{}", token, next));
        } else {
            result.push(token);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture_topology;

    #[test]
    fn detects_simple_line_mention() {
        let topo = fixture_topology();
        assert_eq!(detect_line("U8 Hermannplatz", &topo), Some(LineId::new("U8")));
    }

    #[test]
    fn fuses_prefix_and_digit() {
        let topo = fixture_topology();
        assert_eq!(detect_line("s 41 Tempelhof", &topo), Some(LineId::new("S41")));
    }

    #[test]
    fn digit_line_matches_only_after_tram_keyword() {
        let topo = fixture_topology();
        assert_eq!(detect_line("Tram 12 Am Kupfergraben", &topo), Some(LineId::new("12")));
    }

    #[test]
    fn bare_count_never_resolves_to_a_digit_line() {
        let topo = fixture_topology();
        assert_eq!(detect_line("12 Kontrolleure am Bahnsteig", &topo), None);
        assert_eq!(detect_line("2 Kontrolleure U9", &topo), Some(LineId::new("U9")));
    }

    #[test]
    fn no_line_mentioned_returns_none() {
        let topo = fixture_topology();
        assert_eq!(detect_line("Kontrolleure am Bahnsteig", &topo), None);
    }

    #[test]
    fn two_distinct_lines_each_mentioned_once_is_ambiguous() {
        let topo = fixture_topology();
        assert_eq!(detect_line("U6 oder U8 Kontrolle", &topo), None);
    }
}
