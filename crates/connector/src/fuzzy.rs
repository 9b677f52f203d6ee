/// Token-based fuzzy similarity in `[0, 100]`, used by station detection
/// to score NER spans against candidate station/synonym names.
///
/// `ratio` is the highest of three views of the same pair, the same
/// combination fuzzywuzzy-style matchers use: the plain sequence ratio, a
/// token-sort ratio (tokens reordered alphabetically before comparing, so
/// word order differences don't cost anything), and a token-set ratio
/// (shared tokens factored out, so one name being a superset of the other's
/// words doesn't cost anything either). Station names here are mostly
/// single words, where all three collapse to the same value; the token
/// views earn their keep on multi-word names like "Rathaus Steglitz".
pub fn ratio(a: &str, b: &str) -> u32 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    sequence_ratio(&a, &b)
        .max(token_sort_ratio(&a, &b))
        .max(token_set_ratio(&a, &b))
}

/// Plain character-sequence ratio: `2 * M / T`, where `M` is the total
/// length of the matching blocks found by [`matching_length`] and `T` is
/// the combined length of both strings. Unlike a Levenshtein-distance-based
/// ratio, a transposed pair of adjacent characters only costs the length of
/// the shorter matching run around it, not a full substitution each — the
/// same tolerance difflib's `SequenceMatcher.ratio()` has.
fn sequence_ratio(a: &str, b: &str) -> u32 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() && b.is_empty() {
        return 100;
    }
    let total = a.len() + b.len();
    if total == 0 {
        return 100;
    }
    let matched = matching_length(&a, &b);
    ((2 * matched * 100) as f64 / total as f64).round() as u32
}

/// Total length of the longest common substring between `a` and `b`, plus
/// recursively whatever else matches to its left and right — the
/// Ratcliff/Obershelp "matching blocks" construction.
fn matching_length(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let (start_a, start_b, len) = longest_common_substring(a, b);
    if len == 0 {
        return 0;
    }
    let left = matching_length(&a[..start_a], &b[..start_b]);
    let right = matching_length(&a[start_a + len..], &b[start_b + len..]);
    left + len + right
}

/// Longest contiguous run common to `a` and `b`, as `(start_in_a, start_in_b, len)`.
/// `len == 0` means no character is shared at all.
fn longest_common_substring(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut dp = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    let mut best = (0, 0, 0);
    for i in 1..=a.len() {
        for j in 1..=b.len() {
            if a[i - 1] == b[j - 1] {
                dp[i][j] = dp[i - 1][j - 1] + 1;
                if dp[i][j] > best.2 {
                    best = (i - dp[i][j], j - dp[i][j], dp[i][j]);
                }
            }
        }
    }
    best
}

fn tokens(s: &str) -> Vec<&str> {
    s.split_whitespace().collect()
}

/// Sorts each string's tokens alphabetically before comparing, so word
/// order never costs anything ("Steglitz Rathaus" vs "Rathaus Steglitz").
fn token_sort_ratio(a: &str, b: &str) -> u32 {
    sequence_ratio(&sorted_tokens_joined(a), &sorted_tokens_joined(b))
}

fn sorted_tokens_joined(s: &str) -> String {
    let mut toks = tokens(s);
    toks.sort_unstable();
    toks.join(" ")
}

/// Factors out the tokens common to both strings before comparing, so one
/// name containing the other's words plus extras doesn't cost anything.
fn token_set_ratio(a: &str, b: &str) -> u32 {
    use std::collections::BTreeSet;

    let tokens_a: BTreeSet<&str> = tokens(a).into_iter().collect();
    let tokens_b: BTreeSet<&str> = tokens(b).into_iter().collect();

    let intersection: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let only_a: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let only_b: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

    let sorted_sect = intersection.join(" ");
    let combined_a = join_with_prefix(&sorted_sect, &only_a);
    let combined_b = join_with_prefix(&sorted_sect, &only_b);

    sequence_ratio(&sorted_sect, &combined_a)
        .max(sequence_ratio(&sorted_sect, &combined_b))
        .max(sequence_ratio(&combined_a, &combined_b))
}

fn join_with_prefix(prefix: &str, rest: &[&str]) -> String {
    if prefix.is_empty() {
        rest.join(" ")
    } else if rest.is_empty() {
        prefix.to_string()
    } else {
        format!("{prefix} {}", rest.join(" "))
    }
}

/// Finds the highest-scoring candidate with score `>= threshold`, returning
/// `None` if no candidate clears the bar. Ties keep the first-seen
/// candidate, matching the deterministic "first match wins" rule used
/// elsewhere for synonym resolution.
pub fn best_match<'a>(
    query: &str,
    candidates: impl IntoIterator<Item = &'a str>,
    threshold: u32,
) -> Option<(&'a str, u32)> {
    let mut best: Option<(&str, u32)> = None;
    for candidate in candidates {
        let score = ratio(query, candidate);
        if score >= threshold {
            match best {
                Some((_, best_score)) if best_score >= score => {}
                _ => best = Some((candidate, score)),
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_identical_is_100() {
        assert_eq!(ratio("Hermannplatz", "hermannplatz"), 100);
    }

    #[test]
    fn ratio_close_misspelling_scores_high() {
        assert!(ratio("merhingdam", "mehringdamm") >= 75);
    }

    #[test]
    fn ratio_unrelated_scores_low() {
        assert!(ratio("Hermannplatz", "xyz") < 30);
    }

    #[test]
    fn ratio_is_order_independent_for_multi_word_names() {
        assert_eq!(ratio("Steglitz Rathaus", "Rathaus Steglitz"), 100);
    }

    #[test]
    fn ratio_tolerates_an_extra_shared_word() {
        assert!(ratio("Rathaus Steglitz", "Rathaus Steglitz Süd") >= 75);
    }

    #[test]
    fn best_match_picks_highest_above_threshold() {
        let candidates = ["Wittenau", "Hermannplatz", "Mehringdamm"];
        let (m, _) = best_match("merhingdam", candidates, 75).unwrap();
        assert_eq!(m, "Mehringdamm");
    }

    #[test]
    fn best_match_none_below_threshold() {
        let candidates = ["Wittenau", "Hermannplatz"];
        assert!(best_match("xyzxyz", candidates, 75).is_none());
    }
}
