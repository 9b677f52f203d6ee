/// A single recognized span of text in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
}

/// Named-entity recognizer boundary: a black-box sequence tagger that,
/// given text, returns zero or more substrings that look like station
/// mentions, in text order. The core never assumes the model runs
/// in-process — an out-of-process implementation (gRPC, a local HTTP
/// microservice) can be swapped in behind the same trait without touching
/// any caller.
pub trait NerTagger: Send + Sync {
    fn tag(&self, text: &str) -> Vec<Span>;
}

/// A conservative in-process tagger: greedily merges runs of tokens that
/// are not digits, line codes, or common filler words into candidate
/// spans. Downstream fuzzy matching against the station pool does the
/// real disambiguation — this tagger's only job is to avoid feeding
/// obvious noise into it.
#[derive(Debug, Default)]
pub struct HeuristicNerTagger {
    extra_stopwords: Vec<String>,
}

const BASE_STOPWORDS: &[&str] = &[
    "s", "u", "am", "im", "in", "an", "auf", "bei", "mit", "zu", "nach", "der", "die", "das",
    "den", "dem", "und", "oder", "ist", "sind", "war", "jetzt", "gerade", "eben", "hier", "da",
    "dort", "kontrolleur", "kontrolleure", "control", "controller", "inspector", "inspectors",
    "eingestiegen", "ausgestiegen", "aussteigen", "einsteigen", "raus", "steigen",
    "bahnsteig", "bahn", "zug", "gleis", "richtung", "ri", "tram", "hellblau", "blau",
    "gesehen", "gesichtet", "gespottet", "ticket", "tickets",
    // generic street-name suffixes mentioned on their own never identify a
    // station ("Richtung Osloer Straße" -> the useful token is "Osloer")
    "straße", "strasse", "str",
];

impl HeuristicNerTagger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extends the built-in filler-word list, e.g. with venue-specific
    /// slang a deployment has observed feeding noise into extraction.
    pub fn with_stopwords(mut self, words: impl IntoIterator<Item = String>) -> Self {
        self.extra_stopwords
            .extend(words.into_iter().map(|w| w.to_lowercase()));
        self
    }

    fn is_excluded(&self, raw_token: &str) -> bool {
        let token = trim_punctuation(raw_token);
        if token.is_empty() {
            return true;
        }
        if token.chars().all(|c| c.is_ascii_digit()) {
            return true;
        }
        if looks_like_line_code(token) {
            return true;
        }
        let lower = token.to_lowercase();
        BASE_STOPWORDS.contains(&lower.as_str()) || self.extra_stopwords.contains(&lower)
    }
}

impl NerTagger for HeuristicNerTagger {
    fn tag(&self, text: &str) -> Vec<Span> {
        let mut spans = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for raw_token in text.split_whitespace() {
            if self.is_excluded(raw_token) {
                if !current.is_empty() {
                    spans.push(Span {
                        text: current.join(" "),
                    });
                    current.clear();
                }
                continue;
            }
            current.push(trim_punctuation(raw_token));
        }
        if !current.is_empty() {
            spans.push(Span {
                text: current.join(" "),
            });
        }
        spans
    }
}

fn trim_punctuation(token: &str) -> &str {
    token.trim_matches(|c: char| c.is_ascii_punctuation() && c != '-')
}

/// True for short alphanumeric tokens shaped like a line code (`U8`,
/// `S41`, `M10`) — at most one or two leading letters followed entirely by
/// digits, four characters or fewer.
fn looks_like_line_code(token: &str) -> bool {
    if token.len() > 4 || token.is_empty() {
        return false;
    }
    let mut chars = token.chars();
    let first = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => c,
        _ => return false,
    };
    let _ = first;
    let rest: String = chars.collect();
    !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit())
}
