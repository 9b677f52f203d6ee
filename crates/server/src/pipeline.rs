use chrono::{DateTime, Utc};

use freifahren_core::Report;
use freifahren_extract::{guard, Extractor};

use crate::state::AppState;

/// A single inbound chat message, stripped of any platform-specific
/// envelope.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub chat_id: String,
    pub date_unix: i64,
    pub text: String,
}

/// Runs one message through Guard → Extractor → Verifier, producing a
/// `Report` stamped with `timestamp` when the pipeline resolved at least
/// one field. Never panics: malformed or unresolvable input silently
/// yields `None`.
pub fn run_pipeline(text: &str, timestamp: DateTime<Utc>, state: &AppState) -> Option<Report> {
    if !guard::accepts(text) {
        tracing::info!(len = text.len(), "guard rejected message");
        return None;
    }

    let threshold = state.config.risk.fuzzy_threshold;
    let extractor = Extractor::new(&state.topology, state.ner.as_ref(), threshold);
    let mut candidate = extractor.extract(text)?;

    freifahren_verify::verify(
        &mut candidate,
        text,
        &state.topology,
        state.ner.as_ref(),
        threshold,
        &state.config.risk.ring_lines,
    );

    if candidate.is_empty() {
        return None;
    }

    Some(Report {
        station_id: candidate.station,
        timestamp: Report::truncate_to_minute(timestamp),
        direction_id: candidate.direction,
        lines: candidate.line.into_iter().collect(),
    })
}
