const EMOJI_RANGE_START: u32 = 0x1F600;
const EMOJI_RANGE_END: u32 = 0x1F64F;
const MAX_EMOJI_CHARS: usize = 5;
const MIN_LEN: usize = 3;
const MAX_LEN: usize = 250;

/// Filters out spam, questions and trivia before any expensive work runs.
/// Pure function, no failure modes — returns `true` to accept.
pub fn accepts(text: &str) -> bool {
    if text.chars().count() < MIN_LEN {
        tracing::debug!("guard: rejected, below minimum length");
        return false;
    }
    if text.contains('?') {
        tracing::debug!("guard: rejected, contains a question mark");
        return false;
    }
    if text.chars().count() > MAX_LEN {
        tracing::debug!("guard: rejected, exceeds maximum length");
        return false;
    }
    if text.contains("http") {
        tracing::debug!("guard: rejected, contains a link");
        return false;
    }
    let emoji_count = text
        .chars()
        .filter(|&c| (c as u32) >= EMOJI_RANGE_START && (c as u32) <= EMOJI_RANGE_END)
        .count();
    if emoji_count > MAX_EMOJI_CHARS {
        tracing::debug!(emoji_count, "guard: rejected, excessive emoji");
        return false;
    }
    true
}
