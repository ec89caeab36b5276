//! Token estimation and budget truncation.
//!
//! Uses a character-based heuristic: ~4 characters per token, rounded up.
//! Downstream code relies only on monotonicity, never on tokenizer
//! fidelity.

use tracing::warn;

/// Estimate the token count for a string.
///
/// Heuristic: 1 token ≈ 4 characters. Empty text costs zero.
pub fn estimate_tokens(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }
    (text.len() + 3) / 4
}

/// Hard-truncate text to fit a token budget.
///
/// Returns the text unchanged when it already fits. Otherwise cuts at
/// `max_tokens * 4` characters on a char boundary, backs off to the last
/// space so words survive the cut, trims trailing whitespace, and appends
/// a `[TRUNCATED]` marker. The marker may overshoot a very small budget;
/// that is the only place a budget is exceeded.
pub fn truncate_to_tokens(text: &str, max_tokens: usize) -> String {
    if estimate_tokens(text) <= max_tokens {
        return text.to_string();
    }

    warn!(
        budget = max_tokens,
        estimated = estimate_tokens(text),
        "Truncating text to budget"
    );

    let max_chars = max_tokens.saturating_mul(4);
    let mut cut = max_chars.min(text.len());
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    let mut truncated = &text[..cut];

    if let Some(last_space) = truncated.rfind(' ') {
        if last_space > 0 {
            truncated = &truncated[..last_space];
        }
    }

    format!("{}\n\n[TRUNCATED]", truncated.trim_end())
}
