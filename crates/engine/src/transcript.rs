//! Timestamped transcript rendering and oldest-first prefix packing.

use windlass_core::Turn;

use crate::estimate::estimate_tokens;

/// Render turns as `[timestamp] Role: content` lines joined by newlines.
pub fn render_transcript(turns: &[Turn]) -> String {
    turns
        .iter()
        .map(|t| format!("[{}] {}: {}", t.timestamp, t.role.label(), t.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Longest prefix of `turns` whose rendered transcript stays within
/// `budget` tokens.
///
/// Grows from the oldest turn so migration always takes the oldest
/// context out of the live window first. Returns an empty slice when even
/// the first turn does not fit.
pub fn keep_oldest_prefix(turns: &[Turn], budget: usize) -> &[Turn] {
    let mut end = 0;
    for i in 1..=turns.len() {
        if estimate_tokens(&render_transcript(&turns[..i])) <= budget {
            end = i;
        } else {
            break;
        }
    }
    &turns[..end]
}
