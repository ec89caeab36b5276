//! Section-based context window allocation.
//!
//! Sections are processed in list order against one shared token counter,
//! so listing order is priority order: a section only ever competes with
//! what the sections before it left over. Unused share is not
//! redistributed.

use std::collections::BTreeMap;

use tracing::{debug, warn};
use windlass_core::{Error, Result};

use crate::estimate::{estimate_tokens, truncate_to_tokens};

/// One named window section.
#[derive(Debug, Clone)]
pub struct Section {
    pub name: String,
    pub text: String,
}

impl Section {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Allocate `ceiling` tokens across `sections` and render the window.
///
/// Each section gets `min(floor(ceiling * ratio), remaining)` tokens.
/// Sections with a zero ratio or blank text are skipped entirely; a
/// section whose allotment has been exhausted by earlier sections is
/// logged and skipped. Section text is trimmed, truncated to its
/// allotment, and rendered as a `### NAME` block; blocks are joined by
/// one blank line.
///
/// Ratios summing to more than 1 (within epsilon) are a configuration
/// error and produce no partial output. Only ratios for listed section
/// names count toward the sum.
pub fn build_context_window(
    sections: &[Section],
    ratios: &BTreeMap<String, f64>,
    ceiling: usize,
) -> Result<String> {
    let total_ratio: f64 = sections
        .iter()
        .map(|s| ratios.get(&s.name).copied().unwrap_or(0.0))
        .sum();
    if total_ratio > 1.0 + 1e-6 {
        return Err(Error::Config {
            message: format!("Ratios sum to {total_ratio:.2}, must be <= 1.0"),
        });
    }

    let mut remaining = ceiling;
    let mut rendered: Vec<String> = Vec::new();

    for section in sections {
        let ratio = ratios.get(&section.name).copied().unwrap_or(0.0);
        let text = section.text.trim();
        if ratio <= 0.0 || text.is_empty() {
            continue;
        }

        let allotment = ((ceiling as f64) * ratio).floor() as usize;
        let allotment = allotment.min(remaining);
        if allotment == 0 {
            warn!(section = %section.name, "No budget left for section, skipping");
            continue;
        }

        let truncated = truncate_to_tokens(text, allotment);
        let used = estimate_tokens(&truncated);
        remaining = remaining.saturating_sub(used);
        debug!(section = %section.name, allotment, used, remaining, "Rendered section");

        rendered.push(format!("### {}\n{}", section.name, truncated));
    }

    Ok(rendered.join("\n\n"))
}
