//! Deterministic anchor extraction for stored summaries.
//!
//! Anchors are the grep-friendly tokens a summary carries so the chunk it
//! describes stays findable in the retrieval index. They are derived from
//! the summarized text itself, never taken from the model response:
//! structured tokens (snake_case identifiers, paths, URLs, host:port pairs,
//! dotted versions, CLI flags, bare numbers), acronyms, and a small
//! allowlist of infrastructure terms, scored by weighted occurrence and
//! capped at [`MAX_ANCHORS`].
//!
//! Every returned anchor is normalized (lowercased, whitespace collapsed to
//! underscores) and is guaranteed to occur in the source text, so a later
//! keyword search for it will hit the chunk.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

/// Hard cap on anchors per summary.
pub const MAX_ANCHORS: usize = 12;

/// Minimum length for word-like anchors outside the allowlist.
const MIN_LEN: usize = 3;

/// Prefixes that mark an anchor as infrastructure-flavored and boost it.
const PREFERRED_PREFIXES: &[&str] = &[
    "http", "https", "ssh", "tls", "jwt", "rag", "ollama", "faiss", "llama", "docker",
];

/// Normalized forms that are never kept.
const BLACKLIST: &[&str] = &["e.g", "eg"];

static STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "an", "and", "any", "approach", "are", "as", "at", "be", "by", "can",
        "conversation", "data", "discussion", "do", "eg", "enable", "enabled", "ensure",
        "etc", "focus", "for", "from", "general", "has", "have", "help", "i", "if",
        "implement", "in", "information", "is", "it", "like", "me", "my", "of", "on",
        "or", "our", "server", "settings", "setup", "so", "summary", "system", "that",
        "the", "this", "to", "us", "use", "using", "we", "were", "will", "with",
        "would", "you", "your",
    ]
    .into_iter()
    .collect()
});

static ALLOWLIST: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // protocols / transport
        "ssh", "https", "http", "tls", "ssl", "smtp", "dns", "tcp", "udp",
        // llm / retrieval infra
        "rag", "faiss", "llamaindex", "ollama", "openai", "chroma", "bm25", "mmr",
        // common tokens
        "jwt", "oauth", "json", "yaml", "toml", "sql",
    ]
    .into_iter()
    .collect()
});

// Compiled once on first use.
static STRUCTURED_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\b[a-zA-Z]:\\[^\s]+",                 // windows paths
        r"\bhttps?://[^\s]+",                   // urls
        r"\blocalhost:\d{2,5}\b",               // host:port
        r"\b\d{1,3}(?:\.\d{1,3}){2,3}\b",       // dotted versions / addresses
        r"\b\d{2,5}\b",                         // bare numbers (ports, counts)
        r"\b\d+\s*-\s*\d+\b",                   // numeric ranges
        r"\b[A-Z_]{2,}[A-Z0-9_]*\b",            // CONSTANTS / env vars
        r"\b[a-zA-Z_][a-zA-Z0-9_]{2,}\b",       // identifiers
        r"\b[a-zA-Z0-9_-]+\.[a-zA-Z0-9_.-]+\b", // dotted tokens (files, domains)
        r"\B--[a-zA-Z][a-zA-Z0-9_-]*\b",        // cli flags
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static UNIX_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^a-zA-Z0-9])(/[^\s]+/[^\s]+)").unwrap());

static CODE_SPAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]{1,200})`").unwrap());

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)```.*?```").unwrap());

static ACRONYM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[A-Z]{2,}\b").unwrap());

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-zA-Z0-9]+").unwrap());

/// Extract a ranked list of normalized anchors from `text`.
pub fn extract_anchors(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let lower = text.to_lowercase();
    let normalized_text = normalize_anchor(text);

    let mut scores: HashMap<String, i32> = HashMap::new();
    let mut acronyms: HashSet<String> = HashSet::new();

    // Inline code and fenced blocks tend to hold the strongest anchors, so
    // their tokens are counted a second time at a higher weight.
    let mut code_text = String::new();
    for cap in CODE_SPAN.captures_iter(text) {
        if let Some(span) = cap.get(1) {
            code_text.push_str(span.as_str());
            code_text.push(' ');
        }
    }
    for block in FENCED_BLOCK.find_iter(text) {
        code_text.push_str(block.as_str());
        code_text.push(' ');
    }

    for pattern in STRUCTURED_PATTERNS.iter() {
        for m in pattern.find_iter(text) {
            *scores.entry(normalize_anchor(m.as_str())).or_default() += 2;
        }
        for m in pattern.find_iter(&code_text) {
            *scores.entry(normalize_anchor(m.as_str())).or_default() += 3;
        }
    }
    for cap in UNIX_PATH.captures_iter(text) {
        if let Some(path) = cap.get(1) {
            *scores.entry(normalize_anchor(path.as_str())).or_default() += 2;
        }
    }
    for cap in UNIX_PATH.captures_iter(&code_text) {
        if let Some(path) = cap.get(1) {
            *scores.entry(normalize_anchor(path.as_str())).or_default() += 3;
        }
    }

    for m in ACRONYM.find_iter(text) {
        let normalized = normalize_anchor(m.as_str());
        acronyms.insert(normalized.clone());
        *scores.entry(normalized).or_default() += 2;
    }

    for term in ALLOWLIST.iter() {
        if lower.contains(term) {
            *scores.entry((*term).to_string()).or_default() += 4;
        }
    }

    // Bigrams of content words catch multiword names; they only survive the
    // later filters when the underscored form occurs verbatim in the text.
    let words: Vec<&str> = WORD.find_iter(&lower).map(|m| m.as_str()).collect();
    let content_words: Vec<&str> = words
        .into_iter()
        .filter(|w| !STOPWORDS.contains(w) && w.len() >= MIN_LEN)
        .collect();
    for pair in content_words.windows(2) {
        *scores.entry(format!("{}_{}", pair[0], pair[1])).or_default() += 1;
    }

    let mut cleaned: HashMap<String, i32> = HashMap::new();
    for (anchor, base) in scores {
        if is_generic(&anchor, &acronyms) {
            continue;
        }
        if !normalized_text.contains(&anchor) {
            continue;
        }
        let mut score = base;
        if anchor.chars().any(|c| matches!(c, '/' | ':' | '.' | '_' | '+' | '-')) {
            score += 2;
        }
        if acronyms.contains(&anchor) {
            score += 2;
        }
        if PREFERRED_PREFIXES.iter().any(|p| anchor.starts_with(p)) {
            score += 2;
        }
        cleaned.insert(anchor, score);
    }

    // Drop composites that merely restate anchors already present, and any
    // underscored form that never occurs verbatim.
    let anchor_set: HashSet<&str> = cleaned.keys().map(String::as_str).collect();
    let mut kept: Vec<String> = Vec::new();
    for anchor in cleaned.keys() {
        let parts: Vec<&str> = anchor.split('_').filter(|p| !p.is_empty()).collect();
        if parts.len() > 1
            && parts.iter().all(|p| anchor_set.contains(p))
            && occurrence_count(anchor, &lower) == 0
        {
            continue;
        }
        if anchor.contains('_') && occurrence_count(anchor, &lower) == 0 {
            continue;
        }
        kept.push(anchor.clone());
    }

    // Coherence gate: an anchor earns its place through the allowlist, a
    // prefix cluster, or repetition.
    let mut prefix_counts: HashMap<&str, usize> = HashMap::new();
    for anchor in &kept {
        *prefix_counts.entry(anchor_prefix(anchor)).or_default() += 1;
    }
    let allowlisted = kept.iter().filter(|a| ALLOWLIST.contains(a.as_str())).count();

    let mut coherent: Vec<String> = Vec::new();
    for anchor in &kept {
        if ALLOWLIST.contains(anchor.as_str()) {
            coherent.push(anchor.clone());
            continue;
        }
        if allowlisted >= 3 {
            if is_structured(anchor) && occurrence_count(anchor, &lower) >= 2 {
                coherent.push(anchor.clone());
            }
            continue;
        }
        if prefix_counts.get(anchor_prefix(anchor)).copied().unwrap_or(0) >= 2
            || occurrence_count(anchor, &lower) >= 2
        {
            coherent.push(anchor.clone());
        }
    }

    let score_of = |a: &String| cleaned.get(a).copied().unwrap_or(0);
    coherent.sort_by(|a, b| {
        score_of(b)
            .cmp(&score_of(a))
            .then(a.len().cmp(&b.len()))
            .then(a.cmp(b))
    });
    coherent.truncate(MAX_ANCHORS);
    coherent
}

/// Lowercase, collapse whitespace runs to `_`, and keep only the characters
/// that survive a grep: letters, digits, and `. _ : / + -`.
fn normalize_anchor(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches(|c: char| matches!(c, '`' | '\'' | '"'));
    let mut out = String::with_capacity(trimmed.len());
    let mut last_was_underscore = false;
    for c in trimmed.chars() {
        let c = match c {
            '\u{2014}' | '\u{2013}' => '-',
            other => other.to_ascii_lowercase(),
        };
        if c.is_whitespace() {
            if !last_was_underscore && !out.is_empty() {
                out.push('_');
                last_was_underscore = true;
            }
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | ':' | '/' | '+' | '-') {
            if c == '_' {
                if !last_was_underscore && !out.is_empty() {
                    out.push('_');
                    last_was_underscore = true;
                }
            } else {
                out.push(c);
                last_was_underscore = false;
            }
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

fn is_generic(anchor: &str, acronyms: &HashSet<String>) -> bool {
    if anchor.is_empty() {
        return true;
    }
    if BLACKLIST.contains(&anchor) || STOPWORDS.contains(anchor) {
        return true;
    }
    if !anchor.chars().any(|c| c.is_ascii_alphanumeric()) {
        return true;
    }
    if anchor.len() < MIN_LEN && !ALLOWLIST.contains(anchor) {
        return true;
    }
    if anchor.split('_').all(|part| STOPWORDS.contains(part)) {
        return true;
    }
    if !is_structured(anchor) && !ALLOWLIST.contains(anchor) && !acronyms.contains(anchor) {
        return true;
    }
    false
}

/// Structured anchors carry a digit or a separator; plain words are only
/// kept through the allowlist or as acronyms.
fn is_structured(anchor: &str) -> bool {
    anchor.chars().any(|c| c.is_ascii_digit())
        || anchor.chars().any(|c| matches!(c, '/' | ':' | '.' | '_' | '+' | '-'))
}

/// Non-overlapping occurrences of `anchor` in `lower`, counting only hits
/// with no adjacent alphanumeric character.
fn occurrence_count(anchor: &str, lower: &str) -> usize {
    if anchor.is_empty() {
        return 0;
    }
    let bytes = lower.as_bytes();
    lower
        .match_indices(anchor)
        .filter(|(start, matched)| {
            let end = start + matched.len();
            let clear_before = *start == 0 || !bytes[start - 1].is_ascii_alphanumeric();
            let clear_after = end == bytes.len() || !bytes[end].is_ascii_alphanumeric();
            clear_before && clear_after
        })
        .count()
}

fn anchor_prefix(anchor: &str) -> &str {
    anchor
        .split(|c: char| matches!(c, '_' | ':' | '/' | '.' | '-'))
        .next()
        .unwrap_or("")
}
