//! Keyword relevance scoring shared by the index backends.
//!
//! Queries are tokenized into lowercase terms and each stored chunk is
//! scored by term occurrences normalized by chunk length, so a short
//! focused chunk outranks a long one with the same hit count.

use serde::{Deserialize, Serialize};
use windlass_core::{ChunkMetadata, ScoredChunk};

/// One stored chunk: the migrated text plus its provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedChunk {
    pub text: String,
    pub metadata: ChunkMetadata,
}

/// Tokenize a query into lowercase terms, stripping punctuation.
pub fn query_terms(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .map(|w| {
            w.chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

/// Rank chunks against a query, best first.
///
/// Score = total term occurrences / (chunk length / 100), floored at 1.
/// Chunks with no matching term are dropped. Returns at most `top_k`
/// results.
pub fn rank_chunks(chunks: &[IndexedChunk], query: &str, top_k: usize) -> Vec<ScoredChunk> {
    let terms = query_terms(query);
    if terms.is_empty() {
        return Vec::new();
    }

    let mut results: Vec<ScoredChunk> = chunks
        .iter()
        .filter_map(|chunk| {
            let haystack = chunk.text.to_lowercase();
            let occurrences: usize = terms
                .iter()
                .map(|t| haystack.matches(t.as_str()).count())
                .sum();
            if occurrences == 0 {
                return None;
            }
            let score = occurrences as f32 / (chunk.text.len() as f32 / 100.0).max(1.0);
            Some(ScoredChunk {
                score,
                text: chunk.text.clone(),
            })
        })
        .collect();

    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    results.truncate(top_k);
    results
}
