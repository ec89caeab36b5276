//! Context-window assembly.
//!
//! The assembler pulls the live conversation through the pager, queries the
//! retrieval index for related chunks, and hands the five standard sections
//! to the budget allocator. Storage and index failures degrade to smaller
//! windows; only a bad ratio table is an error.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::warn;
use windlass_core::{ConversationStore, Error, Result, RetrievalIndex, SessionId};

use crate::pager::ConversationPager;
use crate::prompts;
use crate::retrieval::render_retrieved_knowledge;
use crate::section::{build_context_window, Section};

/// Token budget and retrieval knobs for one assembler.
#[derive(Debug, Clone)]
pub struct WindowOptions {
    pub ceiling_tokens: usize,
    pub ratios: BTreeMap<String, f64>,
    pub top_k: usize,
}

pub struct WindowAssembler {
    store: Arc<dyn ConversationStore>,
    index: Arc<dyn RetrievalIndex>,
    pager: ConversationPager,
    options: WindowOptions,
}

impl WindowAssembler {
    /// Build an assembler, rejecting ratio tables that oversubscribe the
    /// ceiling up front rather than on every assembly pass.
    pub fn new(
        store: Arc<dyn ConversationStore>,
        index: Arc<dyn RetrievalIndex>,
        pager: ConversationPager,
        options: WindowOptions,
    ) -> Result<Self> {
        let total: f64 = options.ratios.values().sum();
        if total > 1.0 + 1e-6 {
            return Err(Error::Config {
                message: format!("Ratios sum to {total:.2}, must be <= 1.0"),
            });
        }
        Ok(Self {
            store,
            index,
            pager,
            options,
        })
    }

    /// Assemble the full context window for a session.
    ///
    /// The conversation is paged against its own slice of the ceiling, so
    /// turns migrate into the index before the allocator would have to cut
    /// the transcript. An unreadable conversation assembles as if empty.
    pub async fn assemble_window(&self, session_id: &SessionId) -> Result<String> {
        let turns = match self.store.load(session_id).await {
            Ok(turns) => turns,
            Err(e) => {
                warn!(error = %e, "Failed to load conversation, assembling without it");
                Vec::new()
            }
        };

        let conversation_ratio = self
            .options
            .ratios
            .get(prompts::CURRENT_CONVERSATION_SECTION)
            .copied()
            .unwrap_or(0.0);
        let pager_ceiling =
            (self.options.ceiling_tokens as f64 * conversation_ratio).floor() as usize;
        let live = self.pager.page(&turns, session_id, pager_ceiling).await;
        let conversation = format!("{}{live}", prompts::CONVERSATION_INTRO);

        let knowledge =
            render_retrieved_knowledge(self.index.as_ref(), &turns, self.options.top_k).await;

        let sections = [
            Section::new(prompts::SYSTEM_PROMPT_SECTION, prompts::SYSTEM_PROMPT),
            Section::new(prompts::TASK_SECTION, prompts::TASK),
            Section::new(prompts::TOOL_CONTRACT_SECTION, prompts::TOOL_CONTRACT),
            Section::new(prompts::RETRIEVED_KNOWLEDGE_SECTION, knowledge),
            Section::new(prompts::CURRENT_CONVERSATION_SECTION, conversation),
        ];
        build_context_window(&sections, &self.options.ratios, self.options.ceiling_tokens)
    }
}

/// Assemble the two-section window handed to the summarizer: the fixed
/// summary task plus the material to summarize, at a 0.3 / 0.7 split.
pub fn build_summary_window(text: &str, ceiling: usize) -> Result<String> {
    let mut ratios = BTreeMap::new();
    ratios.insert(prompts::SUMMARY_TASK_SECTION.to_string(), 0.3);
    ratios.insert(prompts::TRANSCRIPT_SECTION.to_string(), 0.7);

    let sections = [
        Section::new(prompts::SUMMARY_TASK_SECTION, prompts::SUMMARY_TASK),
        Section::new(
            prompts::TRANSCRIPT_SECTION,
            format!("{}{text}", prompts::TRANSCRIPT_INTRO),
        ),
    ];
    build_context_window(&sections, &ratios, ceiling)
}
