//! # Windlass Engine
//!
//! The assembly and paging machinery: token budgeting across named window
//! sections, incremental offload of old conversation turns into the
//! retrieval index, startup handoff between sessions, and summarization
//! over a pluggable generation backend.
//!
//! The engine depends only on the trait surface in `windlass-core` plus the
//! file-backed ledger and pointer from `windlass-store`; concrete store and
//! index backends are injected by the caller.

pub mod anchors;
pub mod estimate;
pub mod handoff;
pub mod pager;
pub mod prompts;
pub mod retrieval;
pub mod section;
pub mod summary;
pub mod transcript;
pub mod window;

pub use anchors::extract_anchors;
pub use estimate::{estimate_tokens, truncate_to_tokens};
pub use handoff::SessionHandoff;
pub use pager::ConversationPager;
pub use retrieval::render_retrieved_knowledge;
pub use section::{build_context_window, Section};
pub use summary::Summarizer;
pub use transcript::{keep_oldest_prefix, render_transcript};
pub use window::{build_summary_window, WindowAssembler, WindowOptions};
