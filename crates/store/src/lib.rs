//! # Windlass Store
//!
//! File-backed persistence for conversations, the offload ledger, and the
//! previous-session pointer. Everything here is flat JSON (or plain text)
//! under one data directory, human-inspectable, and tolerant of absent or
//! damaged files: reads degrade to empty state, only writes can fail.

pub mod conversation;
pub mod ledger;
pub mod session;

pub use conversation::FileConversationStore;
pub use ledger::OffloadLedger;
pub use session::PreviousSession;
