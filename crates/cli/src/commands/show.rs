//! `windlass show` — Print a session's live transcript.

use windlass_config::AppConfig;
use windlass_core::{ConversationStore, SessionId};
use windlass_engine::render_transcript;
use windlass_store::{FileConversationStore, OffloadLedger};

pub async fn run(session: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let session_id = SessionId::from(session);

    let store = FileConversationStore::new(&config.storage.data_dir);
    let turns = store.load(&session_id).await?;

    if turns.is_empty() {
        println!("Session {session_id} has no stored conversation.");
        return Ok(());
    }

    let offloaded = OffloadLedger::new(&config.storage.data_dir)
        .load(&session_id)
        .len();
    println!(
        "💬 Session {session_id} — {} turns, {offloaded} offloaded",
        turns.len()
    );
    println!();
    println!("{}", render_transcript(&turns));

    Ok(())
}
