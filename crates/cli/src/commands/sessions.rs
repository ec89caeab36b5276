//! `windlass sessions` — List stored sessions.

use windlass_config::AppConfig;
use windlass_core::{canonical, ConversationStore};
use windlass_store::{FileConversationStore, OffloadLedger, PreviousSession};

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let data_dir = &config.storage.data_dir;

    let store = FileConversationStore::new(data_dir);
    let ledger = OffloadLedger::new(data_dir);

    let mut sessions = store.list_sessions();
    sessions.sort_by(|a, b| a.as_str().cmp(b.as_str()));

    if sessions.is_empty() {
        println!("No stored sessions.");
        return Ok(());
    }

    let last_active = PreviousSession::new(data_dir).load();

    println!("🗂  Sessions");
    println!("─────────────────────────────────────");
    for session in &sessions {
        let turns = store.load(session).await?;
        let offloaded = ledger.load(session);
        let live = canonical::difference(&turns, &offloaded).len();
        let marker = if last_active.as_ref() == Some(session) {
            "  (last active)"
        } else {
            ""
        };
        println!(
            "  {session}: {live} live, {} offloaded{marker}",
            offloaded.len()
        );
    }

    Ok(())
}
