//! `windlass add` — Append a turn to a session's conversation.

use windlass_config::AppConfig;
use windlass_core::{ConversationStore, SessionId, Turn};
use windlass_store::FileConversationStore;

pub async fn run(
    session: Option<String>,
    role: &str,
    message: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let session_id = match session {
        Some(id) => SessionId::from(&id),
        None => SessionId::new(),
    };

    let turn = match role {
        "user" => Turn::user(message),
        "assistant" => Turn::assistant(message),
        other => {
            return Err(format!("Unknown role {other:?}, expected \"user\" or \"assistant\"").into())
        }
    };
    let label = turn.role.label();

    let store = FileConversationStore::new(&config.storage.data_dir);
    store.append(&session_id, turn).await?;

    println!("📝 Added {label} turn to session {session_id}");
    Ok(())
}
