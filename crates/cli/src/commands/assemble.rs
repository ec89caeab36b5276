//! `windlass assemble` — Run the session handoff and print the window.

use std::sync::Arc;

use windlass_config::AppConfig;
use windlass_core::SessionId;
use windlass_engine::{
    estimate_tokens, ConversationPager, SessionHandoff, WindowAssembler, WindowOptions,
};
use windlass_store::{FileConversationStore, OffloadLedger, PreviousSession};

pub async fn run(session: &str, ceiling: Option<usize>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let data_dir = &config.storage.data_dir;

    let store = Arc::new(FileConversationStore::new(data_dir));
    let index = super::build_index(&config);
    let session_id = SessionId::from(session);

    // Offload whatever the previous session left live before this one
    // starts, so its content is retrievable from the opening turn.
    let handoff = SessionHandoff::new(
        store.clone(),
        index.clone(),
        OffloadLedger::new(data_dir),
        PreviousSession::new(data_dir),
    );
    handoff.run(&session_id).await;

    let ceiling_tokens = ceiling.unwrap_or(config.window.ceiling_tokens);
    let pager = ConversationPager::new(
        OffloadLedger::new(data_dir),
        index.clone(),
        config.window.chunk_ratio,
        config.window.recent_keep,
    );
    let assembler = WindowAssembler::new(
        store,
        index,
        pager,
        WindowOptions {
            ceiling_tokens,
            ratios: config.window.ratios.clone(),
            top_k: config.retrieval.top_k,
        },
    )?;

    let window = assembler.assemble_window(&session_id).await?;

    println!("{window}");
    println!();
    println!("─────────────────────────────────────");
    println!(
        "  Estimated size: {} / {ceiling_tokens} tokens",
        estimate_tokens(&window)
    );

    Ok(())
}
