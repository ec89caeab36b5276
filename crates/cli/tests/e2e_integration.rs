//! End-to-end integration tests for the Windlass context pipeline.
//!
//! These exercise the full path a conversation takes: turns appended to the
//! store, oldest turns paged into the retrieval index once the transcript
//! outgrows its budget, session handoff at startup, and window assembly
//! pulling offloaded knowledge back in through retrieval.

use std::collections::BTreeMap;
use std::sync::Arc;

use tempfile::tempdir;
use windlass_core::{GenerateError, Generator, Role, SessionId, Turn};
use windlass_core::{ConversationStore, RetrievalIndex};
use windlass_engine::{
    estimate_tokens, render_transcript, ConversationPager, SessionHandoff, Summarizer,
    WindowAssembler, WindowOptions,
};
use windlass_index::FileIndex;
use windlass_store::{FileConversationStore, OffloadLedger, PreviousSession};

// ── Scripted generator ───────────────────────────────────────────────────

/// A generation backend that returns canned responses in sequence.
struct ScriptedGenerator {
    responses: std::sync::Mutex<Vec<Result<String, GenerateError>>>,
    prompts: std::sync::Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    fn new(responses: Vec<Result<String, GenerateError>>) -> Self {
        Self {
            responses: std::sync::Mutex::new(responses),
            prompts: std::sync::Mutex::new(Vec::new()),
        }
    }

    fn prompt(&self, i: usize) -> String {
        self.prompts.lock().unwrap()[i].clone()
    }
}

#[async_trait::async_trait]
impl Generator for ScriptedGenerator {
    fn name(&self) -> &str {
        "e2e_scripted"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(GenerateError::Unavailable("script exhausted".into()));
        }
        responses.remove(0)
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────

fn default_ratios() -> BTreeMap<String, f64> {
    BTreeMap::from([
        ("SYSTEM_PROMPT".to_string(), 0.15),
        ("TASK".to_string(), 0.05),
        ("TOOL_CONTRACT".to_string(), 0.10),
        ("RETRIEVED_KNOWLEDGE".to_string(), 0.40),
        ("CURRENT_CONVERSATION".to_string(), 0.30),
    ])
}

fn fixed_turn(role: Role, content: &str) -> Turn {
    Turn::with_timestamp(role, content, "2026-01-01T00:00:00+00:00")
}

fn options(ceiling_tokens: usize) -> WindowOptions {
    WindowOptions {
        ceiling_tokens,
        ratios: default_ratios(),
        top_k: 5,
    }
}

// ── Scenarios ────────────────────────────────────────────────────────────

#[tokio::test]
async fn old_turns_resurface_through_retrieval() {
    let dir = tempdir().unwrap();
    let store = Arc::new(FileConversationStore::new(dir.path()));
    let index = Arc::new(FileIndex::new(dir.path()));
    let session = SessionId::from("long-running");

    // One memorable early turn, then enough filler to burst the ceiling.
    store
        .append(
            &session,
            fixed_turn(
                Role::User,
                "we finalized the postgres migration checklist and moved the replica to db-7",
            ),
        )
        .await
        .unwrap();
    for i in 0..7 {
        store
            .append(
                &session,
                fixed_turn(Role::Assistant, &format!("filler {i:02} {}", "k".repeat(110))),
            )
            .await
            .unwrap();
    }

    let pager = ConversationPager::new(OffloadLedger::new(dir.path()), index.clone(), 0.5, 1);
    for _ in 0..10 {
        let turns = store.load(&session).await.unwrap();
        pager.page(&turns, &session, 150).await;
    }

    let ledger = OffloadLedger::new(dir.path()).load(&session);
    assert!(ledger.iter().any(|t| t.content.contains("postgres")));

    // The user asks about the offloaded topic; assembly brings it back in
    // through the retrieved-knowledge section.
    store
        .append(
            &session,
            Turn::user("what was on the postgres migration checklist?"),
        )
        .await
        .unwrap();

    let pager = ConversationPager::new(OffloadLedger::new(dir.path()), index.clone(), 0.5, 1);
    let assembler =
        WindowAssembler::new(store, index, pager, options(8192)).unwrap();
    let window = assembler.assemble_window(&session).await.unwrap();

    assert!(window.contains("### RETRIEVED_KNOWLEDGE"));
    assert!(window.contains("finalized the postgres migration checklist"));
    assert!(window.contains("what was on the postgres migration checklist?"));
}

#[tokio::test]
async fn handoff_carries_a_previous_session_into_the_next() {
    let dir = tempdir().unwrap();
    let store = Arc::new(FileConversationStore::new(dir.path()));
    let index = Arc::new(FileIndex::new(dir.path()));

    let first = SessionId::from("monday");
    store
        .append(
            &first,
            Turn::user("store the deploy key under vault path secret/acme"),
        )
        .await
        .unwrap();
    store
        .append(&first, Turn::assistant("noted: vault path secret/acme"))
        .await
        .unwrap();

    // First startup only points the marker at "monday".
    let handoff = SessionHandoff::new(
        store.clone(),
        index.clone(),
        OffloadLedger::new(dir.path()),
        PreviousSession::new(dir.path()),
    );
    handoff.run(&first).await;
    assert!(index.retrieve("vault", 5).await.unwrap().is_empty());

    // The next startup offloads monday's remainder before tuesday begins.
    let second = SessionId::from("tuesday");
    handoff.run(&second).await;
    assert_eq!(PreviousSession::new(dir.path()).load(), Some(second.clone()));
    assert_eq!(OffloadLedger::new(dir.path()).load(&first).len(), 2);

    store
        .append(&second, Turn::user("which vault path held the deploy key?"))
        .await
        .unwrap();

    let pager = ConversationPager::new(OffloadLedger::new(dir.path()), index.clone(), 0.5, 1);
    let assembler =
        WindowAssembler::new(store, index, pager, options(8192)).unwrap();
    let window = assembler.assemble_window(&second).await.unwrap();

    assert!(window.contains("secret/acme"));
}

#[tokio::test]
async fn assembly_itself_pages_out_old_turns() {
    let dir = tempdir().unwrap();
    let store = Arc::new(FileConversationStore::new(dir.path()));
    let index = Arc::new(FileIndex::new(dir.path()));
    let session = SessionId::from("tight");

    let turns: Vec<Turn> = (0..6)
        .map(|i| fixed_turn(Role::User, &format!("{i:02} {}", "q".repeat(200))))
        .collect();
    for turn in &turns {
        store.append(&session, turn.clone()).await.unwrap();
    }

    let pager = ConversationPager::new(OffloadLedger::new(dir.path()), index.clone(), 0.5, 1);
    let assembler =
        WindowAssembler::new(store, index, pager, options(400)).unwrap();

    let mut window = String::new();
    for _ in 0..6 {
        window = assembler.assemble_window(&session).await.unwrap();
    }

    // The four oldest turns migrated; the transcript then fits its slice.
    assert_eq!(
        OffloadLedger::new(dir.path()).load(&session),
        turns[..4].to_vec()
    );

    // Headers and truncation markers are the only overhead past the ceiling.
    assert!(estimate_tokens(&window) <= 400 + 60);
}

#[tokio::test]
async fn summarizer_turns_a_transcript_into_a_note() {
    let dir = tempdir().unwrap();
    let store = FileConversationStore::new(dir.path());
    let session = SessionId::from("to-summarize");

    store
        .append(
            &session,
            Turn::user("compare sqlite and postgres for the ledger"),
        )
        .await
        .unwrap();
    store
        .append(&session, Turn::assistant("sqlite wins for a single writer"))
        .await
        .unwrap();

    let generator = Arc::new(ScriptedGenerator::new(vec![Ok(concat!(
        "<JSON>{\"title\": \"Ledger storage choice\", \"goal\": \"Pick a ledger backend.\", ",
        "\"events\": [\"Compared sqlite and postgres\"], \"anchors\": [\"sqlite\", \"ledger\"]}</JSON>"
    )
    .to_string())]));

    let turns = store.load(&session).await.unwrap();
    let transcript = render_transcript(&turns);
    let summarizer = Summarizer::new(generator.clone(), 4096, 3);
    let note = summarizer.summarize(&transcript).await.unwrap();

    assert!(note.starts_with("Title: Ledger storage choice"));
    assert!(note.contains("- Compared sqlite and postgres"));

    // The prompt itself is a budgeted window with the transcript inside.
    assert!(generator.prompt(0).contains("### CONVERSATIONAL_TRANSCRIPT"));
    assert!(generator.prompt(0).contains("compare sqlite and postgres"));
}
