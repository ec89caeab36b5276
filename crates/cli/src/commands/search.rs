//! `windlass search` — Query the retrieval index.

use windlass_config::AppConfig;

pub async fn run(query: &str, top_k: Option<usize>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let index = super::build_index(&config);
    let top_k = top_k.unwrap_or(config.retrieval.top_k);

    println!("🔍 Searching offloaded chunks for: \"{query}\"");
    println!();

    let results = index.retrieve(query, top_k).await?;
    if results.is_empty() {
        println!("  No matching chunks.");
        return Ok(());
    }

    for (i, chunk) in results.iter().enumerate() {
        let preview = chunk.text.lines().next().unwrap_or("");
        println!("  {:>2}. [score: {:.2}] {preview}", i + 1, chunk.score);
        for line in chunk.text.lines().skip(1).take(2) {
            println!("      {line}");
        }
    }

    Ok(())
}
