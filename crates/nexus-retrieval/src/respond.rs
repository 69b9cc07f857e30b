//! Query responder: embed, retrieve, format. No re-ranking, no
//! deduplication, no synthesis. The answer is the retrieved text.

use nexus_core::error::{Error, Result};
use nexus_core::traits::Embedder;

use crate::index::EmbeddingIndex;

pub const NO_MATCH_MESSAGE: &str = "⚠️ No matching data found in the local knowledge base.";

/// Answer `query` with the `k` nearest chunks, nearest first. When
/// `show_sources` is set, a source line per retrieved chunk is appended in
/// the same order.
pub fn respond(
    query: &str,
    k: usize,
    show_sources: bool,
    index: &EmbeddingIndex,
    embedder: &dyn Embedder,
) -> Result<String> {
    let query_vec = embedder
        .embed(query)
        .map_err(|e| Error::Computation(e.to_string()))?;
    let hits = index.top_k(&query_vec, k);

    if hits.is_empty() {
        return Ok(NO_MATCH_MESSAGE.to_string());
    }

    let extracted = hits
        .iter()
        .map(|h| format!("🔹 {}", h.chunk.content.trim()))
        .collect::<Vec<_>>()
        .join("\n\n");
    let mut answer = format!("Retrieval success:\n\n{extracted}");

    if show_sources {
        let sources = hits
            .iter()
            .map(|h| format!("- Fragment from: `{}`", h.chunk.doc_path))
            .collect::<Vec<_>>()
            .join("\n");
        answer.push_str(&format!("\n\n---\nData Sources:\n{sources}"));
    }

    Ok(answer)
}
