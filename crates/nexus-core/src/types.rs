//! Domain types shared by the retrieval and chat crates.

use serde::{Deserialize, Serialize};

/// A chunk of a source document that is independently embedded.
///
/// - `content`: the text payload of the chunk
/// - `doc_path`: path of the source file the chunk was cut from
/// - `chunk_index`/`total_chunks`: position within the parent document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub content: String,
    pub doc_path: String,
    pub chunk_index: usize,
    pub total_chunks: usize,
}

/// A retrieved chunk with its similarity score. Higher is always better.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: DocumentChunk,
    pub score: f32,
}

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }
}
