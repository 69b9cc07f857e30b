use std::path::Path;
use std::sync::Arc;

use nexus_core::error::Result;
use nexus_core::traits::Embedder;
use nexus_core::types::{Role, Turn};
use nexus_retrieval::{respond, EmbeddingIndex, KnowledgeCache};

use crate::conversation::Conversation;

pub const K_MIN: usize = 1;
pub const K_MAX: usize = 10;

/// Per-session retrieval settings. `k` always stays within [K_MIN, K_MAX];
/// out-of-range input is clamped at construction.
#[derive(Debug, Clone, Copy)]
pub struct QueryConfig {
    k: usize,
    show_sources: bool,
}

impl QueryConfig {
    pub fn new(k: usize, show_sources: bool) -> Self {
        Self { k: k.clamp(K_MIN, K_MAX), show_sources }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn show_sources(&self) -> bool {
        self.show_sources
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self { k: 3, show_sources: true }
    }
}

/// One interactive session: the conversation, the retrieval settings and the
/// active index. Handlers are invoked by the host loop, one at a time.
pub struct ChatSession {
    conversation: Conversation,
    config: QueryConfig,
    index: Arc<EmbeddingIndex>,
    embedder: Arc<dyn Embedder>,
}

impl ChatSession {
    pub fn new(index: Arc<EmbeddingIndex>, embedder: Arc<dyn Embedder>, config: QueryConfig) -> Self {
        Self { conversation: Conversation::new(), config, index, embedder }
    }

    /// Record the user turn, retrieve, record the assistant turn. The user
    /// turn stays logged even when retrieval fails.
    pub fn on_query(&mut self, text: &str) -> Result<String> {
        self.conversation.append(Turn::new(Role::User, text));
        let answer = respond(
            text,
            self.config.k(),
            self.config.show_sources(),
            &self.index,
            self.embedder.as_ref(),
        )?;
        self.conversation.append(Turn::new(Role::Assistant, answer.clone()));
        Ok(answer)
    }

    /// Clear the conversation. Unconditional, atomic, never fails.
    pub fn on_reset(&mut self) {
        tracing::debug!("conversation reset");
        self.conversation.reset();
    }

    /// Switch the session to another knowledge file, building its index
    /// through the cache if this is the first time the path is seen. The
    /// conversation is left intact.
    pub fn on_upload(&mut self, path: &Path, cache: &mut KnowledgeCache) -> Result<()> {
        self.index = cache.get_or_build(path, self.embedder.as_ref())?;
        Ok(())
    }

    pub fn set_k(&mut self, k: usize) {
        self.config = QueryConfig::new(k, self.config.show_sources());
    }

    pub fn set_show_sources(&mut self, show_sources: bool) {
        self.config = QueryConfig::new(self.config.k(), show_sources);
    }

    pub fn config(&self) -> QueryConfig {
        self.config
    }

    pub fn index(&self) -> &EmbeddingIndex {
        &self.index
    }

    pub fn history(&self) -> &[Turn] {
        self.conversation.all()
    }
}
