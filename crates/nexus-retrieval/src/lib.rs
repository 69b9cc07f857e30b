//! nexus-retrieval
//!
//! The chunk store builder, the in-memory embedding index and the query
//! responder. See `store` for the build/cache flow and `respond` for the
//! answer formatting.

pub mod index;
pub mod respond;
pub mod store;

pub use index::EmbeddingIndex;
pub use respond::{respond, NO_MATCH_MESSAGE};
pub use store::{build, KnowledgeCache};
