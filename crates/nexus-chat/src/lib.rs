//! nexus-chat
//!
//! Conversation log and the per-session event handlers the host loop drives.

pub mod conversation;
pub mod session;

pub use conversation::Conversation;
pub use session::{ChatSession, QueryConfig, K_MAX, K_MIN};
