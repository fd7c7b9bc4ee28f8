//! Memory journal core
//!
//! - `emotion` / `summary`: keyword emotion detection and display summaries
//! - `record`: the memory record and creation input
//! - `backend` / `store`: slot persistence and the owned journal state
//! - `search` / `insight`: filtered views and aggregate insights
//! - `handler`: REST endpoints over a shared store

pub mod backend;
pub mod emotion;
pub mod handler;
pub mod humanize;
pub mod insight;
pub mod record;
pub mod search;
pub mod store;
pub mod summary;

pub use backend::{FileSlot, MemorySlot, StorageSlot};
pub use emotion::{classify, Emotion};
pub use handler::{memories_router, MemoriesState};
pub use insight::{Insight, InsightAggregator, InsightKind, MemoryStats};
pub use record::{MemoryRecord, NewMemory, QUICK_TAGS};
pub use store::MemoryStore;
pub use summary::summarize;
