//! EchoVault - Private local memory journal
//!
//! EchoVault records short text entries ("memories"), tags them, assigns an
//! emotion and derives simple insights. Everything stays on the local
//! machine: the journal is one JSON array in a single storage slot, loaded
//! once at startup and rewritten after every change.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │            CLI (echovault)  /  Local HTTP API (serve)         │
//! └───────────────┬──────────────────────────────┬───────────────┘
//!                 │ add / delete                 │ query
//! ┌───────────────▼──────────────┐   ┌───────────▼───────────────┐
//! │ Emotion classifier + summary │   │ Search filter             │
//! └───────────────┬──────────────┘   │ Insight aggregator        │
//!                 │ new record       └───────────▲───────────────┘
//! ┌───────────────▼──────────────────────────────┴───────────────┐
//! │ MemoryStore (newest first) ──persist──▶ StorageSlot (JSON)    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`memory`]: record model, store, search, insights, REST handlers
//! - [`api`]: HTTP application and server loop
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod config;
pub mod error;
pub mod memory;

pub use config::EchoVaultConfig;
pub use error::{Error, Result};
pub use memory::{MemoryRecord, MemoryStore, NewMemory};
