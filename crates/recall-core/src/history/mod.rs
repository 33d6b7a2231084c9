//! History domain module.
//!
//! Contains the backing store contract and the mode-gated filtering
//! decorator that keeps system-generated entries out of persistent history.
//!
//! # Module Structure
//!
//! - `store`: Backing store contract (`HistoryStore`) and a trivial
//!   in-memory implementation
//! - `filter`: The filtering decorator (`FilteringHistory`) and the scoped
//!   automated-mode guard

mod filter;
mod store;

// Re-export public API
pub use filter::{AutomatedModeGuard, FilteringHistory};
pub use store::{HistoryStore, InMemoryHistoryStore};
