//! Core filtering logic for user-only input history.
//!
//! An interactive CLI agent shares one input channel between a human typing
//! at the prompt and the tool's own automation injecting generated
//! instruction text. This crate decides which entries are human-authored and
//! gates an arbitrary backing history store accordingly.
//!
//! # Module Structure
//!
//! - `classifier`: Content heuristic deciding "system-generated vs. user-authored"
//! - `history`: The backing store contract and the mode-gated filtering decorator
//! - `error`: Shared error type for history storage operations

pub mod classifier;
pub mod error;
pub mod history;

// Re-export the public API at the crate root
pub use classifier::Classifier;
pub use error::{HistoryError, Result};
pub use history::{AutomatedModeGuard, FilteringHistory, HistoryStore, InMemoryHistoryStore};
