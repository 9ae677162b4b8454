//! Shared domain types for marketfeed
//!
//! Everything here is read-only after startup and shared freely between
//! per-market tasks.

pub mod types;

pub use types::*;
