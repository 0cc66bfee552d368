//! Unified error types for docstyle.
//!
//! This module provides the crate-wide error type together with the
//! per-property failures reported by style operations.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, MultiPropertyError, PropertyError, Result};
