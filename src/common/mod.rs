//! Common types shared by the style engine.
//!
//! This module provides the error types and the length units used when
//! converting user-facing measurements to the 1/100 mm values hosts store.

// Submodule declarations
pub mod error;
pub mod unit;

// Re-exports for convenience
pub use error::{Error, MultiPropertyError, PropertyError, Result};
pub use unit::{LengthValue, UnitLength};
