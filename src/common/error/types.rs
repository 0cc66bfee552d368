//! Unified error types for docstyle.
//!
//! Recoverable, per-property conditions ([`PropertyError`], [`MultiPropertyError`])
//! are reported through style reports and logs. The crate-level [`Error`] is
//! reserved for conditions the caller must handle.
use thiserror::Error;

/// Failure of a single property read or write against a target.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropertyError {
    /// The target has no property with this name
    #[error("Property not found: {name}")]
    NotFound { name: String },

    /// The value kind does not match what the target stores
    #[error("Type mismatch for property '{name}': expected {expected}, got {found}")]
    TypeMismatch {
        name: String,
        expected: String,
        found: String,
    },

    /// The property exists but cannot be written
    #[error("Property is read-only: {name}")]
    ReadOnly { name: String },
}

impl PropertyError {
    /// Name of the property this failure belongs to.
    pub fn name(&self) -> &str {
        match self {
            Self::NotFound { name } | Self::TypeMismatch { name, .. } | Self::ReadOnly { name } => {
                name
            },
        }
    }

    #[inline]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }
}

/// A batch write that partially failed.
///
/// Every property not listed in `errors` was written successfully.
#[derive(Error, Debug, Clone, PartialEq, Default)]
#[error("{} of the properties could not be set", .errors.len())]
pub struct MultiPropertyError {
    pub errors: Vec<PropertyError>,
}

impl MultiPropertyError {
    #[inline]
    pub fn new(errors: Vec<PropertyError>) -> Self {
        Self { errors }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Main error type for docstyle operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Single property failure surfaced as a hard error
    #[error(transparent)]
    Property(#[from] PropertyError),

    /// Batch write failure surfaced as a hard error
    #[error(transparent)]
    MultiProperty(#[from] MultiPropertyError),

    /// The target supports none of the capabilities a style requires
    #[error("'{style}' requires one of [{}]", .required.join(", "))]
    CapabilityMismatch { style: String, required: Vec<String> },

    /// Invalid argument passed by the caller
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Text could not be parsed into a value
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Result type for docstyle operations.
pub type Result<T> = std::result::Result<T, Error>;
