//! Error conversion implementations.
//!
//! This module contains From trait implementations to convert from standard
//! library parse errors to the unified Error type.

use super::types::Error;
use std::num::{ParseFloatError, ParseIntError};

impl From<ParseFloatError> for Error {
    fn from(err: ParseFloatError) -> Self {
        Error::ParseError(err.to_string())
    }
}

impl From<ParseIntError> for Error {
    fn from(err: ParseIntError) -> Self {
        Error::ParseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::PropertyError;

    #[test]
    fn test_parse_errors_convert() {
        let err: Error = "x1".parse::<f64>().unwrap_err().into();
        assert!(matches!(err, Error::ParseError(_)));

        let err: Error = "".parse::<i32>().unwrap_err().into();
        assert!(matches!(err, Error::ParseError(_)));
    }

    #[test]
    fn test_property_error_converts() {
        let err: Error = PropertyError::not_found("Width").into();
        assert_eq!(err.to_string(), "Property not found: Width");
    }
}
