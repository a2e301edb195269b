//! Error types for jsbridge
//!
//! Re-exports core errors from jsbridge-core and adds host-side conversion errors.

use thiserror::Error;

// Re-export core error types
pub use jsbridge_core::{QjsError as CoreError, QjsResult as CoreResult};

/// Errors that can occur during bridge operations
#[derive(Error, Debug)]
pub enum Error {
    /// Core QuickJS error
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A host `Value` did not hold the requested variant
    #[error("Cannot convert {actual} to {expected}")]
    Conversion {
        expected: &'static str,
        actual: &'static str,
    },
}

impl Error {
    /// Create a type error
    pub fn type_error(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::Core(CoreError::type_error(expected, actual))
    }

    /// Create an unsupported type error
    pub fn unsupported(type_name: impl Into<String>) -> Self {
        Self::Core(CoreError::unsupported(type_name))
    }

    /// Check if this error was raised by script code
    pub fn is_script_error(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_script_error())
    }

    /// Check if a host value had no JavaScript representation
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Core(CoreError::Unsupported { .. }))
    }

    /// Get the error type name (e.g., "TypeError", "ReferenceError")
    pub fn error_type(&self) -> &str {
        match self {
            Self::Core(e) => e.error_type(),
            Self::Conversion { .. } => "ConversionError",
        }
    }

    /// Get the script stack trace if available
    pub fn stack_trace(&self) -> Option<&str> {
        match self {
            Self::Core(e) => e.stack_trace(),
            Self::Conversion { .. } => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Core(CoreError::JsonError(e))
    }
}

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_are_transparent() {
        let err: Error = CoreError::script_error("ReferenceError: x is not defined").into();
        assert_eq!(err.to_string(), "ReferenceError: x is not defined");
        assert!(err.is_script_error());
    }

    #[test]
    fn test_unsupported() {
        let err = Error::unsupported("JSON array");
        assert!(err.is_unsupported());
        assert!(err.to_string().contains("Unsupported type"));
        assert_eq!(err.error_type(), "UnsupportedTypeError");
    }

    #[test]
    fn test_conversion_error() {
        let err = Error::Conversion {
            expected: "boolean",
            actual: "string",
        };
        assert_eq!(err.to_string(), "Cannot convert string to boolean");
        assert_eq!(err.error_type(), "ConversionError");
        assert!(err.stack_trace().is_none());
    }

    #[test]
    fn test_from_serde_json() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: Error = json_err.into();
        assert_eq!(err.error_type(), "JsonError");
    }
}
