//! Core error types for QuickJS operations
//!
//! Script errors keep the text the interpreter itself rendered for the
//! thrown value (`ReferenceError: x is not defined`), so hosts can match on
//! exactly what QuickJS would print. Everything else describes a problem
//! detected on the host side before the interpreter was involved.

use thiserror::Error;

/// Result type alias for QuickJS operations
pub type QjsResult<T> = Result<T, QjsError>;

/// Structured error types for QuickJS operations
#[derive(Debug, Error)]
pub enum QjsError {
    /// Failed to allocate a QuickJS runtime or context
    #[error("Context creation failed: {message}")]
    ContextCreation { message: String },

    /// Exception raised by the interpreter during compilation or execution
    ///
    /// `message` is the thrown value converted with the interpreter's own
    /// `toString`; `error_type` and `stack` are read from the thrown object
    /// when it has them.
    #[error("{message}")]
    ScriptError {
        message: String,
        error_type: Option<String>,
        stack: Option<String>,
    },

    /// Host supplied a value of the wrong category
    #[error("Type error: expected {expected}, got {actual}")]
    TypeError { expected: String, actual: String },

    /// Value has no representation on the other side of the bridge
    #[error("Unsupported type: {type_name}")]
    Unsupported { type_name: String },

    /// Value was created by a different context
    #[error("Value belongs to a different context")]
    ForeignValue,

    /// JSON.stringify produced `undefined` for the value
    #[error("Value of type {type_name} has no JSON representation")]
    NotSerializable { type_name: String },

    /// Property or source name that cannot cross the C boundary
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Internal/unexpected error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl QjsError {
    /// Create a script error from the rendered message only
    pub fn script_error(message: impl Into<String>) -> Self {
        Self::ScriptError {
            message: message.into(),
            error_type: None,
            stack: None,
        }
    }

    /// Create a script error with the error name and stack trace
    pub fn script_error_with_details(
        message: impl Into<String>,
        error_type: Option<String>,
        stack: Option<String>,
    ) -> Self {
        Self::ScriptError {
            message: message.into(),
            error_type,
            stack,
        }
    }

    /// Create a context creation error
    pub fn context_creation(message: impl Into<String>) -> Self {
        Self::ContextCreation {
            message: message.into(),
        }
    }

    /// Create a type error
    pub fn type_error(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::TypeError {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an unsupported type error
    pub fn unsupported(type_name: impl Into<String>) -> Self {
        Self::Unsupported {
            type_name: type_name.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error was raised by script code
    pub fn is_script_error(&self) -> bool {
        matches!(self, Self::ScriptError { .. })
    }

    /// Get the stack trace if available
    pub fn stack_trace(&self) -> Option<&str> {
        match self {
            Self::ScriptError { stack, .. } => stack.as_deref(),
            _ => None,
        }
    }

    /// Get the error type name (e.g., "TypeError", "ReferenceError")
    pub fn error_type(&self) -> &str {
        match self {
            Self::ScriptError { error_type, .. } => error_type.as_deref().unwrap_or("Error"),
            Self::ContextCreation { .. } => "RuntimeInitError",
            Self::TypeError { .. } => "TypeError",
            Self::Unsupported { .. } => "UnsupportedTypeError",
            Self::ForeignValue => "ForeignValueError",
            Self::NotSerializable { .. } => "NotSerializableError",
            Self::InvalidName(_) => "InvalidNameError",
            Self::JsonError(_) => "JsonError",
            Self::Internal(_) => "InternalError",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_error_display_is_rendered_message() {
        let err = QjsError::script_error("ReferenceError: missing is not defined");
        assert_eq!(err.to_string(), "ReferenceError: missing is not defined");
        assert!(err.is_script_error());
        assert_eq!(err.error_type(), "Error");
    }

    #[test]
    fn test_script_error_with_details() {
        let err = QjsError::script_error_with_details(
            "TypeError: not a function",
            Some("TypeError".into()),
            Some("    at <eval> (<input>:1:1)".into()),
        );

        assert_eq!(err.error_type(), "TypeError");
        assert_eq!(err.stack_trace(), Some("    at <eval> (<input>:1:1)"));
    }

    #[test]
    fn test_unsupported_mentions_type() {
        let err = QjsError::unsupported("JSON object");
        assert_eq!(err.to_string(), "Unsupported type: JSON object");
        assert_eq!(err.error_type(), "UnsupportedTypeError");
        assert!(!err.is_script_error());
    }

    #[test]
    fn test_type_error() {
        let err = QjsError::type_error("UTF-8 string", "non-UTF-8 bytes");
        assert!(err.to_string().contains("expected UTF-8 string"));
        assert!(err.to_string().contains("got non-UTF-8 bytes"));
    }

    #[test]
    fn test_context_creation() {
        let err = QjsError::context_creation("JS_NewRuntime returned null");
        assert!(err.to_string().contains("JS_NewRuntime"));
        assert_eq!(err.error_type(), "RuntimeInitError");
    }

    #[test]
    fn test_stack_trace_none_for_host_errors() {
        let err = QjsError::internal("test");
        assert!(err.stack_trace().is_none());
        assert_eq!(err.to_string(), "Internal error: test");
    }
}
