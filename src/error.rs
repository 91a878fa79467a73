//! Error handling module for the profile generator
//!
//! Binding and serialization failures share one error type built with
//! thiserror. Any error aborts document construction.

use thiserror::Error;

use crate::types::ParameterType;

/// Main error type for request generation
#[derive(Error, Debug)]
pub enum ProfileError {
    /// A supplied value does not match the parameter's declared type
    #[error("Type mismatch for parameter '{name}': expected {expected}, found {found}")]
    TypeMismatch {
        name: String,
        expected: ParameterType,
        found: String,
    },

    /// A binding names a parameter that was never declared
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    /// A textual binding that is not of the form NAME=VALUE
    #[error("Malformed binding '{0}': expected NAME=VALUE")]
    MalformedBinding(String),

    /// An attribute value holds a character XML 1.0 cannot represent
    #[error("Character {found:?} cannot appear in an XML document (value {value:?})")]
    InvalidXmlChar { found: char, value: String },

    /// IO errors (writing the document)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for profile operations
pub type Result<T> = std::result::Result<T, ProfileError>;

impl ProfileError {
    /// Create a type mismatch error
    pub fn type_mismatch(
        name: impl Into<String>,
        expected: ParameterType,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            name: name.into(),
            expected,
            found: found.into(),
        }
    }

    /// Create an unknown parameter error
    pub fn unknown_parameter(name: impl Into<String>) -> Self {
        Self::UnknownParameter(name.into())
    }

    /// Create an invalid XML character error
    pub fn invalid_xml_char(found: char, value: impl Into<String>) -> Self {
        Self::InvalidXmlChar {
            found,
            value: value.into(),
        }
    }

    /// Create a malformed binding error
    pub fn malformed_binding(text: impl Into<String>) -> Self {
        Self::MalformedBinding(text.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProfileError::type_mismatch("runSetup", ParameterType::Boolean, "\"maybe\"");
        assert_eq!(
            err.to_string(),
            "Type mismatch for parameter 'runSetup': expected boolean, found \"maybe\""
        );

        let err = ProfileError::unknown_parameter("gpuCount");
        assert_eq!(err.to_string(), "Unknown parameter: gpuCount");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: ProfileError = io_err.into();
        assert!(matches!(err, ProfileError::Io(_)));
    }

    #[test]
    fn test_invalid_xml_char_message() {
        let err = ProfileError::invalid_xml_char('\u{1}', "urn:a\u{1}b");
        assert!(err.to_string().contains("'\\u{1}'"));
    }

    #[test]
    fn test_malformed_binding_message() {
        let err = ProfileError::malformed_binding("osImage");
        assert!(err.to_string().contains("NAME=VALUE"));
    }
}
