//! Error kinds for rfpilot operations

use std::fmt;

/// The kind of error that occurred.
///
/// This enum categorizes errors to help users write clear error handling logic.
/// Users can match on ErrorKind to decide how to handle specific error cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    // =========================================================================
    // General errors
    // =========================================================================
    /// An unexpected error occurred - catch-all for unhandled cases
    Unexpected,

    /// The requested feature or operation is not supported
    Unsupported,

    /// Invalid configuration or parameters
    ConfigInvalid,

    // =========================================================================
    // Prompt errors
    // =========================================================================
    /// The system prompt file is missing - fatal at startup
    PromptMissing,

    // =========================================================================
    // Inference/LLM errors
    // =========================================================================
    /// LLM inference failed or returned an unusable response
    InferenceFailed,

    /// Rate limit exceeded
    RateLimited,

    /// Authentication with the model endpoint failed
    AuthFailed,

    /// The model endpoint rejected the request
    ApiFailed,

    // =========================================================================
    // Simulation errors
    // =========================================================================
    /// The generated simulation script exited with a failure
    ScriptFailed,

    /// The simulation results file does not exist
    ResultsMissing,

    /// The simulation results file could not be parsed
    ResultsMalformed,

    // =========================================================================
    // IO errors
    // =========================================================================
    /// File not found
    FileNotFound,

    /// Permission denied
    PermissionDenied,

    /// IO operation failed
    IoFailed,

    /// Network error
    NetworkFailed,

    // =========================================================================
    // Parse errors
    // =========================================================================
    /// Failed to parse input
    ParseFailed,

    /// Serialization/deserialization failed
    SerializationFailed,
}

impl ErrorKind {
    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        match self {
            // General
            ErrorKind::Unexpected => "Unexpected",
            ErrorKind::Unsupported => "Unsupported",
            ErrorKind::ConfigInvalid => "ConfigInvalid",

            // Prompt
            ErrorKind::PromptMissing => "PromptMissing",

            // Inference
            ErrorKind::InferenceFailed => "InferenceFailed",
            ErrorKind::RateLimited => "RateLimited",
            ErrorKind::AuthFailed => "AuthFailed",
            ErrorKind::ApiFailed => "ApiFailed",

            // Simulation
            ErrorKind::ScriptFailed => "ScriptFailed",
            ErrorKind::ResultsMissing => "ResultsMissing",
            ErrorKind::ResultsMalformed => "ResultsMalformed",

            // IO
            ErrorKind::FileNotFound => "FileNotFound",
            ErrorKind::PermissionDenied => "PermissionDenied",
            ErrorKind::IoFailed => "IoFailed",
            ErrorKind::NetworkFailed => "NetworkFailed",

            // Parse
            ErrorKind::ParseFailed => "ParseFailed",
            ErrorKind::SerializationFailed => "SerializationFailed",
        }
    }

    /// Check if this error kind is retryable by default
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::InferenceFailed | ErrorKind::NetworkFailed | ErrorKind::RateLimited
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::PromptMissing.to_string(), "PromptMissing");
        assert_eq!(ErrorKind::InferenceFailed.to_string(), "InferenceFailed");
    }

    #[test]
    fn test_is_retryable() {
        assert!(ErrorKind::NetworkFailed.is_retryable());
        assert!(ErrorKind::RateLimited.is_retryable());
        assert!(!ErrorKind::PromptMissing.is_retryable());
        assert!(!ErrorKind::ScriptFailed.is_retryable());
        assert!(!ErrorKind::ResultsMalformed.is_retryable());
    }
}
