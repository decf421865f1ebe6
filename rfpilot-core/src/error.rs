//! rfpilot error types
//!
//! Re-exports rfpilot-error and provides design-loop conveniences.

// Re-export the core error types
pub use rfpilot_error::{Error, ErrorKind, ErrorStatus, Result};

// =============================================================================
// Design-loop error constructors
// =============================================================================

/// Create a PromptMissing error
pub fn prompt_missing(path: impl Into<String>) -> Error {
    Error::prompt_missing(path)
}

/// Create an InferenceFailed error
pub fn inference_failed(reason: impl Into<String>) -> Error {
    Error::inference_failed(reason)
}

/// Create a ScriptFailed error from a child exit code
pub fn script_failed(exit_code: Option<i32>) -> Error {
    Error::script_failed(exit_code)
}

/// Create a ResultsMissing error
pub fn results_missing(path: impl Into<String>) -> Error {
    Error::results_missing(path)
}

/// Create a ResultsMalformed error naming the offending line (1-based)
pub fn results_malformed(line: usize, message: impl Into<String>) -> Error {
    Error::results_malformed(line, message)
}
