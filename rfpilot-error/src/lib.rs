//! # rfpilot-error
//!
//! Unified error handling for rfpilot - following OpenDAL's error handling practices.
//!
//! ## Design Philosophy
//!
//! - **ErrorKind**: Know what error occurred (e.g., PromptMissing, ScriptFailed)
//! - **ErrorStatus**: Decide how to handle it (Permanent, Temporary, Persistent)
//! - **Error Context**: Assist in locating the cause with rich context
//! - **Error Source**: Wrap underlying errors without leaking raw types
//!
//! ## Usage
//!
//! ```rust
//! use rfpilot_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::ResultsMalformed, "expected two comma-separated columns")
//!         .with_operation("results::parse")
//!         .with_context("line", "3")
//!         .with_context("path", "S11_results.csv"))
//! }
//! ```
//!
//! ## Principles
//!
//! - All functions return `Result<T, rfpilot_error::Error>`
//! - External errors are wrapped with `set_source(err)`
//! - Same error handled once, subsequent ops only append context
//! - Don't abuse `From<OtherError>` to prevent raw error leakage

mod error;
mod kind;
mod status;

pub use error::Error;
pub use kind::ErrorKind;
pub use status::ErrorStatus;

/// Result type alias using rfpilot Error
pub type Result<T> = std::result::Result<T, Error>;
