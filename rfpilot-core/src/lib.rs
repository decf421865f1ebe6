//! # rfpilot core
//!
//! Building blocks for an LLM-driven microstrip patch antenna design loop.
//!
//! ## Core Concepts
//! - **Provider**: Trait-based LLM communication (OpenAI-compatible, echo)
//! - **ChatSession**: Append-only conversation replayed to the model whole
//! - **ScriptRunner**: Writes the generated `cst_python_api` script and runs
//!   it as a child process
//! - **Results**: Parses the S11 sweep and picks the deepest dip
//! - **ThinkingIndicator**: Console spinner for in-flight completions

pub mod chat;
pub mod error;
pub mod progress;
pub mod provider;
pub mod results;
pub mod script;

pub use chat::ChatSession;
pub use error::{Error, ErrorKind, ErrorStatus, Result};
pub use progress::{IndicatorHandle, ThinkingIndicator};
pub use provider::{
    ChatMessage, CompletionRequest, CompletionResponse, EchoProvider, FinishReason, LlmProvider,
    OpenAIProvider, ProviderConfig, Role, Usage, UsageTracker, DEFAULT_MODEL,
};
pub use results::{
    best_row, feedback_message, load_results, parse_results, ResultRow, RESULTS_FILENAME,
};
pub use script::{ScriptRunner, DEFAULT_INTERPRETER, SCRIPT_FILENAME};
