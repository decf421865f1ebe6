//! Design agent implementation - composes the chat session with the
//! simulation round

use rfpilot_core::{
    best_row, feedback_message, load_results, ChatSession, ErrorKind, FinishReason, LlmProvider,
    Result, ScriptRunner, UsageTracker, DEFAULT_INTERPRETER, RESULTS_FILENAME, SCRIPT_FILENAME,
};
use std::path::{Path, PathBuf};

/// Reply substring that marks a ready-to-run simulation script.
///
/// The import line every working `cst_python_api` script must carry; its
/// presence anywhere in a reply is the completion signal.
pub const COMPLETION_MARKER: &str = "import cst_python_api as cpa";

/// Check a reply for the completion marker.
///
/// A plain substring test, applied to each reply on its own; nothing
/// latches across replies.
pub fn design_complete(reply: &str) -> bool {
    reply.contains(COMPLETION_MARKER)
}

/// Configuration for the design agent
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Model sent with every completion; None uses the provider default
    pub model: Option<String>,
    /// Where the generated script is written
    pub script_file: PathBuf,
    /// Where the simulation leaves its S11 sweep
    pub results_file: PathBuf,
    /// Interpreter that runs the generated script
    pub python: String,
    /// Enable verbose logging
    pub verbose: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: None,
            script_file: SCRIPT_FILENAME.into(),
            results_file: RESULTS_FILENAME.into(),
            python: DEFAULT_INTERPRETER.into(),
            verbose: false,
        }
    }
}

/// The design agent - drives one antenna optimization dialogue.
///
/// The agent owns the conversation and the script plumbing; the caller
/// owns the console (prompts, spinner, printing), sequencing the round as:
/// `ask` -> `design_complete`? -> `save_script` -> `run_script` ->
/// `collect_feedback` -> `ask` again with the feedback sentence.
pub struct DesignAgent<P: LlmProvider> {
    session: ChatSession<P>,
    runner: ScriptRunner,
    config: AgentConfig,
}

impl<P: LlmProvider> DesignAgent<P> {
    /// Create an agent with default configuration
    pub fn new(provider: P, system_prompt: impl Into<String>) -> Self {
        Self::with_config(provider, system_prompt, AgentConfig::default())
    }

    /// Create an agent with custom configuration
    pub fn with_config(
        provider: P,
        system_prompt: impl Into<String>,
        config: AgentConfig,
    ) -> Self {
        let mut session = ChatSession::new(provider, system_prompt);
        if let Some(model) = &config.model {
            session = session.with_model(model.clone());
        }

        let runner = ScriptRunner::new()
            .with_interpreter(config.python.clone())
            .with_path(config.script_file.clone());

        Self {
            session,
            runner,
            config,
        }
    }

    /// Send one user turn and return the assistant reply
    pub async fn ask(&mut self, text: impl Into<String>) -> Result<String> {
        let reply = self.session.ask(text).await?;

        if self.config.verbose {
            println!("   [agent] reply: {} chars", reply.len());
        }

        Ok(reply)
    }

    /// Write the reply verbatim to the configured script file
    pub fn save_script(&self, reply: &str) -> Result<&Path> {
        self.runner.write(reply)?;

        if self.config.verbose {
            println!("   [agent] wrote {}", self.runner.path().display());
        }

        Ok(self.runner.path())
    }

    /// Run the saved script to completion; nonzero exit is an error
    pub async fn run_script(&self) -> Result<()> {
        self.runner.run().await
    }

    /// Summarize the simulation output for the next user turn.
    ///
    /// `Ok(None)` means the results file does not exist and the round
    /// carries no feedback. A present-but-malformed file is an error.
    pub fn collect_feedback(&self) -> Result<Option<String>> {
        let rows = match load_results(&self.config.results_file) {
            Ok(rows) => rows,
            Err(e) if e.kind() == ErrorKind::ResultsMissing => return Ok(None),
            Err(e) => return Err(e.with_operation("agent::collect_feedback")),
        };

        if self.config.verbose {
            println!("   [agent] parsed {} result rows", rows.len());
        }

        Ok(best_row(&rows).map(feedback_message))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Model the session sends with every completion
    pub fn model(&self) -> &str {
        self.session.model()
    }

    /// Full conversation so far, system turn first
    pub fn history(&self) -> &[rfpilot_core::ChatMessage] {
        self.session.history()
    }

    /// Token usage accumulated across all asks
    pub fn usage(&self) -> &UsageTracker {
        self.session.usage()
    }

    /// Finish reason of the most recent completion, if any
    pub fn last_finish_reason(&self) -> Option<FinishReason> {
        self.session.last_finish_reason()
    }

    /// Path the generated script is written to
    pub fn script_file(&self) -> &Path {
        self.runner.path()
    }

    /// Path the simulation results are read from
    pub fn results_file(&self) -> &Path {
        &self.config.results_file
    }
}
