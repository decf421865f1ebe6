//! # Simulation Script Runner
//!
//! Writes the assistant's generated `cst_python_api` script to disk and
//! launches it as a child process.
//!
//! ## Design
//! - The reply text is written verbatim, overwriting any previous script
//! - The script runs as `{interpreter} {path}` with inherited stdio, so
//!   solver output streams straight to the console
//! - The child is awaited with no timeout; a stuck solver holds the loop
//! - A nonzero exit becomes `ScriptFailed` carrying the exit code

use crate::error::{script_failed, Error, Result};
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Filename the generated script is saved under
pub const SCRIPT_FILENAME: &str = "generate_patch_antenna.py";

/// Interpreter used when the caller does not pick one
pub const DEFAULT_INTERPRETER: &str = "python";

/// Writes and executes the generated simulation script
#[derive(Debug, Clone)]
pub struct ScriptRunner {
    interpreter: String,
    path: PathBuf,
}

impl ScriptRunner {
    pub fn new() -> Self {
        Self {
            interpreter: DEFAULT_INTERPRETER.into(),
            path: SCRIPT_FILENAME.into(),
        }
    }

    pub fn with_interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the script content verbatim, replacing any previous script
    pub fn write(&self, content: &str) -> Result<()> {
        std::fs::write(&self.path, content).map_err(|e| {
            Error::from(e)
                .with_operation("script::write")
                .with_context("path", self.path.display().to_string())
        })
    }

    /// Run the script to completion and check its exit status
    pub async fn run(&self) -> Result<()> {
        let status = Command::new(&self.interpreter)
            .arg(&self.path)
            .status()
            .await
            .map_err(|e| {
                Error::from(e).with_operation("script::run").with_context(
                    "command",
                    format!("{} {}", self.interpreter, self.path.display()),
                )
            })?;

        if !status.success() {
            return Err(script_failed(status.code())
                .with_operation("script::run")
                .with_context("script", self.path.display().to_string()));
        }

        Ok(())
    }
}

impl Default for ScriptRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_write_is_verbatim_and_overwrites() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(SCRIPT_FILENAME);
        let runner = ScriptRunner::new().with_path(&path);

        let script = "import cst_python_api as cpa\nprint('hello')\n";
        runner.write(script).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), script);

        // A shorter rewrite must fully replace the old content.
        runner.write("pass\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "pass\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_succeeds_on_zero_exit() {
        let runner = ScriptRunner::new().with_interpreter("true");
        runner.run().await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_failure_carries_exit_code() {
        let runner = ScriptRunner::new().with_interpreter("false");
        let err = runner.run().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ScriptFailed);
        assert!(err.context().contains(&("exit_code", "1".to_string())));
    }

    #[tokio::test]
    async fn test_run_missing_interpreter() {
        let runner = ScriptRunner::new().with_interpreter("rfpilot-no-such-interpreter");
        let err = runner.run().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileNotFound);
    }
}
