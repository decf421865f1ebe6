//! # rfpilot CLI
//!
//! Interactive console for the patch antenna design agent.
//!
//! Usage:
//!   rfpilot
//!   rfpilot --offline
//!   rfpilot --model gpt-5-mini --python python3
//!   rfpilot feedback S11_results.csv
//!
//! A session is a dialogue: describe the antenna you want, and once the
//! assistant replies with a complete `cst_python_api` script the tool
//! writes it to disk, runs it, and feeds the simulated S11 minimum back
//! into the conversation for the next optimization round.

use clap::{Parser, Subcommand};
use rfpilot_agent::{design_complete, AgentConfig, DesignAgent};
use rfpilot_core::{
    best_row, feedback_message, load_results, EchoProvider, FinishReason, LlmProvider,
    OpenAIProvider, ProviderConfig, ThinkingIndicator, DEFAULT_INTERPRETER, DEFAULT_MODEL,
    RESULTS_FILENAME, SCRIPT_FILENAME,
};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "rfpilot")]
#[command(author, version, about = "rfpilot - LLM-driven patch antenna design")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Model identifier sent with every completion
    #[arg(short, long, default_value = DEFAULT_MODEL)]
    model: String,

    /// OpenAI-compatible endpoint base URL (defaults to api.openai.com)
    #[arg(long)]
    base_url: Option<String>,

    /// System prompt file loaded once at startup
    #[arg(long, default_value = "prompts/design_prompt.txt")]
    system_prompt: PathBuf,

    /// Where the generated simulation script is written
    #[arg(long, default_value = SCRIPT_FILENAME)]
    script_file: PathBuf,

    /// Where the simulation leaves its S11 sweep
    #[arg(long, default_value = RESULTS_FILENAME)]
    results_file: PathBuf,

    /// Interpreter that runs the generated script
    #[arg(long, default_value = DEFAULT_INTERPRETER)]
    python: String,

    /// Answer offline with an echo provider (no network, no API key)
    #[arg(long)]
    offline: bool,

    /// HTTP timeout for completion calls, in seconds
    #[arg(long, default_value = "120")]
    timeout: u64,

    /// Enable verbose output (agent internals)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an S11 results file and print the feedback summary
    Feedback {
        /// Path to the results CSV
        #[arg(required = true)]
        file: PathBuf,
    },
}

/// `exit` ends the session, however it is cased or padded
fn is_exit_command(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case("exit")
}

/// Read one input block: lines accumulate until an empty line submits.
///
/// EOF submits any pending lines; EOF on an empty block returns `None`,
/// which ends the session.
fn read_block<R: BufRead>(input: &mut R) -> std::io::Result<Option<String>> {
    let mut lines: Vec<String> = Vec::new();
    loop {
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            if lines.is_empty() {
                return Ok(None);
            }
            break;
        }
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            break;
        }
        lines.push(line.to_string());
    }
    Ok(Some(lines.join("\n")))
}

/// Ask with the spinner running. The spinner is fully stopped and its
/// line erased before this returns, so later prints never interleave
/// with it.
async fn think<P: LlmProvider>(
    agent: &mut DesignAgent<P>,
    text: &str,
) -> (Duration, rfpilot_core::Result<String>) {
    let handle = ThinkingIndicator::new().start();
    let result = agent.ask(text).await;
    let elapsed = handle.stop().await;
    (elapsed, result)
}

/// Transport failures end the process, like the reference client
fn reply_or_exit(result: rfpilot_core::Result<String>) -> String {
    match result {
        Ok(reply) => reply,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn warn_if_truncated<P: LlmProvider>(agent: &DesignAgent<P>) {
    if agent.last_finish_reason() == Some(FinishReason::Length) {
        println!("⚠️  Reply hit the model's token limit and may be truncated.");
    }
}

/// One script round: write the reply to disk, run it, feed results back.
///
/// Script and results failures only abandon the round; the next prompt
/// starts fresh with no completion state carried over.
async fn run_simulation_round<P: LlmProvider>(agent: &mut DesignAgent<P>, reply: &str) {
    if let Err(e) = agent.save_script(reply) {
        eprintln!("Error writing CST script: {}", e);
        return;
    }
    println!(
        "Executing generated CST script: {}",
        agent.script_file().display()
    );

    if let Err(e) = agent.run_script().await {
        eprintln!("Error running CST script: {}", e);
        return;
    }

    match agent.collect_feedback() {
        Ok(Some(feedback)) => {
            println!("Feeding results back to the assistant: {}", feedback);
            let (elapsed, result) = think(agent, &feedback).await;
            let advice = reply_or_exit(result);
            println!("🤖 Thought for {:.2} seconds\n", elapsed.as_secs_f64());
            println!("Optimization advice:\n{}\n", advice);
            warn_if_truncated(agent);
        }
        Ok(None) => {
            println!(
                "S11 results not found. Ensure '{}' exists.",
                agent.results_file().display()
            );
        }
        Err(e) => {
            eprintln!("Error reading S11 results: {}", e);
        }
    }
}

async fn run_session<P: LlmProvider>(provider: P, system_prompt: String, cli: &Cli) {
    let config = AgentConfig {
        model: Some(cli.model.clone()),
        script_file: cli.script_file.clone(),
        results_file: cli.results_file.clone(),
        python: cli.python.clone(),
        verbose: cli.verbose,
    };
    let mut agent = DesignAgent::with_config(provider, system_prompt, config);

    println!("Design agent ready! Type your message. Type 'exit' to quit.");
    println!("(Finish a message with an empty line to send it.)");
    println!();

    let stdin = std::io::stdin();
    let mut input = stdin.lock();

    loop {
        println!("You:");

        let block = match read_block(&mut input) {
            Ok(Some(block)) => block,
            Ok(None) => {
                println!("Goodbye!");
                break;
            }
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
        };

        if block.trim().is_empty() {
            continue;
        }
        if is_exit_command(&block) {
            println!("Goodbye!");
            break;
        }

        let (elapsed, result) = think(&mut agent, &block).await;
        let reply = reply_or_exit(result);
        println!("🤖 Thought for {:.2} seconds\n", elapsed.as_secs_f64());
        println!("Assistant:\n{}\n", reply);
        warn_if_truncated(&agent);

        // Detection is per reply; a failed round never latches into the next
        if design_complete(&reply) {
            run_simulation_round(&mut agent, &reply).await;
        }
    }

    let usage = agent.usage();
    if usage.total_calls > 0 {
        println!(
            "({} tokens across {} calls)",
            usage.total_tokens(),
            usage.total_calls
        );
    }
}

/// Debugging helper: summarize a results file without a session
fn run_feedback(file: &Path) {
    match load_results(file) {
        Ok(rows) => match best_row(&rows) {
            Some(row) => println!("{}", feedback_message(row)),
            None => {
                eprintln!("No data rows in {}", file.display());
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Some(Commands::Feedback { file }) = &cli.command {
        run_feedback(file);
        return;
    }

    // The system prompt is the one file the tool cannot start without
    let system_prompt = match std::fs::read_to_string(&cli.system_prompt) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            eprintln!(
                "Error: {}",
                rfpilot_core::error::prompt_missing(cli.system_prompt.display().to_string())
            );
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error reading {}: {}", cli.system_prompt.display(), e);
            std::process::exit(1);
        }
    };

    if cli.offline {
        run_session(EchoProvider::new(), system_prompt, &cli).await;
    } else {
        // An absent OPENAI_API_KEY is not checked up front; the first
        // call fails with AuthFailed instead
        let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
        let mut provider_config = ProviderConfig::openai(api_key)
            .with_model(&cli.model)
            .with_timeout(cli.timeout);
        if let Some(base_url) = &cli.base_url {
            provider_config = provider_config.with_base_url(base_url);
        }
        run_session(OpenAIProvider::new(provider_config), system_prompt, &cli).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_exit_command_is_trimmed_and_case_insensitive() {
        assert!(is_exit_command("exit"));
        assert!(is_exit_command("EXIT"));
        assert!(is_exit_command("  Exit  \n"));
        assert!(!is_exit_command("exit now"));
        assert!(!is_exit_command("quit"));
    }

    #[test]
    fn test_read_block_submits_on_empty_line() {
        let mut input = Cursor::new("line one\nline two\n\nrest\n");
        let block = read_block(&mut input).unwrap();
        assert_eq!(block.as_deref(), Some("line one\nline two"));
        // the next block picks up after the blank line
        let block = read_block(&mut input).unwrap();
        assert_eq!(block.as_deref(), Some("rest"));
    }

    #[test]
    fn test_read_block_eof_submits_pending_lines() {
        let mut input = Cursor::new("only line");
        let block = read_block(&mut input).unwrap();
        assert_eq!(block.as_deref(), Some("only line"));
    }

    #[test]
    fn test_read_block_eof_on_empty_input_ends_session() {
        let mut input = Cursor::new("");
        assert_eq!(read_block(&mut input).unwrap(), None);
    }

    #[test]
    fn test_read_block_strips_crlf() {
        let mut input = Cursor::new("windows line\r\n\r\n");
        let block = read_block(&mut input).unwrap();
        assert_eq!(block.as_deref(), Some("windows line"));
    }
}
