//! Example: Ask the design assistant one question
//!
//! Run with:
//!   # Offline echo provider (default):
//!   cargo run --example one_shot
//!
//!   # Use OpenAI:
//!   OPENAI_API_KEY=sk-xxx cargo run --example one_shot -- --openai
//!
//!   # Use local Ollama:
//!   cargo run --example one_shot -- --ollama

use rfpilot_core::{ChatSession, EchoProvider, LlmProvider, OpenAIProvider, ProviderConfig};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let use_openai = args.iter().any(|arg| arg == "--openai");
    let use_ollama = args.iter().any(|arg| arg == "--ollama");

    let system_prompt = "You are a concise RF engineer. Answer in two sentences.";
    let question = "What patch length should I start from for a 2.45 GHz \
                    microstrip antenna on 1.6 mm FR-4?";

    if use_ollama {
        println!("Using Ollama (localhost:11434)...");
        let provider =
            OpenAIProvider::new(ProviderConfig::local("http://localhost:11434/v1", "llama3.3"));
        run_with_provider(provider, system_prompt, question).await
    } else if use_openai {
        let api_key =
            env::var("OPENAI_API_KEY").expect("Set OPENAI_API_KEY environment variable");
        println!("Using OpenAI...");
        let provider = OpenAIProvider::new(ProviderConfig::openai(api_key));
        run_with_provider(provider, system_prompt, question).await
    } else {
        println!("Using offline echo provider (pass --openai or --ollama for a real model)...");
        run_with_provider(EchoProvider::new(), system_prompt, question).await
    }
}

async fn run_with_provider<P: LlmProvider>(
    provider: P,
    system_prompt: &str,
    question: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Provider: {}", provider.name());
    println!("Model: {}\n", provider.default_model());

    let mut session = ChatSession::new(provider, system_prompt);

    println!("=== Question ===\n{}\n", question);
    let reply = session.ask(question).await?;
    println!("=== Reply ===\n{}\n", reply);

    println!(
        "({} tokens across {} calls)",
        session.usage().total_tokens(),
        session.usage().total_calls
    );
    Ok(())
}
