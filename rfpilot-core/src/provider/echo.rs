//! Offline provider that reflects the request back
//!
//! Useful for exercising the interaction loop without network access or an
//! API key. Pasting a reply that contains the completion marker still drives
//! the script path, so the whole round trip can be rehearsed offline.

use super::*;
use crate::error::{Error, Result};

/// Provider that answers every request locally by echoing the last message
#[derive(Debug, Clone, Default)]
pub struct EchoProvider;

impl EchoProvider {
    pub fn new() -> Self {
        Self
    }
}

impl LlmProvider for EchoProvider {
    fn name(&self) -> &str {
        "echo"
    }

    fn default_model(&self) -> &str {
        "echo"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let last = request
            .messages
            .last()
            .ok_or_else(|| Error::inference_failed("empty request").with_operation("echo::complete"))?;

        let content = format!("[echo] {}", last.content);

        // Whitespace word counts stand in for tokens; good enough for
        // exercising the usage accounting.
        let prompt_tokens: usize = request
            .messages
            .iter()
            .map(|m| m.content.split_whitespace().count())
            .sum();
        let completion_tokens = content.split_whitespace().count();

        Ok(CompletionResponse {
            id: "echo".into(),
            model: request.model.unwrap_or_else(|| "echo".into()),
            content: Some(content),
            finish_reason: FinishReason::Stop,
            usage: Usage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_echo_reflects_last_message() {
        let provider = EchoProvider::new();
        let request = CompletionRequest::new(vec![
            ChatMessage::system("be brief"),
            ChatMessage::user("resonant frequency?"),
        ]);

        let response = tokio_test::block_on(provider.complete(request)).unwrap();
        assert_eq!(response.content.as_deref(), Some("[echo] resonant frequency?"));
        assert_eq!(response.finish_reason, FinishReason::Stop);
        assert!(response.usage.total_tokens > 0);
    }

    #[test]
    fn test_echo_rejects_empty_request() {
        let provider = EchoProvider::new();
        let err =
            tokio_test::block_on(provider.complete(CompletionRequest::new(vec![]))).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InferenceFailed);
    }
}
