//! OpenAI-compatible provider implementation
//!
//! Works with OpenAI, Azure OpenAI, vLLM, Ollama, and other OpenAI-compatible
//! APIs. Only the non-streaming chat completions call is implemented - the
//! design loop consumes whole replies.

use super::*;
use crate::error::{Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// OpenAI-compatible provider
pub struct OpenAIProvider {
    client: Client,
    config: ProviderConfig,
}

impl OpenAIProvider {
    pub fn new(config: ProviderConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    fn build_payload(model: &str, request: &CompletionRequest) -> OpenAIRequest {
        OpenAIRequest {
            model: model.to_string(),
            messages: request
                .messages
                .iter()
                .cloned()
                .map(OpenAIMessage::from)
                .collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: Some(false),
        }
    }
}

impl LlmProvider for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let model = request
            .model
            .as_deref()
            .unwrap_or(self.default_model())
            .to_string();

        let api_request = Self::build_payload(&model, &request);

        let mut req = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .json(&api_request);

        if let Some(api_key) = &self.config.api_key {
            if !api_key.is_empty() {
                req = req.header("Authorization", format!("Bearer {}", api_key));
            }
        }

        let response = req.send().await.map_err(|e| {
            Error::network_failed(e.to_string())
                .with_operation("provider::complete")
                .with_context("model", model.clone())
                .set_source(e)
        })?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();

            let err = if status == 429 {
                Error::rate_limited("rate limit exceeded")
            } else if status == 401 {
                Error::auth_failed("authentication failed, check OPENAI_API_KEY")
            } else {
                Error::api_failed(status, text)
            };
            return Err(err
                .with_operation("provider::complete")
                .with_context("model", model));
        }

        let api_response: OpenAIResponse = response.json().await.map_err(|e| {
            Error::parse_failed(format!("failed to decode completion response: {}", e))
                .with_operation("provider::complete")
                .set_source(e)
        })?;

        let choice = api_response.choices.into_iter().next().ok_or_else(|| {
            Error::inference_failed("no choices in response")
                .with_operation("provider::complete")
                .with_context("model", model)
        })?;

        let finish_reason = parse_finish_reason(choice.finish_reason.as_deref());

        let usage = api_response
            .usage
            .map(|u| Usage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            id: api_response.id,
            model: api_response.model,
            content: choice.message.content,
            finish_reason,
            usage,
        })
    }
}

fn parse_finish_reason(reason: Option<&str>) -> FinishReason {
    match reason {
        Some("stop") => FinishReason::Stop,
        Some("length") => FinishReason::Length,
        Some("content_filter") => FinishReason::ContentFilter,
        _ => FinishReason::Unknown,
    }
}

// ============================================================================
// OpenAI API Types
// ============================================================================

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

impl From<ChatMessage> for OpenAIMessage {
    fn from(msg: ChatMessage) -> Self {
        Self {
            role: match msg.role {
                Role::System => "system".into(),
                Role::User => "user".into(),
                Role::Assistant => "assistant".into(),
            },
            content: Some(msg.content),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    id: String,
    model: String,
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: usize,
    completion_tokens: usize,
    total_tokens: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> CompletionRequest {
        CompletionRequest::new(vec![
            ChatMessage::system("You are an RF design assistant"),
            ChatMessage::user("Design a 2.4 GHz patch antenna"),
        ])
    }

    #[test]
    fn test_payload_shape() {
        let payload = OpenAIProvider::build_payload("gpt-5-mini", &sample_request());
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["model"], "gpt-5-mini");
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "Design a 2.4 GHz patch antenna");
        // Sampling knobs left unset must not appear in the payload.
        assert!(json.get("temperature").is_none());
        assert!(json.get("max_tokens").is_none());
    }

    #[test]
    fn test_payload_with_sampling_options() {
        let request = sample_request().with_temperature(0.5).with_max_tokens(4096);
        let payload = OpenAIProvider::build_payload("gpt-5-mini", &request);
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["temperature"], 0.5);
        assert_eq!(json["max_tokens"], 4096);
    }

    #[test]
    fn test_payload_preserves_history_order() {
        let request = CompletionRequest::new(vec![
            ChatMessage::system("sys"),
            ChatMessage::user("turn 1"),
            ChatMessage::assistant("reply 1"),
            ChatMessage::user("turn 2"),
        ]);
        let payload = OpenAIProvider::build_payload("gpt-5-mini", &request);
        let json = serde_json::to_value(&payload).unwrap();

        let roles: Vec<&str> = json["messages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["role"].as_str().unwrap())
            .collect();
        assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
    }

    #[test]
    fn test_decode_response() {
        let body = r#"{
            "id": "chatcmpl-123",
            "model": "gpt-5-mini",
            "choices": [{
                "message": {"role": "assistant", "content": "Use a 28.5 mm patch."},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 42, "completion_tokens": 10, "total_tokens": 52}
        }"#;

        let decoded: OpenAIResponse = serde_json::from_str(body).unwrap();
        assert_eq!(decoded.id, "chatcmpl-123");
        let choice = &decoded.choices[0];
        assert_eq!(choice.message.content.as_deref(), Some("Use a 28.5 mm patch."));
        assert_eq!(
            parse_finish_reason(choice.finish_reason.as_deref()),
            FinishReason::Stop
        );
        assert_eq!(decoded.usage.unwrap().total_tokens, 52);
    }

    #[test]
    fn test_finish_reason_mapping() {
        assert_eq!(parse_finish_reason(Some("stop")), FinishReason::Stop);
        assert_eq!(parse_finish_reason(Some("length")), FinishReason::Length);
        assert_eq!(
            parse_finish_reason(Some("content_filter")),
            FinishReason::ContentFilter
        );
        assert_eq!(parse_finish_reason(Some("anything")), FinishReason::Unknown);
        assert_eq!(parse_finish_reason(None), FinishReason::Unknown);
    }
}
