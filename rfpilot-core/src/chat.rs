//! # Chat Session
//!
//! Append-only conversation state for the design dialogue.
//!
//! ## Design
//! - One system turn, set at construction, always first
//! - `ask` appends the user turn, replays the entire history to the
//!   provider, then appends the returned assistant turn
//! - The endpoint is stateless, so every call carries the full history
//! - No retries and no truncation: a transport failure propagates with
//!   the user turn already recorded, and history grows for the life of
//!   the process

use crate::error::{inference_failed, Result};
use crate::provider::{
    ChatMessage, CompletionRequest, FinishReason, LlmProvider, UsageTracker,
};

/// A conversation with one model, seeded with a system prompt
pub struct ChatSession<P: LlmProvider> {
    provider: P,
    model: String,
    messages: Vec<ChatMessage>,
    usage: UsageTracker,
    last_finish_reason: Option<FinishReason>,
}

impl<P: LlmProvider> ChatSession<P> {
    /// Create a session whose first turn is the given system prompt.
    ///
    /// The model defaults to the provider's default and is fixed for the
    /// session unless overridden with [`with_model`](Self::with_model).
    pub fn new(provider: P, system_prompt: impl Into<String>) -> Self {
        let model = provider.default_model().to_string();
        Self {
            provider,
            model,
            messages: vec![ChatMessage::system(system_prompt)],
            usage: UsageTracker::new(),
            last_finish_reason: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Send one user turn and return the assistant reply.
    ///
    /// On success the history gains exactly two turns (user, assistant).
    /// On failure the user turn is already appended when the error
    /// propagates; the next `ask` continues from there.
    pub async fn ask(&mut self, user_text: impl Into<String>) -> Result<String> {
        self.messages.push(ChatMessage::user(user_text));

        let request =
            CompletionRequest::new(self.messages.clone()).with_model(self.model.clone());
        let response = self.provider.complete(request).await?;

        self.usage.track(&response.model, &response.usage);
        self.last_finish_reason = Some(response.finish_reason);

        let reply = response.content.ok_or_else(|| {
            inference_failed("model returned an empty reply")
                .with_operation("session::ask")
                .with_context("model", self.model.clone())
        })?;

        self.messages.push(ChatMessage::assistant(reply.clone()));
        Ok(reply)
    }

    /// The full conversation so far, system turn first
    pub fn history(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Token usage accumulated across all asks
    pub fn usage(&self) -> &UsageTracker {
        &self.usage
    }

    /// Finish reason of the most recent completion, if any
    pub fn last_finish_reason(&self) -> Option<FinishReason> {
        self.last_finish_reason
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::provider::{CompletionResponse, Role, Usage};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Provider fed from a fixed list of replies, recording how many
    /// messages each request carried
    struct ScriptedProvider {
        replies: Mutex<VecDeque<String>>,
        seen_lens: Mutex<Vec<usize>>,
    }

    impl ScriptedProvider {
        fn new(replies: &[&str]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
                seen_lens: Mutex::new(Vec::new()),
            }
        }
    }

    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        fn default_model(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
            self.seen_lens.lock().unwrap().push(request.messages.len());
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| inference_failed("no scripted reply left"))?;
            Ok(CompletionResponse {
                id: "scripted".into(),
                model: request.model.unwrap_or_else(|| "scripted".into()),
                content: Some(reply),
                finish_reason: FinishReason::Stop,
                usage: Usage {
                    prompt_tokens: 10,
                    completion_tokens: 5,
                    total_tokens: 15,
                },
            })
        }
    }

    struct FailingProvider;

    impl LlmProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        fn default_model(&self) -> &str {
            "failing"
        }

        async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse> {
            Err(Error::network_failed("connection refused"))
        }
    }

    struct SilentProvider;

    impl LlmProvider for SilentProvider {
        fn name(&self) -> &str {
            "silent"
        }

        fn default_model(&self) -> &str {
            "silent"
        }

        async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
            Ok(CompletionResponse {
                id: "silent".into(),
                model: request.model.unwrap_or_else(|| "silent".into()),
                content: None,
                finish_reason: FinishReason::ContentFilter,
                usage: Usage::default(),
            })
        }
    }

    #[test]
    fn test_system_turn_first() {
        let session = ChatSession::new(ScriptedProvider::new(&[]), "You are an RF assistant");
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history()[0].role, Role::System);
        assert_eq!(session.history()[0].content, "You are an RF assistant");
    }

    #[tokio::test]
    async fn test_history_alternates_after_turns() {
        let provider = ScriptedProvider::new(&["reply one", "reply two"]);
        let mut session = ChatSession::new(provider, "sys");

        let r1 = session.ask("first question").await.unwrap();
        let r2 = session.ask("second question").await.unwrap();

        assert_eq!(r1, "reply one");
        assert_eq!(r2, "reply two");

        // Two turns -> 1 + 2*2 entries in strict order.
        let roles: Vec<Role> = session.history().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::Assistant, Role::User, Role::Assistant]
        );
        assert_eq!(session.history()[3].content, "second question");
    }

    #[tokio::test]
    async fn test_full_history_replayed_each_call() {
        let provider = ScriptedProvider::new(&["a", "b"]);
        let mut session = ChatSession::new(provider, "sys");

        session.ask("one").await.unwrap();
        session.ask("two").await.unwrap();

        let lens = session.provider.seen_lens.lock().unwrap().clone();
        // First call sees system+user, second sees those plus the
        // assistant turn and the new user turn.
        assert_eq!(lens, vec![2, 4]);
    }

    #[tokio::test]
    async fn test_failed_ask_keeps_user_turn() {
        let mut session = ChatSession::new(FailingProvider, "sys");

        let err = session.ask("hello").await.unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::NetworkFailed);

        let roles: Vec<Role> = session.history().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User]);
    }

    #[tokio::test]
    async fn test_empty_reply_is_inference_failure() {
        let mut session = ChatSession::new(SilentProvider, "sys");
        let err = session.ask("hello").await.unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InferenceFailed);
        assert_eq!(session.last_finish_reason(), Some(FinishReason::ContentFilter));
    }

    #[tokio::test]
    async fn test_usage_accumulates() {
        let provider = ScriptedProvider::new(&["a", "b"]);
        let mut session = ChatSession::new(provider, "sys");

        session.ask("one").await.unwrap();
        session.ask("two").await.unwrap();

        assert_eq!(session.usage().total_calls, 2);
        assert_eq!(session.usage().total_tokens(), 30);
    }
}
