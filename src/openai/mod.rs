pub mod fake;
pub mod real;

use async_openai::types::{
    ChatCompletionRequestMessage, CreateChatCompletionResponse,
};
use async_trait::async_trait;

/// Constants for message roles
pub const ROLE_SYSTEM: &str = "system";
pub const ROLE_USER: &str = "user";

/// What was sent on a single completion request
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub model_name: String,
    pub messages: Vec<ChatCompletionRequestMessage>,
    pub max_tokens: u32,
}

/// A trait that abstracts the chat-completion call for testing
///
/// Both the real and fake clients implement this, so the evaluator can be
/// exercised without a network or an API key.
#[async_trait]
pub trait OpenAIClientTrait: Send + Sync {
    /// Sends `messages` to `model` and returns the raw completion response.
    ///
    /// Implementations make exactly one attempt; failures are returned to
    /// the caller unchanged.
    async fn chat_completion(
        &self,
        model: String,
        messages: Vec<ChatCompletionRequestMessage>,
        max_tokens: u32,
    ) -> Result<CreateChatCompletionResponse, anyhow::Error>;
}
