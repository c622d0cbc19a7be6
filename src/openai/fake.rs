use anyhow::Result;
use async_openai::types::{
    ChatChoice, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageContent,
    ChatCompletionRequestUserMessageContent, ChatCompletionResponseMessage,
    CompletionUsage, CreateChatCompletionResponse, FinishReason, Role,
};
use async_trait::async_trait;
use std::sync::Mutex;

use crate::openai::{ModelRequest, OpenAIClientTrait, ROLE_SYSTEM, ROLE_USER};

#[derive(Debug, Clone)]
enum FakeReply {
    Content(Option<String>),
    NoChoices,
    Error(String),
}

/// A fake implementation of the OpenAI client for testing
///
/// Replies are handed out in the order they were queued. Every call is
/// recorded in `requests`, including calls that return an error.
///
/// # Example
///
/// ```
/// use answer_eval::openai::OpenAIClientTrait;
/// use answer_eval::openai::fake::FakeOpenAIClient;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let client = FakeOpenAIClient::new().with_response("Score: 1");
///     let response = client
///         .chat_completion("gpt-4-turbo".to_string(), vec![], 100)
///         .await?;
///     assert_eq!(
///         response.choices[0].message.content.as_deref(),
///         Some("Score: 1")
///     );
///     assert_eq!(client.request_count(), 1);
///     Ok(())
/// }
/// ```
pub struct FakeOpenAIClient {
    replies: Mutex<Vec<FakeReply>>,
    // Track requests for verification in tests
    pub requests: Mutex<Vec<ModelRequest>>,
}

impl Default for FakeOpenAIClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeOpenAIClient {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(vec![]),
            requests: Mutex::new(vec![]),
        }
    }

    /// Queue a reply whose first choice carries `response` as its content
    pub fn with_response(self, response: &str) -> Self {
        self.push(FakeReply::Content(Some(response.to_string())))
    }

    /// Queue a reply whose first choice has no content
    pub fn with_none_content_response(self) -> Self {
        self.push(FakeReply::Content(None))
    }

    /// Queue a reply with an empty `choices` list
    pub fn with_no_choices(self) -> Self {
        self.push(FakeReply::NoChoices)
    }

    /// Queue a failed call, as if the transport or provider errored
    pub fn with_error(self, message: &str) -> Self {
        self.push(FakeReply::Error(message.to_string()))
    }

    fn push(self, reply: FakeReply) -> Self {
        self.replies.lock().unwrap().push(reply);
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Returns `(role, text)` for each message of the request at `index`
    pub fn request_messages(&self, index: usize) -> Vec<(String, String)> {
        let requests = self.requests.lock().unwrap();
        requests
            .get(index)
            .map(|request| {
                request.messages.iter().filter_map(message_text).collect()
            })
            .unwrap_or_default()
    }
}

fn message_text(
    message: &ChatCompletionRequestMessage,
) -> Option<(String, String)> {
    match message {
        ChatCompletionRequestMessage::System(system) => match &system.content
        {
            ChatCompletionRequestSystemMessageContent::Text(text) => {
                Some((ROLE_SYSTEM.to_string(), text.clone()))
            }
            _ => None,
        },
        ChatCompletionRequestMessage::User(user) => match &user.content {
            ChatCompletionRequestUserMessageContent::Text(text) => {
                Some((ROLE_USER.to_string(), text.clone()))
            }
            _ => None,
        },
        _ => None,
    }
}

#[async_trait]
impl OpenAIClientTrait for FakeOpenAIClient {
    #[allow(deprecated)]
    async fn chat_completion(
        &self,
        model: String,
        messages: Vec<ChatCompletionRequestMessage>,
        max_tokens: u32,
    ) -> Result<CreateChatCompletionResponse, anyhow::Error> {
        // Store the request for later verification
        self.requests.lock().unwrap().push(ModelRequest {
            model_name: model.clone(),
            messages,
            max_tokens,
        });

        let reply = {
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                FakeReply::Content(Some("Fake default response".to_string()))
            } else {
                replies.remove(0)
            }
        };

        let choices = match reply {
            FakeReply::Error(message) => return Err(anyhow::anyhow!(message)),
            FakeReply::NoChoices => vec![],
            FakeReply::Content(content) => {
                let message = ChatCompletionResponseMessage {
                    role: Role::Assistant,
                    content,
                    #[allow(deprecated)]
                    function_call: None,
                    tool_calls: None,
                    #[allow(deprecated)]
                    refusal: None,
                    audio: None,
                };
                vec![ChatChoice {
                    index: 0,
                    message,
                    finish_reason: Some(FinishReason::Stop),
                    logprobs: None,
                }]
            }
        };

        let usage = CompletionUsage {
            prompt_tokens: 0,
            completion_tokens: 0,
            total_tokens: 0,
            prompt_tokens_details: None,
            completion_tokens_details: None,
        };

        Ok(CreateChatCompletionResponse {
            id: "fake_id".to_string(),
            object: "chat.completion".to_string(),
            created: 0,
            model,
            system_fingerprint: Some("fake-fingerprint".to_string()),
            service_tier: None,
            choices,
            usage: Some(usage),
        })
    }
}
