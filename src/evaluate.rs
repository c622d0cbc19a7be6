use crate::config::EvaluatorConfig;
use crate::error::EvalError;
use crate::openai::OpenAIClientTrait;
use crate::prompts::{build_user_prompt, EVALUATION_SYSTEM_PROMPT};
use anyhow::Result;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs,
};
use tracing::{info, instrument};

/// The question and candidate answer supplied on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub question: String,
    pub answer: String,
}

impl Invocation {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

pub fn build_prompt(invocation: &Invocation) -> Prompt {
    Prompt {
        system: EVALUATION_SYSTEM_PROMPT.to_string(),
        user: build_user_prompt(&invocation.question, &invocation.answer),
    }
}

pub fn build_messages(
    prompt: &Prompt,
) -> Result<Vec<ChatCompletionRequestMessage>> {
    let system_message = ChatCompletionRequestMessage::System(
        ChatCompletionRequestSystemMessageArgs::default()
            .content(prompt.system.as_str())
            .build()
            .map_err(|e| {
                anyhow::anyhow!("Failed to build system message: {}", e)
            })?,
    );

    let user_message = ChatCompletionRequestMessage::User(
        ChatCompletionRequestUserMessageArgs::default()
            .content(prompt.user.as_str())
            .build()
            .map_err(|e| {
                anyhow::anyhow!("Failed to build user message: {}", e)
            })?,
    );

    Ok(vec![system_message, user_message])
}

/// Asks the model to score `invocation` and returns its trimmed reply.
///
/// Exactly one completion request is made. The reply is passed through
/// as-is apart from trimming; the "Score:/Reason:" shape is requested but
/// not checked.
#[instrument(skip_all, fields(model = %config.model))]
pub async fn evaluate_with_client(
    client: &dyn OpenAIClientTrait,
    config: &EvaluatorConfig,
    invocation: &Invocation,
) -> Result<String, EvalError> {
    let prompt = build_prompt(invocation);
    let messages = build_messages(&prompt).map_err(EvalError::Completion)?;

    info!("Requesting evaluation");
    let start_time = std::time::Instant::now();
    let response = client
        .chat_completion(config.model.clone(), messages, config.max_tokens)
        .await
        .map_err(EvalError::Completion)?;
    info!(
        duration_ms = start_time.elapsed().as_millis() as u64,
        "Evaluation received"
    );

    let content = response
        .choices
        .first()
        .and_then(|choice| choice.message.content.as_deref())
        .ok_or(EvalError::EmptyResponse)?;

    Ok(content.trim().to_string())
}
