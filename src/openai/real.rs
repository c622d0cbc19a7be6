use crate::config::EvaluatorConfig;
use crate::openai::OpenAIClientTrait;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, CreateChatCompletionRequestArgs,
    CreateChatCompletionResponse,
};
use async_openai::Client;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

// A real implementation of the OpenAI client
pub struct RealOpenAIClient {
    client: Client<OpenAIConfig>,
}

impl RealOpenAIClient {
    pub fn new(client: Client<OpenAIConfig>) -> Self {
        Self { client }
    }
}

/// Builds a client from resolved configuration.
pub fn create_openai_client(
    config: &EvaluatorConfig,
) -> Arc<dyn OpenAIClientTrait> {
    create_openai_client_with_http(config, reqwest::Client::new())
}

/// Same as [`create_openai_client`] but over a caller-supplied HTTP client.
///
/// async-openai retries rate-limited requests by default; the backoff is
/// given a zero budget so every request is a single attempt.
pub fn create_openai_client_with_http(
    config: &EvaluatorConfig,
    http_client: reqwest::Client,
) -> Arc<dyn OpenAIClientTrait> {
    let mut openai_config =
        OpenAIConfig::new().with_api_key(config.api_key.clone());
    if let Some(api_base) = &config.api_base {
        debug!("Using OpenAI API base {}", api_base);
        openai_config = openai_config.with_api_base(api_base.clone());
    }

    let no_retry = backoff::ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(Duration::ZERO))
        .build();

    let client = Client::with_config(openai_config)
        .with_http_client(http_client)
        .with_backoff(no_retry);
    Arc::new(RealOpenAIClient::new(client))
}

#[async_trait]
impl OpenAIClientTrait for RealOpenAIClient {
    #[allow(deprecated)]
    async fn chat_completion(
        &self,
        model: String,
        messages: Vec<ChatCompletionRequestMessage>,
        max_tokens: u32,
    ) -> Result<CreateChatCompletionResponse, anyhow::Error> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(messages)
            .max_tokens(max_tokens)
            .build()?;

        let response = self.client.chat().create(request).await?;

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluate::{build_messages, build_prompt, Invocation};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    const RATE_LIMIT_BODY: &str = r#"{"error":{"message":"Rate limit reached for requests","type":"rate_limit_exceeded","param":null,"code":"rate_limit_exceeded"}}"#;

    // Reads one full HTTP request (headers plus Content-Length body).
    async fn read_request(stream: &mut TcpStream) -> std::io::Result<()> {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).await?;
            if n == 0 {
                return Ok(());
            }
            buf.extend_from_slice(&chunk[..n]);

            let Some(header_end) =
                buf.windows(4).position(|w| w == b"\r\n\r\n")
            else {
                continue;
            };
            let headers =
                String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
            let content_length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                return Ok(());
            }
        }
    }

    async fn serve_rate_limited(listener: TcpListener, hits: Arc<AtomicUsize>) {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            hits.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                if read_request(&mut stream).await.is_err() {
                    return;
                }
                let response = format!(
                    "HTTP/1.1 429 Too Many Requests\r\n\
                     Content-Type: application/json\r\n\
                     Content-Length: {}\r\n\
                     Connection: close\r\n\r\n{}",
                    RATE_LIMIT_BODY.len(),
                    RATE_LIMIT_BODY
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    }

    #[tokio::test]
    async fn test_rate_limited_request_is_not_retried() -> anyhow::Result<()> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let hits = Arc::new(AtomicUsize::new(0));
        let server = tokio::spawn(serve_rate_limited(listener, hits.clone()));

        let config = EvaluatorConfig::new(Some("sk-test".to_string()))?
            .with_api_base(Some(format!("http://{}/v1", addr)));
        let http_client = reqwest::Client::builder().no_proxy().build()?;
        let client = create_openai_client_with_http(&config, http_client);

        let messages =
            build_messages(&build_prompt(&Invocation::new("What is 2+2?", "4")))?;
        let result = tokio::time::timeout(
            Duration::from_secs(10),
            client.chat_completion(
                config.model.clone(),
                messages,
                config.max_tokens,
            ),
        )
        .await
        .expect("rate-limited request should fail without backing off");

        let err = result.unwrap_err();
        assert!(
            err.to_string().contains("Rate limit reached"),
            "unexpected error: {}",
            err
        );
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        server.abort();
        Ok(())
    }
}
