use thiserror::Error;

/// Problems resolving the evaluator configuration before any request is made.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OpenAI API key not configured")]
    MissingApiKey,

    #[error("max_tokens must be greater than 0")]
    InvalidMaxTokens,
}

/// Everything that can end an evaluation run unsuccessfully.
#[derive(Debug, Error)]
pub enum EvalError {
    /// Fewer than two positional arguments were given.
    #[error("missing question or answer")]
    Usage,

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The completion request itself failed (network, auth, provider).
    #[error("{0}")]
    Completion(anyhow::Error),

    #[error("completion response contained no text")]
    EmptyResponse,

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl EvalError {
    pub fn is_usage(&self) -> bool {
        matches!(self, EvalError::Usage)
    }
}
