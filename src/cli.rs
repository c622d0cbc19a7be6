use crate::config::{EvaluatorConfig, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use crate::error::{ConfigError, EvalError};
use crate::evaluate::Invocation;
use clap::Parser;

/// Score a candidate answer to a question with a language model
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The question being answered
    #[arg(allow_hyphen_values = true)]
    pub question: Option<String>,

    /// The candidate answer to evaluate
    #[arg(allow_hyphen_values = true)]
    pub answer: Option<String>,

    /// Trailing positionals past the answer are accepted and ignored
    #[arg(hide = true)]
    pub extra_args: Vec<String>,

    #[command(flatten)]
    pub common_args: CommonArgs,
}

/// Connection and model settings
#[derive(Parser, Debug, Clone)]
pub struct CommonArgs {
    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// OpenAI API base URL
    #[arg(long, env = "OPENAI_API_BASE")]
    pub openai_api_base: Option<String>,

    /// Model used for evaluation
    #[arg(long, env = "EVAL_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Upper bound on generated tokens
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,
}

impl Cli {
    /// Both positionals must be present; anything else is a usage error.
    pub fn invocation(&self) -> Result<Invocation, EvalError> {
        match (&self.question, &self.answer) {
            (Some(question), Some(answer)) => {
                Ok(Invocation::new(question.clone(), answer.clone()))
            }
            _ => Err(EvalError::Usage),
        }
    }
}

impl CommonArgs {
    pub fn evaluator_config(&self) -> Result<EvaluatorConfig, ConfigError> {
        EvaluatorConfig::new(self.openai_api_key.clone())?
            .with_api_base(self.openai_api_base.clone())
            .with_model(self.model.clone())
            .with_max_tokens(self.max_tokens)
    }
}
