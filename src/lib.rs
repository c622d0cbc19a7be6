pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod openai;
pub mod prompts;

pub mod test_utils;

pub use config::EvaluatorConfig;
pub use error::{ConfigError, EvalError};
pub use evaluate::{evaluate_with_client, Invocation};
