use crate::cli::Cli;
use crate::config::EvaluatorConfig;
use crate::error::EvalError;
use crate::evaluate::evaluate_with_client;
use crate::openai::real::create_openai_client;
use crate::openai::OpenAIClientTrait;
use clap::Parser;
use std::ffi::OsString;
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

pub const USAGE_LINE: &str = "❌ Usage: answer_eval '<question>' '<answer>'";
pub const ERROR_PREFIX: &str = "❌ Error analyzing response:";

/// Entry point used by the binary. Returns the process exit code.
pub async fn run() -> u8 {
    dotenv::dotenv().ok();
    init_logging();

    let cli = match parse_cli(std::env::args_os()) {
        Ok(cli) => cli,
        Err(code) => return code,
    };
    let mut stdout = std::io::stdout().lock();
    run_with_client_factory(&cli, create_openai_client, &mut stdout).await
}

/// Parses arguments, keeping clap's own failures on the 0/1 exit-code scheme.
/// `--help` and `--version` exit 0; any other parse error exits 1.
fn parse_cli<I, T>(args: I) -> Result<Cli, u8>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args).map_err(|e| {
        let _ = e.print();
        if e.use_stderr() {
            EXIT_FAILURE
        } else {
            EXIT_SUCCESS
        }
    })
}

// Logs go to stderr; stdout only ever carries the reply or the error line.
fn init_logging() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Runs one evaluation and writes the outcome to `out`.
///
/// `make_client` is only called once the arguments and configuration are
/// valid, so a usage error never touches the network.
pub async fn run_with_client_factory<F>(
    cli: &Cli,
    make_client: F,
    out: &mut dyn Write,
) -> u8
where
    F: FnOnce(&EvaluatorConfig) -> Arc<dyn OpenAIClientTrait>,
{
    let result = evaluate_cli(cli, make_client).await;
    report(result, out)
}

async fn evaluate_cli<F>(cli: &Cli, make_client: F) -> Result<String, EvalError>
where
    F: FnOnce(&EvaluatorConfig) -> Arc<dyn OpenAIClientTrait>,
{
    let invocation = cli.invocation()?;
    if !cli.extra_args.is_empty() {
        debug!(count = cli.extra_args.len(), "Ignoring extra arguments");
    }
    let config = cli.common_args.evaluator_config()?;
    debug!(model = %config.model, max_tokens = config.max_tokens, "Resolved configuration");

    let client = make_client(&config);
    evaluate_with_client(client.as_ref(), &config, &invocation).await
}

fn report(result: Result<String, EvalError>, out: &mut dyn Write) -> u8 {
    let (line, code) = match result {
        Ok(reply) => (reply, EXIT_SUCCESS),
        Err(e) if e.is_usage() => (USAGE_LINE.to_string(), EXIT_FAILURE),
        Err(e) => {
            error!("Evaluation failed: {}", e);
            (format!("{} {}", ERROR_PREFIX, e), EXIT_FAILURE)
        }
    };

    match writeln!(out, "{}", line).and_then(|_| out.flush()) {
        Ok(()) => code,
        Err(e) => {
            error!("{}", EvalError::Output(e));
            EXIT_FAILURE
        }
    }
}
