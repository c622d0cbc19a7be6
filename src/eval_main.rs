use std::process::ExitCode;

use answer_eval::app::run;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    ExitCode::from(run().await)
}
