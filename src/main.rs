// src/main.rs

use std::process::ExitCode;

use ffrun::{cli, exit_code, logging, run};

#[tokio::main]
async fn main() -> ExitCode {
    match run_main().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ffrun error: {err:?}");
            ExitCode::from(exit_code(&err))
        }
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    run(args).await
}
