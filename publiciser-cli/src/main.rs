mod app;
mod output;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use publiciser::Publicise;

use crate::app::Cli;

fn main() -> anyhow::Result<ExitCode> {
    ctrlc::set_handler(|| {
        eprintln!("\nCancelled.");
        std::process::exit(130);
    })
    .context("failed to set Ctrl+C handler")?;

    let cli = Cli::parse();

    // publiciser warnings on stderr unless --json; -l shows each step, -v debug; RUST_LOG overrides
    if !cli.json {
        env_logger::Builder::new()
            .filter_module("publiciser", cli.log_level())
            .parse_default_env()
            .target(env_logger::Target::Stderr)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(false)
            .init();
    }

    let outcome = Publicise::new(cli.config())
        .execute()
        .with_context(|| format!("failed to publicise {}", cli.target.display()))?;

    output::print_outcome(&outcome, cli.json)?;

    Ok(if outcome.succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
