use anyhow::Context;
use clap::Parser;
use portprobe::cli::{self, Cli};
use portprobe::output;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Cli) -> anyhow::Result<()> {
    cli::scan::execute(args)
        .await
        .with_context(|| format!("cannot scan {}", args.host))?;
    Ok(())
}

/// Log to stderr so formatted results on stdout stay machine-readable.
fn init_logging(cli: &Cli) {
    let default_level = if cli.verbose {
        "info"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
