// Entrypoint for the CLI application.
// - Keeps `main` small: parse flags, set up logging, run the batch and
//   print the results.
// - Every fatal error ends the process with status 1.

use anyhow::anyhow;
use clap::{CommandFactory, Parser};
use std::io::{self, Write};
use std::process;
use telegrup::api::TelegraphClient;
use telegrup::config::Cli;
use telegrup::ui::{print_results, WithSpinner};
use telegrup::upload::upload_bunch;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // Logging is best effort; the uploader works without it.
    let _ = init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        if e.is_file_list() {
            let _ = Cli::command().write_help(&mut io::stderr());
            eprintln!();
        }
        error!(error = %e, "telegrup failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> telegrup::Result<()> {
    let files = cli.file_list()?;
    let client = TelegraphClient::from_env()?;
    debug!(files = files.len(), endpoint = client.endpoint(), "starting upload");

    let results = if cli.quiet {
        upload_bunch(&client, &files, &cli.options())?
    } else {
        upload_bunch(&WithSpinner::new(client), &files, &cli.options())?
    };
    if cli.quiet {
        return Ok(());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    print_results(&mut out, &results, cli.output_format())?;
    out.flush()?;
    Ok(())
}

/// Install a stderr subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialise logging: {e}"))
}
