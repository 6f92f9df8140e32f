mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// Log to stderr so table / JSON output on stdout stays clean.
/// `RUST_LOG` wins over the `-v` count.
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let Cli {
        mut global,
        command,
    } = cli;

    if let Command::Completions(args) = command {
        use clap::CommandFactory;

        clap_complete::generate(args.shell, &mut Cli::command(), "comelit", &mut std::io::stdout());
        return Ok(());
    }

    let cfg = comelit_config::load_config()?;
    if global.output.is_none() {
        global.output = Some(config::default_output(&cfg)?);
    }

    tracing::debug!(command = ?command, profile = %config::active_profile_name(&global, &cfg), "dispatching");
    commands::dispatch(command, &global, &cfg).await
}
