//! Todo API entry point.

use clap::Parser;
use std::process::ExitCode;
use todo::cli::commands;
use todo::cli::{Cli, Commands};
use todo::error::Error;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.quiet {
        todo::QUIET.store(true, std::sync::atomic::Ordering::Relaxed);
    }

    init_tracing(cli.verbose, cli.quiet, cli.log_json);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                eprintln!("{}", e.to_structured_json());
            } else if let Some(hint) = e.hint() {
                eprintln!("Error: {e}\n  Hint: {hint}");
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool, log_json: bool) {
    use tracing_subscriber::EnvFilter;

    if quiet {
        return;
    }

    // Honor RUST_LOG if set, otherwise use verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug,rusqlite=info"),
            _ => EnvFilter::new("trace"),
        }
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(cli: &Cli) -> Result<(), Error> {
    match &cli.command {
        Commands::Serve(args) => commands::serve::execute(args, cli.db.as_deref()),
        Commands::Init { force } => commands::init::execute(cli.db.as_deref(), *force, cli.json),
        Commands::Version => commands::version::execute(cli.db.as_deref(), cli.json),
        Commands::Completions { shell } => commands::completions::execute(*shell),
    }
}
