mod adapters;
mod bot;
mod cli;
mod config;
mod core;
mod web;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn main() {
    let args = Cli::parse();
    init_tracing(&args);
    cli::context::init(&args.data_dir);

    let result = match &args.command {
        Commands::Serve(serve) => cli::commands::serve::execute(serve),
        Commands::RegisterCommands { client_id, token } => {
            cli::commands::register::execute(client_id, token)
        }
        Commands::Encrypt { text } => cli::commands::cipher::encrypt(text),
        Commands::Decrypt { text } => cli::commands::cipher::decrypt(text),
        Commands::Shop { action } => cli::commands::shop::execute(action),
        Commands::Log { last, actor, store } => {
            cli::commands::log::execute(*last, actor.as_deref(), store.as_deref())
        }
    };

    if let Err(e) = result {
        cli::output::error(&format!("Error: {e}"));
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins; otherwise `info` for the server, `warn` for one-shot
/// commands and `debug` with `--verbose`. Logs go to stderr so command
/// output stays pipeable.
fn init_tracing(args: &Cli) {
    let default_level = if args.verbose {
        "debug"
    } else if matches!(args.command, Commands::Serve(_)) {
        "info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
