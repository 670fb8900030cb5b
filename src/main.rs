mod cmd;

use clap::Parser;
use clusterctx::{ContextStore, StorePaths, logging};
use cmd::{Cli, CmdResult, Command};
use owo_colors::OwoColorize;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Loaded before logging so `.env` may set CLUSTERCTX_LOG; reported once it is up.
    let dotenv = dotenvy::dotenv();
    logging::init(cli.verbose);
    if let Err(err) = dotenv {
        if !err.not_found() {
            tracing::warn!(error = %err, "ignoring unreadable .env file");
        }
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CmdResult<()> {
    let paths = StorePaths::resolve(cli.config_dir.as_deref())?;
    tracing::debug!(dir = %paths.dir().display(), "using config directory");
    let store = ContextStore::new(paths);

    match cli.command {
        Command::Context(action) => cmd::context::handle(&store, action),
        Command::Server(action) => cmd::server::handle(&store, action),
    }
}
