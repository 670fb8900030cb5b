pub mod context;
pub mod server;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clusterctx::{ContextError, ContextType};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Parser)]
#[command(
    name = "clusterctx",
    version,
    about = "manage contexts for cluster and managed-service endpoints"
)]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Directory holding config.yaml (defaults to $CLUSTERCTX_CONFIG_DIR, then the platform config dir)
    #[arg(long, global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Manage contexts
    #[command(subcommand)]
    Context(ContextCommand),
    /// Legacy view over k8s contexts
    #[command(subcommand)]
    Server(ServerCommand),
}

#[derive(Subcommand)]
pub enum ContextCommand {
    /// List contexts
    #[command(alias = "ls")]
    List {
        #[arg(long = "type", value_enum)]
        context_type: Option<ContextType>,
        #[arg(short = 'o', long = "output", value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Show a context by name
    Get {
        name: String,
        #[arg(short = 'o', long = "output", value_enum, default_value = "yaml")]
        format: OutputFormat,
    },
    /// Show the current context, for one type or all of them
    Current {
        #[arg(long = "type", value_enum)]
        context_type: Option<ContextType>,
    },
    /// Make a context current for its type
    Use { name: String },
    /// Clear the current context of a type
    Unset {
        #[arg(long = "type", value_enum)]
        context_type: ContextType,
    },
    /// Add a context
    Add(AddArgs),
    /// Delete a context
    #[command(alias = "rm")]
    Delete {
        name: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args)]
pub struct AddArgs {
    pub name: String,
    #[arg(long = "type", value_enum)]
    pub context_type: ContextType,
    #[arg(long)]
    pub endpoint: String,
    /// Kubeconfig path (k8s only)
    #[arg(long)]
    pub path: Option<String>,
    /// Context inside the kubeconfig (k8s only)
    #[arg(long)]
    pub kube_context: Option<String>,
    /// Mark the cluster as a management cluster (k8s only)
    #[arg(long)]
    pub management: bool,
    /// Make the new context current for its type
    #[arg(long)]
    pub current: bool,
}

#[derive(Subcommand)]
pub enum ServerCommand {
    /// Show the current server
    Current,
    /// List servers
    #[command(alias = "ls")]
    List,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

#[derive(Debug, Error)]
pub enum CmdError {
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Prompt(#[from] inquire::InquireError),
    #[error("failed to render output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to render output: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type CmdResult<T> = Result<T, CmdError>;

/// Prints `value` as JSON or YAML. `Table` is handled by each command.
pub(crate) fn print_structured<T: Serialize>(value: &T, format: OutputFormat) -> CmdResult<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml | OutputFormat::Table => print!("{}", serde_yaml::to_string(value)?),
    }
    Ok(())
}
