//! Command line interface of `workflow-admin`, built with clap.
//!
//! [`Cli`] carries the global `--config` and `--verbose` flags and one
//! [`Command`]: `serve`, `routes` or `menu`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Workflow transitions for an admin panel, served over HTTP.
#[derive(Debug, Parser)]
#[command(name = "workflow-admin", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (defaults to ./workflow-admin.toml when present).
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serves the pull request admin over HTTP.
    Serve {
        /// Address to listen on; overrides the configuration.
        #[arg(long)]
        bind: Option<String>,
    },

    /// Lists the admin's routes, including the transition-apply route.
    Routes,

    /// Prints the tab menu rendered for a pull request.
    Menu {
        /// Pull request id.
        id: String,

        /// Admin action the menu is rendered for.
        #[arg(long, default_value = "edit")]
        action: String,

        /// Print the menu as JSON instead of a tree.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}
