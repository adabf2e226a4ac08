use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "actprogress")]
#[command(about = "Reading progress across the acts of a serialized story", long_about = None)]
#[command(version)]
pub(crate) struct Cli {
    /// Config file. Default: ./actprogress.json (optional)
    #[arg(long, global = true)]
    pub(crate) config: Option<PathBuf>,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Compute progress for one page and print it.
    Show {
        /// Section table (acts.json)
        #[arg(long)]
        sections: Option<PathBuf>,
        /// Current page
        #[arg(long, allow_hyphen_values = true, conflicts_with = "source")]
        page: Option<String>,
        /// URL of a JSON document holding the current page
        #[arg(long)]
        source: Option<String>,
        /// Field of the source document holding the page
        #[arg(long)]
        field: Option<String>,
        /// Output JSON (full report)
        #[arg(long)]
        json: bool,
    },

    /// Serve progress as JSON over HTTP.
    Serve {
        /// Section table (acts.json)
        #[arg(long)]
        sections: Option<PathBuf>,
        /// URL of a JSON document holding the current page
        #[arg(long)]
        source: Option<String>,
        /// Field of the source document holding the page
        #[arg(long)]
        field: Option<String>,
        #[arg(long)]
        bind: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },

    /// Validate a section table.
    Check {
        /// Section table (acts.json)
        #[arg(long)]
        sections: Option<PathBuf>,
        /// Output JSON summary
        #[arg(long)]
        json: bool,
    },
}
