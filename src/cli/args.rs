//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};

/// Build, view, and save binary search trees
#[derive(Parser, Debug)]
#[command(name = "bstv")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Config file (default: $XDG_CONFIG_HOME/bstv/bstv.toml)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format for trees.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// Single-line JSON
    Compact,
    /// Indented text tree
    Tree,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a tree locally and save it to history
    Build {
        /// Numbers, comma/space separated (none or "-" reads stdin)
        numbers: Vec<String>,
        /// Also build the height-balanced variant
        #[arg(short, long)]
        balanced: bool,
        /// Do not record the submission in history
        #[arg(long)]
        no_save: bool,
        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: Format,
    },

    /// Print the parsed numbers in normalized form
    Normalize {
        /// Numbers, comma/space separated (none or "-" reads stdin)
        numbers: Vec<String>,
    },

    /// Talk to the remote tree API
    Remote {
        #[command(subcommand)]
        command: RemoteCommands,
    },

    /// Manage saved trees
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum RemoteCommands {
    /// Build a tree on the server and print its response
    Create {
        /// Numbers, comma/space separated (none or "-" reads stdin)
        numbers: Vec<String>,
        /// Request the balanced variant as well
        #[arg(short, long)]
        balanced: bool,
    },

    /// List trees stored on the server
    List,
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommands {
    /// List saved trees, newest first
    List,

    /// Show the tree of a saved submission
    Show {
        /// Record id
        id: String,
        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: Format,
    },

    /// Send a saved submission to the remote API again
    Rerun {
        /// Record id
        id: String,
    },

    /// Delete one saved tree
    Delete {
        /// Record id
        id: String,
    },

    /// Delete all saved trees
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective config
    Show,

    /// Show config and data paths
    Path,

    /// Create config template
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
}
