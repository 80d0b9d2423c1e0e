//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Parent-linked tree editor: validated in-memory tree store with undo/redo
#[derive(Parser, Debug)]
#[command(name = "treestore")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Seed file with the initial nodes (JSON or TOML)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub seed: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the forest as a tree
    Show {
        /// Append ids to labels
        #[arg(long)]
        ids: bool,
    },

    /// Render the forest as a table
    Table,

    /// Show a single node
    Get {
        /// Node id
        id: String,
    },

    /// List children of a node
    Children {
        /// Node id
        id: String,
        /// Include all descendants (pre-order)
        #[arg(short, long)]
        all: bool,
    },

    /// List ancestors of a node, nearest first
    Ancestors {
        /// Node id
        id: String,
    },

    /// Edit interactively with undo/redo (commands from stdin)
    Edit {
        /// Read commands from a script file instead of stdin
        #[arg(long, value_hint = ValueHint::FilePath)]
        script: Option<PathBuf>,
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
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show config file locations
    Path,
    /// Print a commented template
    Template,
}
