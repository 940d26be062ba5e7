//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};

/// Asset panorama layout: lay out group hierarchies and drive the canvas viewport
#[derive(Parser, Debug)]
#[command(name = "assetmap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug level: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Extra config file layered over the global one
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Session arguments shared by the commands that open a panorama.
#[derive(Args, Debug, Clone, Default)]
pub struct SessionArgs {
    /// Group dump (JSON array of group trees); defaults to `data_file` from config
    #[arg(value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    /// Group to focus (default: first group with assets)
    #[arg(short, long)]
    pub group: Option<String>,

    /// Collapse every business node before applying --toggle
    #[arg(long)]
    pub collapse_all: bool,

    /// Toggle expand state of a business node; repeatable, applied in order
    #[arg(short, long = "toggle", value_name = "NODE_ID")]
    pub toggle: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Cells and viewport as JSON
    #[default]
    Json,
    /// One line per cell
    Text,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List top-level groups
    Groups {
        /// Group dump; defaults to `data_file` from config
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Lay out a group and print the resulting cells
    Layout {
        #[command(flatten)]
        session: SessionArgs,

        /// Zoom to an absolute multiple after rendering
        #[arg(long, conflicts_with = "fit")]
        zoom: Option<f64>,

        /// Fit all cells into the viewport after rendering
        #[arg(long)]
        fit: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Show the visible tree of a group
    Tree {
        #[command(flatten)]
        session: SessionArgs,
    },

    /// Reveal a node: expand its ancestors and center on it
    Search {
        #[command(flatten)]
        session: SessionArgs,

        /// Node to reveal
        #[arg(long)]
        node: String,

        /// Slash-separated ancestor ids of the node
        #[arg(long)]
        path: String,
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
    /// Show merged config
    Show,

    /// Print config template
    Template,

    /// Show config paths
    Path,
}
