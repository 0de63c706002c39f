//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Organization chart editor: import flat records, edit them as a tree, export them back
#[derive(Parser, Debug)]
#[command(name = "orgtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file overlaid on the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the chart as a tree
    Tree {
        /// Chart file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Collapse the node with this id (repeatable)
        #[arg(long)]
        collapse: Vec<String>,
    },

    /// Print the renderer tree as JSON
    Display {
        /// Chart file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Collapse the node with this id (repeatable)
        #[arg(long)]
        collapse: Vec<String>,
        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Normalize a chart: drop isolated members, order parents before reports
    Export {
        /// Chart file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Output file (default: stdout)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Add a member
    Add {
        /// Chart file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
        /// Manager id (default: new top-level member)
        #[arg(long)]
        parent: Option<String>,
        /// Explicit id (default: generated)
        #[arg(long)]
        id: Option<String>,
        /// Output file (default: overwrite chart file)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Change a member's fields or manager
    Update {
        /// Chart file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Member id
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
        /// New manager id
        #[arg(long, conflicts_with = "root")]
        parent: Option<String>,
        /// Make the member top-level
        #[arg(long)]
        root: bool,
        /// Output file (default: overwrite chart file)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Remove a member with everyone reporting to them
    Delete {
        /// Chart file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Member id
        id: String,
        /// Output file (default: overwrite chart file)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// List valid managers for a member (all members if no id is given)
    Parents {
        /// Chart file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Member id
        id: Option<String>,
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
    /// Show global config file path
    Path,
    /// Print a commented config template
    Template,
}
