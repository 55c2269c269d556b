//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Register short names for your scripts and run them from anywhere
#[derive(Parser, Debug)]
#[command(name = "tb")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose logging to stderr (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Store file (default: from config, TBIRD_STORE_PATH, or the data dir)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register a script under a name
    Create {
        /// Alias name (with --inherit: the script path)
        name: String,
        /// Script to run
        #[arg(value_hint = ValueHint::FilePath)]
        path: Option<PathBuf>,
        /// Replace an existing alias of the same name
        #[arg(short, long)]
        overwrite: bool,
        /// Take the name from the script's package.json (or directory name)
        #[arg(short, long)]
        inherit: bool,
    },

    /// List registered aliases
    List,

    /// Find aliases by name (regular expression or plain text)
    Search {
        /// Pattern matched against alias names
        query: String,
    },

    /// Point an alias at a different script
    UpdatePath {
        /// Alias name
        name: String,
        /// New script path
        #[arg(value_hint = ValueHint::FilePath)]
        new_path: PathBuf,
    },

    /// Rename an alias
    UpdateName {
        /// Current alias name
        name: String,
        /// New alias name
        new_name: String,
    },

    /// Remove an alias
    Remove {
        /// Alias name
        name: String,
    },

    /// Run an alias (`tb <name> [params...]` is short for this)
    ///
    /// Everything after the alias name goes to the script untouched,
    /// including `--`, `--help` and tb's own flags.
    Run {
        /// Alias name followed by the script's arguments
        #[arg(
            required = true,
            num_args = 1..,
            trailing_var_arg = true,
            value_name = "NAME [PARAMS]"
        )]
        argv: Vec<String>,
    },

    /// Set a store setting; no value removes it
    Set {
        /// Setting key
        key: String,
        /// Setting value
        value: Option<String>,
        /// Parse the value as JSON (numbers, objects, ...)
        #[arg(long)]
        json: bool,
    },

    /// Show a store setting
    Get {
        /// Setting key
        key: String,
    },

    /// Register every script in a directory under its file name
    Use {
        /// Directory to scan
        #[arg(value_hint = ValueHint::DirPath)]
        directory: Option<PathBuf>,
        /// Replace existing aliases of the same name
        #[arg(short, long)]
        overwrite: bool,
    },

    /// Show the store location and contents
    Store {
        /// Show the effective tool configuration instead
        #[arg(long)]
        config: bool,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// `tb <name> [params...]`
    #[command(external_subcommand)]
    External(Vec<String>),
}
