use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use newsdesk_core::StorageFormat;

#[derive(Parser)]
#[command(name = "newsdesk")]
#[command(about = "Category taxonomy tools for the newsdesk CMS")]
#[command(version)]
pub struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Base directory (default: ~/.newsdesk)
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

/// Category representation
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    /// Numeric id (e.g. 321)
    Id,
    /// Url path or legacy alias (e.g. news/localnews)
    Path,
    /// Full name (e.g. "News > Local")
    Hierarchical,
    /// Leaf label (e.g. "Local")
    Display,
}

impl From<Kind> for StorageFormat {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Id => StorageFormat::Id,
            Kind::Path => StorageFormat::Path,
            Kind::Hierarchical => StorageFormat::Hierarchical,
            Kind::Display => StorageFormat::Display,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the category tree
    Tree,

    /// Resolve a stored or routed category value
    Resolve {
        /// Value to resolve (id, url path, hierarchical or display name)
        value: String,

        /// Representation the value is in
        #[arg(short, long, value_enum, default_value = "path")]
        kind: Kind,
    },

    /// Resolve router segments (/category/:category/:subcategory/:subsubcategory)
    Url {
        /// First segment (e.g. lifestyle)
        category: Option<String>,

        /// Second segment (e.g. food-and-wine)
        subcategory: Option<String>,

        /// Third segment (e.g. restaurant-reviews)
        subsubcategory: Option<String>,
    },

    /// Show category picker rows
    Picker,

    /// Show every routable path and alias with its category id
    Routes,

    /// Print the stored value for a category
    Serialize {
        /// Category id
        id: u32,

        /// Representation to emit (default: storage.format from config)
        #[arg(short, long, value_enum)]
        format: Option<Kind>,
    },

    /// Upgrade the category fields of exported posts (JSON array)
    Migrate {
        /// Posts export file
        input: PathBuf,

        /// Write upgraded posts here (default: overwrite input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Dry run (report only, write nothing)
        #[arg(short, long)]
        dry_run: bool,
    },

    /// Validate the taxonomy with the configured routing
    Validate,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g., storage.format)
        key: String,
    },

    /// Set a config value
    Set {
        /// Config key (e.g., routing.deprecated_aliases)
        key: String,

        /// Value to set (e.g., "news/local" or "theatre=32,reviews=321")
        value: String,
    },

    /// List all config values
    List,

    /// Show config file path
    Path,

    /// Initialize config file with defaults
    Init,
}
