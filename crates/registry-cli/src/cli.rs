//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Component Registry - versioned configuration for agents, teams, and workflows
#[derive(Parser, Debug)]
#[command(name = "registry")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Content root holding the declarative component trees
    #[arg(long, global = true, default_value = ".", env = "REGISTRY_ROOT")]
    pub root: PathBuf,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Register a new component version from a declarative file
    ///
    /// The file's declared identity and version seed the store.
    ///
    /// Examples:
    ///   registry create agents/demo/config.yaml --type agent --activate
    Create {
        /// Path to the declarative YAML file
        file: PathBuf,

        /// Component type (agent, team, or workflow)
        #[arg(short = 't', long = "type")]
        component_type: String,

        /// Make this the active version
        #[arg(long)]
        activate: bool,

        /// Who is creating the version
        #[arg(long, default_value = "cli")]
        by: String,

        /// Free-form description stored with the version
        #[arg(short, long)]
        description: Option<String>,
    },

    /// List all versions of a component, newest first
    List {
        /// Component identity
        component_id: String,

        /// Include deprecated versions
        #[arg(long)]
        include_deprecated: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show one version's config document
    Show {
        /// Component identity
        component_id: String,

        /// Version number
        version: u32,
    },

    /// Make a version the single active one for its component
    Activate {
        /// Component identity
        component_id: String,

        /// Version number to activate
        version: u32,

        /// Who is activating
        #[arg(long, default_value = "cli")]
        by: String,

        /// Why the version is being activated
        #[arg(short, long)]
        reason: Option<String>,
    },

    /// Soft-delete a version (the active version cannot be deprecated)
    Deprecate {
        /// Component identity
        component_id: String,

        /// Version number to deprecate
        version: u32,

        /// Who is deprecating
        #[arg(long, default_value = "cli")]
        by: String,

        /// Why the version is being deprecated
        #[arg(short, long)]
        reason: Option<String>,
    },

    /// Copy a version's config into a new, inactive version
    Clone {
        /// Component identity
        component_id: String,

        /// Version to copy from
        source: u32,

        /// Version to create
        target: u32,

        /// Who is cloning
        #[arg(long, default_value = "cli")]
        by: String,

        /// Free-form description stored with the new version
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Replace a version's config payload in place
    UpdateConfig {
        /// Component identity
        component_id: String,

        /// Version whose config is replaced
        version: u32,

        /// Path to a YAML document with the new payload
        file: PathBuf,

        /// Who is updating
        #[arg(long, default_value = "cli")]
        by: String,

        /// Why the config is being replaced
        #[arg(short, long)]
        reason: Option<String>,
    },

    /// Show the audit trail for a component
    History {
        /// Component identity
        component_id: String,

        /// Limit to one version
        #[arg(long)]
        version: Option<u32>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Resolve a component's config (active version unless one is given)
    Resolve {
        /// Component identity
        component_id: String,

        /// Exact version (defaults to the active version)
        #[arg(long)]
        version: Option<u32>,
    },

    /// Reconcile declarative files with the version store
    ///
    /// Without a component identity the whole content root is synced.
    Sync {
        /// Sync just one component
        component_id: Option<String>,

        /// Preview changes without applying them
        #[arg(long)]
        dry_run: bool,

        /// Output as JSON for CI/CD integration
        #[arg(long)]
        json: bool,
    },
}
