use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

/// Generate a static page listing your GitHub repositories and their languages
#[derive(Parser)]
#[command(name = "reposite")]
#[command(version, propagate_version = true)]
#[command(about = "Generate a static page listing your GitHub repositories and their languages")]
pub struct Cli {
    /// Output format for command reports (defaults to output.format from the config)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Config file; relative cache and output paths resolve against its directory
    #[arg(short, long, global = true, env = "REPOSITE_CONFIG")]
    pub config: Option<PathBuf>,

    /// GitHub token (overrides api.token)
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// GitHub account whose repositories are listed (overrides site.account)
    #[arg(long, global = true)]
    pub account: Option<String>,

    /// Show debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Defaults to `build`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Print shell completions to stdout
    pub fn print_completions(shell: Shell) {
        let mut cmd = Self::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
    }
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Colored, human-readable output
    #[default]
    Pretty,
    /// JSON output for scripting
    Json,
}

impl OutputFormat {
    /// Parse the `output.format` config value
    pub fn from_config(value: &str) -> Self {
        match value {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch anything not yet cached, then render the site
    #[command(alias = "b")]
    Build(BuildArgs),

    /// Fetch the repository list and language maps into the cache
    #[command(alias = "f")]
    Fetch,

    /// Render the site from the cache without network access
    #[command(alias = "r")]
    Render(BuildArgs),

    /// Manage local cache
    Cache(CacheArgs),

    /// Manage configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the build and render commands
#[derive(Args, Default)]
pub struct BuildArgs {
    /// Also print the rendered HTML to stdout
    #[arg(long)]
    pub stdout: bool,
}

/// Arguments for the cache command
#[derive(Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommands,
}

/// Cache subcommands
#[derive(Subcommand)]
pub enum CacheCommands {
    /// Show what is cached
    Status,
    /// Delete cached data so the next run fetches it again
    Clear {
        /// Only forget this repository's languages
        #[arg(long)]
        repo: Option<String>,
    },
}

/// Arguments for the config command
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Config subcommands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., site.account)
        key: String,
        /// Value to set
        value: String,
    },
    /// Show configuration file path
    Path,
    /// Initialize configuration interactively
    Init,
}

/// Arguments for the completions command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}
