//! Clap derive structures for the `jujube` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// jujube -- query Juju application configuration from the command line
#[derive(Debug, Parser)]
#[command(
    name = "jujube",
    version,
    about = "Query a Juju controller using the local juju CLI's credentials",
    long_about = "A small client for Juju controllers.\n\n\
        Credentials are read from the locally installed juju CLI\n\
        (`juju show-controller --show-password`); the controller is then\n\
        queried directly over its websocket API.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Model UUID to scope the connection to
    #[arg(long, short = 'm', env = "JUJUBE_MODEL", global = true)]
    pub model: Option<String>,

    /// Output format
    #[arg(long, short = 'o', env = "JUJUBE_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Overall dial timeout in seconds
    #[arg(long, env = "JUJUBE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Delay between endpoint dial sweeps, in milliseconds
    #[arg(long, env = "JUJUBE_RETRY_DELAY_MS", global = true)]
    pub retry_delay_ms: Option<u64>,

    /// juju binary to invoke for credential discovery
    #[arg(long, env = "JUJUBE_JUJU_COMMAND", global = true)]
    pub juju_command: Option<PathBuf>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show an application's charm configuration
    #[command(alias = "cfg")]
    AppConfig(AppConfigArgs),

    /// Show the controller registered with the local juju CLI
    #[command(alias = "ctl")]
    Controller,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct AppConfigArgs {
    /// Application name as deployed in the model
    pub application: String,

    /// Branch (generation) to read configuration from
    #[arg(long, default_value = "")]
    pub branch: String,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
