//! CLI-owned settings: the TOML file, env overrides, and translation to
//! core types.
//!
//! Core never sees these types -- it receives pre-built dial options and
//! a `LocalJuju` handle. Resolution order is flag > env > file > default.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use jujube_core::{DialOptions, LocalJuju};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── TOML settings structs ────────────────────────────────────────────

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub defaults: Defaults,
    pub dial: DialSettings,
    pub juju: JujuSettings,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Defaults {
    /// Output format when -o is not given.
    pub output: String,

    /// Model UUID used when --model is not given.
    pub model: Option<String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: "table".into(),
            model: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct DialSettings {
    /// Overall dial timeout in seconds.
    pub timeout_secs: u64,

    /// Delay between endpoint dial sweeps, in milliseconds.
    pub retry_delay_ms: u64,
}

impl Default for DialSettings {
    fn default() -> Self {
        let dial = DialOptions::default();
        Self {
            timeout_secs: dial.timeout.as_secs(),
            retry_delay_ms: u64::try_from(dial.retry_delay.as_millis()).unwrap_or(1000),
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct JujuSettings {
    /// juju binary to invoke; defaults to `juju` on PATH.
    pub command: Option<PathBuf>,
}

// ── Settings file path ───────────────────────────────────────────────

/// Resolve the settings file path via XDG / platform conventions.
pub fn settings_path() -> PathBuf {
    ProjectDirs::from("dev", "jujube", "jujube")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("jujube");
            p.push("config.toml");
            p
        })
}

// ── Loading ──────────────────────────────────────────────────────────

/// Load settings from file + environment.
///
/// Environment keys use a double underscore between section and field,
/// e.g. `JUJUBE_DIAL__TIMEOUT_SECS`.
pub fn load_settings() -> Result<Settings, CliError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Settings::default()))
        .merge(Toml::file(settings_path()))
        .merge(Env::prefixed("JUJUBE_").split("__"));

    let settings: Settings = figment.extract()?;
    Ok(settings)
}

/// Load settings, falling back to defaults if the file is unreadable.
pub fn load_settings_or_default() -> Settings {
    load_settings().unwrap_or_default()
}

// ── Resolution against CLI flags ─────────────────────────────────────

impl Settings {
    /// Dial options with CLI flag overrides applied.
    pub fn dial_options(&self, global: &GlobalOpts) -> DialOptions {
        DialOptions {
            timeout: Duration::from_secs(global.timeout.unwrap_or(self.dial.timeout_secs)),
            retry_delay: Duration::from_millis(
                global.retry_delay_ms.unwrap_or(self.dial.retry_delay_ms),
            ),
        }
    }

    /// The effective output format.
    pub fn output_format(&self, global: &GlobalOpts) -> Result<OutputFormat, CliError> {
        if let Some(ref format) = global.output {
            return Ok(format.clone());
        }
        OutputFormat::from_str(&self.defaults.output, true).map_err(|_| CliError::Validation {
            field: "defaults.output".into(),
            reason: format!("unknown output format: {}", self.defaults.output),
        })
    }

    /// The effective model UUID, if any.
    pub fn model(&self, global: &GlobalOpts) -> Option<String> {
        global.model.clone().or_else(|| self.defaults.model.clone())
    }

    /// The juju binary to invoke.
    pub fn juju(&self, global: &GlobalOpts) -> LocalJuju {
        global
            .juju_command
            .clone()
            .or_else(|| self.juju.command.clone())
            .map_or_else(LocalJuju::default, LocalJuju::new)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
