//! `app-config`: fetch one application's charm configuration.
//!
//! The full flow of the tool: load credentials from the local juju CLI
//! (fatal on failure), connect scoped to the model, query, render.

use owo_colors::OwoColorize;
use tabled::Tabled;
use uuid::Uuid;

use jujube_core::{ApplicationGetResults, Controller};

use crate::cli::{AppConfigArgs, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;
use crate::settings::{self, Settings};

pub async fn handle(
    args: AppConfigArgs,
    global: &GlobalOpts,
    settings: &Settings,
) -> Result<(), CliError> {
    let format = settings.output_format(global)?;

    let model = settings.model(global).ok_or_else(|| CliError::NoModel {
        path: settings::settings_path().display().to_string(),
    })?;
    let model_uuid = Uuid::parse_str(&model).map_err(|_| CliError::Validation {
        field: "model".into(),
        reason: format!("not a model UUID: {model}"),
    })?;

    let mut controller = Controller::with_dial_options(settings.dial_options(global));
    // A failed credential load is fatal -- connecting without fresh
    // configuration would dial with nothing.
    controller.configure_with(&settings.juju(global)).await?;

    let results = controller
        .application_config(&model_uuid.to_string(), &args.application, &args.branch)
        .await?;

    let color = output::should_color(&global.color);
    let rendered = render(&format, &results, color);
    output::print_output(&rendered, global.quiet);
    Ok(())
}

// ── Rendering ────────────────────────────────────────────────────────

#[derive(Debug, Tabled)]
struct ConfigRow {
    #[tabled(rename = "OPTION")]
    option: String,
    #[tabled(rename = "TYPE")]
    kind: String,
    #[tabled(rename = "SOURCE")]
    source: String,
    #[tabled(rename = "VALUE")]
    value: String,
}

fn render(format: &OutputFormat, results: &ApplicationGetResults, color: bool) -> String {
    output::render_single(
        format,
        results,
        |r| detail_view(r, color),
        |r| {
            let mut names: Vec<String> = r.config.keys().cloned().collect();
            names.sort();
            names.join("\n")
        },
    )
}

/// Header line plus an option table, for interactive use.
fn detail_view(results: &ApplicationGetResults, color: bool) -> String {
    let header = if color {
        format!(
            "{}  {}",
            results.application.bold(),
            format!("charm: {}", results.charm).dimmed()
        )
    } else {
        format!("{}  charm: {}", results.application, results.charm)
    };

    let rows = config_rows(results);
    if rows.is_empty() {
        return format!("{header}\n(no configuration options)");
    }

    format!("{header}\n{}", output::render_table(&rows))
}

fn config_rows(results: &ApplicationGetResults) -> Vec<ConfigRow> {
    let mut rows: Vec<ConfigRow> = results
        .config
        .iter()
        .map(|(name, descriptor)| ConfigRow {
            option: name.clone(),
            kind: descriptor["type"].as_str().unwrap_or_default().to_string(),
            source: descriptor["source"].as_str().unwrap_or_default().to_string(),
            value: display_value(&descriptor["value"]),
        })
        .collect();
    rows.sort_by(|a, b| a.option.cmp(&b.option));
    rows
}

/// Config values keep their charm-declared type; strings render bare,
/// everything else as compact JSON.
fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "-".into(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ── Tests ────────────────────────────────────────────────────────────
