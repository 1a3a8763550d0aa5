//! `controller`: show what the local juju CLI knows about its
//! controller. Runs the credential loader only -- no network I/O.

use owo_colors::OwoColorize;
use serde::Serialize;

use jujube_core::ControllerDocument;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;
use crate::settings::Settings;

pub async fn handle(global: &GlobalOpts, settings: &Settings) -> Result<(), CliError> {
    let format = settings.output_format(global)?;

    let (name, document) = settings.juju(global).show_controller().await?;
    let view = ControllerView::build(name, &document);

    let color = output::should_color(&global.color);
    let rendered = output::render_single(
        &format,
        &view,
        |v| detail_view(v, color),
        |v| v.name.clone(),
    );
    output::print_output(&rendered, global.quiet);
    Ok(())
}

// ── View ─────────────────────────────────────────────────────────────

/// Renderable controller summary. The account password never enters
/// this type.
#[derive(Debug, Serialize)]
struct ControllerView {
    name: String,
    uuid: String,
    cloud: String,
    region: String,
    agent_version: String,
    api_endpoints: Vec<String>,
    current_model: String,
    user: String,
    access: String,
    models: Vec<ModelView>,
}

#[derive(Debug, Serialize)]
struct ModelView {
    name: String,
    uuid: String,
    unit_count: u64,
}

impl ControllerView {
    fn build(name: String, document: &ControllerDocument) -> Self {
        Self {
            name,
            uuid: document.details.uuid.clone(),
            cloud: document.details.cloud.clone(),
            region: document.details.region.clone(),
            agent_version: document.details.agent_version.clone(),
            api_endpoints: document.details.api_endpoints.clone(),
            current_model: document.current_model.clone(),
            user: document.account.user.clone(),
            access: document.account.access.clone(),
            models: document
                .models
                .iter()
                .map(|(model_name, summary)| ModelView {
                    name: model_name.clone(),
                    uuid: summary.uuid.clone(),
                    unit_count: summary.unit_count,
                })
                .collect(),
        }
    }
}

fn detail_view(view: &ControllerView, color: bool) -> String {
    let label = |text: &str| {
        if color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    };

    let mut lines = vec![
        format!("{} {}", label("controller:"), view.name),
        format!("{} {}", label("uuid:"), view.uuid),
        format!("{} {}/{}", label("cloud:"), view.cloud, view.region),
        format!("{} {}", label("agent-version:"), view.agent_version),
        format!("{} {}", label("endpoints:"), view.api_endpoints.join(", ")),
        format!("{} {} ({})", label("account:"), view.user, view.access),
        format!("{} {}", label("current-model:"), view.current_model),
    ];

    if !view.models.is_empty() {
        lines.push(label("models:"));
        for model in &view.models {
            lines.push(format!(
                "  {} ({}, {} units)",
                model.name, model.uuid, model.unit_count
            ));
        }
    }

    lines.join("\n")
}

// ── Tests ────────────────────────────────────────────────────────────
