//! Command dispatch: bridges CLI args -> core calls -> output formatting.

pub mod app_config;
pub mod controller_cmd;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;
use crate::settings::Settings;

/// Dispatch a command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    global: &GlobalOpts,
    settings: &Settings,
) -> Result<(), CliError> {
    match cmd {
        Command::AppConfig(args) => app_config::handle(args, global, settings).await,
        Command::Controller => controller_cmd::handle(global, settings).await,
        // Completions are handled before dispatch
        Command::Completions(_) => unreachable!(),
    }
}
