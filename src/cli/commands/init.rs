use std::fs;

use anyhow::{Context, Result};

use super::super::args::InitCommand;
use super::{CommandResult, CommandSummary, InitSummary, helper::finish};
use crate::config::{CONFIG_FILE_NAME, default_config_json};

pub fn init(cmd: InitCommand) -> Result<CommandResult> {
    let config_path = cmd.common.root.join(CONFIG_FILE_NAME);

    let created = if config_path.exists() {
        tracing::debug!(path = %config_path.display(), "config file already exists");
        None
    } else {
        fs::write(&config_path, default_config_json()?)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        Some(config_path)
    };

    Ok(finish(
        CommandSummary::Init(InitSummary { created }),
        Vec::new(),
        0,
    ))
}
