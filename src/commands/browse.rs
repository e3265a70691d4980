use std::path::Path;
use std::sync::Arc;

use crate::catalog::AcrClient;
use crate::config::Config;
use crate::error::{BrowserError, Result};
use crate::pull::docker_available;

/// Open the registry browser
///
/// Resolves the configuration (prompting on first run), builds the catalog
/// client and runs the TUI until the user quits. Creates its own tokio
/// runtime, so it must not be called from within another async context.
pub fn cmd_browse(config_path: Option<&Path>) -> Result<()> {
    use crate::tui::BrowserTui;
    use iocraft::prelude::*;

    let config = Config::resolve(config_path)?;
    let client = Arc::new(AcrClient::from_config(&config)?);
    let pull_enabled = docker_available();
    if !pull_enabled {
        tracing::warn!("docker not found on PATH, pull disabled");
    }
    tracing::debug!(registry = %config.registry, pull_enabled, "starting browser");

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| BrowserError::Tui(format!("Failed to create runtime: {e}")))?;

    rt.block_on(async {
        element!(BrowserTui(
            registry: config.registry.clone(),
            client: Some(client),
            pull_enabled: pull_enabled,
        ))
        .fullscreen()
        .await
        .map_err(|e| BrowserError::Tui(format!("TUI error: {e}")))
    })
}
