//! autogui-mcp: desktop automation MCP server over stdio

use std::sync::Arc;

use anyhow::{Context, Result};
use autogui_core::{
    automation::Automator,
    backend::{AutomationBackend, DesktopBackend},
    model::Capabilities,
    util::detect::detect_session,
};
use autogui_mcp_server::{config::Cli, mcp::AutoguiMcpServer};
use clap::Parser;
use rmcp::{ServiceExt, transport::stdio};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the protocol, so logs go to stderr
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("autogui_mcp_server=info,autogui_core=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .init();

    let cli = Cli::parse();
    let config = cli
        .automation_config()
        .context("Invalid automation configuration")?;

    info!("autogui-mcp server starting...");
    let session = detect_session();
    info!(
        "Platform: {} (display: {})",
        session.platform.os, session.platform.display
    );
    if let Some(warning) = session.input_warning() {
        warn!("{}", warning);
    }

    let desktop = DesktopBackend::new().context("Failed to initialise the desktop backend")?;
    let backend = AutomationBackend::from_desktop(Arc::new(desktop));

    info!(
        "Failsafe: {}, pause: {:.3}s, screenshots: {}",
        if config.failsafe { "enabled" } else { "disabled" },
        config.pause.as_secs_f64(),
        config.screenshot_dir.display()
    );

    let automator = Automator::new(backend, Arc::new(config), Capabilities::detect());
    info!("Backend initialized: {}", automator.backend_name());
    if automator.capabilities().confidence_matching {
        info!("Image matching available: confidence is honoured by locate tools");
    } else {
        warn!(
            "Image matching not compiled in (feature `image-matching`); locate tools use exact \
             matching and ignore confidence"
        );
    }

    let server = AutoguiMcpServer::new(automator);

    info!("Initializing stdio transport...");
    let service = server.serve(stdio()).await?;
    info!("autogui-mcp server initialized, waiting for MCP requests...");

    service.waiting().await?;

    info!("autogui-mcp server shutting down");
    Ok(())
}
