//! # WASM Terminal
//!
//! Line-oriented shell for a WASM-backed terminal.
//!
//! ## Overview
//!
//! The binary:
//! - Loads settings from a YAML file (`--config <path>`)
//! - Builds a validated terminal configuration around a directory resolver
//! - Hosts the terminal in a console panel and toggles it visible
//! - Resolves each line read from stdin until EOF
//!
//! ## Architecture
//!
//! This is the top layer, tying together:
//! - wasm-terminal-core: configuration and command resolution contract
//! - wasm-terminal-panel: console panel state machine

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use wasm_terminal::{DirectoryResolver, Shell};
use wasm_terminal_core::{TerminalConfig, TerminalConfigRecord, TerminalSettings};
use wasm_terminal_panel::{ConsolePanel, PanelMessage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config_path = wasm_terminal::config_path(&args)?;

    let settings = match config_path {
        Some(path) => TerminalSettings::from_file(path)?,
        None => TerminalSettings::default(),
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(&settings.terminal.log_level)
            }),
        )
        .init();

    tracing::info!("WASM Terminal v{} starting...", env!("CARGO_PKG_VERSION"));

    let resolver = Arc::new(DirectoryResolver::new(settings.commands.clone()));
    let mut record = TerminalConfigRecord::new().command_resolver(resolver);
    if let Some(endpoint) = &settings.terminal.worker_endpoint {
        record = record.worker_endpoint(endpoint.clone());
    }
    let config = TerminalConfig::new(Some(record))?;

    // Host the session in a console panel
    let panel = ConsolePanel::new(config.clone());
    let (sender, messages) = ConsolePanel::channel();
    let (events_tx, mut events_rx) = mpsc::channel(16);
    let panel_task = tokio::spawn(panel.run(messages, events_tx));
    let events_task = tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(json) => tracing::debug!("Panel event: {}", json),
                Err(e) => tracing::warn!("Unserializable panel event: {}", e),
            }
        }
    });
    sender.send(PanelMessage::ToggleConsoleVisible).await?;

    let shell = Shell::new(config);
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        stdout.write_all(settings.terminal.prompt.as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match shell.execute(&line).await {
            Ok(Some(output)) => stdout.write_all(output.render().as_bytes()).await?,
            Ok(None) => {}
            Err(e) => {
                tracing::debug!("Command failed: {:?}", e);
                eprintln!("{e}");
            }
        }
    }

    tracing::info!("Input closed, shutting down");
    drop(sender);
    let panel = panel_task.await?;
    events_task.await?;
    tracing::info!(
        "WASM Terminal session {} finished (terminal attached: {})",
        panel.session(),
        panel.is_terminal_open()
    );

    Ok(())
}
