use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use backend_bridge::{commands::BackendCommand, runtime::BackendConfig};
use clap::Parser;
use client_core::config;
use controller::events::UiEvent;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Args {
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    database_url: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut settings = config::load_settings(args.config.as_deref());
    if let Some(database_url) = args.database_url {
        settings.database_url = database_url;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .init();

    let database_url = config::prepare_database_url(&settings.database_url)?;
    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(16);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(64);
    backend_bridge::runtime::launch(
        BackendConfig {
            database_url,
            storage_key: settings.storage_key,
        },
        cmd_rx,
        ui_tx,
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Nickname")
            .with_inner_size([420.0, 360.0])
            .with_min_inner_size([360.0, 280.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Nickname",
        options,
        Box::new(|_cc| Ok(Box::new(ui::NicknameApp::new(cmd_tx, ui_rx)))),
    )
    .map_err(|err| anyhow::anyhow!("failed to run nickname window: {err}"))
}
