//! Backend worker thread: owns the tokio runtime and the nickname controller.

use std::thread;

use client_core::{NicknameController, RemoveOutcome, SaveOutcome};
use crossbeam_channel::{Receiver, Sender};
use storage::SqliteKeyValueStore;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub struct BackendConfig {
    pub database_url: String,
    pub storage_key: String,
}

pub fn launch(config: BackendConfig, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::new(
                    UiErrorContext::BackendStartup,
                    format!("failed to build backend runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let store = match SqliteKeyValueStore::new(&config.database_url).await {
                Ok(store) => store,
                Err(err) => {
                    tracing::error!(
                        database_url = %config.database_url,
                        "failed to open nickname store: {err:#}"
                    );
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::new(
                        UiErrorContext::BackendStartup,
                        format!("could not open nickname storage: {err}"),
                    )));
                    return;
                }
            };
            let controller = NicknameController::new(store, config.storage_key);
            tracing::debug!("backend worker ready");

            while let Ok(cmd) = cmd_rx.recv() {
                let event = handle_command(&controller, cmd).await;
                if ui_tx.send(event).is_err() {
                    break;
                }
            }
            tracing::debug!("ui disconnected; backend worker stopping");
        });
    });
}

async fn handle_command(
    controller: &NicknameController<SqliteKeyValueStore>,
    cmd: BackendCommand,
) -> UiEvent {
    match cmd {
        BackendCommand::Load => UiEvent::Loaded(controller.load().await),
        BackendCommand::Save { candidate } => match controller.save(candidate).await {
            SaveOutcome::Saved => UiEvent::Saved,
            SaveOutcome::NeedsConfirmation(prompt) => UiEvent::SaveRejected(prompt),
            SaveOutcome::Failed(err) => {
                UiEvent::Error(UiError::new(UiErrorContext::Save, err.to_string()))
            }
        },
        BackendCommand::Remove => match controller.remove().await {
            RemoveOutcome::Removed => UiEvent::Removed,
            RemoveOutcome::Failed(err) => {
                UiEvent::Error(UiError::new(UiErrorContext::Remove, err.to_string()))
            }
        },
    }
}
