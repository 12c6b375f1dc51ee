use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use client_core::{config, NicknameController, RemoveOutcome, SaveOutcome};
use serde::Serialize;
use shared::domain::{ConfirmChoice, ConfirmationPrompt, Nickname};
use storage::SqliteKeyValueStore;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "nickname", about = "Store, greet and forget a nickname")]
struct Cli {
    /// Settings file, defaults to ./nickname.toml
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    database_url: Option<String>,
    /// Storage key the nickname is kept under
    #[arg(long)]
    key: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Show {
        #[arg(long)]
        json: bool,
    },
    Save {
        nickname: Option<String>,
    },
    Delete,
}

#[derive(Debug, Serialize)]
struct ShowReport {
    nickname: Option<String>,
    heading: String,
    updated_at: Option<DateTime<Utc>>,
    diverged: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let mut settings = config::load_settings(cli.config.as_deref());
    if let Some(database_url) = cli.database_url {
        settings.database_url = database_url;
    }
    if let Some(key) = cli.key {
        settings.storage_key = key;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let database_url = config::prepare_database_url(&settings.database_url)?;
    let store = SqliteKeyValueStore::new(&database_url)
        .await
        .with_context(|| format!("failed to open nickname store at '{database_url}'"))?;
    let controller = NicknameController::new(store, settings.storage_key);
    controller.load().await;

    let succeeded = match cli.command {
        Command::Show { json } => {
            show(&controller, json).await?;
            !controller.is_diverged().await
        }
        Command::Save { nickname } => {
            let outcome = controller.save(Nickname::from(nickname)).await;
            if let SaveOutcome::NeedsConfirmation(prompt) = &outcome {
                let choice = confirm(prompt).await?;
                prompt.resolve(choice);
            }
            println!("{}", controller.heading().await);
            !matches!(outcome, SaveOutcome::Failed(_))
        }
        Command::Delete => {
            let outcome = controller.remove().await;
            println!("{}", controller.heading().await);
            outcome == RemoveOutcome::Removed
        }
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn show(controller: &NicknameController<SqliteKeyValueStore>, json: bool) -> Result<()> {
    let snapshot = controller.snapshot().await;
    if !json {
        println!("{}", snapshot.heading());
        return Ok(());
    }

    let updated_at = match controller.store().updated_at(controller.key()).await {
        Ok(updated_at) => updated_at,
        Err(err) => {
            tracing::warn!("failed to read nickname timestamp: {err}");
            None
        }
    };
    let report = ShowReport {
        heading: snapshot.heading().to_string(),
        nickname: snapshot.nickname.into(),
        updated_at,
        diverged: snapshot.diverged,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Blocks on stdin until the user picks one of the prompt's choices.
async fn confirm(prompt: &ConfirmationPrompt) -> Result<ConfirmChoice> {
    let labels: Vec<&str> = prompt.choices.iter().map(|choice| choice.label()).collect();
    eprintln!("{}: {}", prompt.title, prompt.message);
    eprint!("[{}] ", labels.join("/"));

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("failed to read confirmation choice")?;
    Ok(parse_choice(&line))
}

fn parse_choice(input: &str) -> ConfirmChoice {
    match input.trim().to_ascii_lowercase().as_str() {
        "c" | "cancel" => ConfirmChoice::Cancel,
        _ => ConfirmChoice::Ok,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cancel_and_defaults_to_ok() {
        assert_eq!(parse_choice("Cancel\n"), ConfirmChoice::Cancel);
        assert_eq!(parse_choice(" c "), ConfirmChoice::Cancel);
        assert_eq!(parse_choice("ok"), ConfirmChoice::Ok);
        assert_eq!(parse_choice(""), ConfirmChoice::Ok);
    }

    #[test]
    fn parses_save_without_argument_as_absent_candidate() {
        let cli = Cli::try_parse_from(["nickname", "save"]).expect("parse");
        match cli.command {
            Command::Save { nickname } => assert_eq!(Nickname::from(nickname), Nickname::Absent),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_overrides_precede_subcommand() {
        let cli = Cli::try_parse_from([
            "nickname",
            "--database-url",
            "sqlite::memory:",
            "--key",
            "@handle",
            "show",
            "--json",
        ])
        .expect("parse");
        assert_eq!(cli.database_url.as_deref(), Some("sqlite::memory:"));
        assert_eq!(cli.key.as_deref(), Some("@handle"));
        assert!(matches!(cli.command, Command::Show { json: true }));
    }

    #[test]
    fn report_serializes_absent_nickname_as_null() {
        let report = ShowReport {
            nickname: None,
            heading: Nickname::Absent.heading().to_string(),
            updated_at: None,
            diverged: false,
        };
        let value = serde_json::to_value(&report).expect("json");
        assert_eq!(value["nickname"], serde_json::Value::Null);
        assert_eq!(value["heading"], "Create your nickname");
    }
}
