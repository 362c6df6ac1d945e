// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Nikki Diary driver
//!
//! Line-oriented front-end over the diary core: log in with a
//! username, record activities, list and filter them, export rows for
//! a spreadsheet sink. Rendering stays plain text; everything of
//! substance lives in the library.

use std::io::Write as _;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nikki_diary::config::{Config, StorageBackend};
use nikki_diary::db::{FirestoreStore, LocalFileStore, SnapshotStore};
use nikki_diary::services::diary::{self, DateFilter};
use nikki_diary::session::Session;
use nikki_diary::time_utils;

const EXPORT_PATH: &str = "diary_export.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::from_env()?;
    let store = build_store(&config).await?;
    tracing::info!(backend = ?config.backend, "Starting Nikki Diary");

    println!("Nikki Diary - type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut session: Option<Session> = None;

    prompt(session.as_ref())?;
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            prompt(session.as_ref())?;
            continue;
        }
        if line == "quit" || line == "exit" {
            break;
        }

        if let Err(e) = dispatch(&line, &mut session, &store, &config, &mut lines).await {
            println!("error: {}", e);
        }
        prompt(session.as_ref())?;
    }

    if let Some(active) = session.take() {
        active.logout();
    }
    Ok(())
}

async fn dispatch(
    line: &str,
    session: &mut Option<Session>,
    store: &Arc<dyn SnapshotStore>,
    config: &Config,
    lines: &mut Lines<BufReader<Stdin>>,
) -> anyhow::Result<()> {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    match command {
        "help" => print_help(),
        "login" => {
            if let Some(previous) = session.take() {
                previous.logout();
            }
            let new_session = Session::login(store.clone(), config, rest).await?;
            println!("Logged in as {}.", new_session.username());
            *session = Some(new_session);
        }
        "logout" => match session.take() {
            Some(active) => {
                println!("Goodbye, {}.", active.username());
                active.logout();
            }
            None => println!("Not logged in."),
        },
        "add" => {
            let active = require_session(session)?;
            let (date, start, end, description) = split_activity_args(rest)?;
            let activity = active.add_activity(date, start, end, description)?;
            println!("Added {} [{}].", activity.description, activity.id);
        }
        "edit" => {
            let active = require_session(session)?;
            let (id, rest) = rest
                .split_once(' ')
                .ok_or_else(|| anyhow::anyhow!("usage: edit <id> <date> <start> <end> <description>"))?;
            let (date, start, end, description) = split_activity_args(rest.trim())?;
            let activity = active.update_activity(id, date, start, end, description)?;
            println!("Updated {} [{}].", activity.description, activity.id);
        }
        "delete" => {
            let active = require_session(session)?;
            let id = rest;
            if id.is_empty() {
                anyhow::bail!("usage: delete <id>");
            }
            print!("Delete this activity? [y/N] ");
            std::io::stdout().flush()?;
            let answer = lines.next_line().await?.unwrap_or_default();
            if matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
                active.delete_activity(id)?;
                println!("Deleted.");
            } else {
                println!("Kept.");
            }
        }
        "list" => {
            let active = require_session(session)?;
            let filter = parse_filter(rest);
            print_activities(&active.filtered(&filter));
        }
        "dates" => {
            let active = require_session(session)?;
            for date in active.unique_dates() {
                println!("{}  {}", date, time_utils::format_date_label(&date));
            }
        }
        "export" => {
            let active = require_session(session)?;
            let filter = parse_filter(rest);
            let rows = active.export_rows(&filter);
            let json = serde_json::to_vec_pretty(&rows)?;
            tokio::fs::write(EXPORT_PATH, json).await?;
            println!("Wrote {} rows to {}.", rows.len(), EXPORT_PATH);
        }
        "state" => {
            let active = require_session(session)?;
            println!("{:?}", active.sync_state());
        }
        _ => println!("Unknown command {:?}; type 'help'.", command),
    }

    Ok(())
}

fn require_session<'a>(session: &'a Option<Session>) -> anyhow::Result<&'a Session> {
    session
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("not logged in; use 'login <username>'"))
}

/// Split `<date> <start> <end> <description...>`; the description keeps
/// its internal whitespace.
fn split_activity_args(rest: &str) -> anyhow::Result<(&str, &str, &str, &str)> {
    let mut parts = rest.splitn(4, ' ');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(date), Some(start), Some(end), Some(description)) if !description.trim().is_empty() => {
            Ok((date, start, end, description.trim()))
        }
        _ => anyhow::bail!("usage: <date> <start> <end> <description>"),
    }
}

fn parse_filter(arg: &str) -> DateFilter {
    if arg.is_empty() {
        DateFilter::All
    } else {
        DateFilter::from_arg(arg)
    }
}

fn print_activities(records: &[nikki_diary::models::Activity]) {
    if records.is_empty() {
        println!("No activities.");
        return;
    }
    for (date, group) in diary::group_by_date(records) {
        println!("{}", time_utils::format_date_label(&date));
        for activity in group {
            println!(
                "  {}-{}  {}  [{}]",
                activity.start_time, activity.end_time, activity.description, activity.id
            );
        }
    }
}

fn print_help() {
    println!(
        "\
login <username>                          start a session
logout                                    end the session
add <date> <start> <end> <description>    add an activity (e.g. add 2024-01-10 09:00 10:00 Gym)
edit <id> <date> <start> <end> <desc>     edit an activity
delete <id>                               delete an activity (asks first)
list [date|all]                           list activities, optionally for one date
dates                                     list dates that have activities
export [date|all]                         write export rows to {EXPORT_PATH}
state                                     show sync state
quit                                      exit"
    );
}

fn prompt(session: Option<&Session>) -> std::io::Result<()> {
    match session {
        Some(active) => print!("{}> ", active.username()),
        None => print!("> "),
    }
    std::io::stdout().flush()
}

async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn SnapshotStore>> {
    match config.backend {
        StorageBackend::Firestore => {
            let store = FirestoreStore::connect(
                &config.gcp_project_id,
                Duration::from_secs(config.poll_interval_secs),
            )
            .await?;
            Ok(Arc::new(store))
        }
        StorageBackend::Local => Ok(Arc::new(LocalFileStore::new(config.data_dir.clone()))),
    }
}

/// Initialize structured logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("nikki_diary=debug".parse().unwrap())
                .add_directive("warn".parse().unwrap()),
        )
        .with(format)
        .init();
}
