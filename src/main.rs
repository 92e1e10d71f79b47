mod error;
mod jobs;
mod pipeline;
mod settings;

use crate::settings::Settings;
use anyhow::Context;
use chrono::NaiveDate;
use log::info;
use nba_stats_api::client::NbaApi;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Schedule,
    Freeze,
    Stats { date: Option<NaiveDate> },
    SyncSchedule,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let Some(command) = handle_cli_args() else {
        return Ok(());
    };

    better_panic::install();
    init_logging();

    let settings = Settings::load();
    let api = NbaApi::new().with_timeout(settings.http_timeout);
    info!("{command:?} (data dir {})", settings.data_dir.display());

    match command {
        Command::Schedule => jobs::run_schedule(&settings, &api).await.context("schedule step failed")?,
        Command::Freeze => jobs::run_freeze(&settings, &api).await.context("freeze step failed")?,
        Command::Stats { date } => jobs::run_stats(&settings, &api, date)
            .await
            .context("stats extraction failed")?,
        Command::SyncSchedule => jobs::run_sync_schedule(&settings, &api)
            .await
            .context("schedule snapshot refresh failed")?,
    }
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

/// `None` when the invocation was fully handled here (help, version).
fn handle_cli_args() -> Option<Command> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match parse_args(&args) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("{message}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn parse_args(args: &[String]) -> Result<Option<Command>, String> {
    let Some((first, rest)) = args.split_first() else {
        return Err("Missing command".to_owned());
    };

    let command = match first.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            return Ok(None);
        }
        "-V" | "--version" => {
            println!("fantasyxi {}", env!("CARGO_PKG_VERSION"));
            return Ok(None);
        }
        "schedule" => Command::Schedule,
        "freeze" => Command::Freeze,
        "sync-schedule" => Command::SyncSchedule,
        "stats" => {
            return match rest {
                [] => Ok(Some(Command::Stats { date: None })),
                [flag, value] if flag == "--date" => parse_date(value).map(|date| Some(Command::Stats { date: Some(date) })),
                [arg] => match arg.strip_prefix("--date=") {
                    Some(value) => parse_date(value).map(|date| Some(Command::Stats { date: Some(date) })),
                    None => Err(format!("Unknown argument: {arg}")),
                },
                _ => Err(format!("Unexpected arguments: {}", rest.join(" "))),
            };
        }
        other => return Err(format!("Unknown argument: {other}")),
    };

    match rest.first() {
        Some(arg) => Err(format!("Unknown argument: {arg}")),
        None => Ok(Some(command)),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| format!("Invalid date {raw:?}, expected YYYY-MM-DD"))
}

fn usage_text() -> &'static str {
    "fantasyxi - daily fantasy basketball roster freeze and stats ingestion

Usage:
  fantasyxi schedule                 Record today's freeze deadline and game ids
  fantasyxi freeze                   Snapshot the league roster once the deadline passed
  fantasyxi stats [--date YYYY-MM-DD]
                                     Build the rostered players' stats table
  fantasyxi sync-schedule            Refresh the local league schedule snapshot
  fantasyxi --help
  fantasyxi --version

Environment:
  FANTASYXI_DATA_DIR               Output root (default data/processed)
  FANTASYXI_LEAGUE_JSON            League roster snapshot (default <data dir>/league.json)
  FANTASYXI_PLAYERS_JSON           Local player directory; fetched from the stats service when unset
  FANTASYXI_SEASON                 Season for the player directory (default 2024-25)
  FANTASYXI_FUZZY_THRESHOLD        Fuzzy name match threshold, 0-100 (default 90)
  FANTASYXI_FREEZE_OFFSET_MINUTES  Minutes after first tip-off to freeze (default 4)
  FANTASYXI_UTC_OFFSET_HOURS       League-local UTC offset (default -4)
  FANTASYXI_HTTP_TIMEOUT_SECS      Per-request timeout (default 60)
  RUST_LOG                         Log filter (default info)"
}
