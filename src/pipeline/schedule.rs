use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::persist;
use async_trait::async_trait;
use chrono::NaiveDate;
use log::{info, warn};
use nba_stats_api::ScheduledGame;
use nba_stats_api::client::{ApiResult, NbaApi, parse_league_schedule};
use std::path::{Path, PathBuf};

/// Where game listings come from.
#[async_trait]
pub trait ScheduleSource: Send + Sync {
    /// Today's games from the low-latency feed.
    async fn todays_games(&self) -> ApiResult<Vec<ScheduledGame>>;
    /// Games on any calendar date, from the complete league schedule.
    async fn games_on(&self, day: NaiveDate) -> ApiResult<Vec<ScheduledGame>>;
}

#[async_trait]
impl ScheduleSource for NbaApi {
    async fn todays_games(&self) -> ApiResult<Vec<ScheduledGame>> {
        self.fetch_todays_scoreboard().await
    }

    async fn games_on(&self, day: NaiveDate) -> ApiResult<Vec<ScheduledGame>> {
        let games = self.fetch_league_schedule().await?;
        Ok(games_on_date(games, day))
    }
}

#[async_trait]
impl<T: ScheduleSource + ?Sized> ScheduleSource for &T {
    async fn todays_games(&self) -> ApiResult<Vec<ScheduledGame>> {
        (**self).todays_games().await
    }

    async fn games_on(&self, day: NaiveDate) -> ApiResult<Vec<ScheduledGame>> {
        (**self).games_on(day).await
    }
}

fn games_on_date(games: Vec<ScheduledGame>, day: NaiveDate) -> Vec<ScheduledGame> {
    games.into_iter().filter(|g| g.game_date == Some(day)).collect()
}

fn unique_ids(games: &[ScheduledGame]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::with_capacity(games.len());
    for game in games {
        if !ids.contains(&game.game_id) {
            ids.push(game.game_id.clone());
        }
    }
    ids
}

/// Game ids per date, read from a materialized schedule snapshot when one
/// exists and from the live schedule source otherwise. Lookups never write.
pub struct ScheduleCache<S> {
    snapshot: PathBuf,
    source: S,
}

impl<S: ScheduleSource> ScheduleCache<S> {
    pub fn new(snapshot: impl Into<PathBuf>, source: S) -> Self {
        Self { snapshot: snapshot.into(), source }
    }

    /// Ordered, de-duplicated game ids for `day`; empty when nothing is
    /// scheduled or no source could answer.
    pub async fn game_ids_for_date(&self, day: NaiveDate) -> Vec<String> {
        match self.snapshot_game_ids(day) {
            Ok(Some(ids)) => return ids,
            Ok(None) => info!("{day} not in schedule snapshot at {}, querying schedule source", self.snapshot.display()),
            Err(e) => warn!("unreadable schedule snapshot, querying schedule source: {e}"),
        }

        match self.source.games_on(day).await {
            Ok(games) => unique_ids(&games),
            Err(e) => {
                warn!("schedule lookup for {day} failed: {e}");
                Vec::new()
            }
        }
    }

    /// `Ok(None)` when no snapshot has been materialized or it has no games
    /// on `day`.
    pub fn snapshot_game_ids(&self, day: NaiveDate) -> PipelineResult<Option<Vec<String>>> {
        let text = match std::fs::read_to_string(&self.snapshot) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PipelineError::Io(e, self.snapshot.clone())),
        };
        let games = parse_league_schedule(&text).map_err(|e| PipelineError::Json(e, self.snapshot.clone()))?;
        let ids = unique_ids(&games_on_date(games, day));
        Ok((!ids.is_empty()).then_some(ids))
    }
}

/// Download the full league schedule and replace the snapshot at `path`.
/// Returns the number of games in the new snapshot.
pub async fn sync_snapshot(api: &NbaApi, path: &Path) -> PipelineResult<usize> {
    let document = api.fetch_league_schedule_document().await?;
    let games = parse_league_schedule(&document)
        .map_err(|e| PipelineError::Json(e, path.to_path_buf()))?
        .len();
    persist::write_atomic(path, document.as_bytes())?;
    info!("schedule snapshot refreshed: {games} games -> {}", path.display());
    Ok(games)
}
