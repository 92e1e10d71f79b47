//! Daily roster freeze.
//!
//! Two transitions per calendar day, each run by its own invocation:
//! the schedule step records the freeze deadline (first tip-off plus an
//! offset) and the day's game ids; the freeze step, once the deadline has
//! passed, snapshots the league roster and marks the day processed. The
//! freeze file is the only coordination between the two and the processed
//! flag guarantees the roster is taken at most once.

use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::identity::matcher::NameIndex;
use crate::pipeline::identity::store::IdentityStore;
use crate::pipeline::identity::{IdentityResolver, PlayerDirectory};
use crate::pipeline::persist;
use crate::pipeline::retry::RetryPolicy;
use crate::pipeline::roster::{FrozenRosterStore, RosterSource, extract_league_players};
use crate::pipeline::schedule::ScheduleSource;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use log::{debug, error, info, warn};
use nba_stats_api::ScheduledGame;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// On-disk shape of the freeze file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreezeRecord {
    pub date: NaiveDate,
    #[serde(default, alias = "freeze_deadline")]
    pub freeze_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_game_utc: Option<DateTime<Utc>>,
    #[serde(default)]
    pub game_ids: Vec<String>,
    #[serde(default)]
    pub processed: bool,
}

/// What the schedule step captured about one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreezeDay {
    pub date: NaiveDate,
    pub first_tipoff: Option<DateTime<Utc>>,
    pub game_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FreezeState {
    /// No freeze file yet.
    NotScheduled,
    /// Waiting for the deadline; the roster has not been taken.
    Scheduled { day: FreezeDay, deadline: DateTime<Utc> },
    /// Roster taken, or nothing to freeze that day (no deadline).
    Processed { day: FreezeDay, deadline: Option<DateTime<Utc>> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreezeAction {
    Missing,
    AlreadyProcessed,
    Wait { deadline: DateTime<Utc> },
    Freeze,
}

impl FreezeState {
    pub fn from_record(record: Option<FreezeRecord>) -> Self {
        let Some(record) = record else {
            return FreezeState::NotScheduled;
        };
        let day = FreezeDay {
            date: record.date,
            first_tipoff: record.first_game_utc,
            game_ids: record.game_ids,
        };
        match (record.processed, record.freeze_time) {
            (true, deadline) => FreezeState::Processed { day, deadline },
            (false, Some(deadline)) => FreezeState::Scheduled { day, deadline },
            (false, None) => {
                warn!("freeze file for {} has no deadline, treating the day as having no games", day.date);
                FreezeState::Processed { day, deadline: None }
            }
        }
    }

    pub fn to_record(&self) -> Option<FreezeRecord> {
        let (day, deadline, processed) = match self {
            FreezeState::NotScheduled => return None,
            FreezeState::Scheduled { day, deadline } => (day, Some(*deadline), false),
            FreezeState::Processed { day, deadline } => (day, *deadline, true),
        };
        Some(FreezeRecord {
            date: day.date,
            freeze_time: deadline,
            first_game_utc: day.first_tipoff,
            game_ids: day.game_ids.clone(),
            processed,
        })
    }

    pub fn day(&self) -> Option<&FreezeDay> {
        match self {
            FreezeState::NotScheduled => None,
            FreezeState::Scheduled { day, .. } | FreezeState::Processed { day, .. } => Some(day),
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.day().map(|d| d.date)
    }

    /// A day recorded with nothing to freeze.
    pub fn is_empty_day(&self) -> bool {
        matches!(self, FreezeState::Processed { day, deadline: None } if day.game_ids.is_empty())
    }

    pub fn next_action(&self, now: DateTime<Utc>) -> FreezeAction {
        match self {
            FreezeState::NotScheduled => FreezeAction::Missing,
            FreezeState::Processed { .. } => FreezeAction::AlreadyProcessed,
            FreezeState::Scheduled { deadline, .. } if now < *deadline => FreezeAction::Wait { deadline: *deadline },
            FreezeState::Scheduled { .. } => FreezeAction::Freeze,
        }
    }

    pub fn into_processed(self) -> Self {
        match self {
            FreezeState::Scheduled { day, deadline } => FreezeState::Processed { day, deadline: Some(deadline) },
            other => other,
        }
    }
}

/// Plan a day from its games. The date is the first tip-off's calendar day
/// in the league's local offset; a day without any tip-off time is recorded
/// as already processed with no games.
pub fn plan(
    today: NaiveDate,
    games: &[ScheduledGame],
    freeze_offset: chrono::Duration,
    utc_offset: FixedOffset,
) -> FreezeState {
    let Some(first) = games.iter().filter_map(|g| g.tipoff).min() else {
        return FreezeState::Processed {
            day: FreezeDay { date: today, first_tipoff: None, game_ids: Vec::new() },
            deadline: None,
        };
    };

    let mut game_ids: Vec<String> = Vec::with_capacity(games.len());
    for game in games {
        if !game_ids.contains(&game.game_id) {
            game_ids.push(game.game_id.clone());
        }
    }

    FreezeState::Scheduled {
        day: FreezeDay {
            date: first.with_timezone(&utc_offset).date_naive(),
            first_tipoff: Some(first),
            game_ids,
        },
        deadline: first.checked_add_signed(freeze_offset).unwrap_or_else(|| {
            warn!("freeze offset {freeze_offset} overflows from {first}, freezing at tip-off");
            first
        }),
    }
}

/// The freeze file.
#[derive(Debug, Clone)]
pub struct FreezeStore {
    path: PathBuf,
}

impl FreezeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> PipelineResult<FreezeState> {
        Ok(FreezeState::from_record(persist::read_json(&self.path)?))
    }

    pub fn save(&self, state: &FreezeState) -> PipelineResult<()> {
        match state.to_record() {
            Some(record) => persist::write_json(&self.path, &record),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleOutcome {
    /// Today already has a plan; nothing was written.
    Unchanged(FreezeState),
    Planned(FreezeState),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FreezeOutcome {
    AlreadyProcessed,
    Waiting { deadline: DateTime<Utc> },
    Frozen { date: NaiveDate, players: usize, resolved: usize },
}

pub struct FreezeScheduler<S> {
    store: FreezeStore,
    schedule: S,
    retry: RetryPolicy,
    freeze_offset: chrono::Duration,
    utc_offset: FixedOffset,
}

impl<S: ScheduleSource> FreezeScheduler<S> {
    pub fn new(store: FreezeStore, schedule: S, freeze_offset: chrono::Duration, utc_offset: FixedOffset) -> Self {
        Self { store, schedule, retry: RetryPolicy::default(), freeze_offset, utc_offset }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Record today's deadline and game ids. A day that already has a plan
    /// is left alone, except that a no-games record is replaced once games
    /// show up.
    pub async fn schedule_step(&self, now: DateTime<Utc>) -> PipelineResult<ScheduleOutcome> {
        let today = now.with_timezone(&self.utc_offset).date_naive();
        let existing = self.store.load()?;
        let same_day = existing.date() == Some(today);
        if same_day && !existing.is_empty_day() {
            info!("freeze for {today} already planned");
            return Ok(ScheduleOutcome::Unchanged(existing));
        }

        let games = self.games_for(today).await;
        let planned = plan(today, &games, self.freeze_offset, self.utc_offset);
        if same_day && planned.is_empty_day() {
            info!("still no games for {today}");
            return Ok(ScheduleOutcome::Unchanged(existing));
        }

        self.store.save(&planned)?;
        match &planned {
            FreezeState::Scheduled { day, deadline } => {
                info!("freeze for {} at {deadline}, {} games", day.date, day.game_ids.len())
            }
            _ => info!("no games on {today}, nothing to freeze"),
        }
        Ok(ScheduleOutcome::Planned(planned))
    }

    /// Live scoreboard first; on failure the league schedule, retried.
    async fn games_for(&self, today: NaiveDate) -> Vec<ScheduledGame> {
        match self.schedule.todays_games().await {
            Ok(games) => return games,
            Err(e) => warn!("live scoreboard failed, falling back to league schedule: {e}"),
        }
        self.retry
            .run("league schedule", |_| self.schedule.games_on(today))
            .await
            .unwrap_or_else(|e| {
                error!("no schedule for {today} after {} attempts: {e}", self.retry.attempts);
                Vec::new()
            })
    }

    /// Take the roster if the deadline has passed and the day is not yet
    /// processed. The processed flag is written only after the roster.
    pub async fn freeze_step<R, D, St>(
        &self,
        now: DateTime<Utc>,
        freezer: &RosterFreezer<R, D, St>,
    ) -> PipelineResult<FreezeOutcome>
    where
        R: RosterSource,
        D: PlayerDirectory,
        St: IdentityStore,
    {
        let state = self.store.load()?;
        match state.next_action(now) {
            FreezeAction::Missing => Err(PipelineError::MissingFreezeState(self.store.path.clone())),
            FreezeAction::AlreadyProcessed => Ok(FreezeOutcome::AlreadyProcessed),
            FreezeAction::Wait { deadline } => Ok(FreezeOutcome::Waiting { deadline }),
            FreezeAction::Freeze => {
                let date = state.date().ok_or_else(|| PipelineError::MissingFreezeState(self.store.path.clone()))?;
                let snapshot = freezer.snapshot(date).await?;
                if !snapshot.written {
                    info!("kept the existing roster for {date}, marking the day processed");
                }
                self.store.save(&state.into_processed())?;
                Ok(FreezeOutcome::Frozen { date, players: snapshot.players, resolved: snapshot.resolved })
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterSnapshot {
    pub players: usize,
    pub resolved: usize,
    pub written: bool,
}

/// Fetches the league roster, resolves stats ids and writes the frozen
/// roster table for a date.
pub struct RosterFreezer<R, D, St> {
    roster: R,
    directory: D,
    identity: St,
    threshold: u8,
    rosters: FrozenRosterStore,
}

impl<R: RosterSource, D: PlayerDirectory, St: IdentityStore> RosterFreezer<R, D, St> {
    pub fn new(roster: R, directory: D, identity: St, threshold: u8, rosters: FrozenRosterStore) -> Self {
        Self { roster, directory, identity, threshold, rosters }
    }

    /// An existing table for `date` is kept as is.
    pub async fn snapshot(&self, date: NaiveDate) -> PipelineResult<RosterSnapshot> {
        if self.rosters.exists(date) {
            let existing = self.rosters.load(date)?;
            warn!("frozen roster for {date} already exists, keeping it");
            return Ok(RosterSnapshot {
                players: existing.len(),
                resolved: existing.iter().filter(|e| e.player.resolved_stats_id.is_some()).count(),
                written: false,
            });
        }

        let teams = self.roster.fetch_teams().await?;
        let mut entries = extract_league_players(&teams);
        let index = NameIndex::from_players(self.directory.players().await?);
        if index.is_empty() {
            warn!("player directory is empty, only cached ids will resolve");
        } else {
            debug!("matching against {} canonical names", index.len());
        }
        let resolver = IdentityResolver::new(&self.identity, index, self.threshold);
        let summary = resolver.resolve_in_place(entries.iter_mut().map(|e| &mut e.player))?;

        let path = self.rosters.save(date, &entries)?;
        info!("wrote {} rostered players to {}", entries.len(), path.display());
        Ok(RosterSnapshot { players: entries.len(), resolved: summary.resolved(), written: true })
    }
}
