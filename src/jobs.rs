//! The daily jobs, each one invocation of the binary.

use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::aggregate::DailyStatsAggregator;
use crate::pipeline::boxscore::BoxscoreFetcher;
use crate::pipeline::freeze::{FreezeOutcome, FreezeScheduler, FreezeStore, RosterFreezer, ScheduleOutcome};
use crate::pipeline::identity::store::JsonFileStore;
use crate::pipeline::identity::{LocalDirectory, PlayerDirectory, RemoteDirectory};
use crate::pipeline::roster::{FrozenRosterStore, JsonRosterSource, roster_ids};
use crate::pipeline::schedule::{ScheduleCache, sync_snapshot};
use crate::settings::Settings;
use chrono::{NaiveDate, Utc};
use log::{debug, info, warn};
use nba_stats_api::client::NbaApi;

fn scheduler(settings: &Settings, api: &NbaApi) -> FreezeScheduler<NbaApi> {
    FreezeScheduler::new(
        FreezeStore::new(settings.freeze_path()),
        api.clone(),
        settings.freeze_offset,
        settings.utc_offset,
    )
}

pub async fn run_schedule(settings: &Settings, api: &NbaApi) -> PipelineResult<()> {
    let (ScheduleOutcome::Unchanged(state) | ScheduleOutcome::Planned(state)) =
        scheduler(settings, api).schedule_step(Utc::now()).await?;
    debug!("freeze state: {state:?}");
    Ok(())
}

pub async fn run_freeze(settings: &Settings, api: &NbaApi) -> PipelineResult<()> {
    match &settings.players_json {
        Some(path) => freeze_with(settings, api, LocalDirectory::new(path)).await,
        None => freeze_with(settings, api, RemoteDirectory::new(api.clone(), &settings.season)).await,
    }
}

async fn freeze_with<D: PlayerDirectory>(settings: &Settings, api: &NbaApi, directory: D) -> PipelineResult<()> {
    let freezer = RosterFreezer::new(
        JsonRosterSource::new(&settings.league_json),
        directory,
        JsonFileStore::new(settings.identity_cache_path()),
        settings.fuzzy_threshold,
        FrozenRosterStore::new(settings.roster_dir()),
    );
    match scheduler(settings, api).freeze_step(Utc::now(), &freezer).await? {
        FreezeOutcome::AlreadyProcessed => info!("roster already frozen for today"),
        FreezeOutcome::Waiting { deadline } => info!("freeze deadline {deadline} not reached"),
        FreezeOutcome::Frozen { date, players, resolved } => {
            info!("roster frozen for {date}: {resolved} of {players} players resolved")
        }
    }
    Ok(())
}

/// Build and persist the stats table for `date`, or for the frozen day when
/// no date is given. Game ids captured at schedule time are preferred over a
/// fresh schedule lookup.
pub async fn run_stats(settings: &Settings, api: &NbaApi, date: Option<NaiveDate>) -> PipelineResult<()> {
    let freeze = FreezeStore::new(settings.freeze_path()).load()?;
    let (date, captured) = match (date, freeze.day()) {
        (Some(date), Some(day)) if day.date == date => (date, day.game_ids.clone()),
        (Some(date), _) => (date, Vec::new()),
        (None, Some(day)) => (day.date, day.game_ids.clone()),
        (None, None) => return Err(PipelineError::MissingFreezeState(settings.freeze_path())),
    };

    let roster = FrozenRosterStore::new(settings.roster_dir()).load(date)?;
    let ids = roster_ids(&roster);
    if ids.len() < roster.len() {
        warn!("{} rostered players have no stats id and will be skipped", roster.len() - ids.len());
    }

    let game_ids = if captured.is_empty() {
        ScheduleCache::new(settings.schedule_snapshot_path(), api.clone())
            .game_ids_for_date(date)
            .await
    } else {
        captured
    };

    let aggregator = DailyStatsAggregator::new(BoxscoreFetcher::from_api(api.clone()));
    let table = aggregator.aggregate(date, &game_ids, &ids).await;
    if table.is_empty() {
        warn!("no stats for {date}, nothing written");
        return Ok(());
    }
    let path = table.save(&settings.stats_dir())?;
    info!("wrote {} rows to {}", table.rows.len(), path.display());
    Ok(())
}

pub async fn run_sync_schedule(settings: &Settings, api: &NbaApi) -> PipelineResult<()> {
    sync_snapshot(api, &settings.schedule_snapshot_path()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::freeze::{FreezeDay, FreezeState};
    use crate::pipeline::persist::testing::scratch_dir;
    use crate::pipeline::roster::{PlayerRecord, RosterEntry};
    use nba_stats_api::BoxscoreRow;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, 22).unwrap()
    }

    fn entry(id: Option<i64>) -> RosterEntry {
        RosterEntry {
            team_id: Some("1".into()),
            team_abbrev: Some("HOOP".into()),
            team_name: Some("Hoopers".into()),
            owners: "Ana".into(),
            lineup_slot: Some("C".into()),
            player: PlayerRecord {
                platform_player_id: format!("p{}", id.unwrap_or_default()),
                display_name: "Someone".into(),
                team_abbreviation: Some("DEN".into()),
                resolved_stats_id: id,
            },
        }
    }

    fn processed_day(game_ids: &[&str]) -> FreezeState {
        FreezeState::Processed {
            day: FreezeDay {
                date: day(),
                first_tipoff: None,
                game_ids: game_ids.iter().map(|g| g.to_string()).collect(),
            },
            deadline: None,
        }
    }

    #[tokio::test]
    async fn stats_without_freeze_file_or_date_is_fatal() {
        let settings = Settings::with_data_dir(scratch_dir("jobs-no-freeze"));
        let err = run_stats(&settings, &NbaApi::new(), None).await.unwrap_err();
        assert!(matches!(err, PipelineError::MissingFreezeState(_)));
    }

    #[tokio::test]
    async fn stats_without_frozen_roster_is_fatal_and_writes_nothing() {
        let settings = Settings::with_data_dir(scratch_dir("jobs-no-roster"));
        FreezeStore::new(settings.freeze_path()).save(&processed_day(&["g1"])).unwrap();

        let err = run_stats(&settings, &NbaApi::new(), None).await.unwrap_err();
        assert!(matches!(err, PipelineError::MissingRoster(_)));
        assert!(!settings.stats_dir().exists());
    }

    #[tokio::test]
    async fn stats_use_captured_game_ids_and_keep_rostered_players() {
        let mut server = mockito::Server::new_async().await;
        let live = server
            .mock("GET", "/static/json/liveData/boxscore/boxscore_0022400061.json")
            .with_status(200)
            .with_body(
                r#"{"game": {"gameId": "0022400061", "homeTeam": {"teamTricode": "DEN", "players": [
                    {"personId": 203999, "name": "Nikola Jokic", "statistics": {"points": 29, "reboundsTotal": 13, "minutesCalculated": "PT36M"}},
                    {"personId": 1, "name": "Bench Guy", "statistics": {"points": 2, "minutesCalculated": "PT5M"}}
                ]}}}"#,
            )
            .create_async()
            .await;

        let settings = Settings::with_data_dir(scratch_dir("jobs-stats"));
        FreezeStore::new(settings.freeze_path()).save(&processed_day(&["0022400061"])).unwrap();
        FrozenRosterStore::new(settings.roster_dir())
            .save(day(), &[entry(Some(203999)), entry(None)])
            .unwrap();

        let api = NbaApi::new().with_base_urls(server.url(), server.url());
        run_stats(&settings, &api, None).await.unwrap();
        live.assert_async().await;

        let path = settings.stats_dir().join("2024-10").join("stats_2024-10-22.csv");
        let rows: Vec<BoxscoreRow> = crate::pipeline::persist::read_csv(&path).unwrap().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].player_id, Some(203999));
        assert_eq!(rows[0].pts, Some(29));
    }

    #[tokio::test]
    async fn empty_stats_are_not_persisted() {
        let settings = Settings::with_data_dir(scratch_dir("jobs-empty"));
        FreezeStore::new(settings.freeze_path()).save(&processed_day(&[])).unwrap();
        FrozenRosterStore::new(settings.roster_dir()).save(day(), &[entry(Some(203999))]).unwrap();
        std::fs::create_dir_all(settings.schedule_snapshot_path().parent().unwrap()).unwrap();
        std::fs::write(settings.schedule_snapshot_path(), r#"{"leagueSchedule": {"gameDates": []}}"#).unwrap();

        run_stats(&settings, &NbaApi::new(), None).await.unwrap();
        assert!(!settings.stats_dir().exists());
    }
}
