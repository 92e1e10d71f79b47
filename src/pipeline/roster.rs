use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::persist;
use async_trait::async_trait;
use chrono::NaiveDate;
use nba_stats_api::value_as_string;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// League snapshot: already-fetched fantasy platform objects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct League {
    #[serde(default)]
    pub teams: Vec<LeagueTeam>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeagueTeam {
    #[serde(default, alias = "teamId", deserialize_with = "opt_id")]
    pub team_id: Option<String>,
    #[serde(default, alias = "teamAbbrev", alias = "abbrev")]
    pub team_abbrev: Option<String>,
    #[serde(default, alias = "teamName", alias = "name")]
    pub team_name: Option<String>,
    #[serde(default)]
    pub owners: Vec<Owner>,
    #[serde(default)]
    pub roster: Vec<LeaguePlayer>,
}

/// Platforms send owners either as bare names or as profile objects.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Owner {
    Name(String),
    Profile {
        #[serde(default, alias = "displayName")]
        name: Option<String>,
    },
}

impl Owner {
    pub fn display(&self) -> &str {
        match self {
            Owner::Name(name) => name,
            Owner::Profile { name } => name.as_deref().unwrap_or("Unknown"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaguePlayer {
    #[serde(alias = "playerId", deserialize_with = "id")]
    pub player_id: String,
    pub name: String,
    #[serde(default, alias = "proTeam")]
    pub pro_team: Option<String>,
    #[serde(default, alias = "lineupSlot")]
    pub position: Option<String>,
}

fn id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let value = Value::deserialize(d)?;
    value_as_string(&value).ok_or_else(|| serde::de::Error::custom(format!("invalid player id: {value}")))
}

fn opt_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?.as_ref().and_then(value_as_string))
}

/// Read-only access to the league's current rosters.
#[async_trait]
pub trait RosterSource: Send + Sync {
    async fn fetch_teams(&self) -> PipelineResult<Vec<LeagueTeam>>;
}

#[async_trait]
impl<T: RosterSource + ?Sized> RosterSource for &T {
    async fn fetch_teams(&self) -> PipelineResult<Vec<LeagueTeam>> {
        (**self).fetch_teams().await
    }
}

/// Roster source backed by a league snapshot file exported by the
/// league-management tooling.
#[derive(Debug, Clone)]
pub struct JsonRosterSource {
    path: PathBuf,
}

impl JsonRosterSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RosterSource for JsonRosterSource {
    async fn fetch_teams(&self) -> PipelineResult<Vec<LeagueTeam>> {
        let league: League = persist::read_json(&self.path)?.ok_or_else(|| {
            PipelineError::Roster(format!("league snapshot not found at {}", self.path.display()))
        })?;
        Ok(league.teams)
    }
}

// ---------------------------------------------------------------------------
// Rostered players
// ---------------------------------------------------------------------------

/// A fantasy-platform player as the identity resolver sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerRecord {
    pub platform_player_id: String,
    pub display_name: String,
    pub team_abbreviation: Option<String>,
    pub resolved_stats_id: Option<i64>,
}

/// One rostered player plus the fantasy team holding them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterEntry {
    pub team_id: Option<String>,
    pub team_abbrev: Option<String>,
    pub team_name: Option<String>,
    pub owners: String,
    pub lineup_slot: Option<String>,
    pub player: PlayerRecord,
}

/// Flatten league teams into one entry per player. A player listed twice
/// keeps the first team seen.
pub fn extract_league_players(teams: &[LeagueTeam]) -> Vec<RosterEntry> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut entries = Vec::new();

    for team in teams {
        let owners = team.owners.iter().map(Owner::display).collect::<Vec<_>>().join(", ");
        for player in &team.roster {
            if !seen.insert(player.player_id.as_str()) {
                continue;
            }
            entries.push(RosterEntry {
                team_id: team.team_id.clone(),
                team_abbrev: team.team_abbrev.clone(),
                team_name: team.team_name.clone(),
                owners: owners.clone(),
                lineup_slot: player.position.clone(),
                player: PlayerRecord {
                    platform_player_id: player.player_id.clone(),
                    display_name: player.name.clone(),
                    team_abbreviation: player.pro_team.clone().filter(|t| !t.is_empty()),
                    resolved_stats_id: None,
                },
            });
        }
    }
    entries
}

// ---------------------------------------------------------------------------
// Frozen roster table
// ---------------------------------------------------------------------------

/// On-disk row of the frozen roster table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrozenRosterRow {
    pub team_id: Option<String>,
    pub team_abbrev: Option<String>,
    pub team_name: Option<String>,
    pub owners: String,
    pub player_id: String,
    pub player_name: String,
    pub pro_team: Option<String>,
    pub lineup_slot: Option<String>,
    pub nba_player_id: Option<i64>,
}

impl From<&RosterEntry> for FrozenRosterRow {
    fn from(e: &RosterEntry) -> Self {
        Self {
            team_id: e.team_id.clone(),
            team_abbrev: e.team_abbrev.clone(),
            team_name: e.team_name.clone(),
            owners: e.owners.clone(),
            player_id: e.player.platform_player_id.clone(),
            player_name: e.player.display_name.clone(),
            pro_team: e.player.team_abbreviation.clone(),
            lineup_slot: e.lineup_slot.clone(),
            nba_player_id: e.player.resolved_stats_id,
        }
    }
}

impl From<FrozenRosterRow> for RosterEntry {
    fn from(r: FrozenRosterRow) -> Self {
        Self {
            team_id: r.team_id,
            team_abbrev: r.team_abbrev,
            team_name: r.team_name,
            owners: r.owners,
            lineup_slot: r.lineup_slot,
            player: PlayerRecord {
                platform_player_id: r.player_id,
                display_name: r.player_name,
                team_abbreviation: r.pro_team,
                resolved_stats_id: r.nba_player_id,
            },
        }
    }
}

/// Per-date frozen roster tables under one directory. Tables are written
/// once and never rewritten.
#[derive(Debug, Clone)]
pub struct FrozenRosterStore {
    dir: PathBuf,
}

impl FrozenRosterStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("roster_{date}.csv"))
    }

    pub fn exists(&self, date: NaiveDate) -> bool {
        self.path_for(date).exists()
    }

    pub fn save(&self, date: NaiveDate, entries: &[RosterEntry]) -> PipelineResult<PathBuf> {
        let path = self.path_for(date);
        let rows: Vec<FrozenRosterRow> = entries.iter().map(FrozenRosterRow::from).collect();
        persist::write_csv(&path, &rows)?;
        Ok(path)
    }

    pub fn load(&self, date: NaiveDate) -> PipelineResult<Vec<RosterEntry>> {
        let path = self.path_for(date);
        let rows: Vec<FrozenRosterRow> =
            persist::read_csv(&path)?.ok_or_else(|| PipelineError::MissingRoster(path.clone()))?;
        Ok(rows.into_iter().map(RosterEntry::from).collect())
    }
}

/// Stats-provider ids of every resolved rostered player.
pub fn roster_ids(entries: &[RosterEntry]) -> HashSet<i64> {
    entries.iter().filter_map(|e| e.player.resolved_stats_id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::persist::testing::scratch_dir;

    const LEAGUE: &str = r#"{"teams": [
        {"team_id": 1, "team_abbrev": "HOOP", "team_name": "Hoopers",
         "owners": [{"name": "Ana"}, {"displayName": "Luis"}, {}],
         "roster": [
            {"playerId": 3112335, "name": "Nikola Jokić", "proTeam": "DEN", "position": "C"},
            {"playerId": "1966", "name": "LeBron James", "proTeam": "LAL", "position": "SF"}
         ]},
        {"team_id": "2", "team_abbrev": "DUNK", "team_name": "Dunkers",
         "owners": ["Maria"],
         "roster": [
            {"playerId": 1966, "name": "LeBron James", "proTeam": "LAL", "position": "UTIL"},
            {"playerId": 4065648, "name": "Jayson Tatum", "proTeam": "", "position": "SF"}
         ]}
    ]}"#;

    #[test]
    fn league_players_are_flattened_and_deduplicated() {
        let league: League = serde_json::from_str(LEAGUE).unwrap();
        let entries = extract_league_players(&league.teams);

        let ids: Vec<&str> = entries.iter().map(|e| e.player.platform_player_id.as_str()).collect();
        assert_eq!(ids, vec!["3112335", "1966", "4065648"]);

        assert_eq!(entries[0].owners, "Ana, Luis, Unknown");
        assert_eq!(entries[0].team_id.as_deref(), Some("1"));
        assert_eq!(entries[1].team_abbrev.as_deref(), Some("HOOP"), "first team seen wins");
        assert_eq!(entries[2].owners, "Maria");
        assert_eq!(entries[2].player.team_abbreviation, None);
    }

    #[test]
    fn frozen_roster_round_trips_through_the_table() {
        let dir = scratch_dir("roster-table");
        let store = FrozenRosterStore::new(&dir);
        let date = NaiveDate::from_ymd_opt(2024, 10, 22).unwrap();
        let league: League = serde_json::from_str(LEAGUE).unwrap();
        let mut entries = extract_league_players(&league.teams);
        entries[0].player.resolved_stats_id = Some(203999);

        assert!(!store.exists(date));
        let path = store.save(date, &entries).unwrap();
        assert!(path.ends_with("roster_2024-10-22.csv"));

        let loaded = store.load(date).unwrap();
        assert_eq!(loaded, entries);
        assert_eq!(roster_ids(&loaded), HashSet::from([203999]));
    }

    #[test]
    fn missing_frozen_roster_is_a_precondition_error() {
        let store = FrozenRosterStore::new(scratch_dir("roster-missing"));
        let date = NaiveDate::from_ymd_opt(2024, 10, 22).unwrap();
        assert!(matches!(store.load(date), Err(PipelineError::MissingRoster(_))));
    }

    #[tokio::test]
    async fn json_roster_source_reads_the_snapshot() {
        let dir = scratch_dir("roster-source");
        let path = dir.join("league.json");
        std::fs::write(&path, LEAGUE).unwrap();

        let teams = JsonRosterSource::new(&path).fetch_teams().await.unwrap();
        assert_eq!(teams.len(), 2);

        let missing = JsonRosterSource::new(dir.join("nope.json")).fetch_teams().await;
        assert!(matches!(missing, Err(PipelineError::Roster(_))));
    }
}
