/// NBA CDN raw wire types: serde shapes for the low-latency JSON feeds
/// (today's scoreboard, live boxscores, full league schedule).
/// Mapped to domain types by the fns in client.rs.
use serde::Deserialize;

use crate::{lenient_f64, lenient_i64, lenient_string, lenient_u32};

// ---------------------------------------------------------------------------
// Today's scoreboard  (liveData/scoreboard)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScoreboardResponse {
    pub scoreboard: Option<Scoreboard>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Scoreboard {
    #[serde(rename = "gameDate")]
    pub game_date: Option<String>, // "2024-10-22"
    pub games: Option<Vec<ScoreboardGame>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScoreboardGame {
    #[serde(rename = "gameId")]
    pub game_id: Option<String>,
    #[serde(rename = "gameTimeUTC")]
    pub game_time_utc: Option<String>, // "2024-10-22T23:30:00Z"
    #[serde(rename = "gameStatus", default, deserialize_with = "lenient_u32")]
    pub game_status: Option<u32>, // 1 scheduled, 2 live, 3 final
    #[serde(rename = "homeTeam")]
    pub home_team: Option<TeamRef>,
    #[serde(rename = "awayTeam")]
    pub away_team: Option<TeamRef>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct TeamRef {
    #[serde(rename = "teamTricode")]
    pub team_tricode: Option<String>,
}

// ---------------------------------------------------------------------------
// Full league schedule  (staticData/scheduleLeagueV2)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct LeagueScheduleResponse {
    #[serde(rename = "leagueSchedule")]
    pub league_schedule: Option<LeagueSchedule>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct LeagueSchedule {
    #[serde(rename = "seasonYear")]
    pub season_year: Option<String>,
    #[serde(rename = "gameDates")]
    pub game_dates: Option<Vec<ScheduleGameDate>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScheduleGameDate {
    #[serde(rename = "gameDate")]
    pub game_date: Option<String>, // "10/22/2024 00:00:00"
    pub games: Option<Vec<ScheduleGame>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScheduleGame {
    #[serde(rename = "gameId")]
    pub game_id: Option<String>,
    #[serde(rename = "gameDateTimeUTC")]
    pub game_date_time_utc: Option<String>,
    #[serde(rename = "homeTeam")]
    pub home_team: Option<TeamRef>,
    #[serde(rename = "awayTeam")]
    pub away_team: Option<TeamRef>,
}

// ---------------------------------------------------------------------------
// Live boxscore  (liveData/boxscore)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct BoxscoreResponse {
    pub game: Option<BoxscoreGame>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct BoxscoreGame {
    #[serde(rename = "gameId")]
    pub game_id: Option<String>,
    #[serde(rename = "homeTeam")]
    pub home_team: Option<BoxscoreTeam>,
    #[serde(rename = "awayTeam")]
    pub away_team: Option<BoxscoreTeam>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct BoxscoreTeam {
    #[serde(rename = "teamTricode")]
    pub team_tricode: Option<String>,
    pub players: Option<Vec<BoxscorePlayer>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct BoxscorePlayer {
    #[serde(rename = "personId", default, deserialize_with = "lenient_i64")]
    pub person_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    pub statistics: Option<PlayerStatistics>,
}

/// Nested per-player statistics. Counting stats arrive as integers,
/// percentages as 0..1 floats, minutes as ISO-8601 durations.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct PlayerStatistics {
    #[serde(rename = "fieldGoalsMade", deserialize_with = "lenient_u32")]
    pub field_goals_made: Option<u32>,
    #[serde(rename = "fieldGoalsAttempted", deserialize_with = "lenient_u32")]
    pub field_goals_attempted: Option<u32>,
    #[serde(rename = "fieldGoalsPercentage", deserialize_with = "lenient_f64")]
    pub field_goals_percentage: Option<f64>,
    #[serde(rename = "freeThrowsMade", deserialize_with = "lenient_u32")]
    pub free_throws_made: Option<u32>,
    #[serde(rename = "freeThrowsAttempted", deserialize_with = "lenient_u32")]
    pub free_throws_attempted: Option<u32>,
    #[serde(rename = "freeThrowsPercentage", deserialize_with = "lenient_f64")]
    pub free_throws_percentage: Option<f64>,
    #[serde(rename = "threePointersMade", deserialize_with = "lenient_u32")]
    pub three_pointers_made: Option<u32>,
    #[serde(rename = "threePointersAttempted", deserialize_with = "lenient_u32")]
    pub three_pointers_attempted: Option<u32>,
    #[serde(rename = "threePointersPercentage", deserialize_with = "lenient_f64")]
    pub three_pointers_percentage: Option<f64>,
    #[serde(rename = "reboundsOffensive", deserialize_with = "lenient_u32")]
    pub rebounds_offensive: Option<u32>,
    #[serde(rename = "reboundsDefensive", deserialize_with = "lenient_u32")]
    pub rebounds_defensive: Option<u32>,
    #[serde(rename = "reboundsTotal", deserialize_with = "lenient_u32")]
    pub rebounds_total: Option<u32>,
    #[serde(deserialize_with = "lenient_u32")]
    pub assists: Option<u32>,
    #[serde(deserialize_with = "lenient_u32")]
    pub steals: Option<u32>,
    #[serde(deserialize_with = "lenient_u32")]
    pub blocks: Option<u32>,
    #[serde(deserialize_with = "lenient_u32")]
    pub points: Option<u32>,
    #[serde(rename = "pointsInThePaint", deserialize_with = "lenient_u32")]
    pub points_in_the_paint: Option<u32>,
    #[serde(rename = "minutesCalculated", deserialize_with = "lenient_string")]
    pub minutes_calculated: Option<String>, // "PT25M"
    #[serde(deserialize_with = "lenient_string")]
    pub minutes: Option<String>, // "PT25M01.00S"
}
