use crate::cdn::{BoxscoreResponse, BoxscoreTeam, LeagueScheduleResponse, ScoreboardResponse};
use crate::stats::{StatsResponse, StatsRow};
use crate::{
    BoxscoreRow, CanonicalPlayer, ScheduledGame, clock_minutes, iso_duration_minutes,
    value_as_f64, value_as_i64, value_as_string, value_as_u32,
};
use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, ORIGIN, REFERER};
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const NBA_CDN: &str = "https://cdn.nba.com";
const NBA_STATS: &str = "https://stats.nba.com";

/// NBA data client over the public CDN feeds (fast, possibly incomplete)
/// and the stats service (slower, authoritative).
#[derive(Debug, Clone)]
pub struct NbaApi {
    client: Client,
    timeout: Duration,
    cdn_base: String,
    stats_base: String,
}

impl Default for NbaApi {
    fn default() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
        headers.insert(REFERER, HeaderValue::from_static("https://www.nba.com/"));
        headers.insert(ORIGIN, HeaderValue::from_static("https://www.nba.com"));

        Self {
            client: Client::builder()
                .user_agent("fantasyxi/0.1 (daily stats ingestion)")
                .default_headers(headers)
                .build()
                .unwrap_or_default(),
            timeout: Duration::from_secs(60),
            cdn_base: NBA_CDN.to_owned(),
            stats_base: NBA_STATS.to_owned(),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(String, String),
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl NbaApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Point the client at other hosts (mirrors, test servers).
    pub fn with_base_urls(mut self, cdn: impl Into<String>, stats: impl Into<String>) -> Self {
        self.cdn_base = cdn.into().trim_end_matches('/').to_owned();
        self.stats_base = stats.into().trim_end_matches('/').to_owned();
        self
    }

    /// Today's games from the live scoreboard, in feed order. Any
    /// non-success status is an error, never an empty day.
    pub async fn fetch_todays_scoreboard(&self) -> ApiResult<Vec<ScheduledGame>> {
        let url = format!("{}/static/json/liveData/scoreboard/todaysScoreboard_00.json", self.cdn_base);
        let raw: ScoreboardResponse = self.get_strict(&url).await?;
        Ok(map_scoreboard(raw))
    }

    /// The full-season league schedule as raw JSON text, validated to parse.
    /// Suitable for materializing as an on-disk snapshot.
    pub async fn fetch_league_schedule_document(&self) -> ApiResult<String> {
        let url = format!("{}/static/json/staticData/scheduleLeagueV2.json", self.cdn_base);
        let text = self.get_text(&url).await?;
        parse_league_schedule(&text).map_err(|e| ApiError::Parsing(e.to_string(), url))?;
        Ok(text)
    }

    /// The full-season league schedule; covers any past or future date.
    /// Any non-success status is an error.
    pub async fn fetch_league_schedule(&self) -> ApiResult<Vec<ScheduledGame>> {
        let url = format!("{}/static/json/staticData/scheduleLeagueV2.json", self.cdn_base);
        let text = self.get_text(&url).await?;
        parse_league_schedule(&text).map_err(|e| ApiError::Parsing(e.to_string(), url))
    }

    /// Player rows from the live boxscore feed. Empty when the feed has not
    /// been populated for this game yet.
    pub async fn fetch_live_boxscore(&self, game_id: &str) -> ApiResult<Vec<BoxscoreRow>> {
        let url = format!("{}/static/json/liveData/boxscore/boxscore_{game_id}.json", self.cdn_base);
        let raw: BoxscoreResponse = self.get(&url).await?;
        Ok(map_live_boxscore(game_id, raw))
    }

    /// Player rows from the stats service's traditional boxscore table.
    pub async fn fetch_historical_boxscore(&self, game_id: &str) -> ApiResult<Vec<BoxscoreRow>> {
        let url = format!(
            "{}/stats/boxscoretraditionalv2?GameID={game_id}&StartPeriod=0&EndPeriod=10&StartRange=0&EndRange=28800&RangeType=0",
            self.stats_base
        );
        let raw: StatsResponse = self.get(&url).await?;
        Ok(map_historical_boxscore(game_id, &raw))
    }

    /// Every player the league has on record, for identity matching.
    pub async fn fetch_player_directory(&self, season: &str) -> ApiResult<Vec<CanonicalPlayer>> {
        let url = format!(
            "{}/stats/commonallplayers?LeagueID=00&Season={season}&IsOnlyCurrentSeason=0",
            self.stats_base
        );
        let raw: StatsResponse = self.get(&url).await?;
        let players = map_player_directory(&raw);
        if players.is_empty() {
            return Err(ApiError::NotFound(format!("empty player directory for season {season}")));
        }
        Ok(players)
    }

    async fn get<T: Default + serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e.to_string(), url.to_owned())),
            Err(e) => {
                // Feeds answer 403/404 until a game's document exists.
                if let Some(status) = e.status().filter(|s| s.is_client_error()) {
                    debug!("{url} answered {status}, treating as empty");
                    Ok(T::default())
                } else {
                    Err(ApiError::Api(e, url.to_owned()))
                }
            }
        }
    }

    /// Like `get`, but a 4xx is an error rather than an empty document.
    async fn get_strict<T: serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let text = self.get_text(url).await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Parsing(e.to_string(), url.to_owned()))
    }

    async fn get_text(&self, url: &str) -> ApiResult<String> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        let response = response.error_for_status().map_err(|e| ApiError::Api(e, url.to_owned()))?;
        response.text().await.map_err(|e| ApiError::Network(e, url.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Mapping: CDN wire types → clean domain types
// ---------------------------------------------------------------------------

/// Parse a league schedule document (as fetched, or as read back from a snapshot).
pub fn parse_league_schedule(text: &str) -> Result<Vec<ScheduledGame>, serde_json::Error> {
    let raw: LeagueScheduleResponse = serde_json::from_str(text)?;
    Ok(map_league_schedule(raw))
}

/// Schedule feeds write dates either ISO style or US style with a time suffix.
pub fn parse_schedule_date(raw: &str) -> Option<NaiveDate> {
    let head = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(head, "%m/%d/%Y"))
        .ok()
}

fn parse_instant(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|d| DateTime::parse_from_rfc3339(d).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn map_scoreboard(raw: ScoreboardResponse) -> Vec<ScheduledGame> {
    let scoreboard = raw.scoreboard.unwrap_or_default();
    let game_date = scoreboard.game_date.as_deref().and_then(parse_schedule_date);

    scoreboard
        .games
        .unwrap_or_default()
        .into_iter()
        .filter_map(|g| {
            let game_id = g.game_id.filter(|id| !id.is_empty())?;
            Some(ScheduledGame {
                game_id,
                game_date,
                tipoff: parse_instant(g.game_time_utc.as_deref()),
                home: g.home_team.and_then(|t| t.team_tricode),
                away: g.away_team.and_then(|t| t.team_tricode),
            })
        })
        .collect()
}

fn map_league_schedule(raw: LeagueScheduleResponse) -> Vec<ScheduledGame> {
    raw.league_schedule
        .and_then(|s| s.game_dates)
        .unwrap_or_default()
        .into_iter()
        .flat_map(|day| {
            let game_date = day.game_date.as_deref().and_then(parse_schedule_date);
            day.games.unwrap_or_default().into_iter().filter_map(move |g| {
                let game_id = g.game_id.filter(|id| !id.is_empty())?;
                Some(ScheduledGame {
                    game_id,
                    game_date,
                    tipoff: parse_instant(g.game_date_time_utc.as_deref()),
                    home: g.home_team.and_then(|t| t.team_tricode),
                    away: g.away_team.and_then(|t| t.team_tricode),
                })
            })
        })
        .collect()
}

fn map_live_boxscore(game_id: &str, raw: BoxscoreResponse) -> Vec<BoxscoreRow> {
    let Some(game) = raw.game else {
        return Vec::new();
    };
    let game_id = game.game_id.clone().unwrap_or_else(|| game_id.to_owned());

    [game.home_team, game.away_team]
        .into_iter()
        .flatten()
        .flat_map(|team| map_live_team(&game_id, team))
        .collect()
}

fn map_live_team(game_id: &str, team: BoxscoreTeam) -> Vec<BoxscoreRow> {
    let tricode = team.team_tricode;
    team.players
        .unwrap_or_default()
        .into_iter()
        .map(|p| {
            let st = p.statistics.unwrap_or_default();
            // The calculated duration wins over the raw clock when both exist.
            let minutes = st
                .minutes_calculated
                .as_deref()
                .and_then(iso_duration_minutes)
                .or_else(|| st.minutes.as_deref().and_then(iso_duration_minutes));

            BoxscoreRow {
                game_id: game_id.to_owned(),
                team: tricode.clone(),
                player_id: p.person_id,
                player_name: p.name,
                fgm: st.field_goals_made,
                fga: st.field_goals_attempted,
                fg_pct: st.field_goals_percentage,
                ftm: st.free_throws_made,
                fta: st.free_throws_attempted,
                ft_pct: st.free_throws_percentage,
                fg3m: st.three_pointers_made,
                fg3a: st.three_pointers_attempted,
                fg3_pct: st.three_pointers_percentage,
                oreb: st.rebounds_offensive,
                dreb: st.rebounds_defensive,
                reb: st.rebounds_total,
                ast: st.assists,
                stl: st.steals,
                blk: st.blocks,
                pts: st.points,
                pip: st.points_in_the_paint,
                ppm: None,
                minutes,
            }
            .with_derived_fields()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Mapping: stats service tables → clean domain types
// ---------------------------------------------------------------------------

fn map_historical_boxscore(game_id: &str, raw: &StatsResponse) -> Vec<BoxscoreRow> {
    let Some(table) = raw.table("PlayerStats") else {
        return Vec::new();
    };
    table.rows().map(|row| map_historical_row(game_id, row)).collect()
}

fn map_historical_row(game_id: &str, row: StatsRow<'_>) -> BoxscoreRow {
    let count = |key: &str| row.get(key).and_then(value_as_u32);
    let minutes = row.get("MIN").and_then(|v| match v {
        serde_json::Value::String(s) => clock_minutes(s),
        other => value_as_f64(other),
    });

    // Percentages from this source are always recomputed; paint points
    // are not published here.
    BoxscoreRow {
        game_id: game_id.to_owned(),
        team: row.get("TEAM_ABBREVIATION").and_then(value_as_string),
        player_id: row.get("PLAYER_ID").and_then(value_as_i64),
        player_name: row.get("PLAYER_NAME").and_then(value_as_string),
        fgm: count("FGM"),
        fga: count("FGA"),
        fg_pct: None,
        ftm: count("FTM"),
        fta: count("FTA"),
        ft_pct: None,
        fg3m: count("FG3M"),
        fg3a: count("FG3A"),
        fg3_pct: None,
        oreb: count("OREB"),
        dreb: count("DREB"),
        reb: count("REB"),
        ast: count("AST"),
        stl: count("STL"),
        blk: count("BLK"),
        pts: count("PTS"),
        pip: None,
        ppm: None,
        minutes,
    }
    .with_derived_fields()
}

fn map_player_directory(raw: &StatsResponse) -> Vec<CanonicalPlayer> {
    let Some(table) = raw.table("CommonAllPlayers") else {
        return Vec::new();
    };
    table
        .rows()
        .filter_map(|row| {
            Some(CanonicalPlayer {
                id: row.get("PERSON_ID").and_then(value_as_i64)?,
                full_name: row.get("DISPLAY_FIRST_LAST").and_then(value_as_string)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mockito::Matcher;

    const LIVE_BOXSCORE: &str = r#"{
        "game": {
            "gameId": "0022400061",
            "homeTeam": {
                "teamTricode": "DEN",
                "players": [
                    {
                        "personId": 203999,
                        "name": "Nikola Jokić",
                        "statistics": {
                            "fieldGoalsMade": 12, "fieldGoalsAttempted": 20, "fieldGoalsPercentage": 0.6,
                            "freeThrowsMade": 5, "freeThrowsAttempted": 6,
                            "threePointersMade": 0, "threePointersAttempted": 0,
                            "reboundsOffensive": 4, "reboundsDefensive": 10, "reboundsTotal": 14,
                            "assists": 11, "steals": 2, "blocks": 1, "points": 29,
                            "pointsInThePaint": 18,
                            "minutesCalculated": "PT36M", "minutes": "PT35M42.00S"
                        }
                    }
                ]
            },
            "awayTeam": {
                "teamTricode": "LAL",
                "players": [
                    {
                        "personId": 2544,
                        "name": "LeBron James",
                        "statistics": { "points": "bad", "minutes": "PT30M00.00S" }
                    }
                ]
            }
        }
    }"#;

    const HISTORICAL_BOXSCORE: &str = r#"{
        "resultSets": [
            {
                "name": "PlayerStats",
                "headers": ["GAME_ID", "TEAM_ABBREVIATION", "PLAYER_ID", "PLAYER_NAME", "MIN",
                            "FGM", "FGA", "FG_PCT", "FG3M", "FG3A", "FTM", "FTA",
                            "OREB", "DREB", "REB", "AST", "STL", "BLK", "PTS"],
                "rowSet": [
                    ["0022400061", "DEN", 203999, "Nikola Jokic", "36.000000:30",
                     12, 20, 0.6, 1, 4, 5, 6, 4, 10, 14, 11, 2, 1, 30],
                    ["0022400061", "DEN", 1629008, "Michael Porter Jr.", null,
                     null, null, null, null, null, null, null, null, null, null, null, null, null, null]
                ]
            },
            { "name": "TeamStats", "headers": [], "rowSet": [] }
        ]
    }"#;

    #[test]
    fn schedule_dates_accept_iso_and_us_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 10, 22);
        assert_eq!(parse_schedule_date("2024-10-22"), expected);
        assert_eq!(parse_schedule_date("10/22/2024 00:00:00"), expected);
        assert_eq!(parse_schedule_date("22.10.2024"), None);
        assert_eq!(parse_schedule_date("short"), None);
    }

    #[test]
    fn live_boxscore_maps_both_teams_and_derives_fields() {
        let raw: BoxscoreResponse = serde_json::from_str(LIVE_BOXSCORE).unwrap();
        let rows = map_live_boxscore("ignored", raw);
        assert_eq!(rows.len(), 2);

        let jokic = &rows[0];
        assert_eq!(jokic.game_id, "0022400061");
        assert_eq!(jokic.team.as_deref(), Some("DEN"));
        assert_eq!(jokic.player_id, Some(203999));
        assert_eq!(jokic.fg_pct, Some(0.6));
        assert_eq!(jokic.ft_pct, Some(5.0 / 6.0));
        assert_eq!(jokic.fg3_pct, None, "no attempts means no percentage");
        assert_eq!(jokic.pip, Some(18));
        assert_eq!(jokic.minutes, Some(36.0), "calculated minutes take precedence");
        assert_eq!(jokic.ppm, Some(29.0 / 36.0));

        let lebron = &rows[1];
        assert_eq!(lebron.team.as_deref(), Some("LAL"));
        assert_eq!(lebron.pts, None, "malformed field degrades to absent");
        assert_eq!(lebron.minutes, Some(30.0), "raw minutes used when calculated is absent");
        assert_eq!(lebron.ppm, None);
    }

    #[test]
    fn live_boxscore_without_game_is_empty() {
        assert!(map_live_boxscore("0022400061", BoxscoreResponse::default()).is_empty());
    }

    #[test]
    fn historical_boxscore_renames_columns_and_recomputes_pct() {
        let raw: StatsResponse = serde_json::from_str(HISTORICAL_BOXSCORE).unwrap();
        let rows = map_historical_boxscore("0022400061", &raw);
        assert_eq!(rows.len(), 2);

        let jokic = &rows[0];
        assert_eq!(jokic.player_name.as_deref(), Some("Nikola Jokic"));
        assert_eq!(jokic.fg3m, Some(1));
        assert_eq!(jokic.fg3a, Some(4));
        assert_eq!(jokic.fg3_pct, Some(0.25));
        assert_eq!(jokic.minutes, Some(36.5));
        assert_eq!(jokic.pip, None);
        assert_eq!(jokic.ppm, Some(30.0 / 36.5));

        let dnp = &rows[1];
        assert_eq!(dnp.player_id, Some(1629008));
        assert_eq!(dnp.minutes, None);
        assert_eq!(dnp.fg_pct, None);
        assert_eq!(dnp.ppm, None);
    }

    #[test]
    fn league_schedule_flattens_game_dates() {
        let text = r#"{"leagueSchedule": {"gameDates": [
            {"gameDate": "10/22/2024 00:00:00", "games": [
                {"gameId": "0022400061", "gameDateTimeUTC": "2024-10-22T23:30:00Z",
                 "homeTeam": {"teamTricode": "BOS"}, "awayTeam": {"teamTricode": "NYK"}},
                {"gameId": "", "gameDateTimeUTC": "2024-10-23T02:00:00Z"}
            ]},
            {"gameDate": "10/23/2024 00:00:00", "games": [
                {"gameId": "0022400062", "gameDateTimeUTC": "not a date"}
            ]}
        ]}}"#;
        let games = parse_league_schedule(text).unwrap();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].game_date, NaiveDate::from_ymd_opt(2024, 10, 22));
        assert_eq!(games[0].tipoff, Some(Utc.with_ymd_and_hms(2024, 10, 22, 23, 30, 0).unwrap()));
        assert_eq!(games[0].home.as_deref(), Some("BOS"));
        assert_eq!(games[1].tipoff, None);
    }

    #[test]
    fn player_directory_skips_incomplete_rows() {
        let raw: StatsResponse = serde_json::from_str(
            r#"{"resultSets": [{"name": "CommonAllPlayers",
                "headers": ["PERSON_ID", "DISPLAY_LAST_COMMA_FIRST", "DISPLAY_FIRST_LAST"],
                "rowSet": [[203999, "Jokic, Nikola", "Nikola Jokić"], [1, "Nobody", null]]}]}"#,
        )
        .unwrap();
        let players = map_player_directory(&raw);
        assert_eq!(
            players,
            vec![CanonicalPlayer { id: 203999, full_name: "Nikola Jokić".into() }]
        );
    }

    #[tokio::test]
    async fn scoreboard_is_fetched_and_mapped() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/static/json/liveData/scoreboard/todaysScoreboard_00.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"scoreboard": {"gameDate": "2024-10-22", "games": [
                    {"gameId": "0022400061", "gameTimeUTC": "2024-10-22T23:30:00Z", "gameStatus": 1}
                ]}}"#,
            )
            .create_async()
            .await;

        let api = NbaApi::new().with_base_urls(server.url(), server.url());
        let games = api.fetch_todays_scoreboard().await.unwrap();
        mock.assert_async().await;
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].game_id, "0022400061");
        assert_eq!(games[0].game_date, NaiveDate::from_ymd_opt(2024, 10, 22));
    }

    #[tokio::test]
    async fn schedule_feeds_report_client_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/static/json/liveData/scoreboard/todaysScoreboard_00.json")
            .with_status(403)
            .create_async()
            .await;
        server
            .mock("GET", "/static/json/staticData/scheduleLeagueV2.json")
            .with_status(429)
            .create_async()
            .await;

        let api = NbaApi::new().with_base_urls(server.url(), server.url());
        let err = api.fetch_todays_scoreboard().await.unwrap_err();
        assert!(matches!(err, ApiError::Api(_, _)), "unexpected error: {err}");
        let err = api.fetch_league_schedule().await.unwrap_err();
        assert!(matches!(err, ApiError::Api(_, _)), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn missing_live_boxscore_document_is_empty_not_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/static/json/liveData/boxscore/boxscore_0022400061.json")
            .with_status(403)
            .create_async()
            .await;

        let api = NbaApi::new().with_base_urls(server.url(), server.url());
        let rows = api.fetch_live_boxscore("0022400061").await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn server_errors_surface_as_api_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/stats/boxscoretraditionalv2")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let api = NbaApi::new().with_base_urls(server.url(), server.url());
        let err = api.fetch_historical_boxscore("0022400061").await.unwrap_err();
        assert!(matches!(err, ApiError::Api(_, _)), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn historical_boxscore_is_fetched_with_game_id() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/stats/boxscoretraditionalv2")
            .match_query(Matcher::UrlEncoded("GameID".into(), "0022400061".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(HISTORICAL_BOXSCORE)
            .create_async()
            .await;

        let api = NbaApi::new().with_base_urls(server.url(), server.url());
        let rows = api.fetch_historical_boxscore("0022400061").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].pts, Some(30));
    }

    #[tokio::test]
    async fn empty_player_directory_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/stats/commonallplayers")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"resultSets": []}"#)
            .create_async()
            .await;

        let api = NbaApi::new().with_base_urls(server.url(), server.url());
        let err = api.fetch_player_directory("2024-25").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn schedule_document_must_parse_before_it_is_returned() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/static/json/staticData/scheduleLeagueV2.json")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let api = NbaApi::new().with_base_urls(server.url(), server.url());
        let err = api.fetch_league_schedule_document().await.unwrap_err();
        assert!(matches!(err, ApiError::Parsing(_, _)));
    }
}
