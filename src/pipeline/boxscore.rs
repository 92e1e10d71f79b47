use async_trait::async_trait;
use log::{debug, info, warn};
use nba_stats_api::BoxscoreRow;
use nba_stats_api::client::{ApiResult, NbaApi};

/// Which feed answered for a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Live,
    Historical,
}

/// One provider of per-game player rows.
#[async_trait]
pub trait BoxscoreSource: Send + Sync {
    async fn rows(&self, game_id: &str) -> ApiResult<Vec<BoxscoreRow>>;
}

#[async_trait]
impl<T: BoxscoreSource + ?Sized> BoxscoreSource for &T {
    async fn rows(&self, game_id: &str) -> ApiResult<Vec<BoxscoreRow>> {
        (**self).rows(game_id).await
    }
}

/// The CDN live boxscore feed.
pub struct LiveBoxscores(pub NbaApi);

#[async_trait]
impl BoxscoreSource for LiveBoxscores {
    async fn rows(&self, game_id: &str) -> ApiResult<Vec<BoxscoreRow>> {
        self.0.fetch_live_boxscore(game_id).await
    }
}

/// The stats service's traditional boxscore table.
pub struct HistoricalBoxscores(pub NbaApi);

#[async_trait]
impl BoxscoreSource for HistoricalBoxscores {
    async fn rows(&self, game_id: &str) -> ApiResult<Vec<BoxscoreRow>> {
        self.0.fetch_historical_boxscore(game_id).await
    }
}

/// Boxscore rows for one game, from the live feed when it has them and from
/// the historical service otherwise. Never fails: a game no tier can serve
/// yields no rows.
pub struct BoxscoreFetcher<L, H> {
    live: L,
    historical: H,
}

impl BoxscoreFetcher<LiveBoxscores, HistoricalBoxscores> {
    pub fn from_api(api: NbaApi) -> Self {
        Self::new(LiveBoxscores(api.clone()), HistoricalBoxscores(api))
    }
}

impl<L: BoxscoreSource, H: BoxscoreSource> BoxscoreFetcher<L, H> {
    pub fn new(live: L, historical: H) -> Self {
        Self { live, historical }
    }

    pub async fn fetch(&self, game_id: &str) -> Vec<BoxscoreRow> {
        self.fetch_served(game_id).await.1
    }

    /// Like [`fetch`](Self::fetch), also reporting the tier that answered.
    pub async fn fetch_served(&self, game_id: &str) -> (Option<Tier>, Vec<BoxscoreRow>) {
        match self.live.rows(game_id).await {
            Ok(rows) if !rows.is_empty() => {
                debug!("{game_id}: {} rows from live feed", rows.len());
                return (Some(Tier::Live), rows);
            }
            Ok(_) => info!("{game_id}: live feed empty, trying historical"),
            Err(e) => warn!("{game_id}: live feed failed, trying historical: {e}"),
        }

        match self.historical.rows(game_id).await {
            Ok(rows) if !rows.is_empty() => {
                debug!("{game_id}: {} rows from historical service", rows.len());
                (Some(Tier::Historical), rows)
            }
            Ok(_) => {
                warn!("{game_id}: no boxscore rows from any source");
                (None, Vec::new())
            }
            Err(e) => {
                warn!("{game_id}: historical service failed, no rows: {e}");
                (None, Vec::new())
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fake::{FakeBoxscores, row};
    use super::*;

    #[tokio::test]
    async fn live_rows_win_and_historical_is_not_consulted() {
        let live = FakeBoxscores::default().with("g1", Some(vec![row("g1", Some(1), 10)]));
        let historical = FakeBoxscores::default().with("g1", Some(vec![row("g1", Some(1), 99)]));
        let fetcher = BoxscoreFetcher::new(&live, &historical);

        let (tier, rows) = fetcher.fetch_served("g1").await;
        assert_eq!(tier, Some(Tier::Live));
        assert_eq!(rows[0].pts, Some(10));
        assert!(historical.calls().is_empty());
    }

    #[tokio::test]
    async fn empty_live_falls_back_to_historical() {
        let live = FakeBoxscores::default().with("g1", Some(Vec::new()));
        let historical = FakeBoxscores::default().with("g1", Some(vec![row("g1", Some(1), 21)]));
        let fetcher = BoxscoreFetcher::new(&live, &historical);

        let (tier, rows) = fetcher.fetch_served("g1").await;
        assert_eq!(tier, Some(Tier::Historical));
        assert_eq!(rows, vec![row("g1", Some(1), 21)]);
    }

    #[tokio::test]
    async fn failing_live_falls_back_to_historical() {
        let live = FakeBoxscores::default().with("g1", None);
        let historical = FakeBoxscores::default().with("g1", Some(vec![row("g1", Some(7), 3)]));
        let fetcher = BoxscoreFetcher::new(&live, &historical);

        assert_eq!(fetcher.fetch("g1").await, vec![row("g1", Some(7), 3)]);
        assert_eq!(historical.calls(), vec!["g1"]);
    }

    #[tokio::test]
    async fn both_tiers_down_yields_no_rows() {
        let live = FakeBoxscores::default().with("g1", None);
        let historical = FakeBoxscores::default().with("g1", None);
        let fetcher = BoxscoreFetcher::new(&live, &historical);

        assert_eq!(fetcher.fetch_served("g1").await, (None, Vec::new()));
    }

    #[tokio::test]
    async fn result_is_nonempty_iff_some_tier_had_rows() {
        let cases = [
            (Some(vec![row("g", Some(1), 1)]), Some(Vec::new()), true),
            (Some(Vec::new()), Some(vec![row("g", Some(1), 1)]), true),
            (None, Some(vec![row("g", Some(1), 1)]), true),
            (Some(Vec::new()), Some(Vec::new()), false),
            (None, Some(Vec::new()), false),
            (Some(Vec::new()), None, false),
            (None, None, false),
        ];
        for (live, historical, expect_rows) in cases {
            let live = FakeBoxscores::default().with("g", live);
            let historical = FakeBoxscores::default().with("g", historical);
            let rows = BoxscoreFetcher::new(&live, &historical).fetch("g").await;
            assert_eq!(!rows.is_empty(), expect_rows);
        }
    }

    #[tokio::test]
    async fn api_backed_fetcher_falls_back_over_http() {
        let mut server = mockito::Server::new_async().await;
        let live = server
            .mock("GET", "/static/json/liveData/boxscore/boxscore_0022400061.json")
            .with_status(403)
            .create_async()
            .await;
        let historical = server
            .mock("GET", "/stats/boxscoretraditionalv2")
            .match_query(mockito::Matcher::UrlEncoded("GameID".into(), "0022400061".into()))
            .with_status(200)
            .with_body(
                r#"{"resultSets": [{"name": "PlayerStats",
                    "headers": ["PLAYER_ID", "PLAYER_NAME", "TEAM_ABBREVIATION", "MIN", "PTS"],
                    "rowSet": [[1628983, "Shai Gilgeous-Alexander", "OKC", "36:00", 30]]}]}"#,
            )
            .create_async()
            .await;

        let api = NbaApi::new().with_base_urls(server.url(), server.url());
        let (tier, rows) = BoxscoreFetcher::from_api(api).fetch_served("0022400061").await;

        live.assert_async().await;
        historical.assert_async().await;
        assert_eq!(tier, Some(Tier::Historical));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].player_id, Some(1628983));
        assert_eq!(rows[0].ppm, Some(30.0 / 36.0));
    }
}
