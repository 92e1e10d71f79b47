use crate::error::PipelineResult;
use crate::pipeline::boxscore::{BoxscoreFetcher, BoxscoreSource};
use crate::pipeline::persist;
use chrono::NaiveDate;
use futures_util::future::join_all;
use log::info;
use nba_stats_api::BoxscoreRow;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Rostered players' lines for one date, best performances first.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyStatsTable {
    pub date: NaiveDate,
    pub rows: Vec<BoxscoreRow>,
}

impl DailyStatsTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `<stats_dir>/YYYY-MM/stats_YYYY-MM-DD.csv`
    pub fn path_in(&self, stats_dir: &Path) -> PathBuf {
        stats_dir
            .join(self.date.format("%Y-%m").to_string())
            .join(format!("stats_{}.csv", self.date.format("%Y-%m-%d")))
    }

    pub fn save(&self, stats_dir: &Path) -> PipelineResult<PathBuf> {
        let path = self.path_in(stats_dir);
        persist::write_csv(&path, &self.rows)?;
        Ok(path)
    }
}

pub struct DailyStatsAggregator<L, H> {
    fetcher: BoxscoreFetcher<L, H>,
}

impl<L: BoxscoreSource, H: BoxscoreSource> DailyStatsAggregator<L, H> {
    pub fn new(fetcher: BoxscoreFetcher<L, H>) -> Self {
        Self { fetcher }
    }

    /// Fetch every game concurrently, keep rows whose player id is rostered,
    /// and order by points, rebounds, then assists.
    pub async fn aggregate(&self, date: NaiveDate, game_ids: &[String], roster: &HashSet<i64>) -> DailyStatsTable {
        let per_game = join_all(game_ids.iter().map(|gid| self.fetcher.fetch(gid))).await;

        let fetched: usize = per_game.iter().map(Vec::len).sum();
        let mut rows: Vec<BoxscoreRow> = per_game
            .into_iter()
            .flatten()
            .filter(|row| row.player_id.is_some_and(|id| roster.contains(&id)))
            .collect();
        sort_rows(&mut rows);

        info!(
            "{date}: {} games, {fetched} player lines, {} rostered",
            game_ids.len(),
            rows.len()
        );
        DailyStatsTable { date, rows }
    }
}

/// Descending with missing values last.
fn desc(a: Option<u32>, b: Option<u32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn sort_rows(rows: &mut [BoxscoreRow]) {
    rows.sort_by(|a, b| {
        desc(a.pts, b.pts)
            .then_with(|| desc(a.reb, b.reb))
            .then_with(|| desc(a.ast, b.ast))
    });
}
