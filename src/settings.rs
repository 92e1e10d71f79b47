use chrono::{FixedOffset, Offset, Utc};
use log::warn;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_DATA_DIR: &str = "data/processed";
const DEFAULT_FUZZY_THRESHOLD: u8 = 90;
const DEFAULT_FREEZE_OFFSET_MINUTES: i64 = 4;
/// One day either side of the first tip-off.
const MAX_FREEZE_OFFSET_MINUTES: i64 = 24 * 60;
const DEFAULT_UTC_OFFSET_HOURS: i32 = -4;
const DEFAULT_SEASON: &str = "2024-25";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
    /// Minimum similarity (0-100) for a fuzzy name match to be accepted.
    pub fuzzy_threshold: u8,
    /// How long after the first tip-off rosters lock.
    pub freeze_offset: chrono::Duration,
    /// League-local calendar used to decide which day "today" is.
    pub utc_offset: FixedOffset,
    pub league_json: PathBuf,
    pub players_json: Option<PathBuf>,
    pub season: String,
    pub http_timeout: Duration,
}

impl Settings {
    /// Settings rooted at `data_dir` with every other knob at its default.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            league_json: data_dir.join("league.json"),
            data_dir,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            freeze_offset: chrono::Duration::minutes(DEFAULT_FREEZE_OFFSET_MINUTES),
            utc_offset: hours_offset(DEFAULT_UTC_OFFSET_HOURS),
            players_json: None,
            season: DEFAULT_SEASON.to_owned(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }

    /// Load from `FANTASYXI_*` environment variables; anything unset or
    /// unparsable keeps its default.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let data_dir = var("FANTASYXI_DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_owned());
        let mut settings = Self::with_data_dir(data_dir);

        if let Some(threshold) = parse_var::<u8>(&var, "FANTASYXI_FUZZY_THRESHOLD") {
            if threshold <= 100 {
                settings.fuzzy_threshold = threshold;
            } else {
                warn!("FANTASYXI_FUZZY_THRESHOLD={threshold} is above 100, keeping {DEFAULT_FUZZY_THRESHOLD}");
            }
        }
        if let Some(minutes) = parse_var::<i64>(&var, "FANTASYXI_FREEZE_OFFSET_MINUTES") {
            let in_range = (-MAX_FREEZE_OFFSET_MINUTES..=MAX_FREEZE_OFFSET_MINUTES).contains(&minutes);
            match chrono::TimeDelta::try_minutes(minutes).filter(|_| in_range) {
                Some(offset) => settings.freeze_offset = offset,
                None => warn!(
                    "FANTASYXI_FREEZE_OFFSET_MINUTES={minutes} is out of range, keeping {DEFAULT_FREEZE_OFFSET_MINUTES}"
                ),
            }
        }
        if let Some(hours) = parse_var::<i32>(&var, "FANTASYXI_UTC_OFFSET_HOURS") {
            if (-23..=23).contains(&hours) {
                settings.utc_offset = hours_offset(hours);
            } else {
                warn!("FANTASYXI_UTC_OFFSET_HOURS={hours} is out of range, keeping {DEFAULT_UTC_OFFSET_HOURS}");
            }
        }
        if let Some(path) = var("FANTASYXI_LEAGUE_JSON") {
            settings.league_json = PathBuf::from(path);
        }
        settings.players_json = var("FANTASYXI_PLAYERS_JSON").map(PathBuf::from);
        if let Some(season) = var("FANTASYXI_SEASON") {
            settings.season = season;
        }
        if let Some(secs) = parse_var::<u64>(&var, "FANTASYXI_HTTP_TIMEOUT_SECS") {
            settings.http_timeout = Duration::from_secs(secs);
        }
        settings
    }

    pub fn freeze_path(&self) -> PathBuf {
        self.data_dir.join("freeze_time.json")
    }

    pub fn identity_cache_path(&self) -> PathBuf {
        self.data_dir.join("mappings").join("nba_id_cache.json")
    }

    pub fn roster_dir(&self) -> PathBuf {
        self.data_dir.join("daily_rosters")
    }

    pub fn stats_dir(&self) -> PathBuf {
        self.data_dir.join("daily_stats")
    }

    pub fn schedule_snapshot_path(&self) -> PathBuf {
        self.data_dir.join("misc").join("scheduleLeagueV2.json")
    }
}

fn parse_var<T: std::str::FromStr>(var: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = var(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("ignoring unparsable {key}={raw}");
            None
        }
    }
}

fn hours_offset(hours: i32) -> FixedOffset {
    FixedOffset::east_opt(hours * 3600).unwrap_or_else(|| Utc.fix())
}
