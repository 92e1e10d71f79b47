//! Maps fantasy-platform players onto stats-provider ids.
//!
//! Resolution order per player:
//!   1. the persistent cache, keyed by `"name|team"` (a confirmed mapping is
//!      never replaced);
//!   2. an exact match against the canonical directory, diacritics and
//!      case ignored;
//!   3. the best fuzzy match, accepted only at or above the threshold.
//!
//! Unresolved players keep an absent id. The whole cache is written back at
//! the end of every batch.

pub mod matcher;
pub mod store;

use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::persist;
use crate::pipeline::roster::PlayerRecord;
use async_trait::async_trait;
use log::{debug, info, warn};
use matcher::NameIndex;
use nba_stats_api::CanonicalPlayer;
use nba_stats_api::client::NbaApi;
use std::path::PathBuf;
use store::{IdentityCache, IdentityStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Cached(i64),
    Exact(i64),
    Fuzzy { id: i64, score: u8 },
    Unresolved,
}

impl Resolution {
    pub fn id(&self) -> Option<i64> {
        match *self {
            Resolution::Cached(id) | Resolution::Exact(id) | Resolution::Fuzzy { id, .. } => Some(id),
            Resolution::Unresolved => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionSummary {
    pub cached: usize,
    pub exact: usize,
    pub fuzzy: usize,
    pub unresolved: usize,
}

impl ResolutionSummary {
    fn record(&mut self, resolution: Resolution) {
        match resolution {
            Resolution::Cached(_) => self.cached += 1,
            Resolution::Exact(_) => self.exact += 1,
            Resolution::Fuzzy { .. } => self.fuzzy += 1,
            Resolution::Unresolved => self.unresolved += 1,
        }
    }

    pub fn resolved(&self) -> usize {
        self.cached + self.exact + self.fuzzy
    }
}

pub fn cache_key(name: &str, team: Option<&str>) -> String {
    format!("{name}|{}", team.unwrap_or_default())
}

pub struct IdentityResolver<S> {
    store: S,
    index: NameIndex,
    threshold: u8,
}

impl<S: IdentityStore> IdentityResolver<S> {
    pub fn new(store: S, index: NameIndex, threshold: u8) -> Self {
        Self { store, index, threshold }
    }

    /// Resolve a batch and hand the records back with ids filled in.
    pub fn resolve(&self, mut records: Vec<PlayerRecord>) -> PipelineResult<Vec<PlayerRecord>> {
        self.resolve_in_place(records.iter_mut())?;
        Ok(records)
    }

    /// Resolve a batch in place. Records that already carry an id are left
    /// untouched.
    pub fn resolve_in_place<'a>(
        &self,
        records: impl IntoIterator<Item = &'a mut PlayerRecord>,
    ) -> PipelineResult<ResolutionSummary> {
        let mut cache = self.store.load()?;
        let mut summary = ResolutionSummary::default();

        for record in records {
            if record.resolved_stats_id.is_some() {
                continue;
            }
            let resolution =
                self.lookup(&mut cache, &record.display_name, record.team_abbreviation.as_deref());
            if resolution == Resolution::Unresolved {
                warn!(
                    "no stats id for {} ({})",
                    record.display_name,
                    record.team_abbreviation.as_deref().unwrap_or("no team")
                );
            }
            record.resolved_stats_id = resolution.id();
            summary.record(resolution);
        }

        self.store.save(&cache)?;
        info!(
            "identity batch: {} cached, {} exact, {} fuzzy, {} unresolved",
            summary.cached, summary.exact, summary.fuzzy, summary.unresolved
        );
        Ok(summary)
    }

    /// Resolve one player against `cache`, recording any new mapping in it.
    pub fn lookup(&self, cache: &mut IdentityCache, name: &str, team: Option<&str>) -> Resolution {
        let key = cache_key(name, team);

        if let Some(cached) = cache.get(&key) {
            match cached.trim().parse::<i64>() {
                Ok(id) => return Resolution::Cached(id),
                Err(_) => warn!("unusable cached id {cached:?} for {key}, resolving again"),
            }
        }

        if let Some(id) = self.index.exact(name) {
            cache.insert(key, id.to_string());
            return Resolution::Exact(id);
        }

        match self.index.best_match(name) {
            Some(m) if m.score >= self.threshold => {
                debug!("fuzzy match {name:?} -> {:?} ({})", m.name, m.score);
                let (id, score) = (m.id, m.score);
                cache.insert(key, id.to_string());
                Resolution::Fuzzy { id, score }
            }
            Some(m) => {
                debug!("best fuzzy candidate for {name:?} is {:?} at {}, below {}", m.name, m.score, self.threshold);
                Resolution::Unresolved
            }
            None => Resolution::Unresolved,
        }
    }
}

// ---------------------------------------------------------------------------
// Canonical player directory
// ---------------------------------------------------------------------------

#[async_trait]
pub trait PlayerDirectory: Send + Sync {
    async fn players(&self) -> PipelineResult<Vec<CanonicalPlayer>>;
}

/// Directory from a local `[{"id": .., "full_name": ..}]` file.
#[derive(Debug, Clone)]
pub struct LocalDirectory {
    path: PathBuf,
}

impl LocalDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PlayerDirectory for LocalDirectory {
    async fn players(&self) -> PipelineResult<Vec<CanonicalPlayer>> {
        persist::read_json(&self.path)?.ok_or_else(|| {
            PipelineError::Roster(format!("player directory not found at {}", self.path.display()))
        })
    }
}

/// Directory fetched from the stats service for one season.
#[derive(Debug, Clone)]
pub struct RemoteDirectory {
    api: NbaApi,
    season: String,
}

impl RemoteDirectory {
    pub fn new(api: NbaApi, season: impl Into<String>) -> Self {
        Self { api, season: season.into() }
    }
}

#[async_trait]
impl PlayerDirectory for RemoteDirectory {
    async fn players(&self) -> PipelineResult<Vec<CanonicalPlayer>> {
        Ok(self.api.fetch_player_directory(&self.season).await?)
    }
}
