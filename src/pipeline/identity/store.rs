use crate::error::PipelineResult;
use crate::pipeline::persist;
use nba_stats_api::value_as_string;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// `"name|team"` → stats-provider id, ids kept as strings on disk.
pub type IdentityCache = BTreeMap<String, String>;

/// Whole-cache persistence: read everything up front, write everything back.
pub trait IdentityStore {
    fn load(&self) -> PipelineResult<IdentityCache>;
    fn save(&self, cache: &IdentityCache) -> PipelineResult<()>;
}

impl<S: IdentityStore + ?Sized> IdentityStore for &S {
    fn load(&self) -> PipelineResult<IdentityCache> {
        (**self).load()
    }

    fn save(&self, cache: &IdentityCache) -> PipelineResult<()> {
        (**self).save(cache)
    }
}

/// Identity cache kept as one JSON object on disk. Entries that don't read
/// as an id are skipped on load but left in the file on save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl IdentityStore for JsonFileStore {
    fn load(&self) -> PipelineResult<IdentityCache> {
        // Older files may hold bare numbers; normalize to strings on the way in.
        let raw: Option<BTreeMap<String, Value>> = persist::read_json(&self.path)?;
        Ok(raw
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(key, value)| value_as_string(&value).map(|id| (key, id)))
            .collect())
    }

    fn save(&self, cache: &IdentityCache) -> PipelineResult<()> {
        let mut on_disk: BTreeMap<String, Value> = persist::read_json(&self.path)?.unwrap_or_default();
        on_disk.extend(cache.iter().map(|(key, id)| (key.clone(), Value::String(id.clone()))));
        persist::write_json(&self.path, &on_disk)
    }
}
