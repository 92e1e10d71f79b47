/// NBA stats service raw wire types. Every endpoint answers with tabular
/// `resultSets`: a header row plus untyped value rows.
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct StatsResponse {
    #[serde(rename = "resultSets")]
    pub result_sets: Option<Vec<ResultSet>>,
    /// A few endpoints send a single set under the singular key.
    #[serde(rename = "resultSet")]
    pub result_set: Option<ResultSet>,
}

impl StatsResponse {
    /// Find a result set by name. A response that carries only the singular
    /// `resultSet` answers with that set whatever it is called.
    pub fn table(&self, name: &str) -> Option<&ResultSet> {
        let sets = self.result_sets.as_deref().unwrap_or_default();
        if let Some(set) = sets.iter().find(|s| s.name.as_deref() == Some(name)) {
            return Some(set);
        }
        if sets.is_empty() {
            return self.result_set.as_ref();
        }
        None
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ResultSet {
    pub name: Option<String>,
    pub headers: Option<Vec<String>>,
    #[serde(rename = "rowSet")]
    pub row_set: Option<Vec<Vec<Value>>>,
}

impl ResultSet {
    pub fn rows(&self) -> impl Iterator<Item = StatsRow<'_>> {
        let headers = self.headers.as_deref().unwrap_or_default();
        self.row_set
            .iter()
            .flatten()
            .map(move |values| StatsRow { headers, values: values.as_slice() })
    }
}

/// One row of a result set, addressed by column label.
#[derive(Debug, Clone, Copy)]
pub struct StatsRow<'a> {
    headers: &'a [String],
    values: &'a [Value],
}

impl<'a> StatsRow<'a> {
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.headers
            .iter()
            .position(|h| h == key)
            .and_then(|i| self.values.get(i))
            .filter(|v| !v.is_null())
    }
}
