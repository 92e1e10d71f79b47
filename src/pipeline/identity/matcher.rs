use nba_stats_api::CanonicalPlayer;
use std::collections::BTreeMap;
use unicode_normalization::UnicodeNormalization;

/// Strip diacritics (compatibility decomposition, non-ASCII dropped),
/// collapse whitespace and case-fold.
pub fn normalize_name(name: &str) -> String {
    let ascii: String = name.nfkd().filter(char::is_ascii).collect();
    ascii.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Similarity on a 0-100 scale: the better of the plain and the
/// token-sorted normalized Levenshtein ratios, so "Jr. Gary Trent" still
/// scores well against "Gary Trent Jr.".
pub fn similarity(a: &str, b: &str) -> u8 {
    let a = tokens(a);
    let b = tokens(b);
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let direct = strsim::normalized_levenshtein(&a.join(" "), &b.join(" "));
    let sorted = strsim::normalized_levenshtein(&sorted_join(&a), &sorted_join(&b));
    (direct.max(sorted) * 100.0).round() as u8
}

fn tokens(s: &str) -> Vec<String> {
    normalize_name(s)
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}

fn sorted_join(tokens: &[String]) -> String {
    let mut sorted = tokens.to_vec();
    sorted.sort_unstable();
    sorted.join(" ")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyMatch<'a> {
    pub name: &'a str,
    pub id: i64,
    pub score: u8,
}

/// Canonical player names (normalized) → provider id.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    by_name: BTreeMap<String, i64>,
}

impl NameIndex {
    /// Later entries win on a name collision.
    pub fn from_players(players: impl IntoIterator<Item = CanonicalPlayer>) -> Self {
        let by_name = players
            .into_iter()
            .map(|p| (normalize_name(&p.full_name), p.id))
            .filter(|(name, _)| !name.is_empty())
            .collect();
        Self { by_name }
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn exact(&self, name: &str) -> Option<i64> {
        self.by_name.get(&normalize_name(name)).copied()
    }

    /// Highest-scoring canonical name; the first name in index order wins ties.
    pub fn best_match(&self, name: &str) -> Option<FuzzyMatch<'_>> {
        let mut best: Option<FuzzyMatch<'_>> = None;
        for (candidate, &id) in &self.by_name {
            let score = similarity(name, candidate);
            if best.as_ref().is_none_or(|b| score > b.score) {
                best = Some(FuzzyMatch { name: candidate, id, score });
            }
        }
        best
    }
}
