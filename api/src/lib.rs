pub mod cdn;
pub mod client;
pub mod stats;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Domain types: clean model, independent of either provider's wire format
// ---------------------------------------------------------------------------

/// One scheduled game as seen by any schedule feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduledGame {
    pub game_id: String,
    /// League calendar date of the game (the feed's own notion of "day").
    pub game_date: Option<NaiveDate>,
    pub tipoff: Option<DateTime<Utc>>,
    pub home: Option<String>,
    pub away: Option<String>,
}

/// Entry of the canonical player directory used for identity matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalPlayer {
    pub id: i64,
    pub full_name: String,
}

/// Per-player, per-game statistics in the canonical column schema.
///
/// Every numeric field is optional: a value the provider omitted or sent in
/// an unexpected shape is carried as `None` instead of failing the row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxscoreRow {
    pub game_id: String,
    #[serde(rename = "NBA_TEAM")]
    pub team: Option<String>,
    #[serde(rename = "nba_player_id")]
    pub player_id: Option<i64>,
    pub player_name: Option<String>,
    #[serde(rename = "FGM")]
    pub fgm: Option<u32>,
    #[serde(rename = "FGA")]
    pub fga: Option<u32>,
    #[serde(rename = "FG%")]
    pub fg_pct: Option<f64>,
    #[serde(rename = "FTM")]
    pub ftm: Option<u32>,
    #[serde(rename = "FTA")]
    pub fta: Option<u32>,
    #[serde(rename = "FT%")]
    pub ft_pct: Option<f64>,
    #[serde(rename = "3PM")]
    pub fg3m: Option<u32>,
    #[serde(rename = "3PA")]
    pub fg3a: Option<u32>,
    #[serde(rename = "3P%")]
    pub fg3_pct: Option<f64>,
    #[serde(rename = "OREB")]
    pub oreb: Option<u32>,
    #[serde(rename = "DREB")]
    pub dreb: Option<u32>,
    #[serde(rename = "REB")]
    pub reb: Option<u32>,
    #[serde(rename = "AST")]
    pub ast: Option<u32>,
    #[serde(rename = "STL")]
    pub stl: Option<u32>,
    #[serde(rename = "BLK")]
    pub blk: Option<u32>,
    #[serde(rename = "PTS")]
    pub pts: Option<u32>,
    #[serde(rename = "PIP")]
    pub pip: Option<u32>,
    #[serde(rename = "PPM")]
    pub ppm: Option<f64>,
    #[serde(rename = "MIN")]
    pub minutes: Option<f64>,
}

impl BoxscoreRow {
    /// Fill the derived columns. Percentages the provider already supplied
    /// are kept when they are a valid ratio; anything else is recomputed.
    pub fn with_derived_fields(mut self) -> Self {
        self.fg_pct = valid_ratio(self.fg_pct).or_else(|| safe_pct(self.fgm, self.fga));
        self.ft_pct = valid_ratio(self.ft_pct).or_else(|| safe_pct(self.ftm, self.fta));
        self.fg3_pct = valid_ratio(self.fg3_pct).or_else(|| safe_pct(self.fg3m, self.fg3a));
        self.minutes = self.minutes.filter(|m| m.is_finite() && *m >= 0.0);
        self.ppm = per_minute(self.pts, self.minutes);
        self
    }
}

// ---------------------------------------------------------------------------
// Field derivation
// ---------------------------------------------------------------------------

/// `made / attempted`, or `None` when either side is missing or nothing was attempted.
pub fn safe_pct(made: Option<u32>, attempted: Option<u32>) -> Option<f64> {
    match (made, attempted) {
        (Some(made), Some(attempted)) if attempted > 0 => Some(f64::from(made) / f64::from(attempted)),
        _ => None,
    }
}

/// Points per minute, only defined for a strictly positive minute count.
pub fn per_minute(points: Option<u32>, minutes: Option<f64>) -> Option<f64> {
    match (points, minutes) {
        (Some(points), Some(minutes)) if minutes > 0.0 => Some(f64::from(points) / minutes),
        _ => None,
    }
}

fn valid_ratio(pct: Option<f64>) -> Option<f64> {
    pct.filter(|p| p.is_finite() && (0.0..=1.0).contains(p))
}

/// Minutes from an ISO-8601 style duration: `PT25M01.00S`, `PT1H2M`, `PT48S`.
pub fn iso_duration_minutes(raw: &str) -> Option<f64> {
    let mut rest = raw.trim().strip_prefix("PT")?;
    let mut minutes = 0.0;

    for unit in ['H', 'M', 'S'] {
        if let Some(idx) = rest.find(unit) {
            let value = parse_unsigned(&rest[..idx], unit == 'S')?;
            minutes += match unit {
                'H' => value * 60.0,
                'M' => value,
                _ => value / 60.0,
            };
            rest = &rest[idx + 1..];
        }
    }

    rest.is_empty().then_some(minutes)
}

/// Minutes from a clock string (`"34:12"`, `"34.000000:12"`) or a plain number.
pub fn clock_minutes(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.split_once(':') {
        Some((mm, ss)) => Some(parse_unsigned(mm, true)? + parse_unsigned(ss, true)? / 60.0),
        None => parse_unsigned(raw, true),
    }
}

fn parse_unsigned(s: &str, fractional: bool) -> Option<f64> {
    let ok = !s.is_empty()
        && s.chars().all(|c| c.is_ascii_digit() || (fractional && c == '.'))
        && s.chars().filter(|&c| c == '.').count() <= 1;
    if ok { s.parse::<f64>().ok() } else { None }
}

// ---------------------------------------------------------------------------
// Lenient value coercion: shape errors degrade a single field to `None`
// ---------------------------------------------------------------------------

pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

pub fn value_as_u32(value: &Value) -> Option<u32> {
    value_as_f64(value)
        .filter(|v| *v >= 0.0 && v.fract() == 0.0 && *v <= f64::from(u32::MAX))
        .map(|v| v as u32)
}

pub fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().filter(|v| v.fract() == 0.0).map(|v| v as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

pub fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn lenient_u32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?.as_ref().and_then(value_as_u32))
}

pub(crate) fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?.as_ref().and_then(value_as_f64))
}

pub(crate) fn lenient_i64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?.as_ref().and_then(value_as_i64))
}

pub(crate) fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?.as_ref().and_then(value_as_string))
}
