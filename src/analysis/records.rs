//! Input records consumed by the analytics engine and the JSON boundary
//! that turns loosely-typed API payloads into them.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

use super::outcome::is_win;

pub type HeroId = u32;

/// One completed match from the player's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub start_time: i64,
    /// `None` when the API never recorded a winner (abandoned or unparsed)
    #[serde(default)]
    pub radiant_win: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub player_slot: u8,
    #[serde(deserialize_with = "flexible_hero_id")]
    pub hero_id: HeroId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub kills: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub deaths: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub assists: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gold_per_min: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub xp_per_min: f64,
}

impl MatchRecord {
    /// Kills plus assists over deaths, with deaths floored at one.
    pub fn kda_ratio(&self) -> f64 {
        (u64::from(self.kills) + u64::from(self.assists)) as f64 / self.deaths.max(1) as f64
    }

    pub fn is_radiant(&self) -> bool {
        self.player_slot < 128
    }
}

/// Aggregate stats for one hero, as reported by the player's hero table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroStatRecord {
    #[serde(deserialize_with = "flexible_hero_id")]
    pub hero_id: HeroId,
    #[serde(default, alias = "localized_name")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub games: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub win: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub kills: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub deaths: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub assists: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gold: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub xp: u64,
}

impl HeroStatRecord {
    pub fn new(hero_id: HeroId, games: u32, win: u32) -> Self {
        HeroStatRecord {
            hero_id,
            name: None,
            games,
            win,
            kills: 0,
            deaths: 0,
            assists: 0,
            gold: 0,
            xp: 0,
        }
    }

    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("Hero {}", self.hero_id),
        }
    }
}

/// Build per-hero totals from a match list, most played first.
///
/// Used when the data layer has matches but no hero table.
pub fn tally_hero_stats(matches: &[MatchRecord]) -> Vec<HeroStatRecord> {
    let mut by_hero: BTreeMap<HeroId, HeroStatRecord> = BTreeMap::new();
    for record in matches {
        let entry = by_hero
            .entry(record.hero_id)
            .or_insert_with(|| HeroStatRecord::new(record.hero_id, 0, 0));
        entry.games += 1;
        if is_win(record) {
            entry.win += 1;
        }
        entry.kills += u64::from(record.kills);
        entry.deaths += u64::from(record.deaths);
        entry.assists += u64::from(record.assists);
        let minutes = record.duration as f64 / 60.0;
        entry.gold += (record.gold_per_min * minutes).round() as u64;
        entry.xp += (record.xp_per_min * minutes).round() as u64;
    }

    let mut stats: Vec<HeroStatRecord> = by_hero.into_values().collect();
    stats.sort_by(|a, b| b.games.cmp(&a.games));
    stats
}

/// Lifetime win/loss counts for the player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinLoss {
    #[serde(default)]
    pub win: u32,
    #[serde(default)]
    pub lose: u32,
}

impl WinLoss {
    pub fn total(&self) -> u32 {
        self.win + self.lose
    }

    /// Win percentage, or `None` when no games were recorded.
    pub fn win_rate_pct(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            total => Some(self.win as f64 / total as f64 * 100.0),
        }
    }
}

/// A collection handed over by the data layer.
///
/// `Missing` means the payload was not a list at all, which the engine
/// answers with its documented defaults instead of an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Feed<T> {
    Missing,
    Records(Vec<T>),
}

pub type MatchFeed = Feed<MatchRecord>;
pub type HeroStatFeed = Feed<HeroStatRecord>;

impl<T: DeserializeOwned> Feed<T> {
    /// Validate a raw JSON payload. Elements that do not fit the record
    /// shape are dropped.
    pub fn from_json(value: &Value) -> Self {
        let Value::Array(items) = value else {
            warn!("expected a JSON array, got {}", json_kind(value));
            return Feed::Missing;
        };

        let mut records = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            match T::deserialize(item) {
                Ok(record) => records.push(record),
                Err(e) => warn!(index = idx, error = %e, "dropping malformed record"),
            }
        }
        Feed::Records(records)
    }
}

impl<T> Feed<T> {
    pub fn as_slice(&self) -> Option<&[T]> {
        match self {
            Feed::Missing => None,
            Feed::Records(records) => Some(records),
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().map_or(0, <[T]>::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> From<Vec<T>> for Feed<T> {
    fn from(records: Vec<T>) -> Self {
        Feed::Records(records)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// OpenDota returns hero ids as strings on some endpoints
fn flexible_hero_id<'de, D>(deserializer: D) -> Result<HeroId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(HeroId),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(id) => Ok(id),
        RawId::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid hero id '{}'", text))),
    }
}
