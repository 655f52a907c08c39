use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use chrono::{DateTime, Utc};
use tracing::debug;
use crate::analysis::records::{HeroStatRecord, MatchRecord, WinLoss};
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CachedProfile {
    pub account_id: u64,
    pub persona_name: Option<String>,
    pub cached_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchCache {
    pub account_id: u64,
    pub last_updated: DateTime<Utc>,
    pub matches: Vec<MatchRecord>,
    #[serde(default)]
    pub hero_stats: Vec<HeroStatRecord>,
    #[serde(default)]
    pub win_loss: Option<WinLoss>,
    #[serde(default)]
    pub profile: Option<CachedProfile>,
}

/// `~/.dota_momentum`, created on demand.
pub fn data_dir() -> PathBuf {
    let dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".dota_momentum");

    let _ = fs::create_dir_all(&dir);
    dir
}

impl MatchCache {
    pub fn new(account_id: u64) -> Self {
        MatchCache {
            account_id,
            last_updated: Utc::now(),
            matches: Vec::new(),
            hero_stats: Vec::new(),
            win_loss: None,
            profile: None,
        }
    }

    pub fn set_profile(&mut self, persona_name: Option<String>) {
        self.profile = Some(CachedProfile {
            account_id: self.account_id,
            persona_name,
            cached_at: Utc::now(),
        });
    }

    pub fn get_cached_profile(&self) -> Option<CachedProfile> {
        self.profile.clone()
    }

    pub fn get_cache_path(account_id: u64) -> PathBuf {
        data_dir().join(format!("{}.json", account_id))
    }

    pub fn load(account_id: u64) -> Result<Self, AppError> {
        Self::load_from(&Self::get_cache_path(account_id), account_id)
    }

    /// Read a cache file; a missing file yields an empty cache.
    pub fn load_from(path: &Path, account_id: u64) -> Result<Self, AppError> {
        match fs::read_to_string(path) {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|e| {
                    AppError::CacheError(format!("Failed to parse cache: {}", e))
                })
            }
            Err(_) => {
                debug!(path = %path.display(), "no cache yet");
                Ok(MatchCache::new(account_id))
            }
        }
    }

    pub fn save(&self) -> Result<(), AppError> {
        self.save_to(&Self::get_cache_path(self.account_id))
    }

    pub fn save_to(&self, path: &Path) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            AppError::CacheError(format!("Failed to serialize cache: {}", e))
        })?;

        fs::write(path, json).map_err(|e| {
            AppError::CacheError(format!("Failed to write cache: {}", e))
        })?;

        Ok(())
    }

    /// Merge freshly fetched matches, skipping ids already cached. Returns
    /// how many were new.
    pub fn add_matches(&mut self, new_matches: Vec<MatchRecord>) -> usize {
        let mut known: HashSet<u64> = self.matches.iter().map(|m| m.match_id).collect();

        let before = self.matches.len();
        for new_match in new_matches {
            if known.insert(new_match.match_id) {
                self.matches.push(new_match);
            }
        }

        // Keep most recent matches first
        self.matches.sort_by(|a, b| b.start_time.cmp(&a.start_time));

        self.last_updated = Utc::now();
        self.matches.len() - before
    }

    pub fn set_hero_stats(&mut self, hero_stats: Vec<HeroStatRecord>, win_loss: WinLoss) {
        self.hero_stats = hero_stats;
        self.win_loss = Some(win_loss);
        self.last_updated = Utc::now();
    }

    pub fn get_recent_matches(&self, count: usize) -> Vec<MatchRecord> {
        self.matches.iter()
            .take(count)
            .cloned()
            .collect()
    }

    pub fn is_stale(&self, max_age_mins: u64) -> bool {
        let now = Utc::now();
        let age = now.signed_duration_since(self.last_updated);
        age.num_minutes() > max_age_mins as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(match_id: u64, start_time: i64) -> MatchRecord {
        MatchRecord {
            match_id,
            start_time,
            radiant_win: Some(true),
            player_slot: 0,
            hero_id: 1,
            kills: 0,
            deaths: 0,
            assists: 0,
            duration: 0,
            gold_per_min: 0.0,
            xp_per_min: 0.0,
        }
    }

    #[test]
    fn add_matches_dedups_and_orders_newest_first() {
        let mut cache = MatchCache::new(1);
        assert_eq!(cache.add_matches(vec![record(1, 100), record(2, 300)]), 2);
        assert_eq!(cache.add_matches(vec![record(2, 300), record(3, 200), record(3, 200)]), 1);

        let ids: Vec<u64> = cache.matches.iter().map(|m| m.match_id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert_eq!(cache.get_recent_matches(2).len(), 2);
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("42.json");

        let mut cache = MatchCache::new(42);
        cache.add_matches(vec![record(9, 500)]);
        cache.set_hero_stats(vec![HeroStatRecord::new(1, 3, 2)], WinLoss { win: 2, lose: 1 });
        cache.set_profile(Some("Puppey".to_string()));
        cache.save_to(&path).unwrap();

        let loaded = MatchCache::load_from(&path, 42).unwrap();
        assert_eq!(loaded.matches, cache.matches);
        assert_eq!(loaded.hero_stats, cache.hero_stats);
        assert_eq!(loaded.win_loss, Some(WinLoss { win: 2, lose: 1 }));
        assert_eq!(
            loaded.get_cached_profile().and_then(|p| p.persona_name),
            Some("Puppey".to_string())
        );
    }

    #[test]
    fn missing_file_is_an_empty_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = MatchCache::load_from(&dir.path().join("nope.json"), 7).unwrap();
        assert_eq!(cache.account_id, 7);
        assert!(cache.matches.is_empty());
    }

    #[test]
    fn corrupt_file_is_a_cache_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(MatchCache::load_from(&path, 7), Err(AppError::CacheError(_))));
    }

    #[test]
    fn staleness_follows_last_update() {
        let mut cache = MatchCache::new(1);
        assert!(!cache.is_stale(30));
        cache.last_updated = Utc::now() - Duration::minutes(45);
        assert!(cache.is_stale(30));
    }
}
