//! Stateless service that runs every calculator over one session's data.
//!
//! The per-calculator functions take plain slices. The engine sits at the
//! data boundary: it accepts feeds that may be missing altogether and maps
//! them to the documented defaults instead of failing.

use serde::Serialize;
use tracing::debug;

use super::hot_cold::{find_cold_spell_heroes, find_hot_streak_heroes, HeroStreakEntry, DEFAULT_MIN_STREAK};
use super::momentum::MomentumSummary;
use super::performance::{calculate_performance_index, PerformanceConfig, PerformanceIndex};
use super::records::{HeroId, HeroStatFeed, HeroStatRecord, MatchFeed, MatchRecord, WinLoss};
use super::streak::{analyze_hero_streak, StreakConfig, StreakResult};
use super::tilt::{calculate_tilt_score, TiltConfig, TiltScore};
use super::trend::{analyze_trend, TrendConfig, TrendResult};

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub streak: StreakConfig,
    pub trend: TrendConfig,
    pub tilt: TiltConfig,
    pub performance: PerformanceConfig,
    pub min_streak: u32,
    /// Most played heroes that get a per-hero breakdown in the report
    pub breakdown_heroes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            streak: StreakConfig::default(),
            trend: TrendConfig::default(),
            tilt: TiltConfig::default(),
            performance: PerformanceConfig::default(),
            min_streak: DEFAULT_MIN_STREAK,
            breakdown_heroes: 5,
        }
    }
}

/// Everything the data layer hands over for one analytics pass.
#[derive(Debug, Clone)]
pub struct SessionData {
    pub matches: MatchFeed,
    pub hero_stats: HeroStatFeed,
    pub win_loss: Option<WinLoss>,
}

impl SessionData {
    pub fn new(matches: Vec<MatchRecord>, hero_stats: Vec<HeroStatRecord>) -> Self {
        SessionData {
            matches: matches.into(),
            hero_stats: hero_stats.into(),
            win_loss: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroBreakdown {
    pub hero_id: HeroId,
    pub name: String,
    pub games: u32,
    pub streak: StreakResult,
    pub trend: TrendResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub matches_analyzed: usize,
    pub summary: MomentumSummary,
    pub hot_heroes: Vec<HeroStreakEntry>,
    pub cold_heroes: Vec<HeroStreakEntry>,
    pub tilt: TiltScore,
    pub performance: PerformanceIndex,
    pub heroes: Vec<HeroBreakdown>,
}

#[derive(Debug, Clone, Default)]
pub struct SessionEngine {
    config: EngineConfig,
}

impl SessionEngine {
    pub fn new(config: EngineConfig) -> Self {
        SessionEngine { config }
    }

    pub fn hero_streak(&self, matches: Option<&[MatchRecord]>, hero_id: HeroId) -> StreakResult {
        match matches {
            Some(matches) => analyze_hero_streak(matches, hero_id, &self.config.streak),
            None => {
                debug!(hero_id, "match feed missing, streak unknown");
                StreakResult::unknown()
            }
        }
    }

    pub fn hot_streak_heroes(
        &self,
        matches: Option<&[MatchRecord]>,
        hero_stats: Option<&[HeroStatRecord]>,
    ) -> Vec<HeroStreakEntry> {
        match (matches, hero_stats) {
            (Some(matches), Some(stats)) => {
                find_hot_streak_heroes(matches, stats, self.config.min_streak, &self.config.streak)
            }
            _ => Vec::new(),
        }
    }

    pub fn cold_spell_heroes(
        &self,
        matches: Option<&[MatchRecord]>,
        hero_stats: Option<&[HeroStatRecord]>,
    ) -> Vec<HeroStreakEntry> {
        match (matches, hero_stats) {
            (Some(matches), Some(stats)) => {
                find_cold_spell_heroes(matches, stats, self.config.min_streak, &self.config.streak)
            }
            _ => Vec::new(),
        }
    }

    pub fn momentum_summary(
        &self,
        matches: Option<&[MatchRecord]>,
        hero_stats: Option<&[HeroStatRecord]>,
    ) -> MomentumSummary {
        let hot = self.hot_streak_heroes(matches, hero_stats);
        let cold = self.cold_spell_heroes(matches, hero_stats);
        MomentumSummary::from_lists(&hot, &cold)
    }

    pub fn hero_trend(&self, matches: Option<&[MatchRecord]>, hero_id: HeroId) -> TrendResult {
        match matches {
            Some(matches) => analyze_trend(matches, hero_id, &self.config.trend),
            None => TrendResult::insufficient_data(),
        }
    }

    pub fn tilt(&self, matches: Option<&[MatchRecord]>) -> TiltScore {
        match matches {
            Some(matches) => calculate_tilt_score(matches, &self.config.tilt),
            None => TiltScore::not_enough_data(),
        }
    }

    pub fn performance(&self, matches: Option<&[MatchRecord]>, win_loss: Option<&WinLoss>) -> PerformanceIndex {
        match matches {
            Some(matches) => calculate_performance_index(matches, win_loss, &self.config.performance),
            None => PerformanceIndex::neutral(),
        }
    }

    /// Per-hero streak and trend for the most played heroes.
    pub fn hero_breakdowns(
        &self,
        matches: Option<&[MatchRecord]>,
        hero_stats: Option<&[HeroStatRecord]>,
    ) -> Vec<HeroBreakdown> {
        let Some(stats) = hero_stats else {
            return Vec::new();
        };

        let mut by_games: Vec<&HeroStatRecord> = stats.iter().collect();
        by_games.sort_by(|a, b| b.games.cmp(&a.games));

        by_games
            .into_iter()
            .take(self.config.breakdown_heroes)
            .map(|hero| HeroBreakdown {
                hero_id: hero.hero_id,
                name: hero.display_name(),
                games: hero.games,
                streak: self.hero_streak(matches, hero.hero_id),
                trend: self.hero_trend(matches, hero.hero_id),
            })
            .collect()
    }

    /// Streak and trend for one hero, named from the hero table when it is
    /// listed there.
    pub fn focus_hero(
        &self,
        matches: Option<&[MatchRecord]>,
        hero_stats: Option<&[HeroStatRecord]>,
        hero_id: HeroId,
    ) -> HeroBreakdown {
        let listed = hero_stats.and_then(|stats| stats.iter().find(|h| h.hero_id == hero_id));
        HeroBreakdown {
            hero_id,
            name: listed.map_or_else(|| format!("Hero {}", hero_id), HeroStatRecord::display_name),
            games: listed.map_or(0, |h| h.games),
            streak: self.hero_streak(matches, hero_id),
            trend: self.hero_trend(matches, hero_id),
        }
    }

    /// Full dashboard pass over one session.
    pub fn report(&self, data: &SessionData) -> SessionReport {
        let matches = data.matches.as_slice();
        let hero_stats = data.hero_stats.as_slice();

        let hot_heroes = self.hot_streak_heroes(matches, hero_stats);
        let cold_heroes = self.cold_spell_heroes(matches, hero_stats);
        let summary = MomentumSummary::from_lists(&hot_heroes, &cold_heroes);

        debug!(
            matches = data.matches.len(),
            heroes = data.hero_stats.len(),
            hot = hot_heroes.len(),
            cold = cold_heroes.len(),
            "session report built"
        );

        SessionReport {
            matches_analyzed: data.matches.len(),
            summary,
            hot_heroes,
            cold_heroes,
            tilt: self.tilt(matches),
            performance: self.performance(matches, data.win_loss.as_ref()),
            heroes: self.hero_breakdowns(matches, hero_stats),
        }
    }
}
