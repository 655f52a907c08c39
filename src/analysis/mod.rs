//! Session analytics: streaks, momentum, trends, tilt and the performance
//! efficiency index. Everything in here is pure and synchronous; the same
//! input always yields the same output.

pub mod engine;
pub mod hot_cold;
pub mod momentum;
pub mod outcome;
pub mod performance;
pub mod records;
pub mod streak;
pub mod tilt;
pub mod trend;

pub use engine::{EngineConfig, HeroBreakdown, SessionData, SessionEngine, SessionReport};
pub use hot_cold::{find_cold_spell_heroes, find_hot_streak_heroes, HeroStreakEntry, StreakDirection};
pub use momentum::{summarize_momentum, MomentumSummary, OverallMomentum};
pub use outcome::is_win;
pub use performance::{calculate_performance_index, Grade, PerformanceConfig, PerformanceIndex, PerformanceTrend};
pub use records::{tally_hero_stats, Feed, HeroId, HeroStatFeed, HeroStatRecord, MatchFeed, MatchRecord, WinLoss};
pub use streak::{analyze_hero_streak, Momentum, RecentForm, StreakConfig, StreakResult, StreakType, WinLossRecord};
pub use tilt::{calculate_tilt_score, TiltConfig, TiltScore, TiltStatus};
pub use trend::{analyze_trend, Confidence, TrendConfig, TrendDirection, TrendKind, TrendResult};

/// Rounds halves toward positive infinity, so -2.5 becomes -2.
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Fraction of wins in `records`, 0.0 for an empty slice.
pub(crate) fn win_fraction(records: &[&MatchRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let wins = records.iter().filter(|m| is_win(m)).count();
    wins as f64 / records.len() as f64
}

/// The caller-ordered matches for one hero, cut to `limit` entries and then
/// ordered most recent first.
///
/// The cut happens before the sort: an input that is not already most
/// recent first can leave genuinely recent games outside the window.
pub(crate) fn hero_window(matches: &[MatchRecord], hero_id: HeroId, limit: usize) -> Vec<&MatchRecord> {
    let mut window: Vec<&MatchRecord> = matches
        .iter()
        .filter(|m| m.hero_id == hero_id)
        .take(limit)
        .collect();
    window.sort_by(|a, b| b.start_time.cmp(&a.start_time));
    window
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::records::{HeroId, MatchRecord};

    pub const NOW: i64 = 1_700_000_000;

    /// A radiant-side match; `start_time` decreases with `age` so index 0
    /// is the most recent.
    pub fn game(hero_id: HeroId, age: i64, won: bool) -> MatchRecord {
        MatchRecord {
            match_id: (age as u64) * 1000 + hero_id as u64,
            start_time: NOW - age * 3600,
            radiant_win: Some(won),
            player_slot: 1,
            hero_id,
            kills: 5,
            deaths: 5,
            assists: 5,
            duration: 2400,
            gold_per_min: 350.0,
            xp_per_min: 450.0,
        }
    }

    /// Most-recent-first history for one hero from a W/L pattern.
    pub fn history(hero_id: HeroId, pattern: &str) -> Vec<MatchRecord> {
        pattern
            .chars()
            .filter(|c| !c.is_whitespace())
            .enumerate()
            .map(|(age, c)| game(hero_id, age as i64, c == 'W'))
            .collect()
    }
}
