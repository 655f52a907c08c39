use serde::{Deserialize, Serialize};

use super::hot_cold::{find_cold_spell_heroes, find_hot_streak_heroes, HeroStreakEntry};
use super::records::{HeroStatRecord, MatchRecord};
use super::streak::StreakConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallMomentum {
    Positive,
    Negative,
    Neutral,
}

/// Dashboard-level momentum: the best hot streak, the worst cold spell and
/// which side has more heroes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MomentumSummary {
    pub hot_streak: Option<HeroStreakEntry>,
    pub cold_spell: Option<HeroStreakEntry>,
    pub momentum: OverallMomentum,
    pub hot_count: usize,
    pub cold_count: usize,
}

impl MomentumSummary {
    /// Build from already ranked hot and cold lists. Counts decide the
    /// momentum; streak lengths do not.
    pub fn from_lists(hot: &[HeroStreakEntry], cold: &[HeroStreakEntry]) -> Self {
        let momentum = match hot.len().cmp(&cold.len()) {
            std::cmp::Ordering::Greater => OverallMomentum::Positive,
            std::cmp::Ordering::Less => OverallMomentum::Negative,
            std::cmp::Ordering::Equal => OverallMomentum::Neutral,
        };

        MomentumSummary {
            hot_streak: hot.first().cloned(),
            cold_spell: cold.first().cloned(),
            momentum,
            hot_count: hot.len(),
            cold_count: cold.len(),
        }
    }
}

pub fn summarize_momentum(
    matches: &[MatchRecord],
    hero_stats: &[HeroStatRecord],
    min_streak: u32,
    config: &StreakConfig,
) -> MomentumSummary {
    let hot = find_hot_streak_heroes(matches, hero_stats, min_streak, config);
    let cold = find_cold_spell_heroes(matches, hero_stats, min_streak, config);
    MomentumSummary::from_lists(&hot, &cold)
}
