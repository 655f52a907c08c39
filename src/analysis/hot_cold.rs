use serde::{Deserialize, Serialize};

use super::records::{HeroId, HeroStatRecord, MatchRecord};
use super::streak::{analyze_hero_streak, Momentum, RecentForm, StreakConfig, StreakType};

pub const DEFAULT_MIN_STREAK: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakDirection {
    /// Heroes on a winning run
    Hot,
    /// Heroes on a losing run
    Cold,
}

impl StreakDirection {
    fn streak_type(self) -> StreakType {
        match self {
            StreakDirection::Hot => StreakType::Win,
            StreakDirection::Cold => StreakType::Loss,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroStreakEntry {
    pub hero_id: HeroId,
    pub name: String,
    pub streak: u32,
    pub recent_form: RecentForm,
    pub win_rate: u32,
    pub momentum: Momentum,
}

/// Heroes whose current streak runs in `direction` for at least
/// `min_streak` games, longest streak first.
pub fn find_streak_heroes(
    matches: &[MatchRecord],
    hero_stats: &[HeroStatRecord],
    direction: StreakDirection,
    min_streak: u32,
    config: &StreakConfig,
) -> Vec<HeroStreakEntry> {
    let wanted = direction.streak_type();

    let mut entries: Vec<HeroStreakEntry> = hero_stats
        .iter()
        .filter_map(|hero| {
            let result = analyze_hero_streak(matches, hero.hero_id, config);
            if result.streak_type != wanted || result.current_streak < min_streak {
                return None;
            }
            Some(HeroStreakEntry {
                hero_id: hero.hero_id,
                name: hero.display_name(),
                streak: result.current_streak,
                recent_form: result.recent_form,
                win_rate: result.win_rate,
                momentum: result.momentum,
            })
        })
        .collect();

    entries.sort_by(|a, b| b.streak.cmp(&a.streak));
    entries
}

pub fn find_hot_streak_heroes(
    matches: &[MatchRecord],
    hero_stats: &[HeroStatRecord],
    min_streak: u32,
    config: &StreakConfig,
) -> Vec<HeroStreakEntry> {
    find_streak_heroes(matches, hero_stats, StreakDirection::Hot, min_streak, config)
}

pub fn find_cold_spell_heroes(
    matches: &[MatchRecord],
    hero_stats: &[HeroStatRecord],
    min_streak: u32,
    config: &StreakConfig,
) -> Vec<HeroStreakEntry> {
    find_streak_heroes(matches, hero_stats, StreakDirection::Cold, min_streak, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::history;

    fn stats(ids: &[HeroId]) -> Vec<HeroStatRecord> {
        ids.iter().map(|&id| HeroStatRecord::new(id, 20, 10)).collect()
    }

    fn pool() -> Vec<MatchRecord> {
        let mut matches = history(1, "WWWL");
        matches.extend(history(2, "WWWWWL"));
        matches.extend(history(3, "LLLW"));
        matches.extend(history(4, "WWL"));
        matches
    }

    #[test]
    fn hot_heroes_sorted_by_streak() {
        let hot = find_hot_streak_heroes(&pool(), &stats(&[1, 2, 3, 4]), 3, &StreakConfig::default());

        let ids: Vec<HeroId> = hot.iter().map(|e| e.hero_id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(hot[0].streak, 5);
        assert_eq!(hot[0].name, "Hero 2");
    }

    #[test]
    fn cold_heroes_need_min_streak() {
        let config = StreakConfig::default();
        let cold = find_cold_spell_heroes(&pool(), &stats(&[1, 2, 3, 4]), 3, &config);
        assert_eq!(cold.len(), 1);
        assert_eq!(cold[0].hero_id, 3);

        let cold = find_cold_spell_heroes(&pool(), &stats(&[3]), 4, &config);
        assert!(cold.is_empty());
    }

    #[test]
    fn lower_threshold_admits_shorter_runs() {
        let hot = find_hot_streak_heroes(&pool(), &stats(&[1, 2, 3, 4]), 2, &StreakConfig::default());
        assert_eq!(hot.len(), 3);
        assert_eq!(hot.last().map(|e| e.hero_id), Some(4));
    }

    #[test]
    fn uses_hero_names_when_known() {
        let mut heroes = stats(&[2]);
        heroes[0].name = Some("Juggernaut".to_string());

        let hot = find_hot_streak_heroes(&pool(), &heroes, 3, &StreakConfig::default());
        assert_eq!(hot[0].name, "Juggernaut");
    }

    #[test]
    fn empty_hero_list_yields_nothing() {
        assert!(find_hot_streak_heroes(&pool(), &[], 3, &StreakConfig::default()).is_empty());
    }
}
