//! Per-hero streak, recent form and momentum.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::outcome::is_win;
use super::records::{HeroId, MatchRecord};
use super::{hero_window, round_half_up, win_fraction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakType {
    None,
    Win,
    Loss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecentForm {
    /// The match feed itself was unusable
    Unknown,
    /// No games on this hero inside the lookback window
    NoData,
    Excellent,
    Good,
    Average,
    Poor,
    Terrible,
}

impl RecentForm {
    /// Classify a win percentage; bands are checked from the top down.
    pub fn from_win_rate(win_rate_pct: f64, config: &StreakConfig) -> Self {
        if win_rate_pct >= config.excellent_form {
            RecentForm::Excellent
        } else if win_rate_pct >= config.good_form {
            RecentForm::Good
        } else if win_rate_pct >= config.average_form {
            RecentForm::Average
        } else if win_rate_pct >= config.poor_form {
            RecentForm::Poor
        } else {
            RecentForm::Terrible
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Momentum {
    Improving,
    Declining,
    Neutral,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinLossRecord {
    pub wins: u32,
    pub losses: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakResult {
    pub current_streak: u32,
    pub streak_type: StreakType,
    pub recent_form: RecentForm,
    pub win_loss_record: WinLossRecord,
    pub momentum: Momentum,
    /// Whole percentage, 0-100
    pub win_rate: u32,
    pub games_analyzed: u32,
}

impl StreakResult {
    fn empty(recent_form: RecentForm) -> Self {
        StreakResult {
            current_streak: 0,
            streak_type: StreakType::None,
            recent_form,
            win_loss_record: WinLossRecord::default(),
            momentum: Momentum::Neutral,
            win_rate: 0,
            games_analyzed: 0,
        }
    }

    /// Result for a match feed that could not be read at all.
    pub fn unknown() -> Self {
        Self::empty(RecentForm::Unknown)
    }

    /// Result for a hero with no games in the window.
    pub fn no_data() -> Self {
        Self::empty(RecentForm::NoData)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StreakConfig {
    pub lookback_games: usize,
    /// Games required before momentum is computed at all
    pub min_momentum_games: usize,
    /// Win-rate swing (as a fraction) between halves that counts as momentum
    pub momentum_threshold: f64,
    pub excellent_form: f64,
    pub good_form: f64,
    pub average_form: f64,
    pub poor_form: f64,
}

impl Default for StreakConfig {
    fn default() -> Self {
        StreakConfig {
            lookback_games: 10,
            min_momentum_games: 4,
            momentum_threshold: 0.2,
            excellent_form: 70.0,
            good_form: 60.0,
            average_form: 40.0,
            poor_form: 30.0,
        }
    }
}

impl StreakConfig {
    pub fn with_lookback(lookback_games: usize) -> Self {
        StreakConfig {
            lookback_games,
            ..Self::default()
        }
    }
}

/// Streak and form for `hero_id` over the first `lookback_games` of the
/// caller's list.
pub fn analyze_hero_streak(matches: &[MatchRecord], hero_id: HeroId, config: &StreakConfig) -> StreakResult {
    let recent = hero_window(matches, hero_id, config.lookback_games);
    if recent.is_empty() {
        debug!(hero_id, "no games in lookback window");
        return StreakResult::no_data();
    }

    let latest_won = is_win(recent[0]);
    let streak_type = if latest_won { StreakType::Win } else { StreakType::Loss };
    let current_streak = recent
        .iter()
        .take_while(|m| is_win(m) == latest_won)
        .count() as u32;

    let games_analyzed = recent.len() as u32;
    let wins = recent.iter().filter(|m| is_win(m)).count() as u32;
    let win_rate_pct = wins as f64 / games_analyzed as f64 * 100.0;

    StreakResult {
        current_streak,
        streak_type,
        recent_form: RecentForm::from_win_rate(win_rate_pct, config),
        win_loss_record: WinLossRecord {
            wins,
            losses: games_analyzed - wins,
        },
        momentum: momentum(&recent, config),
        win_rate: round_half_up(win_rate_pct) as u32,
        games_analyzed,
    }
}

fn momentum(recent: &[&MatchRecord], config: &StreakConfig) -> Momentum {
    if recent.len() < config.min_momentum_games {
        return Momentum::Neutral;
    }

    let (recent_half, older_half) = recent.split_at(recent.len() / 2);
    let difference = win_fraction(recent_half) - win_fraction(older_half);

    if difference > config.momentum_threshold {
        Momentum::Improving
    } else if difference < -config.momentum_threshold {
        Momentum::Declining
    } else {
        Momentum::Neutral
    }
}
