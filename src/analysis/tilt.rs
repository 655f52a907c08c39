//! Recency-weighted tilt score over the latest games.
//!
//! Each game contributes four signals (KDA, farm, experience, result), each
//! worth +1, 0 or -1. Signals are weighted by recency, scaled and added to a
//! neutral base of 50, then clamped to 0-100.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::outcome::is_win;
use super::records::MatchRecord;
use super::round_half_up;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TiltStatus {
    /// Not enough games to say anything
    Stable,
    Flow,
    Good,
    Neutral,
    Warning,
    Danger,
}

impl TiltStatus {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            TiltStatus::Flow
        } else if score >= 60.0 {
            TiltStatus::Good
        } else if score >= 40.0 {
            TiltStatus::Neutral
        } else if score >= 20.0 {
            TiltStatus::Warning
        } else {
            TiltStatus::Danger
        }
    }

    pub fn advice(self) -> &'static str {
        match self {
            TiltStatus::Stable => "Not enough data",
            TiltStatus::Flow => "IN THE ZONE! Keep playing!",
            TiltStatus::Good => "Playing well, stay sharp",
            TiltStatus::Neutral => "Mixed results, stay focused",
            TiltStatus::Warning => "Consider taking a break",
            TiltStatus::Danger => "STOP PLAYING NOW!",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TiltScore {
    /// 0-100, higher is better
    pub level: u32,
    pub status: TiltStatus,
    pub message: String,
}

impl TiltScore {
    pub fn not_enough_data() -> Self {
        TiltScore {
            level: 0,
            status: TiltStatus::Stable,
            message: TiltStatus::Stable.advice().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TiltConfig {
    pub window: usize,
    pub min_games: usize,
    /// Weight lost per step back in time
    pub weight_step: f64,
    pub base_score: f64,
    pub kda_scale: f64,
    pub farm_scale: f64,
    pub experience_scale: f64,
    pub result_scale: f64,
    pub kda_high: f64,
    pub kda_low: f64,
    pub gpm_high: f64,
    pub gpm_low: f64,
    pub xpm_high: f64,
    pub xpm_low: f64,
}

impl Default for TiltConfig {
    fn default() -> Self {
        TiltConfig {
            window: 10,
            min_games: 3,
            weight_step: 0.1,
            base_score: 50.0,
            kda_scale: 10.0,
            farm_scale: 8.0,
            experience_scale: 7.0,
            result_scale: 15.0,
            kda_high: 2.0,
            kda_low: 1.0,
            gpm_high: 400.0,
            gpm_low: 300.0,
            xpm_high: 500.0,
            xpm_low: 400.0,
        }
    }
}

#[derive(Debug, Default)]
struct SignalTotals {
    kda: f64,
    farm: f64,
    experience: f64,
    results: f64,
}

/// +1 above `high`, -1 below `low`, 0 in between.
fn signal(value: f64, high: f64, low: f64) -> f64 {
    if value > high {
        1.0
    } else if value < low {
        -1.0
    } else {
        0.0
    }
}

/// Tilt score for the first `config.window` matches of a most-recent-first
/// list.
pub fn calculate_tilt_score(matches: &[MatchRecord], config: &TiltConfig) -> TiltScore {
    let recent = &matches[..matches.len().min(config.window)];
    if recent.len() < config.min_games {
        debug!(games = recent.len(), "not enough games for tilt score");
        return TiltScore::not_enough_data();
    }

    let mut totals = SignalTotals::default();
    for (index, record) in recent.iter().enumerate() {
        let weight = 1.0 - index as f64 * config.weight_step;

        totals.kda += signal(record.kda_ratio(), config.kda_high, config.kda_low) * weight;
        totals.farm += signal(record.gold_per_min, config.gpm_high, config.gpm_low) * weight;
        totals.experience += signal(record.xp_per_min, config.xpm_high, config.xpm_low) * weight;
        totals.results += if is_win(record) { weight } else { -weight };
    }

    let score = (config.base_score
        + totals.kda * config.kda_scale
        + totals.farm * config.farm_scale
        + totals.experience * config.experience_scale
        + totals.results * config.result_scale)
        .clamp(0.0, 100.0);

    let status = TiltStatus::from_score(score);
    TiltScore {
        level: round_half_up(score) as u32,
        status,
        message: status.advice().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::{game, history};

    fn sharp_win(age: i64) -> MatchRecord {
        MatchRecord {
            kills: 12,
            deaths: 2,
            assists: 9,
            gold_per_min: 650.0,
            xp_per_min: 720.0,
            ..game(1, age, true)
        }
    }

    fn feeding_loss(age: i64) -> MatchRecord {
        MatchRecord {
            kills: 1,
            deaths: 11,
            assists: 3,
            gold_per_min: 210.0,
            xp_per_min: 280.0,
            ..game(1, age, false)
        }
    }

    #[test]
    fn fewer_than_three_games_is_not_enough() {
        let result = calculate_tilt_score(&history(1, "WW"), &TiltConfig::default());
        assert_eq!(result, TiltScore::not_enough_data());
        assert_eq!(result.status, TiltStatus::Stable);
        assert_eq!(result.message, "Not enough data");

        assert_eq!(calculate_tilt_score(&[], &TiltConfig::default()).level, 0);
    }

    #[test]
    fn dominant_session_is_flow() {
        let matches: Vec<MatchRecord> = (0..10).map(sharp_win).collect();
        let result = calculate_tilt_score(&matches, &TiltConfig::default());
        assert_eq!(result.level, 100);
        assert_eq!(result.status, TiltStatus::Flow);
        assert_eq!(result.message, "IN THE ZONE! Keep playing!");
    }

    #[test]
    fn losing_spiral_is_danger() {
        let matches: Vec<MatchRecord> = (0..6).map(feeding_loss).collect();
        let result = calculate_tilt_score(&matches, &TiltConfig::default());
        assert_eq!(result.level, 0);
        assert_eq!(result.status, TiltStatus::Danger);
        assert_eq!(result.message, "STOP PLAYING NOW!");
    }

    #[test]
    fn average_stats_alternating_results_are_neutral() {
        // Fixture stats sit inside every neutral band, only results count
        let result = calculate_tilt_score(&history(1, "WLWL"), &TiltConfig::default());
        assert_eq!(result.level, 53);
        assert_eq!(result.status, TiltStatus::Neutral);
    }

    #[test]
    fn recent_games_weigh_more() {
        let win_first = calculate_tilt_score(&history(1, "WLL"), &TiltConfig::default());
        let win_last = calculate_tilt_score(&history(1, "LLW"), &TiltConfig::default());
        assert!(win_first.level > win_last.level);
    }

    #[test]
    fn only_the_window_counts() {
        let mut matches = history(1, "WWWWWWWWWW");
        matches.extend((10..30).map(feeding_loss));

        let full = calculate_tilt_score(&matches, &TiltConfig::default());
        let window_only = calculate_tilt_score(&matches[..10], &TiltConfig::default());
        assert_eq!(full, window_only);
    }

    #[test]
    fn status_bands() {
        assert_eq!(TiltStatus::from_score(80.0), TiltStatus::Flow);
        assert_eq!(TiltStatus::from_score(79.9), TiltStatus::Good);
        assert_eq!(TiltStatus::from_score(60.0), TiltStatus::Good);
        assert_eq!(TiltStatus::from_score(40.0), TiltStatus::Neutral);
        assert_eq!(TiltStatus::from_score(20.0), TiltStatus::Warning);
        assert_eq!(TiltStatus::from_score(19.9), TiltStatus::Danger);
        assert_eq!(TiltStatus::Warning.advice(), "Consider taking a break");
    }
}
