//! Directional trend for one hero: the latest window of games against the
//! window before it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::records::{HeroId, MatchRecord};
use super::{hero_window, round_half_up, win_fraction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendKind {
    InsufficientData,
    Stable,
    Improving,
    Declining,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    None,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendResult {
    pub trend: TrendKind,
    pub direction: TrendDirection,
    /// 0 (flat) to 3 (strong swing)
    pub strength: u8,
    pub confidence: Confidence,
    pub recent_win_rate: u32,
    pub older_win_rate: u32,
    /// Percentage points, negative when the recent window is worse
    pub improvement: i32,
}

impl TrendResult {
    pub fn insufficient_data() -> Self {
        TrendResult {
            trend: TrendKind::InsufficientData,
            direction: TrendDirection::None,
            strength: 0,
            confidence: Confidence::Low,
            recent_win_rate: 0,
            older_win_rate: 0,
            improvement: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendConfig {
    pub window_size: usize,
    /// Swing beyond which the trend has a direction
    pub direction_threshold: f64,
    pub strong_swing: f64,
    pub moderate_swing: f64,
    pub weak_swing: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        TrendConfig {
            window_size: 5,
            direction_threshold: 0.1,
            strong_swing: 0.4,
            moderate_swing: 0.2,
            weak_swing: 0.1,
        }
    }
}

impl TrendConfig {
    pub fn with_window(window_size: usize) -> Self {
        TrendConfig {
            window_size,
            ..Self::default()
        }
    }

    fn strength(&self, swing: f64) -> (u8, Confidence) {
        if swing >= self.strong_swing {
            (3, Confidence::High)
        } else if swing >= self.moderate_swing {
            (2, Confidence::Medium)
        } else if swing >= self.weak_swing {
            (1, Confidence::Low)
        } else {
            (0, Confidence::Low)
        }
    }
}

pub fn analyze_trend(matches: &[MatchRecord], hero_id: HeroId, config: &TrendConfig) -> TrendResult {
    let size = config.window_size;
    if size == 0 {
        return TrendResult::insufficient_data();
    }

    let Some(needed) = size.checked_mul(2) else {
        return TrendResult::insufficient_data();
    };

    let games = hero_window(matches, hero_id, needed);
    if games.len() < needed {
        debug!(hero_id, games = games.len(), needed, "not enough games for trend");
        return TrendResult::insufficient_data();
    }

    let (recent_window, older_window) = games.split_at(size);
    let recent_rate = win_fraction(recent_window);
    let older_rate = win_fraction(older_window);
    let difference = recent_rate - older_rate;

    let (strength, confidence) = config.strength(difference.abs());
    let (trend, direction) = if difference > config.direction_threshold {
        (TrendKind::Improving, TrendDirection::Up)
    } else if difference < -config.direction_threshold {
        (TrendKind::Declining, TrendDirection::Down)
    } else {
        (TrendKind::Stable, TrendDirection::None)
    };

    TrendResult {
        trend,
        direction,
        strength,
        confidence,
        recent_win_rate: round_half_up(recent_rate * 100.0) as u32,
        older_win_rate: round_half_up(older_rate * 100.0) as u32,
        improvement: round_half_up(difference * 100.0) as i32,
    }
}
