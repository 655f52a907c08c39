//! Performance Efficiency Index (PEI): a weighted 0-100 score over the
//! latest matches with a letter grade and a short-term trend.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::outcome::is_win;
use super::records::{MatchRecord, WinLoss};
use super::round_half_up;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "S+")]
    SPlus,
    S,
    #[serde(rename = "A+")]
    APlus,
    A,
    #[serde(rename = "B+")]
    BPlus,
    B,
    #[serde(rename = "C+")]
    CPlus,
    C,
    D,
    F,
}

const GRADE_FLOORS: [(u32, Grade); 9] = [
    (90, Grade::SPlus),
    (85, Grade::S),
    (80, Grade::APlus),
    (75, Grade::A),
    (70, Grade::BPlus),
    (65, Grade::B),
    (60, Grade::CPlus),
    (55, Grade::C),
    (50, Grade::D),
];

impl Grade {
    pub fn from_score(score: u32) -> Self {
        GRADE_FLOORS
            .iter()
            .find(|(floor, _)| score >= *floor)
            .map(|(_, grade)| *grade)
            .unwrap_or(Grade::F)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::SPlus => "S+",
            Grade::S => "S",
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceTrend {
    Improving,
    Declining,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceIndex {
    pub score: u32,
    pub grade: Grade,
    pub trend: PerformanceTrend,
}

impl PerformanceIndex {
    pub fn neutral() -> Self {
        PerformanceIndex {
            score: 50,
            grade: Grade::C,
            trend: PerformanceTrend::Stable,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceConfig {
    pub window: usize,
    pub min_games: usize,
    pub kda_cap: f64,
    pub gpm_cap: f64,
    pub xpm_cap: f64,
    /// Averages that earn the full factor weight
    pub kda_par: f64,
    pub gpm_par: f64,
    pub xpm_par: f64,
    pub kda_weight: f64,
    pub gpm_weight: f64,
    pub xpm_weight: f64,
    pub win_rate_weight: f64,
    /// Games per half when comparing newer and older wins
    pub trend_half: usize,
    /// Extra wins one half needs before the trend moves
    pub trend_margin: usize,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        PerformanceConfig {
            window: 20,
            min_games: 5,
            kda_cap: 10.0,
            gpm_cap: 1000.0,
            xpm_cap: 1000.0,
            kda_par: 4.0,
            gpm_par: 600.0,
            xpm_par: 700.0,
            kda_weight: 25.0,
            gpm_weight: 20.0,
            xpm_weight: 15.0,
            win_rate_weight: 40.0,
            trend_half: 10,
            trend_margin: 1,
        }
    }
}

/// PEI over the first `config.window` matches of a most-recent-first list.
///
/// The win-rate factor uses `win_loss` when it holds at least one game and
/// falls back to the window's own results otherwise.
pub fn calculate_performance_index(
    matches: &[MatchRecord],
    win_loss: Option<&WinLoss>,
    config: &PerformanceConfig,
) -> PerformanceIndex {
    let recent = &matches[..matches.len().min(config.window)];
    if recent.len() < config.min_games {
        debug!(games = recent.len(), "not enough games for performance index");
        return PerformanceIndex::neutral();
    }

    let mut total_kda = 0.0;
    let mut total_gpm = 0.0;
    let mut total_xpm = 0.0;
    let mut wins = 0usize;
    for record in recent {
        total_kda += record.kda_ratio().min(config.kda_cap);
        total_gpm += record.gold_per_min.min(config.gpm_cap);
        total_xpm += record.xp_per_min.min(config.xpm_cap);
        if is_win(record) {
            wins += 1;
        }
    }

    let games = recent.len() as f64;
    let avg_kda = total_kda / games;
    let avg_gpm = total_gpm / games;
    let avg_xpm = total_xpm / games;
    let win_rate_pct = win_loss
        .and_then(WinLoss::win_rate_pct)
        .unwrap_or(wins as f64 / games * 100.0);

    let raw = (avg_kda / config.kda_par) * config.kda_weight
        + (avg_gpm / config.gpm_par) * config.gpm_weight
        + (avg_xpm / config.xpm_par) * config.xpm_weight
        + (win_rate_pct / 100.0) * config.win_rate_weight;
    let score = round_half_up(raw).clamp(0.0, 100.0) as u32;

    PerformanceIndex {
        score,
        grade: Grade::from_score(score),
        trend: trend(recent, config),
    }
}

fn trend(recent: &[MatchRecord], config: &PerformanceConfig) -> PerformanceTrend {
    let split = recent.len().min(config.trend_half);
    let (newer, rest) = recent.split_at(split);
    let older = &rest[..rest.len().min(config.trend_half)];

    let newer_wins = newer.iter().filter(|m| is_win(m)).count();
    let older_wins = older.iter().filter(|m| is_win(m)).count();

    if newer_wins > older_wins + config.trend_margin {
        PerformanceTrend::Improving
    } else if older_wins > newer_wins + config.trend_margin {
        PerformanceTrend::Declining
    } else {
        PerformanceTrend::Stable
    }
}
