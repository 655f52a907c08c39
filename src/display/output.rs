use crate::analysis::{
    is_win, Confidence, Grade, HeroBreakdown, HeroStreakEntry, Momentum, MatchRecord, MomentumSummary,
    OverallMomentum, PerformanceIndex, PerformanceTrend, RecentForm, SessionReport, StreakType, TiltScore,
    TiltStatus, TrendDirection, TrendKind,
};
use crate::rate_limit::{RequestLog, MAX_REQUESTS_PER_DAY, MAX_REQUESTS_PER_MINUTE};
use chrono::{TimeZone, Utc};
use colored::*;
use std::collections::HashMap;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct MatchRow {
    #[tabled(rename = "#")]
    number: String,
    date: String,
    hero: String,
    result: String,
    kda: String,
    gpm: String,
    xpm: String,
}

#[derive(Tabled)]
struct StreakRow {
    rank: String,
    hero: String,
    streak: String,
    form: String,
    win_rate: String,
    momentum: String,
}

#[derive(Tabled)]
struct HeroRow {
    hero: String,
    games: String,
    streak: String,
    form: String,
    trend: String,
    recent: String,
    older: String,
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

pub fn display_warning(message: &str) {
    println!("{} {}", "⚠️".yellow(), message);
}

fn form_label(form: RecentForm) -> ColoredString {
    match form {
        RecentForm::Unknown => "unknown".dimmed(),
        RecentForm::NoData => "no data".dimmed(),
        RecentForm::Excellent => "excellent".green().bold(),
        RecentForm::Good => "good".green(),
        RecentForm::Average => "average".normal(),
        RecentForm::Poor => "poor".yellow(),
        RecentForm::Terrible => "terrible".red().bold(),
    }
}

fn momentum_label(momentum: Momentum) -> ColoredString {
    match momentum {
        Momentum::Improving => "▲ improving".green(),
        Momentum::Declining => "▼ declining".red(),
        Momentum::Neutral => "– neutral".normal(),
    }
}

fn streak_label(streak_type: StreakType, length: u32) -> ColoredString {
    match streak_type {
        StreakType::Win => format!("{}W", length).green(),
        StreakType::Loss => format!("{}L", length).red(),
        StreakType::None => "-".dimmed(),
    }
}

fn trend_label(kind: TrendKind, direction: TrendDirection, strength: u8) -> ColoredString {
    let arrows = match direction {
        TrendDirection::Up => "▲".repeat(strength.max(1) as usize),
        TrendDirection::Down => "▼".repeat(strength.max(1) as usize),
        TrendDirection::None => "–".to_string(),
    };
    match kind {
        TrendKind::InsufficientData => "not enough games".dimmed(),
        TrendKind::Stable => format!("{} stable", arrows).normal(),
        TrendKind::Improving => format!("{} improving", arrows).green(),
        TrendKind::Declining => format!("{} declining", arrows).red(),
    }
}

fn grade_label(grade: Grade) -> ColoredString {
    match grade {
        Grade::SPlus | Grade::S => grade.as_str().magenta().bold(),
        Grade::APlus | Grade::A => grade.as_str().green().bold(),
        Grade::BPlus | Grade::B => grade.as_str().cyan().bold(),
        Grade::CPlus | Grade::C => grade.as_str().yellow().bold(),
        Grade::D | Grade::F => grade.as_str().red().bold(),
    }
}

fn gauge(level: u32) -> String {
    let filled = (level.min(100) / 5) as usize;
    format!("[{}{}]", "█".repeat(filled), "░".repeat(20 - filled))
}

pub fn display_match_history(matches: &[MatchRecord], hero_names: &HashMap<u32, String>) {
    if matches.is_empty() {
        return;
    }

    let total_matches = matches.len();
    let wins = matches.iter().filter(|m| is_win(m)).count();
    let losses = total_matches - wins;
    let win_rate = (wins as f64 / total_matches as f64) * 100.0;

    println!("\n{}", format!("📊 MATCH HISTORY (Last {} Games)", total_matches).bold().cyan());
    println!("{}\n", "=".repeat(80).cyan());
    println!("{} {} W / {} L ({:.1}% WR)\n",
        "📈 Overall:".bold(),
        wins.to_string().green(),
        losses.to_string().red(),
        win_rate);

    let mut rows = vec![];
    for (idx, record) in matches.iter().enumerate() {
        let result = if is_win(record) {
            "WIN".green().to_string()
        } else {
            "LOSS".red().to_string()
        };

        let date = Utc
            .timestamp_opt(record.start_time, 0)
            .single()
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "?".to_string());

        rows.push(MatchRow {
            number: format!("{}", idx + 1),
            date,
            hero: hero_names
                .get(&record.hero_id)
                .cloned()
                .unwrap_or_else(|| format!("Hero {}", record.hero_id)),
            result,
            kda: format!("{}/{}/{}", record.kills, record.deaths, record.assists),
            gpm: format!("{:.0}", record.gold_per_min),
            xpm: format!("{:.0}", record.xp_per_min),
        });
    }

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

fn streak_table(entries: &[HeroStreakEntry], streak_type: StreakType) -> Table {
    let rows: Vec<StreakRow> = entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| StreakRow {
            rank: format!("#{}", idx + 1),
            hero: entry.name.clone(),
            streak: streak_label(streak_type, entry.streak).to_string(),
            form: form_label(entry.recent_form).to_string(),
            win_rate: format!("{}%", entry.win_rate),
            momentum: momentum_label(entry.momentum).to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table
}

pub fn display_momentum(summary: &MomentumSummary, hot: &[HeroStreakEntry], cold: &[HeroStreakEntry]) {
    println!("\n{}", "🔥 HOT & COLD HEROES".bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());

    let overall = match summary.momentum {
        OverallMomentum::Positive => "POSITIVE".green().bold(),
        OverallMomentum::Negative => "NEGATIVE".red().bold(),
        OverallMomentum::Neutral => "NEUTRAL".normal().bold(),
    };
    println!(
        "{} {} ({} hot / {} cold)\n",
        "Momentum:".bold(),
        overall,
        summary.hot_count,
        summary.cold_count
    );

    if hot.is_empty() && cold.is_empty() {
        println!("{}", "No hero is on a streak right now".yellow());
        return;
    }

    if !hot.is_empty() {
        println!("{}", "On fire".bold().green());
        println!("{}", streak_table(hot, StreakType::Win));
    }
    if !cold.is_empty() {
        println!("{}", "Cold spell".bold().red());
        println!("{}", streak_table(cold, StreakType::Loss));
    }

    if let Some(worst) = &summary.cold_spell {
        println!(
            "  {} {} has lost {} in a row, consider picking something else",
            "⚠️".red(),
            worst.name,
            worst.streak
        );
    }
    println!();
}

pub fn display_tilt(tilt: &TiltScore) {
    println!("\n{}", "🧠 TILT METER".bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());

    let status = match tilt.status {
        TiltStatus::Stable => "NOT ENOUGH DATA".dimmed(),
        TiltStatus::Flow => "FLOW".green().bold(),
        TiltStatus::Good => "GOOD".green(),
        TiltStatus::Neutral => "NEUTRAL".normal(),
        TiltStatus::Warning => "WARNING".yellow().bold(),
        TiltStatus::Danger => "DANGER".red().bold(),
    };

    if tilt.status == TiltStatus::Stable {
        println!("{} {}", status, tilt.message.dimmed());
    } else {
        println!("{} {}/100 {}", gauge(tilt.level), tilt.level, status);
        println!("  {}", tilt.message.bold());
    }
    println!();
}

pub fn display_performance(index: &PerformanceIndex) {
    println!("\n{}", "🏆 PERFORMANCE EFFICIENCY INDEX".bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());

    let trend = match index.trend {
        PerformanceTrend::Improving => "▲ improving".green(),
        PerformanceTrend::Declining => "▼ declining".red(),
        PerformanceTrend::Stable => "– stable".normal(),
    };
    println!(
        "{} {}/100   {} {}   {} {}\n",
        "Score:".bold(),
        index.score,
        "Grade:".bold(),
        grade_label(index.grade),
        "Trend:".bold(),
        trend
    );
}

pub fn display_hero_breakdowns(heroes: &[HeroBreakdown]) {
    if heroes.is_empty() {
        return;
    }

    println!("\n{}", "🦸 MOST PLAYED HEROES".bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());

    let rows: Vec<HeroRow> = heroes
        .iter()
        .map(|hero| HeroRow {
            hero: hero.name.clone(),
            games: hero.games.to_string(),
            streak: streak_label(hero.streak.streak_type, hero.streak.current_streak).to_string(),
            form: form_label(hero.streak.recent_form).to_string(),
            trend: trend_label(hero.trend.trend, hero.trend.direction, hero.trend.strength).to_string(),
            recent: percent_or_dash(hero.trend.trend, hero.trend.recent_win_rate),
            older: percent_or_dash(hero.trend.trend, hero.trend.older_win_rate),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

fn percent_or_dash(kind: TrendKind, value: u32) -> String {
    if kind == TrendKind::InsufficientData {
        "-".to_string()
    } else {
        format!("{}%", value)
    }
}

pub fn display_focus_hero(hero: &HeroBreakdown) {
    println!("\n{}", format!("🎯 {} ", hero.name).bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());

    let streak = &hero.streak;
    println!(
        "  Streak: {}   Form: {}   Record: {}W-{}L ({}%)   Momentum: {}",
        streak_label(streak.streak_type, streak.current_streak),
        form_label(streak.recent_form),
        streak.win_loss_record.wins,
        streak.win_loss_record.losses,
        streak.win_rate,
        momentum_label(streak.momentum)
    );

    let trend = &hero.trend;
    let confidence = match trend.confidence {
        Confidence::Low => "low".dimmed(),
        Confidence::Medium => "medium".normal(),
        Confidence::High => "high".bold(),
    };
    println!(
        "  Trend: {} ({:+} pts, {}% → {}%, confidence {})\n",
        trend_label(trend.trend, trend.direction, trend.strength),
        trend.improvement,
        trend.older_win_rate,
        trend.recent_win_rate,
        confidence
    );
}

pub fn display_report(report: &SessionReport) {
    display_performance(&report.performance);
    display_tilt(&report.tilt);
    display_momentum(&report.summary, &report.hot_heroes, &report.cold_heroes);
    display_hero_breakdowns(&report.heroes);
}

pub fn display_request_budget(log: &RequestLog) {
    let remaining = log.get_remaining();
    let time_until_reset = log.get_reset_time().signed_duration_since(Utc::now());

    println!("\n📊 API Usage (Account: {})", log.account_id);
    println!("   Daily:      {}/{} requests", log.requests_today, MAX_REQUESTS_PER_DAY);
    println!("   Per minute: {}/{} requests", log.requests_this_minute, MAX_REQUESTS_PER_MINUTE);
    println!("   Remaining:  {} requests", remaining);
    println!("   Reset in:   {}s\n", time_until_reset.num_seconds().max(0));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gauge_has_fixed_width() {
        assert_eq!(gauge(0).chars().count(), 22);
        assert_eq!(gauge(100).chars().count(), 22);
        assert_eq!(gauge(250).chars().count(), 22);
        assert!(gauge(50).starts_with("[██████████░"));
    }

    #[test]
    fn insufficient_trend_hides_rates() {
        assert_eq!(percent_or_dash(TrendKind::InsufficientData, 0), "-");
        assert_eq!(percent_or_dash(TrendKind::Stable, 40), "40%");
    }
}
