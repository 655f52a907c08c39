use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::builder::RangedU64ValueParser;
use clap::Parser;
use indicatif::ProgressBar;
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dota_momentum::analysis::{
    tally_hero_stats, EngineConfig, Feed, HeroBreakdown, HeroStatFeed, MatchFeed, SessionData, SessionEngine,
    SessionReport, StreakConfig, TrendConfig,
};
use dota_momentum::api::client::OpenDotaClient;
use dota_momentum::api::models::attach_hero_names;
use dota_momentum::cache::MatchCache;
use dota_momentum::config::Config;
use dota_momentum::display::output::{
    display_error, display_focus_hero, display_info, display_match_history, display_report,
    display_request_budget, display_success, display_warning,
};
use dota_momentum::error::AppError;
use dota_momentum::rate_limit::RequestLog;

// profile, win/loss, matches, hero table, hero names
const REQUESTS_PER_REFRESH: u32 = 5;

#[derive(Parser, Debug)]
#[command(name = "Dota Momentum")]
#[command(about = "Streaks, tilt and performance trends from your recent Dota 2 matches", long_about = None)]
struct Args {
    /// Steam32 account id (the number in your OpenDota profile url)
    account_id: Option<String>,

    /// Number of recent matches to fetch (default: DOTA_MATCH_LIMIT or 50)
    #[arg(short, long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    matches: Option<usize>,

    /// Games per hero considered for streaks
    #[arg(short, long, default_value = "10")]
    lookback: usize,

    /// Minimum streak length for a hero to count as hot or cold
    #[arg(long, default_value = "3")]
    min_streak: u32,

    /// Games per window when comparing a hero's recent and older play
    #[arg(short, long, default_value = "5")]
    window: usize,

    /// Show a detailed breakdown for one hero id
    #[arg(long)]
    hero: Option<u32>,

    /// Number of most played heroes in the breakdown table
    #[arg(long, default_value = "5")]
    top_heroes: usize,

    /// Force refresh from OpenDota (ignore cache)
    #[arg(long)]
    refresh: bool,

    /// Cached data older than this many minutes is refreshed
    #[arg(long, default_value = "30")]
    max_cache_age: u64,

    /// Analyze a saved match list (JSON array) instead of fetching
    #[arg(long)]
    matches_file: Option<PathBuf>,

    /// Hero stats (JSON array) to go with --matches-file
    #[arg(long)]
    heroes_file: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    report: &'a SessionReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    focus: Option<&'a HeroBreakdown>,
}

fn main() {
    let args = Args::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(args) {
        display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn engine_config(args: &Args) -> EngineConfig {
    EngineConfig {
        streak: StreakConfig::with_lookback(args.lookback),
        trend: TrendConfig::with_window(args.window),
        min_streak: args.min_streak,
        breakdown_heroes: args.top_heroes,
        ..EngineConfig::default()
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::from_env()?;
    let engine = SessionEngine::new(engine_config(&args));

    let (data, hero_names) = match &args.matches_file {
        Some(path) => load_offline(path, args.heroes_file.as_deref(), args.json)?,
        None => {
            let raw_id = args
                .account_id
                .as_deref()
                .ok_or_else(|| AppError::ConfigError("an account id or --matches-file is required".to_string()))?;
            let account_id: u64 = raw_id
                .trim()
                .parse()
                .map_err(|_| AppError::InvalidAccountId(raw_id.to_string()))?;
            let limit = args.matches.unwrap_or(config.match_limit);
            fetch_session(&config, account_id, limit, &args)?
        }
    };

    let report = engine.report(&data);
    let focus = args
        .hero
        .map(|hero_id| engine.focus_hero(data.matches.as_slice(), data.hero_stats.as_slice(), hero_id));

    if args.json {
        let output = JsonOutput {
            report: &report,
            focus: focus.as_ref(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match data.matches.as_slice() {
        Some(matches) => display_match_history(&matches[..matches.len().min(20)], &hero_names),
        None => display_warning("Match data was not a list, showing defaults"),
    }
    display_report(&report);
    if let Some(hero) = &focus {
        display_focus_hero(hero);
    }

    Ok(())
}

fn read_json(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

fn name_table(data: &SessionData) -> HashMap<u32, String> {
    data.hero_stats
        .as_slice()
        .unwrap_or_default()
        .iter()
        .map(|h| (h.hero_id, h.display_name()))
        .collect()
}

fn load_offline(
    matches_path: &Path,
    heroes_path: Option<&Path>,
    quiet: bool,
) -> Result<(SessionData, HashMap<u32, String>)> {
    let matches = MatchFeed::from_json(&read_json(matches_path)?);
    let hero_stats = match heroes_path {
        Some(path) => HeroStatFeed::from_json(&read_json(path)?),
        None => match matches.as_slice() {
            Some(records) => Feed::Records(tally_hero_stats(records)),
            None => Feed::Missing,
        },
    };

    if !quiet {
        display_info(&format!("Loaded {} matches from {}", matches.len(), matches_path.display()));
    }

    let data = SessionData {
        matches,
        hero_stats,
        win_loss: None,
    };
    let names = name_table(&data);
    Ok((data, names))
}

fn fetch_session(
    config: &Config,
    account_id: u64,
    limit: usize,
    args: &Args,
) -> Result<(SessionData, HashMap<u32, String>), AppError> {
    let mut cache = MatchCache::load(account_id)?;
    let fresh_enough = !cache.matches.is_empty() && !cache.is_stale(args.max_cache_age);

    let quiet = args.json;

    if fresh_enough && !args.refresh {
        if !quiet {
            display_success("⚡ Using cached matches (use --refresh to update)");
        }
    } else {
        let mut request_log = RequestLog::load(account_id)?;
        if !request_log.can_make_requests(REQUESTS_PER_REFRESH) {
            if !quiet {
                display_request_budget(&request_log);
            }
            if cache.matches.is_empty() {
                return Err(AppError::RateLimited);
            }
            tracing::warn!(account_id, "API budget exhausted, falling back to cached matches");
        } else {
            refresh_cache(config, &mut cache, &mut request_log, limit, quiet)?;
            if !quiet {
                display_request_budget(&request_log);
            }
        }
    }

    if cache.matches.is_empty() {
        return Err(AppError::NoMatches);
    }

    let data = SessionData {
        matches: Feed::Records(cache.get_recent_matches(limit)),
        hero_stats: Feed::Records(cache.hero_stats.clone()),
        win_loss: cache.win_loss,
    };
    let names = name_table(&data);
    Ok((data, names))
}

fn spend_request(request_log: &mut RequestLog) {
    if let Err(e) = request_log.record_and_save() {
        tracing::warn!(error = %e, "could not persist request log");
    }
}

fn refresh_cache(
    config: &Config,
    cache: &mut MatchCache,
    request_log: &mut RequestLog,
    limit: usize,
    quiet: bool,
) -> Result<(), AppError> {
    let account_id = cache.account_id;
    let client = OpenDotaClient::new(config.clone());

    if !quiet {
        display_info(&format!("Fetching data for account {} from OpenDota", account_id));
    }
    let pb = ProgressBar::new(REQUESTS_PER_REFRESH as u64);

    let persona_name = match cache.get_cached_profile() {
        Some(profile) => profile.persona_name,
        None => {
            let profile = client.get_player(account_id)?;
            spend_request(request_log);
            profile.personaname
        }
    };
    pb.inc(1);

    let win_loss = client.get_win_loss(account_id)?;
    spend_request(request_log);
    pb.inc(1);

    let matches = client.get_recent_matches(account_id, limit)?;
    spend_request(request_log);
    pb.inc(1);

    let mut hero_stats = match client.get_player_heroes(account_id)? {
        Feed::Records(stats) => stats,
        Feed::Missing => Vec::new(),
    };
    spend_request(request_log);
    pb.inc(1);

    let heroes = client.get_heroes()?;
    spend_request(request_log);
    attach_hero_names(&mut hero_stats, &heroes);
    pb.inc(1);

    pb.finish_with_message("✓ Data fetched");

    let new_matches = match matches {
        Feed::Records(records) => cache.add_matches(records),
        Feed::Missing => 0,
    };
    cache.set_profile(persona_name.clone());
    cache.set_hero_stats(hero_stats, win_loss);
    cache.save()?;

    if !quiet {
        display_success(&format!(
            "{}: {} new matches, {} cached",
            persona_name.as_deref().unwrap_or("Player"),
            new_matches,
            cache.matches.len()
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_count_must_be_positive() {
        assert!(Args::try_parse_from(["dota_momentum", "86745912", "--matches", "0"]).is_err());

        let args = Args::try_parse_from(["dota_momentum", "86745912", "-m", "20"]).unwrap();
        assert_eq!(args.matches, Some(20));
    }

    #[test]
    fn match_count_is_optional() {
        let args = Args::try_parse_from(["dota_momentum", "86745912"]).unwrap();
        assert_eq!(args.matches, None);
        assert_eq!(args.window, 5);
    }
}
