use dota_momentum::analysis::{
    analyze_hero_streak, analyze_trend, calculate_performance_index, calculate_tilt_score, find_cold_spell_heroes,
    find_hot_streak_heroes, tally_hero_stats, HeroStatRecord, MatchRecord, PerformanceConfig, SessionData,
    SessionEngine, StreakConfig, TiltConfig, TrendConfig,
};
use proptest::prelude::*;

const NOW: i64 = 1_700_000_000;

prop_compose! {
    fn arb_match()(
        hero_id in 1u32..5,
        won in any::<bool>(),
        radiant in any::<bool>(),
        kills in 0u32..25,
        deaths in 0u32..20,
        assists in 0u32..35,
        gold_per_min in 0.0f64..1200.0,
        xp_per_min in 0.0f64..1200.0,
    ) -> MatchRecord {
        let player_slot = if radiant { 2 } else { 130 };
        MatchRecord {
            match_id: 0,
            start_time: 0,
            radiant_win: Some(won == radiant),
            player_slot,
            hero_id,
            kills,
            deaths,
            assists,
            duration: 2400,
            gold_per_min,
            xp_per_min,
        }
    }
}

/// A most-recent-first history with unique ids and start times.
fn arb_history(max_len: usize) -> impl Strategy<Value = Vec<MatchRecord>> {
    prop::collection::vec(arb_match(), 0..max_len).prop_map(|mut matches| {
        for (age, record) in matches.iter_mut().enumerate() {
            record.match_id = 7_000_000_000 + age as u64;
            record.start_time = NOW - age as i64 * 3600;
        }
        matches
    })
}

fn hero_table() -> Vec<HeroStatRecord> {
    (1..5).map(|id| HeroStatRecord::new(id, 40, 20)).collect()
}

proptest! {
    #[test]
    fn scores_stay_in_range(matches in arb_history(60)) {
        let tilt = calculate_tilt_score(&matches, &TiltConfig::default());
        prop_assert!(tilt.level <= 100);

        let pei = calculate_performance_index(&matches, None, &PerformanceConfig::default());
        prop_assert!(pei.score <= 100);

        for hero_id in 1..5 {
            let streak = analyze_hero_streak(&matches, hero_id, &StreakConfig::default());
            prop_assert!(streak.win_rate <= 100);
            prop_assert!(streak.games_analyzed <= 10);
            prop_assert_eq!(
                streak.win_loss_record.wins + streak.win_loss_record.losses,
                streak.games_analyzed
            );
            prop_assert!(streak.current_streak <= streak.games_analyzed);

            let trend = analyze_trend(&matches, hero_id, &TrendConfig::default());
            prop_assert!(trend.strength <= 3);
            prop_assert!(trend.recent_win_rate <= 100 && trend.older_win_rate <= 100);
            prop_assert!((-100..=100).contains(&trend.improvement));
        }
    }

    #[test]
    fn hot_and_cold_are_disjoint(matches in arb_history(60), min_streak in 1u32..5) {
        let stats = hero_table();
        let config = StreakConfig::default();
        let hot = find_hot_streak_heroes(&matches, &stats, min_streak, &config);
        let cold = find_cold_spell_heroes(&matches, &stats, min_streak, &config);

        for entry in &hot {
            prop_assert!(cold.iter().all(|c| c.hero_id != entry.hero_id));
            prop_assert!(entry.streak >= min_streak);
        }
        prop_assert!(hot.windows(2).all(|w| w[0].streak >= w[1].streak));
        prop_assert!(cold.windows(2).all(|w| w[0].streak >= w[1].streak));
    }

    #[test]
    fn report_is_deterministic(matches in arb_history(40)) {
        let engine = SessionEngine::default();
        let stats = tally_hero_stats(&matches);
        let data = SessionData::new(matches, stats);

        let first = serde_json::to_string(&engine.report(&data)).unwrap();
        let second = serde_json::to_string(&engine.report(&data)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn latest_win_never_lowers_tilt(matches in arb_history(15)) {
        prop_assume!(matches.len() >= 3);

        let mut lost = matches.clone();
        lost[0].radiant_win = Some(!lost[0].is_radiant());
        let mut won = matches;
        won[0].radiant_win = Some(won[0].is_radiant());

        let before = calculate_tilt_score(&lost, &TiltConfig::default());
        let after = calculate_tilt_score(&won, &TiltConfig::default());

        prop_assert!(after.level >= before.level);
        if before.level > 0 && before.level < 100 {
            prop_assert!(after.level > before.level);
        }
    }
}
