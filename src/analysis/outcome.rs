use super::records::MatchRecord;

/// Whether the player won the match.
///
/// Slots below 128 are on the radiant side. A match with no recorded winner
/// counts as a loss.
pub fn is_win(record: &MatchRecord) -> bool {
    record.radiant_win == Some(record.is_radiant())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(player_slot: u8, radiant_win: Option<bool>) -> MatchRecord {
        MatchRecord {
            match_id: 1,
            start_time: 0,
            radiant_win,
            player_slot,
            hero_id: 1,
            kills: 0,
            deaths: 0,
            assists: 0,
            duration: 0,
            gold_per_min: 0.0,
            xp_per_min: 0.0,
        }
    }

    #[test]
    fn radiant_player_wins_with_radiant() {
        assert!(is_win(&record(0, Some(true))));
        assert!(is_win(&record(4, Some(true))));
        assert!(!is_win(&record(3, Some(false))));
    }

    #[test]
    fn dire_player_wins_with_dire() {
        assert!(is_win(&record(128, Some(false))));
        assert!(is_win(&record(132, Some(false))));
        assert!(!is_win(&record(130, Some(true))));
    }

    #[test]
    fn unknown_winner_is_not_a_win() {
        assert!(!is_win(&record(0, None)));
        assert!(!is_win(&record(128, None)));
    }
}
