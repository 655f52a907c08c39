// OpenDota endpoint builders. The client appends the api key.

/// Columns requested from the match list endpoint
pub const MATCH_FIELDS: [&str; 11] = [
    "match_id",
    "start_time",
    "radiant_win",
    "player_slot",
    "hero_id",
    "kills",
    "deaths",
    "assists",
    "duration",
    "gold_per_min",
    "xp_per_min",
];

pub fn player_url(base_url: &str, account_id: u64) -> String {
    format!("{}/players/{}", base_url, account_id)
}

pub fn win_loss_url(base_url: &str, account_id: u64) -> String {
    format!("{}/players/{}/wl", base_url, account_id)
}

pub fn recent_matches_url(base_url: &str, account_id: u64, limit: usize) -> String {
    let projection: Vec<String> = MATCH_FIELDS
        .iter()
        .map(|field| format!("project={}", field))
        .collect();
    format!(
        "{}/players/{}/matches?limit={}&{}",
        base_url,
        account_id,
        limit,
        projection.join("&")
    )
}

pub fn player_heroes_url(base_url: &str, account_id: u64) -> String {
    format!("{}/players/{}/heroes", base_url, account_id)
}

pub fn heroes_url(base_url: &str) -> String {
    format!("{}/heroes", base_url)
}

/// Append the api key, if any, to an endpoint url.
pub fn with_api_key(url: &str, api_key: Option<&str>) -> String {
    match api_key {
        Some(key) => {
            let separator = if url.contains('?') { '&' } else { '?' };
            format!("{}{}api_key={}", url, separator, key)
        }
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://api.opendota.com/api";

    #[test]
    fn match_list_projects_every_field() {
        let url = recent_matches_url(BASE, 86745912, 20);
        assert!(url.starts_with("https://api.opendota.com/api/players/86745912/matches?limit=20&"));
        for field in MATCH_FIELDS {
            assert!(url.contains(&format!("project={}", field)), "missing {}", field);
        }
    }

    #[test]
    fn api_key_uses_the_right_separator() {
        let plain = with_api_key(&heroes_url(BASE), Some("k3y"));
        assert_eq!(plain, "https://api.opendota.com/api/heroes?api_key=k3y");

        let query = with_api_key(&recent_matches_url(BASE, 1, 5), Some("k3y"));
        assert!(query.ends_with("&api_key=k3y"));

        assert_eq!(with_api_key(&win_loss_url(BASE, 7), None), "https://api.opendota.com/api/players/7/wl");
    }
}
