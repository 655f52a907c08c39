use crate::error::AppError;
use std::env;

pub const DEFAULT_BASE_URL: &str = "https://api.opendota.com/api";
pub const DEFAULT_MATCH_LIMIT: usize = 50;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: String,
    pub match_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            match_limit: DEFAULT_MATCH_LIMIT,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        // OpenDota works without a key, it only raises the request budget
        let api_key = env::var("OPENDOTA_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let base_url = env::var("OPENDOTA_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let match_limit = match env::var("DOTA_MATCH_LIMIT") {
            Ok(raw) => parse_match_limit(&raw)?,
            Err(_) => DEFAULT_MATCH_LIMIT,
        };

        Ok(Config {
            api_key,
            base_url,
            match_limit,
        })
    }
}

fn parse_match_limit(raw: &str) -> Result<usize, AppError> {
    match raw.trim().parse::<usize>() {
        Ok(0) | Err(_) => Err(AppError::ConfigError(format!(
            "DOTA_MATCH_LIMIT must be a positive integer, got '{}'",
            raw
        ))),
        Ok(limit) => Ok(limit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_limit_accepts_positive_numbers() {
        assert_eq!(parse_match_limit("20").unwrap(), 20);
        assert_eq!(parse_match_limit(" 75 ").unwrap(), 75);
    }

    #[test]
    fn match_limit_rejects_zero_and_garbage() {
        assert!(matches!(parse_match_limit("0"), Err(AppError::ConfigError(_))));
        assert!(matches!(parse_match_limit("lots"), Err(AppError::ConfigError(_))));
    }

    #[test]
    fn default_points_at_public_api() {
        let config = Config::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.api_key.is_none());
        assert_eq!(config.match_limit, DEFAULT_MATCH_LIMIT);
    }
}
