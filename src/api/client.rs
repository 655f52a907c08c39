use crate::analysis::records::{HeroStatFeed, MatchFeed, WinLoss};
use crate::config::Config;
use crate::error::AppError;
use governor::{Quota, RateLimiter, state::{InMemoryState, NotKeyed}, clock::DefaultClock};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::num::NonZeroU32;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

use super::endpoints;
use super::models::*;

// Free tier allows 60 calls per minute
const REQUESTS_PER_MINUTE: u32 = 60;
const MAX_RETRIES: u32 = 3;

pub struct OpenDotaClient {
    config: Config,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl OpenDotaClient {
    pub fn new(config: Config) -> Self {
        let quota = NonZeroU32::new(REQUESTS_PER_MINUTE).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = RateLimiter::direct(Quota::per_minute(quota));
        OpenDotaClient {
            config,
            rate_limiter,
        }
    }

    fn url(&self, endpoint: String) -> String {
        endpoints::with_api_key(&endpoint, self.config.api_key.as_deref())
    }

    fn execute_request(&self, url: &str) -> Result<String, AppError> {
        while self.rate_limiter.check().is_err() {
            thread::sleep(Duration::from_millis(100));
        }

        let mut retry_count = 0;

        loop {
            debug!(url = %redact(url), "GET");
            let response = ureq::get(url)
                .set("User-Agent", "dota_momentum/0.1.0")
                .call();

            match response {
                Ok(resp) => {
                    return resp.into_string().map_err(|e| {
                        AppError::HttpError(e.to_string())
                    });
                }
                Err(ureq::Error::Status(429, _)) => {
                    if retry_count >= MAX_RETRIES {
                        return Err(AppError::RateLimited);
                    }
                    let wait_ms = 2000 * (retry_count + 1) as u64;
                    warn!(wait_ms, "rate limited by OpenDota, retrying");
                    thread::sleep(Duration::from_millis(wait_ms));
                    retry_count += 1;
                }
                Err(ureq::Error::Status(code, _)) => {
                    return Err(AppError::ApiError(format!("OpenDota returned HTTP {}", code)));
                }
                Err(e) => {
                    return Err(AppError::HttpError(e.to_string()));
                }
            }
        }
    }

    fn get_json<T: DeserializeOwned>(&self, endpoint: String) -> Result<T, AppError> {
        let body = self.execute_request(&self.url(endpoint))?;
        serde_json::from_str(&body).map_err(|e| {
            AppError::JsonError(e.to_string())
        })
    }

    pub fn get_player(&self, account_id: u64) -> Result<ProfileDto, AppError> {
        let player: PlayerDto = self.get_json(endpoints::player_url(&self.config.base_url, account_id))?;
        player
            .profile
            .ok_or_else(|| AppError::PlayerNotFound(account_id.to_string()))
    }

    pub fn get_win_loss(&self, account_id: u64) -> Result<WinLoss, AppError> {
        self.get_json(endpoints::win_loss_url(&self.config.base_url, account_id))
    }

    /// Most recent matches first, validated through the match feed boundary.
    pub fn get_recent_matches(&self, account_id: u64, limit: usize) -> Result<MatchFeed, AppError> {
        let raw: Value = self.get_json(endpoints::recent_matches_url(&self.config.base_url, account_id, limit))?;
        Ok(MatchFeed::from_json(&raw))
    }

    pub fn get_player_heroes(&self, account_id: u64) -> Result<HeroStatFeed, AppError> {
        let raw: Value = self.get_json(endpoints::player_heroes_url(&self.config.base_url, account_id))?;
        Ok(HeroStatFeed::from_json(&raw))
    }

    pub fn get_heroes(&self) -> Result<Vec<HeroDto>, AppError> {
        self.get_json(endpoints::heroes_url(&self.config.base_url))
    }
}

fn redact(url: &str) -> &str {
    match url.find("api_key=") {
        Some(idx) => &url[..idx],
        None => url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redact_drops_the_key() {
        assert_eq!(redact("https://x/heroes?api_key=secret"), "https://x/heroes?");
        assert_eq!(redact("https://x/heroes"), "https://x/heroes");
    }
}
