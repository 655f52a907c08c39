use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use chrono::{DateTime, Utc, Duration};
use crate::cache::data_dir;
use crate::error::AppError;

// OpenDota free tier
pub const MAX_REQUESTS_PER_DAY: u32 = 2000;
pub const MAX_REQUESTS_PER_MINUTE: u32 = 60;

/// Persisted request budget for one account, so repeated runs stay inside
/// the API's daily and per-minute allowance.
#[derive(Debug, Serialize, Deserialize)]
pub struct RequestLog {
    pub account_id: u64,
    pub requests_today: u32,
    pub requests_this_minute: u32,
    pub last_request: DateTime<Utc>,
    pub day_reset: DateTime<Utc>,
    pub minute_reset: DateTime<Utc>,
}

impl RequestLog {
    pub fn new(account_id: u64) -> Self {
        Self::starting_at(account_id, Utc::now())
    }

    fn starting_at(account_id: u64, now: DateTime<Utc>) -> Self {
        RequestLog {
            account_id,
            requests_today: 0,
            requests_this_minute: 0,
            last_request: now,
            day_reset: now + Duration::days(1),
            minute_reset: now + Duration::minutes(1),
        }
    }

    pub fn get_log_path(account_id: u64) -> PathBuf {
        data_dir().join(format!("{}.ratelimit.json", account_id))
    }

    pub fn load(account_id: u64) -> Result<Self, AppError> {
        Self::load_from(&Self::get_log_path(account_id), account_id)
    }

    pub fn load_from(path: &Path, account_id: u64) -> Result<Self, AppError> {
        match fs::read_to_string(path) {
            Ok(content) => {
                let mut log: RequestLog = serde_json::from_str(&content)
                    .map_err(|e| AppError::JsonError(format!("Failed to parse rate limit log: {}", e)))?;
                log.roll_windows(Utc::now());
                Ok(log)
            }
            Err(_) => Ok(RequestLog::new(account_id)),
        }
    }

    pub fn save(&self) -> Result<(), AppError> {
        self.save_to(&Self::get_log_path(self.account_id))
    }

    pub fn save_to(&self, path: &Path) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::JsonError(format!("Failed to serialize rate limit log: {}", e)))?;

        fs::write(path, json)
            .map_err(|e| AppError::CacheError(format!("Failed to write rate limit log: {}", e)))?;

        Ok(())
    }

    /// Reset counters whose window has passed.
    pub fn roll_windows(&mut self, now: DateTime<Utc>) {
        if now > self.day_reset {
            self.requests_today = 0;
            self.day_reset = now + Duration::days(1);
        }

        if now > self.minute_reset {
            self.requests_this_minute = 0;
            self.minute_reset = now + Duration::minutes(1);
        }
    }

    pub fn can_make_requests(&self, count: u32) -> bool {
        self.requests_today + count <= MAX_REQUESTS_PER_DAY
            && self.requests_this_minute + count <= MAX_REQUESTS_PER_MINUTE
    }

    pub fn record_request(&mut self) {
        self.requests_today += 1;
        self.requests_this_minute += 1;
        self.last_request = Utc::now();
    }

    /// Count one request and write the log straight away, so a run that
    /// fails partway still leaves the spent budget on disk.
    pub fn record_and_save(&mut self) -> Result<(), AppError> {
        self.record_and_save_to(&Self::get_log_path(self.account_id))
    }

    pub fn record_and_save_to(&mut self, path: &Path) -> Result<(), AppError> {
        self.record_request();
        self.save_to(path)
    }

    pub fn get_remaining(&self) -> u32 {
        MAX_REQUESTS_PER_DAY.saturating_sub(self.requests_today)
            .min(MAX_REQUESTS_PER_MINUTE.saturating_sub(self.requests_this_minute))
    }

    pub fn get_reset_time(&self) -> DateTime<Utc> {
        self.day_reset.min(self.minute_reset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_counts_down() {
        let mut log = RequestLog::new(1);
        assert!(log.can_make_requests(5));
        for _ in 0..58 {
            log.record_request();
        }
        assert_eq!(log.get_remaining(), 2);
        assert!(log.can_make_requests(2));
        assert!(!log.can_make_requests(3));
    }

    #[test]
    fn minute_window_rolls_over() {
        let start = Utc::now();
        let mut log = RequestLog::starting_at(1, start);
        log.requests_this_minute = MAX_REQUESTS_PER_MINUTE;
        log.requests_today = 100;

        log.roll_windows(start + Duration::seconds(90));
        assert_eq!(log.requests_this_minute, 0);
        assert_eq!(log.requests_today, 100);

        log.roll_windows(start + Duration::hours(25));
        assert_eq!(log.requests_today, 0);
    }

    #[test]
    fn persists_between_runs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("1.ratelimit.json");

        let mut log = RequestLog::new(1);
        log.record_request();
        log.record_request();
        log.save_to(&path).unwrap();

        let loaded = RequestLog::load_from(&path, 1).unwrap();
        assert_eq!(loaded.requests_today, 2);
    }

    #[test]
    fn each_request_is_written_before_the_next() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("9.ratelimit.json");

        let mut log = RequestLog::new(9);
        log.record_and_save_to(&path).unwrap();
        log.record_and_save_to(&path).unwrap();
        // A later fetch fails here; nothing else saves the log
        drop(log);

        let loaded = RequestLog::load_from(&path, 9).unwrap();
        assert_eq!(loaded.requests_today, 2);
        assert_eq!(loaded.requests_this_minute, 2);
    }

    #[test]
    fn save_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("9.ratelimit.json");

        let mut log = RequestLog::new(9);
        assert!(matches!(log.record_and_save_to(&path), Err(AppError::CacheError(_))));
        assert_eq!(log.requests_today, 1);
    }
}
