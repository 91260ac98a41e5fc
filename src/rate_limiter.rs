/*!
 * Client-side request rate limiting for translation backends.
 *
 * A fixed-window limiter tracking requests per minute and per hour. When a
 * window is full, `wait_if_needed` sleeps until the window rolls over before
 * recording the request.
 */

use log::debug;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const MINUTE_SECS: f64 = 60.0;
const HOUR_SECS: f64 = 3600.0;

/// Rate limiting configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum requests per calendar minute (0 disables the limit)
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,

    /// Maximum requests per calendar hour (0 disables the limit)
    #[serde(default = "default_requests_per_hour")]
    pub requests_per_hour: u32,

    /// Master switch
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_requests_per_minute() -> u32 {
    60
}

fn default_requests_per_hour() -> u32 {
    1000
}

fn default_enabled() -> bool {
    true
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: default_requests_per_minute(),
            requests_per_hour: default_requests_per_hour(),
            enabled: default_enabled(),
        }
    }
}

/// Snapshot of the limiter's current windows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStats {
    pub current_minute_requests: u32,
    pub current_hour_requests: u32,
    pub requests_per_minute_limit: u32,
    pub requests_per_hour_limit: u32,
}

#[derive(Debug, Default)]
struct WindowState {
    minute_window: HashMap<u64, u32>,
    hour_window: HashMap<u64, u32>,
}

/// Fixed-window rate limiter
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    state: Mutex<WindowState>,
}

fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}

fn window_key(now: f64, window_secs: f64) -> u64 {
    (now / window_secs) as u64
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            state: Mutex::new(WindowState::default()),
        }
    }

    /// Wait until a request is permitted, then record it
    ///
    /// Returns true if the call had to sleep.
    pub async fn wait_if_needed(&self) -> bool {
        if !self.config.enabled {
            return false;
        }

        let mut waited = false;
        // Lock is never held across the sleep
        while let Err(wait) = self.try_acquire_at(now_secs()) {
            debug!("Rate limit reached, waiting {:.1}s", wait.as_secs_f64());
            tokio::time::sleep(wait).await;
            waited = true;
        }
        waited
    }

    /// Record a request at `now` if allowed, otherwise return how long to wait
    pub fn try_acquire_at(&self, now: f64) -> Result<(), Duration> {
        if !self.config.enabled {
            return Ok(());
        }

        let mut state = self.state.lock();
        let wait = self.wait_time(&state, now);
        if wait > 0.0 {
            return Err(Duration::from_secs_f64(wait));
        }

        *state.minute_window.entry(window_key(now, MINUTE_SECS)).or_insert(0) += 1;
        *state.hour_window.entry(window_key(now, HOUR_SECS)).or_insert(0) += 1;
        Self::cleanup_old_entries(&mut state, now);
        Ok(())
    }

    // @returns: Seconds until the fullest exhausted window rolls over, 0 if allowed
    fn wait_time(&self, state: &WindowState, now: f64) -> f64 {
        let limits = [
            (self.config.requests_per_minute, MINUTE_SECS, &state.minute_window),
            (self.config.requests_per_hour, HOUR_SECS, &state.hour_window),
        ];

        limits
            .iter()
            .filter(|(limit, _, _)| *limit > 0)
            .filter_map(|(limit, window_secs, window)| {
                let key = window_key(now, *window_secs);
                let count = window.get(&key).copied().unwrap_or(0);
                (count >= *limit).then(|| (key + 1) as f64 * window_secs - now)
            })
            .fold(0.0, f64::max)
    }

    fn cleanup_old_entries(state: &mut WindowState, now: f64) {
        // Minute windows older than 5 minutes, hour windows older than 2 hours
        let cutoff_minute = window_key((now - 300.0).max(0.0), MINUTE_SECS);
        state.minute_window.retain(|key, _| *key > cutoff_minute);

        let cutoff_hour = window_key((now - 7200.0).max(0.0), HOUR_SECS);
        state.hour_window.retain(|key, _| *key > cutoff_hour);
    }

    /// Current window counts
    pub fn stats(&self) -> RateLimitStats {
        self.stats_at(now_secs())
    }

    pub fn stats_at(&self, now: f64) -> RateLimitStats {
        let state = self.state.lock();
        RateLimitStats {
            current_minute_requests: state
                .minute_window
                .get(&window_key(now, MINUTE_SECS))
                .copied()
                .unwrap_or(0),
            current_hour_requests: state
                .hour_window
                .get(&window_key(now, HOUR_SECS))
                .copied()
                .unwrap_or(0),
            requests_per_minute_limit: self.config.requests_per_minute,
            requests_per_hour_limit: self.config.requests_per_hour,
        }
    }
}
