use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

/// The single mutable shared datum of the whole system: last-notify
/// timestamp per rate-limit key, guarded by one mutex held only for the
/// read-modify-write of that one entry.
#[derive(Debug, Default)]
pub struct RateLimiter {
    last_notified: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` and records `now` if `window` has elapsed since the
    /// last allowed call for `key`; otherwise returns `false` without
    /// side effects.
    pub fn allow(&self, key: &str, now: DateTime<Utc>, window: chrono::Duration) -> bool {
        let mut guard = self.last_notified.lock().unwrap_or_else(|e| e.into_inner());
        match guard.get(key) {
            Some(&last) if now - last < window => false,
            _ => {
                guard.insert(key.to_string(), now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn allows_first_call() {
        let limiter = RateLimiter::new();
        assert!(limiter.allow("chat", Utc::now(), Duration::minutes(5)));
    }

    #[test]
    fn blocks_call_within_window() {
        let limiter = RateLimiter::new();
        let t0 = Utc::now();
        assert!(limiter.allow("chat", t0, Duration::minutes(5)));
        assert!(!limiter.allow("chat", t0 + Duration::minutes(1), Duration::minutes(5)));
    }

    #[test]
    fn allows_call_after_window() {
        let limiter = RateLimiter::new();
        let t0 = Utc::now();
        assert!(limiter.allow("chat", t0, Duration::minutes(5)));
        assert!(limiter.allow("chat", t0 + Duration::minutes(6), Duration::minutes(5)));
    }

    #[test]
    fn tracks_keys_independently() {
        let limiter = RateLimiter::new();
        let t0 = Utc::now();
        assert!(limiter.allow("a", t0, Duration::minutes(5)));
        assert!(limiter.allow("b", t0, Duration::minutes(5)));
    }
}
