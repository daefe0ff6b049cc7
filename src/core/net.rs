// src/core/net.rs
// Blocking HTTP with bounded retries. One client per run, passed down.

use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::NetError;

const USER_AGENT: &str = concat!("po_recon/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        crate::config::options::NetOptions::default().retry_policy()
    }
}

impl RetryPolicy {
    /// Single attempt, no sleeping. Handy for tests and dry runs.
    pub fn none() -> Self {
        Self { max_attempts: 1, initial_delay_ms: 0, max_delay_ms: 0, multiplier: 1 }
    }

    /// Delay before retry number `attempt` (1-based; attempt 0 never waits).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let factor = u64::from(self.multiplier.max(1)).saturating_pow(attempt - 1);
        let ms = self.initial_delay_ms.saturating_mul(factor).min(self.max_delay_ms);
        Duration::from_millis(ms)
    }
}

/// Errors that say whether another attempt could help.
pub trait Transient {
    fn is_transient(&self) -> bool;
}

impl Transient for NetError {
    fn is_transient(&self) -> bool {
        NetError::is_transient(self)
    }
}

/// Run `op` until it succeeds, fails permanently, or attempts run out.
pub fn with_retry<T, E, F>(policy: &RetryPolicy, label: &str, mut op: F) -> Result<T, E>
where
    E: Transient + std::fmt::Display,
    F: FnMut() -> Result<T, E>,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 0;
    loop {
        match op() {
            Ok(v) => return Ok(v),
            Err(e) if e.is_transient() && attempt + 1 < attempts => {
                attempt += 1;
                let wait = policy.delay_for_attempt(attempt);
                logw!("{label}: attempt {attempt}/{attempts} failed ({e}); retrying in {wait:?}");
                thread::sleep(wait);
            }
            Err(e) => return Err(e),
        }
    }
}

pub fn client(timeout: Duration) -> Result<Client, NetError> {
    Ok(Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?)
}

/// GET a page as text. `Ok(None)` means the server says it does not exist.
pub fn get_text(client: &Client, url: &str, policy: &RetryPolicy) -> Result<Option<String>, NetError> {
    with_retry(policy, url, || {
        let resp = client.get(url).send()?;
        match resp.status() {
            StatusCode::NOT_FOUND => Ok(None),
            s if s.is_success() => Ok(Some(resp.text()?)),
            s => Err(NetError::Status { status: s.as_u16(), url: url.to_string() }),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Debug)]
    struct Flaky(bool);
    impl std::fmt::Display for Flaky {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "flaky({})", self.0)
        }
    }
    impl Transient for Flaky {
        fn is_transient(&self) -> bool { self.0 }
    }

    fn fast(max_attempts: u32) -> RetryPolicy {
        RetryPolicy { max_attempts, initial_delay_ms: 0, max_delay_ms: 0, multiplier: 2 }
    }

    #[test]
    fn backoff_grows_and_caps() {
        let p = RetryPolicy { max_attempts: 5, initial_delay_ms: 100, max_delay_ms: 350, multiplier: 2 };
        assert_eq!(p.delay_for_attempt(0), Duration::ZERO);
        assert_eq!(p.delay_for_attempt(1), Duration::from_millis(100));
        assert_eq!(p.delay_for_attempt(2), Duration::from_millis(200));
        assert_eq!(p.delay_for_attempt(3), Duration::from_millis(350));
    }

    #[test]
    fn transient_errors_are_retried_until_success() {
        let calls = Cell::new(0);
        let out: Result<u32, Flaky> = with_retry(&fast(3), "t", || {
            calls.set(calls.get() + 1);
            if calls.get() < 3 { Err(Flaky(true)) } else { Ok(7) }
        });
        assert_eq!(out.unwrap(), 7);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn permanent_errors_are_not_retried() {
        let calls = Cell::new(0);
        let out: Result<u32, Flaky> = with_retry(&fast(5), "t", || {
            calls.set(calls.get() + 1);
            Err(Flaky(false))
        });
        assert!(out.is_err());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn exhaustion_returns_last_error() {
        let calls = Cell::new(0);
        let out: Result<u32, Flaky> = with_retry(&fast(2), "t", || {
            calls.set(calls.get() + 1);
            Err(Flaky(true))
        });
        assert!(out.is_err());
        assert_eq!(calls.get(), 2);
    }
}
