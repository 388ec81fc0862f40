//! Retry under a timeout with exponential backoff.

use std::thread;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::discovery::DiscoveryError;

/// Backoff schedule between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    pub initial: Duration,
    pub max: Duration,
    pub multiplier: u32,
}

impl Default for Backoff {
    fn default() -> Self {
        Backoff {
            initial: Duration::from_millis(100),
            max: Duration::from_secs(5),
            multiplier: 2,
        }
    }
}

impl Backoff {
    fn next(&self, delay: Duration) -> Duration {
        delay.saturating_mul(self.multiplier).min(self.max)
    }
}

/// Runs `op` until it succeeds, fails fatally, or `timeout` elapses.
///
/// Uses the default [`Backoff`]: 100 ms doubling up to 5 s.
pub fn retry_with_timeout<T, F>(timeout: Duration, op: F) -> Result<T, DiscoveryError>
where
    F: FnMut() -> Result<T, DiscoveryError>,
{
    retry_with_backoff(timeout, Backoff::default(), op)
}

/// Runs `op` with an explicit backoff schedule.
///
/// Retryable errors are retried while the deadline has not passed; a wait
/// never extends past the deadline. Fatal errors return immediately. When
/// time runs out the last error is returned.
pub fn retry_with_backoff<T, F>(
    timeout: Duration,
    backoff: Backoff,
    mut op: F,
) -> Result<T, DiscoveryError>
where
    F: FnMut() -> Result<T, DiscoveryError>,
{
    let deadline = Instant::now().checked_add(timeout);
    let mut delay = backoff.initial;
    let mut attempt: u32 = 1;

    loop {
        let error = match op() {
            Ok(value) => return Ok(value),
            Err(error) if !error.is_retryable() => return Err(error),
            Err(error) => error,
        };

        let remaining = match deadline {
            Some(deadline) => deadline.saturating_duration_since(Instant::now()),
            None => Duration::MAX,
        };
        if remaining.is_zero() {
            return Err(error);
        }

        let wait = delay.min(remaining);
        warn!(
            attempt,
            error = %error,
            retry_in_ms = wait.as_millis() as u64,
            "retryable error, retrying"
        );
        thread::sleep(wait);

        delay = backoff.next(delay);
        attempt = attempt.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> Backoff {
        Backoff {
            initial: Duration::from_millis(1),
            max: Duration::from_millis(4),
            multiplier: 2,
        }
    }

    #[test]
    fn succeeds_after_transient_failures() {
        let mut calls = 0;
        let result = retry_with_backoff(Duration::from_secs(5), fast(), || {
            calls += 1;
            if calls < 3 {
                Err(DiscoveryError::retryable("429 TooManyRequests"))
            } else {
                Ok(calls)
            }
        });
        assert_eq!(result, Ok(3));
    }

    #[test]
    fn fatal_errors_are_not_retried() {
        let mut calls = 0;
        let result: Result<(), _> = retry_with_backoff(Duration::from_secs(5), fast(), || {
            calls += 1;
            Err(DiscoveryError::fatal("404 NotAuthorizedOrNotFound"))
        });
        assert_eq!(calls, 1);
        assert!(!result.unwrap_err().is_retryable());
    }

    #[test]
    fn gives_up_at_deadline() {
        let started = Instant::now();
        let mut calls = 0;
        let result: Result<(), _> = retry_with_backoff(Duration::from_millis(30), fast(), || {
            calls += 1;
            Err(DiscoveryError::retryable(format!("attempt {calls}")))
        });

        let err = result.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(err.message(), format!("attempt {calls}"));
        assert!(calls > 1);
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn zero_timeout_tries_once() {
        let mut calls = 0;
        let result: Result<(), _> = retry_with_timeout(Duration::ZERO, || {
            calls += 1;
            Err(DiscoveryError::retryable("503"))
        });
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn backoff_doubles_up_to_cap() {
        let backoff = Backoff::default();
        let mut delay = backoff.initial;
        let mut seen = Vec::new();
        for _ in 0..8 {
            seen.push(delay.as_millis());
            delay = backoff.next(delay);
        }
        assert_eq!(seen, vec![100, 200, 400, 800, 1600, 3200, 5000, 5000]);
    }
}
