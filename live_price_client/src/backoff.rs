//! Delay policies for the poller's repeating timer.
//!
//! The poller asks its `Backoff` for the next delay every time the timer fires,
//! passing the number of consecutive failed fetches. Swapping the policy changes
//! only the spacing of timer ticks, never the poller's states or transitions.
use clap::ValueEnum;
use std::fmt::Debug;
use std::time::Duration;
use strum::{Display, EnumString};

/// Computes the delay until the next scheduled fetch.
pub trait Backoff: Send + Debug {
    /// Delay after a tick given the base `interval` and the current run of
    /// `consecutive_failures` (0 after a success).
    fn delay(&self, interval: Duration, consecutive_failures: u32) -> Duration;
}

/// Fixed interval regardless of failures.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedInterval;

impl Backoff for FixedInterval {
    fn delay(&self, interval: Duration, _consecutive_failures: u32) -> Duration {
        interval
    }
}

/// Interval multiplied by `factor` per consecutive failure, capped at `max_delay`.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    /// Multiplier applied per consecutive failure.
    pub factor: f64,
    /// Maximum delay between fetches.
    pub max_delay: Duration,
    /// Whether to spread the delay by up to ±25%.
    pub jitter: bool,
}

impl ExponentialBackoff {
    /// Doubling backoff with jitter, capped at `max_delay`.
    pub fn new(max_delay: Duration) -> Self {
        Self {
            factor: 2.0,
            max_delay,
            jitter: true,
        }
    }
}

impl Backoff for ExponentialBackoff {
    fn delay(&self, interval: Duration, consecutive_failures: u32) -> Duration {
        if consecutive_failures == 0 {
            return interval;
        }
        let exponent = consecutive_failures.min(i32::MAX as u32) as i32;
        let base = interval.as_millis() as f64 * self.factor.powi(exponent);
        let capped = base.min(self.max_delay.as_millis() as f64).max(interval.as_millis() as f64);

        let final_ms = if self.jitter {
            let jitter_range = capped * 0.25;
            let jitter = (rand::random::<f64>() - 0.5) * 2.0 * jitter_range;
            (capped + jitter).max(interval.as_millis() as f64)
        } else {
            capped
        };

        Duration::from_millis(final_ms as u64)
    }
}

/// Policy choice exposed on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Display, EnumString)]
#[clap(rename_all = "lower")]
#[strum(serialize_all = "lowercase")]
pub enum BackoffKind {
    /// [`FixedInterval`].
    #[default]
    Fixed,
    /// [`ExponentialBackoff`].
    Exponential,
}

impl BackoffKind {
    /// Instantiates the policy.
    pub fn build(self, max_delay: Duration) -> Box<dyn Backoff> {
        match self {
            BackoffKind::Fixed => Box::new(FixedInterval),
            BackoffKind::Exponential => Box::new(ExponentialBackoff::new(max_delay)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_secs(30);

    #[test]
    fn test_fixed_ignores_failures() {
        assert_eq!(FixedInterval.delay(INTERVAL, 0), INTERVAL);
        assert_eq!(FixedInterval.delay(INTERVAL, 7), INTERVAL);
    }

    #[test]
    fn test_exponential_no_jitter() {
        let policy = ExponentialBackoff {
            factor: 2.0,
            max_delay: Duration::from_secs(300),
            jitter: false,
        };
        assert_eq!(policy.delay(INTERVAL, 0), INTERVAL);
        assert_eq!(policy.delay(INTERVAL, 1), Duration::from_secs(60));
        assert_eq!(policy.delay(INTERVAL, 2), Duration::from_secs(120));
        assert_eq!(policy.delay(INTERVAL, 4), Duration::from_secs(300));
        assert_eq!(policy.delay(INTERVAL, u32::MAX), Duration::from_secs(300));
    }

    #[test]
    fn test_exponential_jitter_stays_in_range() {
        let policy = ExponentialBackoff::new(Duration::from_secs(300));
        for _ in 0..100 {
            let delay = policy.delay(INTERVAL, 1);
            assert!(delay >= Duration::from_secs(45), "{delay:?}");
            assert!(delay <= Duration::from_secs(75), "{delay:?}");
        }
    }

    #[test]
    fn test_never_shorter_than_interval() {
        let policy = ExponentialBackoff {
            factor: 2.0,
            max_delay: Duration::from_secs(10),
            jitter: true,
        };
        for _ in 0..100 {
            assert!(policy.delay(INTERVAL, 3) >= INTERVAL);
        }
    }

    #[test]
    fn test_kind_parses_lowercase() {
        assert_eq!("exponential".parse::<BackoffKind>().unwrap(), BackoffKind::Exponential);
        assert_eq!(BackoffKind::Fixed.to_string(), "fixed");
    }
}
