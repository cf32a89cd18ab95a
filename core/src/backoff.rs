use rand::Rng;
use std::time::Duration;

const BASE_MS: u64 = 1_000;
const MAX_MS: u64 = 30_000;
/// Beyond 5 consecutive failures a session goes terminal and stops
/// auto-retrying until an explicit reconnect is invoked.
pub const MAX_CONSECUTIVE_FAILURES: u32 = 5;

/// Exponential backoff with full jitter: `min(30_000, base * 2^attempt +
/// U(0,1000))`, attempt counter reset on a successful connect.
#[derive(Debug, Default)]
pub struct Backoff {
    attempt: u32,
}

impl Backoff {
    pub fn new() -> Self {
        Self { attempt: 0 }
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn exhausted(&self) -> bool {
        self.attempt >= MAX_CONSECUTIVE_FAILURES
    }

    /// Records a failed attempt and returns the delay to wait before retrying.
    pub fn next_delay(&mut self) -> Duration {
        let exp = BASE_MS.saturating_mul(1u64 << self.attempt.min(20));
        let jitter = rand::thread_rng().gen_range(0..=1000u64);
        self.attempt += 1;
        Duration::from_millis(exp.saturating_add(jitter).min(MAX_MS))
    }

    pub fn reset(&mut self) {
        self.attempt = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_is_bounded_and_nondecreasing_in_expectation() {
        let mut b = Backoff::new();
        let mut prev_min = 0u128;
        for _ in 0..10 {
            let d = b.next_delay();
            assert!(d.as_millis() <= 30_000);
            // the floor (no-jitter) component is non-decreasing until capped
            assert!(d.as_millis() + 1000 >= prev_min);
            prev_min = d.as_millis().saturating_sub(1000);
        }
    }

    #[test]
    fn exhausts_after_five_failures() {
        let mut b = Backoff::new();
        for _ in 0..5 {
            assert!(!b.exhausted());
            b.next_delay();
        }
        assert!(b.exhausted());
    }

    #[test]
    fn reset_clears_attempt_counter() {
        let mut b = Backoff::new();
        b.next_delay();
        b.next_delay();
        assert_eq!(b.attempt(), 2);
        b.reset();
        assert_eq!(b.attempt(), 0);
    }
}
