use std::time::Duration;

use crate::RetryConfig;

/// Computes the backoff delay before retry `attempt` (1-indexed).
///
/// `initial_delay * backoff_multiplier^(attempt - 1)`, capped at
/// `max_delay`. Pure and deterministic; the exponent is clamped and the
/// arithmetic saturates, so large attempt numbers settle on the cap
/// instead of overflowing. Multipliers below 1 are treated as 1 (flat
/// backoff), keeping delays non-decreasing.
pub fn delay_for_attempt(attempt: u32, cfg: &RetryConfig) -> Duration {
    let exponent = attempt.saturating_sub(1).min(64);
    let factor = cfg.backoff_multiplier.max(1.0).powi(exponent as i32);
    let delay_ms = cfg.initial_delay.as_millis() as f64 * factor;

    if !delay_ms.is_finite() || delay_ms >= cfg.max_delay.as_millis() as f64 {
        return cfg.max_delay;
    }
    Duration::from_millis(delay_ms as u64).min(cfg.max_delay)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> RetryConfig {
        RetryConfig {
            max_retries: 3,
            initial_delay: Duration::from_millis(1_000),
            max_delay: Duration::from_millis(10_000),
            backoff_multiplier: 2.0,
        }
    }

    #[test]
    fn doubles_per_attempt_until_cap() {
        let cfg = cfg();
        assert_eq!(delay_for_attempt(1, &cfg), Duration::from_millis(1_000));
        assert_eq!(delay_for_attempt(2, &cfg), Duration::from_millis(2_000));
        assert_eq!(delay_for_attempt(3, &cfg), Duration::from_millis(4_000));
        assert_eq!(delay_for_attempt(4, &cfg), Duration::from_millis(8_000));
        assert_eq!(delay_for_attempt(5, &cfg), Duration::from_millis(10_000));
        assert_eq!(delay_for_attempt(10, &cfg), Duration::from_millis(10_000));
    }

    #[test]
    fn monotone_nondecreasing_and_capped() {
        let cfg = cfg();
        let mut previous = Duration::ZERO;
        for attempt in 1..=20 {
            let delay = delay_for_attempt(attempt, &cfg);
            assert!(delay >= previous, "delay shrank at attempt {attempt}");
            assert!(delay <= cfg.max_delay);
            previous = delay;
        }
    }

    #[test]
    fn huge_attempt_numbers_saturate_at_cap() {
        let cfg = cfg();
        assert_eq!(delay_for_attempt(u32::MAX, &cfg), cfg.max_delay);
    }

    #[test]
    fn sub_unit_multiplier_yields_flat_backoff() {
        let cfg = RetryConfig {
            backoff_multiplier: 0.5,
            ..cfg()
        };
        for attempt in 1..=10 {
            assert_eq!(delay_for_attempt(attempt, &cfg), cfg.initial_delay);
        }
    }

    #[test]
    fn deterministic_for_equal_inputs() {
        let cfg = cfg();
        assert_eq!(delay_for_attempt(3, &cfg), delay_for_attempt(3, &cfg));
    }
}
