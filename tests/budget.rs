// ABOUTME: Property tests for the retry budget.
// ABOUTME: Checks the attempt count against the timeout/interval arithmetic.

use preview_wait::wait::RetryPolicy;
use proptest::prelude::*;
use std::time::Duration;

proptest! {
    #[test]
    fn iterations_never_overrun_the_timeout(timeout_ms in 0u64..10_000_000, interval_ms in 1u64..100_000) {
        let policy = RetryPolicy::new(
            Duration::from_millis(timeout_ms),
            Duration::from_millis(interval_ms),
        );
        let n = u64::from(policy.iterations());
        prop_assert!(n * interval_ms <= timeout_ms);
        prop_assert!((n + 1) * interval_ms > timeout_ms);
    }

    #[test]
    fn whole_seconds_divide_exactly(timeout in 0u64..100_000, interval in 1u64..1_000) {
        let policy = RetryPolicy::from_secs(timeout, interval);
        prop_assert_eq!(u64::from(policy.iterations()), timeout / interval);
    }

    #[test]
    fn zero_interval_yields_no_attempts(timeout in 0u64..100_000) {
        let policy = RetryPolicy::from_secs(timeout, 0);
        prop_assert_eq!(policy.iterations(), 0);
    }
}
