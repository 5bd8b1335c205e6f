//! Fixed-window request counter keyed by scope and partition.
//!
//! Each `(scope, partition)` pair owns a window that opens on its first
//! request and admits up to the rule's limit until it expires. Expired
//! windows are swept once the table grows past a threshold.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::{error, warn};

use crate::domain::ports::{RequestThrottle, ThrottleDecision, ThrottlePolicy, ThrottleScope};

const SWEEP_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, Copy)]
struct Window {
    opened: Instant,
    count: u32,
}

/// In-memory fixed-window throttle.
#[derive(Debug)]
pub struct FixedWindowThrottle {
    policy: ThrottlePolicy,
    windows: Mutex<HashMap<(ThrottleScope, String), Window>>,
}

impl FixedWindowThrottle {
    pub fn new(policy: ThrottlePolicy) -> Self {
        Self {
            policy,
            windows: Mutex::new(HashMap::new()),
        }
    }

    fn check_at(&self, scope: ThrottleScope, partition: &str, now: Instant) -> ThrottleDecision {
        let rule = self.policy.rule(scope);
        let Ok(mut windows) = self.windows.lock() else {
            // A poisoned table admits the request.
            error!(scope = scope.as_str(), "throttle table lock poisoned");
            return ThrottleDecision::Allowed { remaining: 0 };
        };

        if windows.len() > SWEEP_THRESHOLD {
            windows.retain(|(key_scope, _), window| {
                now.duration_since(window.opened) < self.policy.rule(*key_scope).window()
            });
        }

        let window = windows
            .entry((scope, partition.to_owned()))
            .or_insert(Window {
                opened: now,
                count: 0,
            });
        if now.duration_since(window.opened) >= rule.window() {
            *window = Window {
                opened: now,
                count: 0,
            };
        }

        if window.count >= rule.limit() {
            let retry_after = rule
                .window()
                .saturating_sub(now.duration_since(window.opened))
                .max(Duration::from_secs(1));
            warn!(
                scope = scope.as_str(),
                partition,
                retry_after_secs = retry_after.as_secs(),
                "request throttled"
            );
            return ThrottleDecision::Limited { retry_after };
        }

        window.count += 1;
        ThrottleDecision::Allowed {
            remaining: rule.limit() - window.count,
        }
    }
}

impl RequestThrottle for FixedWindowThrottle {
    fn check(&self, scope: ThrottleScope, partition: &str) -> ThrottleDecision {
        self.check_at(scope, partition, Instant::now())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for window accounting.

    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::ports::ThrottleRule;

    #[fixture]
    fn throttle() -> FixedWindowThrottle {
        let minute = Duration::from_secs(60);
        FixedWindowThrottle::new(ThrottlePolicy {
            appointment_writes: ThrottleRule::new(2, minute).expect("rule"),
            general: ThrottleRule::new(3, minute).expect("rule"),
        })
    }

    #[rstest]
    fn admits_up_to_limit_then_limits(throttle: FixedWindowThrottle) {
        let start = Instant::now();
        let scope = ThrottleScope::AppointmentWrites;

        assert_eq!(
            throttle.check_at(scope, "10.0.0.1", start),
            ThrottleDecision::Allowed { remaining: 1 }
        );
        assert_eq!(
            throttle.check_at(scope, "10.0.0.1", start),
            ThrottleDecision::Allowed { remaining: 0 }
        );
        assert_eq!(
            throttle.check_at(scope, "10.0.0.1", start + Duration::from_secs(20)),
            ThrottleDecision::Limited {
                retry_after: Duration::from_secs(40)
            }
        );
    }

    #[rstest]
    fn window_resets_after_expiry(throttle: FixedWindowThrottle) {
        let start = Instant::now();
        let scope = ThrottleScope::AppointmentWrites;
        for _ in 0..3 {
            throttle.check_at(scope, "10.0.0.1", start);
        }

        assert!(matches!(
            throttle.check_at(scope, "10.0.0.1", start + Duration::from_secs(60)),
            ThrottleDecision::Allowed { remaining: 1 }
        ));
    }

    #[rstest]
    fn partitions_and_scopes_are_independent(throttle: FixedWindowThrottle) {
        let start = Instant::now();
        for _ in 0..2 {
            throttle.check_at(ThrottleScope::AppointmentWrites, "10.0.0.1", start);
        }

        assert!(matches!(
            throttle.check_at(ThrottleScope::AppointmentWrites, "10.0.0.2", start),
            ThrottleDecision::Allowed { .. }
        ));
        assert!(matches!(
            throttle.check_at(ThrottleScope::General, "10.0.0.1", start),
            ThrottleDecision::Allowed { remaining: 2 }
        ));
    }
}
