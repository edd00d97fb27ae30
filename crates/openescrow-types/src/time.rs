//! Clock abstraction.
//!
//! Deadline and window comparisons are evaluated against the caller-visible
//! current time at the moment of the call. The engine takes the clock as an
//! injected collaborator so the window-boundary properties are testable to
//! the second.

use chrono::{DateTime, Utc};

/// Source of the current time for deadline and window checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock: wall time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
pub use manual::ManualClock;

#[cfg(any(test, feature = "test-helpers"))]
mod manual {
    use std::sync::{Arc, Mutex};

    use chrono::{DateTime, Duration, Utc};

    use super::Clock;

    /// A shared, settable clock. Clones observe the same instant, so a test
    /// can keep one handle and hand another to the engine.
    #[derive(Debug, Clone)]
    pub struct ManualClock {
        now: Arc<Mutex<DateTime<Utc>>>,
    }

    impl ManualClock {
        #[must_use]
        pub fn new(start: DateTime<Utc>) -> Self {
            Self {
                now: Arc::new(Mutex::new(start)),
            }
        }

        /// Jump to an absolute instant.
        pub fn set(&self, instant: DateTime<Utc>) {
            *self.now.lock().expect("clock poisoned") = instant;
        }

        /// Move forward (or backward) by `delta`.
        pub fn advance(&self, delta: Duration) {
            let mut now = self.now.lock().expect("clock poisoned");
            *now += delta;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().expect("clock poisoned")
        }
    }
}
