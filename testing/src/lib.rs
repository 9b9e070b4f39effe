//! # EcoLesson Testing
//!
//! Testing utilities and helpers for EcoLesson reducers.
//!
//! This crate provides:
//! - Deterministic clocks
//! - The [`ReducerTest`] Given-When-Then builder
//! - Helpers for resolving effects without a Store
//! - Property-based testing strategies for form input
//!
//! ## Example
//!
//! ```ignore
//! use ecolesson_auth::mocks::InMemoryIdentityProvider;
//! use ecolesson_auth::{SessionAction, SessionEnvironment, SessionReducer, SessionState};
//! use ecolesson_testing::{ReducerTest, assertions};
//!
//! ReducerTest::new(SessionReducer::<InMemoryIdentityProvider>::new())
//!     .with_env(SessionEnvironment::new(InMemoryIdentityProvider::new()))
//!     .given_state(SessionState::default())
//!     .when_action(SessionAction::IdentityChanged(None))
//!     .when_action(SessionAction::SignOutRequested)
//!     .then_state(|s| assert!(s.pending.sign_out))
//!     .then_effects(assertions::assert_has_future_effect)
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use ecolesson_core::environment::Clock;


pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use std::sync::{Arc, Mutex, PoisonError};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use ecolesson_testing::mocks::FixedClock;
    /// use ecolesson_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that only moves when told to
    ///
    /// Clones share the same time, so a test can keep one handle and give
    /// another to the environment.
    #[derive(Debug, Clone)]
    pub struct ManualClock {
        time: Arc<Mutex<DateTime<Utc>>>,
    }

    impl ManualClock {
        /// Create a manual clock starting at `time`
        #[must_use]
        pub fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Arc::new(Mutex::new(time)),
            }
        }

        /// Move the clock forward
        pub fn advance(&self, by: chrono::Duration) {
            let mut time = self.time.lock().unwrap_or_else(PoisonError::into_inner);
            *time += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Helpers for driving effects by hand
pub mod helpers {
    use ecolesson_core::effect::Effect;

    /// Run an effect to completion without a Store and collect the actions it produces
    ///
    /// Futures are awaited, delays are skipped (their action is returned
    /// immediately) and parallel effects are resolved in order.
    pub async fn resolve_effect<A>(effect: Effect<A>) -> Vec<A> {
        let mut produced = Vec::new();
        let mut queue = vec![effect];

        while let Some(effect) = queue.pop() {
            match effect {
                Effect::None => {},
                Effect::Future(fut) => produced.extend(fut.await),
                Effect::Delay { action, .. } => produced.push(*action),
                Effect::Parallel(effects) => queue.extend(effects.into_iter().rev()),
            }
        }

        produced
    }

    /// Resolve every effect in a reducer's output
    pub async fn resolve_all<A>(effects: impl IntoIterator<Item = Effect<A>>) -> Vec<A> {
        let mut produced = Vec::new();
        for effect in effects {
            produced.extend(resolve_effect(effect).await);
        }
        produced
    }

    /// Install a `tracing` subscriber honoring `RUST_LOG` for the current test binary
    ///
    /// Safe to call from several tests; only the first call installs.
    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    }
}

/// Property-based testing strategies using proptest
pub mod properties {
    use proptest::prelude::*;

    /// Strings made only of whitespace (including the empty string)
    pub fn blank() -> impl Strategy<Value = String> {
        "[ \t\n]{0,6}"
    }

    /// Strings with at least one visible character, padded with whitespace
    pub fn padded_word() -> impl Strategy<Value = String> {
        ("[ \t]{0,3}", "[A-Za-z0-9]{1,12}", "[ \t]{0,3}")
            .prop_map(|(lead, word, trail)| format!("{lead}{word}{trail}"))
    }

    /// Syntactically valid e-mail addresses
    pub fn email() -> impl Strategy<Value = String> {
        ("[a-z][a-z0-9.]{0,10}", "[a-z]{2,8}", "(com|org|br|com\\.br)")
            .prop_map(|(local, domain, tld)| format!("{local}@{domain}.{tld}"))
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, ManualClock, test_clock};

#[cfg(test)]
mod tests {
    use super::*;
    use ecolesson_core::effect::Effect;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
    }

    #[test]
    fn test_manual_clock_advances_all_clones() {
        let clock = ManualClock::new(test_clock().now());
        let shared = clock.clone();

        clock.advance(chrono::Duration::seconds(90));

        assert_eq!(shared.now(), test_clock().now() + chrono::Duration::seconds(90));
    }

    #[tokio::test]
    async fn test_resolve_effect_flattens_parallel() {
        let effect = Effect::merge(vec![
            Effect::Future(Box::pin(async { Some(1) })),
            Effect::None,
            Effect::Delay {
                duration: std::time::Duration::from_secs(60),
                action: Box::new(2),
            },
            Effect::Future(Box::pin(async { None })),
        ]);

        assert_eq!(helpers::resolve_effect(effect).await, vec![1, 2]);
    }
}
