//! # Sliver Testing
//!
//! Testing utilities and helpers for Sliver reducers.
//!
//! This crate provides:
//! - A Given-When-Then harness for reducers ([`ReducerTest`])
//! - A recording copy-on-write producer ([`mocks::RecordingProducer`])
//! - Property-based testing strategies for tags and action maps
//! - Assertion helpers for snapshots and actions
//!
//! ## Example
//!
//! ```ignore
//! use sliver_testing::{ReducerTest, init_test_tracing};
//!
//! #[test]
//! fn adds_a_user() {
//!     init_test_tracing();
//!
//!     ReducerTest::new(users_reducer())
//!         .when_action(actions.add_user.create("Jane".into()))
//!         .then_state(|state| assert_eq!(state.users, vec!["Jane".to_string()]))
//!         .run();
//! }
//! ```

/// Given-When-Then reducer tests
pub mod reducer_test;

/// Mock implementations of the copy-on-write seam
pub mod mocks {
    use sliver_core::draft::{CloneOnWrite, Draft, Produce, ProduceError, Snapshot};
    use std::sync::{Arc, Mutex, PoisonError};

    /// What a single `produce` call resulted in
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Outcome {
        /// The base snapshot was returned
        Unchanged,
        /// The draft's edits became the next snapshot
        Edited,
        /// The recipe's replacement became the next snapshot
        Replaced,
        /// The recipe both edited and replaced
        Conflict,
    }

    /// Producer that records the outcome of every call
    ///
    /// Delegates to [`CloneOnWrite`]. Clones share the same record, so a
    /// clone kept by the test sees the calls made by the reducer.
    ///
    /// # Example
    ///
    /// ```
    /// use sliver_core::draft::{immutable, Produce};
    /// use sliver_testing::mocks::{Outcome, RecordingProducer};
    ///
    /// let producer = RecordingProducer::new();
    /// let base = immutable(vec![1]);
    /// let next = producer.produce(&base, &mut |draft| {
    ///     draft.push(2);
    ///     None
    /// });
    ///
    /// assert_eq!(next.unwrap().as_slice(), &[1, 2]);
    /// assert_eq!(producer.outcomes(), vec![Outcome::Edited]);
    /// ```
    #[derive(Debug, Clone, Default)]
    pub struct RecordingProducer {
        outcomes: Arc<Mutex<Vec<Outcome>>>,
    }

    impl RecordingProducer {
        /// Create a producer with an empty record
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// The outcomes recorded so far, oldest first
        #[must_use]
        pub fn outcomes(&self) -> Vec<Outcome> {
            self.outcomes
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Number of `produce` calls so far
        #[must_use]
        pub fn calls(&self) -> usize {
            self.outcomes
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
        }

        fn record(&self, outcome: Outcome) {
            self.outcomes
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(outcome);
        }
    }

    impl<S: Clone> Produce<S> for RecordingProducer {
        fn produce(
            &self,
            base: &Snapshot<S>,
            recipe: &mut dyn FnMut(&mut Draft<'_, S>) -> Option<S>,
        ) -> Result<Snapshot<S>, ProduceError> {
            let mut replaced = false;
            let result = CloneOnWrite.produce(base, &mut |draft| {
                let replacement = recipe(draft);
                replaced = replacement.is_some();
                replacement
            });

            let outcome = match &result {
                Err(ProduceError::ConflictingUpdate) => Outcome::Conflict,
                Ok(next) if Arc::ptr_eq(next, base) => Outcome::Unchanged,
                Ok(_) if replaced => Outcome::Replaced,
                Ok(_) => Outcome::Edited,
            };
            self.record(outcome);
            result
        }
    }
}

/// Property-based testing utilities using proptest
pub mod properties {
    use proptest::collection::btree_map;
    use proptest::prelude::*;
    use sliver_core::action::{action, ActionFromPayload};
    use std::collections::BTreeMap;

    /// Strategy for action tags, including the empty tag
    pub fn arb_tag() -> impl Strategy<Value = String> {
        prop_oneof![
            1 => Just(String::new()),
            9 => "[a-zA-Z][a-zA-Z0-9_/]{0,15}",
        ]
    }

    /// Strategy for maps of payload creators whose tags need not match their keys
    pub fn arb_action_map() -> impl Strategy<Value = BTreeMap<String, ActionFromPayload<u32>>> {
        btree_map("[a-z][a-zA-Z0-9]{0,11}", arb_tag(), 0..8).prop_map(|tags| {
            tags.into_iter()
                .map(|(key, tag)| (key, action(tag).payload::<u32>()))
                .collect()
        })
    }
}

/// Install a tracing subscriber writing to the test output
///
/// Honors `RUST_LOG` and defaults to `sliver_core=trace`. Safe to call from
/// every test; only the first call installs the subscriber.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sliver_core=trace".into()),
        )
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use mocks::{Outcome, RecordingProducer};
pub use reducer_test::{assertions, ReducerTest};

#[cfg(test)]
mod tests {
    use super::*;
    use sliver_core::draft::{immutable, produce, Produce};

    #[test]
    fn test_recording_producer_outcomes() {
        let producer = RecordingProducer::new();
        let base = immutable(vec![1, 2]);

        let _ = producer.produce(&base, &mut |_| None);
        let _ = producer.produce(&base, &mut |_| Some(vec![3]));
        let _ = producer.produce(&base, &mut |draft| {
            draft.push(3);
            Some(vec![3])
        });

        assert_eq!(
            producer.outcomes(),
            vec![Outcome::Unchanged, Outcome::Replaced, Outcome::Conflict]
        );
        assert_eq!(producer.calls(), 3);
    }

    #[test]
    fn test_recording_producer_clones_share_record() {
        let producer = RecordingProducer::new();
        let clone = producer.clone();
        let base = immutable(0_u8);

        let _ = clone.produce(&base, &mut |draft| {
            **draft += 1;
            None
        });

        assert_eq!(producer.outcomes(), vec![Outcome::Edited]);
        assert_eq!(produce(&base, |_| ()).map(|next| *next), Ok(0));
    }

    #[test]
    fn test_init_test_tracing_is_idempotent() {
        init_test_tracing();
        init_test_tracing();
    }
}
