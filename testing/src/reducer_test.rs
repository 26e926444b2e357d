//! Ergonomic testing utilities for reducers
//!
//! This module provides a fluent API for testing reducers with readable Given-When-Then syntax.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use sliver_core::draft::Snapshot;
use sliver_core::reducer::{ReduceError, Reducer};
use std::sync::Arc;

/// Type alias for state assertion functions
type StateAssertion<S> = Box<dyn FnOnce(&S)>;

/// Type alias for error assertion functions
type ErrorAssertion = Box<dyn FnOnce(&ReduceError)>;

/// Fluent API for testing reducers with Given-When-Then syntax
///
/// # Example
///
/// ```ignore
/// use sliver_testing::ReducerTest;
///
/// ReducerTest::new(users_reducer())
///     .given_state(Users { users: vec![] })
///     .when_action(actions.add_user.create("Jane".into()))
///     .then_state(|state| {
///         assert_eq!(state.users, vec!["Jane".to_string()]);
///     })
///     .run();
/// ```
pub struct ReducerTest<R>
where
    R: Reducer,
{
    reducer: R,
    initial_state: Option<Snapshot<R::State>>,
    action: Option<R::Action>,
    state_assertions: Vec<StateAssertion<R::State>>,
    error_assertion: Option<ErrorAssertion>,
    expect_unchanged: bool,
}

impl<R> ReducerTest<R>
where
    R: Reducer,
{
    /// Create a new reducer test with the given reducer
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            initial_state: None,
            action: None,
            state_assertions: Vec::new(),
            error_assertion: None,
            expect_unchanged: false,
        }
    }

    /// Set the initial state (Given)
    ///
    /// Without a given state the reducer starts from its own initial state.
    #[must_use]
    pub fn given_state(self, state: R::State) -> Self {
        self.given_snapshot(Arc::new(state))
    }

    /// Set the initial state from an existing snapshot (Given)
    #[must_use]
    pub fn given_snapshot(mut self, snapshot: Snapshot<R::State>) -> Self {
        self.initial_state = Some(snapshot);
        self
    }

    /// Set the action to test (When)
    #[must_use]
    pub fn when_action(mut self, action: impl Into<R::Action>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Add an assertion about the resulting state (Then)
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&R::State) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Expect the reducer to return the given snapshot itself (Then)
    #[must_use]
    pub fn then_unchanged(mut self) -> Self {
        self.expect_unchanged = true;
        self
    }

    /// Expect the reducer to fail, and check the error (Then)
    #[must_use]
    pub fn then_error<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&ReduceError) + 'static,
    {
        self.error_assertion = Some(Box::new(assertion));
        self
    }

    /// Run the test and execute all assertions
    ///
    /// # Panics
    ///
    /// Panics if the action is not set, if `then_unchanged()` is used without
    /// a given state, if the reducer fails unexpectedly or succeeds when an
    /// error was expected, or if any assertions fail.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let action = self.action.expect("Action must be set with when_action()");

        // Execute reducer
        let result = self.reducer.reduce(self.initial_state.clone(), action);

        let next = match (result, self.error_assertion) {
            (Ok(next), None) => next,
            (Err(error), Some(assertion)) => {
                assertion(&error);
                return;
            }
            (Ok(_), Some(_)) => panic!("Expected the reducer to fail, but it succeeded"),
            (Err(error), None) => panic!("Reducer failed unexpectedly: {error}"),
        };

        if self.expect_unchanged {
            let given = self
                .initial_state
                .expect("then_unchanged() requires given_state() or given_snapshot()");
            assert!(
                Arc::ptr_eq(&given, &next),
                "Expected the reducer to return the given state unchanged"
            );
        }

        // Run state assertions
        for assertion in self.state_assertions {
            assertion(&next);
        }
    }
}

/// Helper assertions for snapshots and actions
pub mod assertions {
    use sliver_core::action::Action;
    use sliver_core::draft::Snapshot;
    use std::fmt::Debug;
    use std::sync::Arc;

    /// Assert that two snapshots are the same allocation
    ///
    /// # Panics
    ///
    /// Panics if the snapshots are different allocations.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_same_snapshot<S>(left: &Snapshot<S>, right: &Snapshot<S>) {
        assert!(
            Arc::ptr_eq(left, right),
            "Expected both snapshots to be the same allocation"
        );
    }

    /// Assert that two snapshots are different allocations
    ///
    /// # Panics
    ///
    /// Panics if the snapshots are the same allocation.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_new_snapshot<S>(left: &Snapshot<S>, right: &Snapshot<S>) {
        assert!(
            !Arc::ptr_eq(left, right),
            "Expected a new snapshot, but the same allocation was returned"
        );
    }

    /// Assert an action's tag, meta and payload
    ///
    /// # Panics
    ///
    /// Panics if any of the three differs.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_action<P, M>(action: &Action<P, M>, tag: &str, meta: &M, payload: &P)
    where
        P: PartialEq + Debug,
        M: PartialEq + Debug,
    {
        assert_eq!(action.tag, tag, "Unexpected action tag");
        assert_eq!(&action.meta, meta, "Unexpected meta for action '{tag}'");
        assert_eq!(&action.payload, payload, "Unexpected payload for action '{tag}'");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sliver_core::action::{action, action_unnamed, ActionFromPayload, CreateAction};
    use sliver_core::actions::actions_from;
    use sliver_core::reducer::{reducer_from, TagReducer};
    use std::collections::BTreeMap;

    #[derive(Clone, Debug, Default)]
    struct TestState {
        count: i32,
    }

    fn actions() -> BTreeMap<String, ActionFromPayload<i32>> {
        actions_from(&BTreeMap::from([
            ("increment".to_string(), action_unnamed().payload::<i32>()),
            ("reset".to_string(), action_unnamed().payload::<i32>()),
        ]))
    }

    fn test_reducer() -> TagReducer<TestState> {
        let actions = actions();
        reducer_from(TestState::default(), &actions)
            .on(&actions["increment"], |state, action| state.count += action.payload)
            .on(&actions["reset"], |state, action| {
                state.count = 0;
                Some(TestState {
                    count: action.payload,
                })
            })
            .build()
            .unwrap_or_else(|error| unreachable!("every action is handled: {error}"))
    }

    #[test]
    fn test_reducer_test_increment() {
        ReducerTest::new(test_reducer())
            .given_state(TestState { count: 1 })
            .when_action(actions()["increment"].create(2))
            .then_state(|state| {
                assert_eq!(state.count, 3);
            })
            .run();
    }

    #[test]
    fn test_reducer_test_without_state() {
        ReducerTest::new(test_reducer())
            .when_action(actions()["increment"].create(5))
            .then_state(|state| {
                assert_eq!(state.count, 5);
            })
            .run();
    }

    #[test]
    fn test_reducer_test_unchanged() {
        let unhandled: CreateAction = action("unhandled");
        ReducerTest::new(test_reducer())
            .given_state(TestState { count: 7 })
            .when_action(unhandled.create())
            .then_unchanged()
            .run();
    }

    #[test]
    fn test_reducer_test_error() {
        ReducerTest::new(test_reducer())
            .given_state(TestState { count: 7 })
            .when_action(actions()["reset"].create(1))
            .then_error(|error| {
                assert!(matches!(error, ReduceError::ConflictingUpdate { .. }));
            })
            .run();
    }

    #[test]
    fn test_assertions() {
        let snapshot = Arc::new(TestState::default());
        assertions::assert_same_snapshot(&snapshot, &Arc::clone(&snapshot));
        assertions::assert_new_snapshot(&snapshot, &Arc::new(TestState::default()));
        assertions::assert_action(&action("t").payload::<u8>().create(1), "t", &(), &1);
    }
}
