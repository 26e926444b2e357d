//! # Sliver Core
//!
//! Typed action creators and copy-on-write reducers.
//!
//! ## Core Concepts
//!
//! - **Action**: A tagged record `{ type, meta, payload }`
//! - **Action creator**: Builds the actions of one tag and shape
//! - **Action map**: Named action creators whose tags follow their names
//! - **Draft**: A mutable view over an immutable state snapshot
//! - **Reducer**: `(Option<State>, Action) → State`, dispatching on the tag to
//!   one handler per action
//!
//! ## Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use sliver_core::prelude::*;
//!
//! #[derive(Clone, Debug, Default)]
//! struct Counter {
//!     count: i64,
//! }
//!
//! let actions = actions_from(&BTreeMap::from([
//!     ("increment".to_string(), action_unnamed().payload::<i64>()),
//!     ("decrement".to_string(), action_unnamed().payload::<i64>()),
//! ]));
//!
//! let reducer = reducer_from(Counter::default(), &actions)
//!     .on(&actions["increment"], |state, action| state.count += action.payload)
//!     .on(&actions["decrement"], |state, action| state.count -= action.payload)
//!     .build()
//!     .unwrap();
//!
//! let state = reducer.call(None, actions["increment"].create(5)).unwrap();
//! let state = reducer.call(Some(state), actions["decrement"].create(2)).unwrap();
//! assert_eq!(state.count, 3);
//! ```

// Re-export commonly used types
pub use serde::{Deserialize, Serialize};

/// Action records and action creators
pub mod action;

/// Action maps and tag rebinding
pub mod actions;

/// Copy-on-write drafts over immutable snapshots
pub mod draft;

/// Reducers dispatching on action tags
pub mod reducer;

pub use action::{
    action, action_unnamed, Action, ActionCreator, ActionFromMeta, ActionFromMetaPayload,
    ActionFromPayload, AnyAction, CreateAction,
};
pub use actions::{actions_from, ActionMap};
pub use draft::{
    immutable, produce, CloneOnWrite, Draft, IntoNext, Produce, ProduceError, Replace, Snapshot,
};
pub use reducer::{
    reducer_from, BuildError, ReduceError, Reducer, ReducerFrom, ReducerState, TagReducer,
};

/// Everything needed to define actions and reducers
pub mod prelude {
    pub use crate::action::{action, action_unnamed, Action, ActionCreator, AnyAction};
    pub use crate::actions::{actions_from, ActionMap};
    pub use crate::draft::{immutable, Replace, Snapshot};
    pub use crate::reducer::{reducer_from, Reducer};
}
