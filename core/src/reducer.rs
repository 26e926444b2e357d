//! Reducers built from one handler per action tag
//!
//! Building a reducer takes two steps. [`reducer_from`] fixes the initial
//! state and the action map; the returned [`ReducerFrom`] collects one
//! handler per action and checks that every action is handled.
//!
//! ```
//! use sliver_core::action::{action_unnamed, ActionFromPayload, CreateAction};
//! use sliver_core::actions::{actions_from, ActionMap};
//! use sliver_core::reducer::{reducer_from, Reducer};
//!
//! #[derive(Clone, Debug, Default, PartialEq)]
//! struct Users {
//!     users: Vec<String>,
//! }
//!
//! # #[derive(Clone)]
//! struct UserActions {
//!     add_user: ActionFromPayload<String>,
//!     clear_users: CreateAction,
//! }
//! # impl ActionMap for UserActions {
//! #     fn rebind(&self) -> Self {
//! #         use sliver_core::action::ActionCreator;
//! #         Self {
//! #             add_user: self.add_user.rename("add_user"),
//! #             clear_users: self.clear_users.rename("clear_users"),
//! #         }
//! #     }
//! #     fn tags(&self) -> Vec<String> {
//! #         use sliver_core::action::ActionCreator;
//! #         vec![self.add_user.tag().to_owned(), self.clear_users.tag().to_owned()]
//! #     }
//! # }
//!
//! let actions = actions_from(&UserActions {
//!     add_user: action_unnamed().payload(),
//!     clear_users: action_unnamed(),
//! });
//!
//! let reducer = reducer_from(Users::default(), &actions)
//!     .on(&actions.add_user, |state, action| state.users.push(action.payload))
//!     .on(&actions.clear_users, |_, _| Some(Users::default()))
//!     .build()
//!     .unwrap();
//!
//! let state = reducer.reduce(None, actions.add_user.create("Jane".into()).erase()).unwrap();
//! assert_eq!(state.users, vec!["Jane".to_string()]);
//! ```

use crate::action::{Action, ActionCreator, AnyAction};
use crate::actions::ActionMap;
use crate::draft::{CloneOnWrite, Draft, IntoNext, ProduceError, Produce, Snapshot};
use std::any::{type_name, Any};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while reducing an action
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReduceError {
    /// The handler both edited the draft and returned a new state
    ///
    /// This is a defect in the handler, not a retryable condition.
    #[error("handler for '{tag}' returned a new state *and* modified its draft")]
    ConflictingUpdate {
        /// Tag of the action being reduced
        tag: String,
    },

    /// The action's payload or meta type differs from the handler's
    #[error("action '{tag}' does not match its handler, which expects {expected}")]
    ActionMismatch {
        /// Tag of the action being reduced
        tag: String,
        /// Type name of the action the handler accepts
        expected: &'static str,
    },
}

/// Errors raised while building a reducer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// An action of the action map has no handler
    #[error("no handler for action '{0}'")]
    MissingHandler(String),

    /// Two handlers were registered for the same tag
    #[error("more than one handler for action '{0}'")]
    DuplicateHandler(String),

    /// A handler was registered for a tag the action map does not produce
    #[error("handler for '{0}' matches no action of the action map")]
    UnknownTag(String),
}

/// Reduces actions into the next state snapshot
pub trait Reducer {
    /// The state this reducer produces
    type State;

    /// The actions this reducer accepts
    type Action;

    /// Reduce `action` into the next snapshot
    ///
    /// A missing `state` stands for "no state yet" and is replaced by the
    /// reducer's initial state.
    ///
    /// # Errors
    ///
    /// Returns a [`ReduceError`] if the matching handler misbehaves; no
    /// state is produced in that case.
    fn reduce(
        &self,
        state: Option<Snapshot<Self::State>>,
        action: Self::Action,
    ) -> Result<Snapshot<Self::State>, ReduceError>;
}

/// The state type of a reducer
pub type ReducerState<R> = <R as Reducer>::State;

/// Type-erased handler for one tag
trait FieldHandler<S>: Send + Sync {
    fn apply(
        &self,
        producer: &dyn Produce<S>,
        base: &Snapshot<S>,
        action: AnyAction,
    ) -> Result<Snapshot<S>, ReduceError>;
}

/// Handler recovering `Action<P, M>` before running `F` on a draft
struct TypedHandler<P, M, F, R> {
    handler: F,
    _action: PhantomData<fn(Action<P, M>) -> R>,
}

impl<S, P, M, F, R> FieldHandler<S> for TypedHandler<P, M, F, R>
where
    P: Any + Send,
    M: Any + Send,
    F: Fn(&mut Draft<'_, S>, Action<P, M>) -> R + Send + Sync,
    R: IntoNext<S>,
{
    fn apply(
        &self,
        producer: &dyn Produce<S>,
        base: &Snapshot<S>,
        action: AnyAction,
    ) -> Result<Snapshot<S>, ReduceError> {
        let action = action.downcast::<P, M>().map_err(|action| {
            tracing::warn!(tag = action.tag(), "action does not match its handler");
            ReduceError::ActionMismatch {
                tag: action.tag().to_owned(),
                expected: type_name::<Action<P, M>>(),
            }
        })?;
        let tag = action.tag.clone();

        let mut action = Some(action);
        producer
            .produce(base, &mut |draft| {
                action
                    .take()
                    .and_then(|action| (self.handler)(draft, action).into_next())
            })
            .map_err(|ProduceError::ConflictingUpdate| {
                tracing::warn!(tag = %tag, "handler returned a new state and modified its draft");
                ReduceError::ConflictingUpdate { tag }
            })
    }
}

/// Creates the first stage of a reducer from its initial state and actions
///
/// The action map fixes which tags the reducer must handle; handlers are
/// registered on the returned [`ReducerFrom`].
#[must_use]
pub fn reducer_from<S, A>(initial_state: S, actions: &A) -> ReducerFrom<S>
where
    S: Clone + 'static,
    A: ActionMap,
{
    ReducerFrom {
        initial_state: Arc::new(initial_state),
        expected: actions.tags().into_iter().collect(),
        handlers: HashMap::new(),
        duplicate: None,
        producer: Arc::new(CloneOnWrite),
        name: None,
    }
}

/// Collects the handlers of a reducer under construction
pub struct ReducerFrom<S> {
    initial_state: Snapshot<S>,
    expected: BTreeSet<String>,
    handlers: HashMap<String, Box<dyn FieldHandler<S>>>,
    duplicate: Option<String>,
    producer: Arc<dyn Produce<S>>,
    name: Option<String>,
}

impl<S: 'static> ReducerFrom<S> {
    /// Handle the actions created by `creator`
    ///
    /// The handler either edits the draft and returns `()` (or `None`), or
    /// leaves the draft alone and returns the new state (`Some` or
    /// [`crate::draft::Replace`]).
    #[must_use]
    pub fn on<C, F, R>(self, creator: &C, handler: F) -> Self
    where
        C: ActionCreator,
        C::Payload: Any + Send,
        C::Meta: Any + Send,
        F: Fn(&mut Draft<'_, S>, Action<C::Payload, C::Meta>) -> R + Send + Sync + 'static,
        R: IntoNext<S> + 'static,
    {
        self.on_tag(creator.tag(), handler)
    }

    /// Handle actions tagged `tag` whose payload is a `P` and meta an `M`
    #[must_use]
    pub fn on_tag<P, M, F, R>(mut self, tag: impl Into<String>, handler: F) -> Self
    where
        P: Any + Send,
        M: Any + Send,
        F: Fn(&mut Draft<'_, S>, Action<P, M>) -> R + Send + Sync + 'static,
        R: IntoNext<S> + 'static,
    {
        let tag = tag.into();
        let handler = TypedHandler {
            handler,
            _action: PhantomData,
        };
        if self.handlers.insert(tag.clone(), Box::new(handler)).is_some() {
            self.duplicate.get_or_insert(tag);
        }
        self
    }

    /// Use `producer` instead of [`CloneOnWrite`] to apply handlers
    #[must_use]
    pub fn with_producer(mut self, producer: impl Produce<S> + 'static) -> Self {
        self.producer = Arc::new(producer);
        self
    }

    /// Name the reducer in its log output
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Finish the reducer
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] if a handler was registered twice, an action
    /// of the action map has no handler, or a handler matches no action.
    pub fn build(self) -> Result<TagReducer<S>, BuildError> {
        if let Some(tag) = self.duplicate {
            return Err(BuildError::DuplicateHandler(tag));
        }
        if let Some(tag) = self
            .expected
            .iter()
            .find(|tag| !self.handlers.contains_key(tag.as_str()))
        {
            return Err(BuildError::MissingHandler(tag.clone()));
        }
        if let Some(tag) = self
            .handlers
            .keys()
            .find(|tag| !self.expected.contains(tag.as_str()))
        {
            return Err(BuildError::UnknownTag(tag.clone()));
        }

        let name = self.name.unwrap_or_else(|| type_name::<S>().to_owned());
        tracing::debug!(reducer = %name, handlers = self.handlers.len(), "reducer built");

        Ok(TagReducer {
            initial_state: self.initial_state,
            handlers: self.handlers,
            producer: self.producer,
            name,
        })
    }
}

/// A reducer dispatching on the action tag
///
/// Created by [`reducer_from`]. Handlers are fixed at construction time.
pub struct TagReducer<S> {
    initial_state: Snapshot<S>,
    handlers: HashMap<String, Box<dyn FieldHandler<S>>>,
    producer: Arc<dyn Produce<S>>,
    name: String,
}

impl<S> TagReducer<S> {
    /// The state used when no state is passed in
    #[must_use]
    pub const fn initial_state(&self) -> &Snapshot<S> {
        &self.initial_state
    }

    /// Whether an action tagged `tag` would reach a handler
    #[must_use]
    pub fn handles(&self, tag: &str) -> bool {
        self.handlers.contains_key(tag)
    }

    /// Reduce any typed or erased action
    ///
    /// # Errors
    ///
    /// See [`Reducer::reduce`].
    pub fn call(
        &self,
        state: Option<Snapshot<S>>,
        action: impl Into<AnyAction>,
    ) -> Result<Snapshot<S>, ReduceError> {
        self.reduce(state, action.into())
    }
}

impl<S> Reducer for TagReducer<S> {
    type State = S;
    type Action = AnyAction;

    fn reduce(
        &self,
        state: Option<Snapshot<S>>,
        action: AnyAction,
    ) -> Result<Snapshot<S>, ReduceError> {
        let state = state.unwrap_or_else(|| Arc::clone(&self.initial_state));

        let Some(handler) = self.handlers.get(action.tag()) else {
            tracing::trace!(reducer = %self.name, tag = action.tag(), "unhandled action");
            return Ok(state);
        };

        tracing::trace!(reducer = %self.name, tag = action.tag(), "reducing action");
        handler.apply(self.producer.as_ref(), &state, action)
    }
}

impl<S> fmt::Debug for TagReducer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<_> = self.handlers.keys().collect();
        tags.sort();
        f.debug_struct("TagReducer")
            .field("name", &self.name)
            .field("tags", &tags)
            .finish_non_exhaustive()
    }
}
