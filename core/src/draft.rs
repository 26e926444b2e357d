//! Copy-on-write state updates
//!
//! State is shared as immutable [`Snapshot`]s. A handler edits a [`Draft`]
//! of the snapshot, which copies the state the first time it is borrowed
//! mutably. Fields held in `Arc`s are shared between the old and the new
//! snapshot unless the handler replaces them; plain fields are cloned.
//!
//! ```
//! use std::sync::Arc;
//! use sliver_core::draft::{immutable, produce};
//!
//! #[derive(Clone)]
//! struct State {
//!     users: Vec<String>,
//!     settings: Arc<String>,
//! }
//!
//! let base = immutable(State { users: vec![], settings: Arc::new("dark".into()) });
//! let next = produce(&base, |draft| {
//!     draft.users.push("Jane".into());
//! })
//! .unwrap();
//!
//! assert_eq!(next.users, vec!["Jane".to_string()]);
//! assert!(base.users.is_empty());
//! assert!(Arc::ptr_eq(&base.settings, &next.settings));
//! ```

use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use thiserror::Error;

/// An immutable, shareable state value
pub type Snapshot<S> = Arc<S>;

/// Wrap a value as an immutable snapshot
#[must_use]
pub fn immutable<S>(value: S) -> Snapshot<S> {
    Arc::new(value)
}

/// Errors that can occur while producing the next snapshot
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProduceError {
    /// The recipe both edited the draft and returned a replacement state
    #[error(
        "a recipe returned a new state *and* modified its draft; either return a new state *or* modify the draft"
    )]
    ConflictingUpdate,
}

/// A mutable view over a snapshot, scoped to one recipe invocation
///
/// Reads go to the base snapshot until the draft is borrowed mutably; from
/// then on they go to a private copy.
///
/// The draft counts as modified from its first mutable borrow, whether or
/// not the value changes. A recipe that calls `retain` keeping every element
/// therefore yields a new (equal) snapshot, and returning a replacement after
/// such a borrow is a [`ProduceError::ConflictingUpdate`]. Recipes that may
/// not change anything should check through a shared borrow first.
pub struct Draft<'a, S> {
    base: &'a S,
    copy: Option<S>,
}

impl<'a, S> Draft<'a, S> {
    /// Create a draft over `base`
    #[must_use]
    pub const fn new(base: &'a S) -> Self {
        Self { base, copy: None }
    }

    /// Whether the draft has been borrowed mutably
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.copy.is_some()
    }

    /// The edited state, or `None` if the draft was never borrowed mutably
    #[must_use]
    pub fn finish(self) -> Option<S> {
        self.copy
    }
}

impl<S> Deref for Draft<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.copy.as_ref().unwrap_or(self.base)
    }
}

impl<S: Clone> DerefMut for Draft<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        let base = self.base;
        self.copy.get_or_insert_with(|| base.clone())
    }
}

/// Explicitly marks a handler's return value as a replacement state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replace<S>(pub S);

/// Converts a handler's return value into an optional replacement state
///
/// `()` keeps the draft's edits, `Option<S>` and [`Replace<S>`] replace the
/// state.
pub trait IntoNext<S> {
    /// The replacement state, if any
    fn into_next(self) -> Option<S>;
}

impl<S> IntoNext<S> for () {
    fn into_next(self) -> Option<S> {
        None
    }
}

impl<S> IntoNext<S> for Option<S> {
    fn into_next(self) -> Option<S> {
        self
    }
}

impl<S> IntoNext<S> for Replace<S> {
    fn into_next(self) -> Option<S> {
        Some(self.0)
    }
}

/// Copy-on-write update of a snapshot
///
/// Given a base snapshot and a recipe, produce the next snapshot:
///
/// - recipe leaves the draft alone and returns `None`: the base snapshot itself
/// - recipe edits the draft and returns `None`: a snapshot of the edits
/// - recipe leaves the draft alone and returns `Some(state)`: a snapshot of `state`
/// - recipe edits the draft and returns `Some(_)`: [`ProduceError::ConflictingUpdate`]
pub trait Produce<S>: Send + Sync {
    /// Run `recipe` against a draft of `base`
    ///
    /// # Errors
    ///
    /// Returns [`ProduceError::ConflictingUpdate`] if the recipe both edits
    /// the draft and returns a replacement.
    fn produce(
        &self,
        base: &Snapshot<S>,
        recipe: &mut dyn FnMut(&mut Draft<'_, S>) -> Option<S>,
    ) -> Result<Snapshot<S>, ProduceError>;
}

/// The default producer: copies the state on first mutable borrow
///
/// The copy is a `Clone` of the whole top-level state. Only fields held in
/// an `Arc` (or another reference-counted handle) stay shared with the base
/// snapshot; plain fields are cloned along with the edited one, so large
/// siblings that should survive edits by reference belong in an `Arc`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CloneOnWrite;

impl<S: Clone> Produce<S> for CloneOnWrite {
    fn produce(
        &self,
        base: &Snapshot<S>,
        recipe: &mut dyn FnMut(&mut Draft<'_, S>) -> Option<S>,
    ) -> Result<Snapshot<S>, ProduceError> {
        let mut draft = Draft::new(base.as_ref());
        let replacement = recipe(&mut draft);

        match (draft.finish(), replacement) {
            (Some(_), Some(_)) => Err(ProduceError::ConflictingUpdate),
            (Some(edited), None) => Ok(Arc::new(edited)),
            (None, Some(replacement)) => Ok(Arc::new(replacement)),
            (None, None) => Ok(Arc::clone(base)),
        }
    }
}

/// Produce the next snapshot of `base` with [`CloneOnWrite`]
///
/// # Errors
///
/// Returns [`ProduceError::ConflictingUpdate`] if `recipe` both edits the
/// draft and returns a replacement.
pub fn produce<S, R, F>(base: &Snapshot<S>, recipe: F) -> Result<Snapshot<S>, ProduceError>
where
    S: Clone,
    R: IntoNext<S>,
    F: FnOnce(&mut Draft<'_, S>) -> R,
{
    let mut recipe = Some(recipe);
    CloneOnWrite.produce(base, &mut |draft| {
        recipe.take().and_then(|recipe| recipe(draft).into_next())
    })
}
