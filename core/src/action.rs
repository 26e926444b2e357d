//! Action records and the builders that create them
//!
//! An action creator is built from a tag and, optionally, a meta and/or a
//! payload argument. Each argument may be passed through a mapping function
//! given when the creator is built:
//!
//! ```
//! use sliver_core::action::{action, Action};
//!
//! let create = action("addUser").payload::<String>();
//! assert_eq!(
//!     create.create("Jane".to_string()),
//!     Action { tag: "addUser".to_string(), meta: (), payload: "Jane".to_string() }
//! );
//!
//! let create = action("resize")
//!     .meta_with(|n: f64| format!("{n:.2}"))
//!     .payload_with(|s: &str| s.len());
//! let resized = create.create(2.0, "abc");
//! assert_eq!(resized.meta, "2.00");
//! assert_eq!(resized.payload, 3);
//! ```
//!
//! Each creator shape only offers the builder steps it has not taken yet, so
//! configuring the payload twice does not compile:
//!
//! ```compile_fail
//! use sliver_core::action::action;
//!
//! let create = action("twice").payload::<u32>().payload::<u32>();
//! ```
//!
//! ```compile_fail
//! use sliver_core::action::action;
//!
//! let create = action("twice").meta::<u32>().payload::<u32>().meta::<u32>();
//! ```

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Shared, immutable mapping function applied to a creator argument.
type MapFn<I, O> = Arc<dyn Fn(I) -> O + Send + Sync>;

fn identity<T: 'static>() -> MapFn<T, T> {
    Arc::new(|value: T| value)
}

/// A tagged action record
///
/// `()` stands for an absent meta or payload. Serialized, the tag is written
/// as `type`:
///
/// ```
/// use sliver_core::action::Action;
///
/// let action = Action { tag: "ping".to_string(), meta: (), payload: 1 };
/// assert_eq!(
///     serde_json::to_string(&action).unwrap(),
///     r#"{"type":"ping","meta":null,"payload":1}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action<P = (), M = ()> {
    /// Identifies the kind of action; reducers dispatch on it
    #[serde(rename = "type")]
    pub tag: String,
    /// Additional information about the action
    pub meta: M,
    /// The action's data
    pub payload: P,
}

impl<P, M> Action<P, M> {
    /// Erase the meta and payload types so the action can be sent to a reducer
    #[must_use]
    pub fn erase(self) -> AnyAction
    where
        P: Any + Send,
        M: Any + Send,
    {
        AnyAction::from(self)
    }
}

/// Capabilities shared by every action creator shape
///
/// Reducers and action maps work against this trait so they accept a creator
/// of any shape.
pub trait ActionCreator: Sized {
    /// Arguments taken by the creator: `()`, the meta input, the payload
    /// input, or `(meta, payload)`
    type Input;
    /// Payload type of the created actions
    type Payload;
    /// Meta type of the created actions
    type Meta;

    /// The tag every created action carries
    fn tag(&self) -> &str;

    /// Returns a creator of the same shape with `tag` as its tag
    ///
    /// The mapping functions are shared with `self`, which stays unchanged.
    #[must_use]
    fn rename(&self, tag: impl Into<String>) -> Self;

    /// Create an action from the creator's arguments
    fn create_from(&self, input: Self::Input) -> Action<Self::Payload, Self::Meta>;
}

/// Creates an action creator with the provided tag
///
/// The creator takes no arguments; chain [`CreateAction::meta`] or
/// [`CreateAction::payload`] to give it some.
#[must_use]
pub fn action(tag: impl Into<String>) -> CreateAction {
    CreateAction { tag: tag.into() }
}

/// Creates an action creator with an empty tag
///
/// Useful together with [`crate::actions::actions_from`], which renames the
/// creators after their keys.
#[must_use]
pub fn action_unnamed() -> CreateAction {
    CreateAction { tag: String::new() }
}

/// Creator of actions without meta or payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAction {
    tag: String,
}

impl CreateAction {
    /// Create a new action
    #[must_use]
    pub fn create(&self) -> Action {
        Action {
            tag: self.tag.clone(),
            meta: (),
            payload: (),
        }
    }

    /// Returns an action creator that takes a meta argument
    #[must_use]
    pub fn meta<M: 'static>(&self) -> ActionFromMeta<M> {
        ActionFromMeta {
            tag: self.tag.clone(),
            map_meta: identity(),
        }
    }

    /// Returns an action creator that takes a meta argument passed through `map`
    #[must_use]
    pub fn meta_with<IM, M, F>(&self, map: F) -> ActionFromMeta<IM, M>
    where
        F: Fn(IM) -> M + Send + Sync + 'static,
    {
        ActionFromMeta {
            tag: self.tag.clone(),
            map_meta: Arc::new(map),
        }
    }

    /// Returns an action creator that takes a payload argument
    #[must_use]
    pub fn payload<P: 'static>(&self) -> ActionFromPayload<P> {
        ActionFromPayload {
            tag: self.tag.clone(),
            map_payload: identity(),
        }
    }

    /// Returns an action creator that takes a payload argument passed through `map`
    #[must_use]
    pub fn payload_with<IP, P, F>(&self, map: F) -> ActionFromPayload<IP, P>
    where
        F: Fn(IP) -> P + Send + Sync + 'static,
    {
        ActionFromPayload {
            tag: self.tag.clone(),
            map_payload: Arc::new(map),
        }
    }
}

impl ActionCreator for CreateAction {
    type Input = ();
    type Payload = ();
    type Meta = ();

    fn tag(&self) -> &str {
        &self.tag
    }

    fn rename(&self, tag: impl Into<String>) -> Self {
        action(tag)
    }

    fn create_from(&self, (): ()) -> Action {
        self.create()
    }
}

/// Creator of actions carrying meta information
pub struct ActionFromMeta<IM, M = IM> {
    tag: String,
    map_meta: MapFn<IM, M>,
}

impl<IM, M> ActionFromMeta<IM, M> {
    /// Create a new action with the given meta information
    #[must_use]
    pub fn create(&self, meta: IM) -> Action<(), M> {
        Action {
            tag: self.tag.clone(),
            meta: (self.map_meta)(meta),
            payload: (),
        }
    }

    /// Returns an action creator that takes the meta and then a payload argument
    #[must_use]
    pub fn payload<P: 'static>(&self) -> ActionFromMetaPayload<IM, P, M, P> {
        ActionFromMetaPayload {
            tag: self.tag.clone(),
            map_meta: Arc::clone(&self.map_meta),
            map_payload: identity(),
        }
    }

    /// Returns an action creator that takes the meta and then a payload
    /// argument passed through `map`
    #[must_use]
    pub fn payload_with<IP, P, F>(&self, map: F) -> ActionFromMetaPayload<IM, IP, M, P>
    where
        F: Fn(IP) -> P + Send + Sync + 'static,
    {
        ActionFromMetaPayload {
            tag: self.tag.clone(),
            map_meta: Arc::clone(&self.map_meta),
            map_payload: Arc::new(map),
        }
    }
}

impl<IM, M> ActionCreator for ActionFromMeta<IM, M> {
    type Input = IM;
    type Payload = ();
    type Meta = M;

    fn tag(&self) -> &str {
        &self.tag
    }

    fn rename(&self, tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            map_meta: Arc::clone(&self.map_meta),
        }
    }

    fn create_from(&self, meta: IM) -> Action<(), M> {
        self.create(meta)
    }
}

/// Creator of actions carrying a payload
pub struct ActionFromPayload<IP, P = IP> {
    tag: String,
    map_payload: MapFn<IP, P>,
}

impl<IP, P> ActionFromPayload<IP, P> {
    /// Create a new action with the given payload
    #[must_use]
    pub fn create(&self, payload: IP) -> Action<P> {
        Action {
            tag: self.tag.clone(),
            meta: (),
            payload: (self.map_payload)(payload),
        }
    }

    /// Returns an action creator that takes a meta argument before the payload
    #[must_use]
    pub fn meta<M: 'static>(&self) -> ActionFromMetaPayload<M, IP, M, P> {
        ActionFromMetaPayload {
            tag: self.tag.clone(),
            map_meta: identity(),
            map_payload: Arc::clone(&self.map_payload),
        }
    }

    /// Returns an action creator that takes a meta argument, passed through
    /// `map`, before the payload
    #[must_use]
    pub fn meta_with<IM, M, F>(&self, map: F) -> ActionFromMetaPayload<IM, IP, M, P>
    where
        F: Fn(IM) -> M + Send + Sync + 'static,
    {
        ActionFromMetaPayload {
            tag: self.tag.clone(),
            map_meta: Arc::new(map),
            map_payload: Arc::clone(&self.map_payload),
        }
    }
}

impl<IP, P> ActionCreator for ActionFromPayload<IP, P> {
    type Input = IP;
    type Payload = P;
    type Meta = ();

    fn tag(&self) -> &str {
        &self.tag
    }

    fn rename(&self, tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            map_payload: Arc::clone(&self.map_payload),
        }
    }

    fn create_from(&self, payload: IP) -> Action<P> {
        self.create(payload)
    }
}

/// Creator of actions carrying both meta information and a payload
pub struct ActionFromMetaPayload<IM, IP, M = IM, P = IP> {
    tag: String,
    map_meta: MapFn<IM, M>,
    map_payload: MapFn<IP, P>,
}

impl<IM, IP, M, P> ActionFromMetaPayload<IM, IP, M, P> {
    /// Create a new action; the meta argument comes first
    #[must_use]
    pub fn create(&self, meta: IM, payload: IP) -> Action<P, M> {
        Action {
            tag: self.tag.clone(),
            meta: (self.map_meta)(meta),
            payload: (self.map_payload)(payload),
        }
    }
}

impl<IM, IP, M, P> ActionCreator for ActionFromMetaPayload<IM, IP, M, P> {
    type Input = (IM, IP);
    type Payload = P;
    type Meta = M;

    fn tag(&self) -> &str {
        &self.tag
    }

    fn rename(&self, tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            map_meta: Arc::clone(&self.map_meta),
            map_payload: Arc::clone(&self.map_payload),
        }
    }

    fn create_from(&self, (meta, payload): (IM, IP)) -> Action<P, M> {
        self.create(meta, payload)
    }
}

// Derived impls would require the argument types to be `Clone`/`Debug`.

impl<IM, M> Clone for ActionFromMeta<IM, M> {
    fn clone(&self) -> Self {
        self.rename(self.tag.clone())
    }
}

impl<IP, P> Clone for ActionFromPayload<IP, P> {
    fn clone(&self) -> Self {
        self.rename(self.tag.clone())
    }
}

impl<IM, IP, M, P> Clone for ActionFromMetaPayload<IM, IP, M, P> {
    fn clone(&self) -> Self {
        self.rename(self.tag.clone())
    }
}

impl<IM, M> fmt::Debug for ActionFromMeta<IM, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionFromMeta")
            .field("tag", &self.tag)
            .finish_non_exhaustive()
    }
}

impl<IP, P> fmt::Debug for ActionFromPayload<IP, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionFromPayload")
            .field("tag", &self.tag)
            .finish_non_exhaustive()
    }
}

impl<IM, IP, M, P> fmt::Debug for ActionFromMetaPayload<IM, IP, M, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionFromMetaPayload")
            .field("tag", &self.tag)
            .finish_non_exhaustive()
    }
}

/// An action record with its meta and payload types erased
///
/// Reducers receive `AnyAction`s so one reducer can handle actions of
/// different shapes. Each handler recovers its typed [`Action`] with
/// [`AnyAction::downcast`].
pub struct AnyAction {
    tag: String,
    meta: Box<dyn Any + Send>,
    payload: Box<dyn Any + Send>,
}

impl AnyAction {
    /// A bare action with the given tag and neither meta nor payload
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self::from(Action {
            tag: tag.into(),
            meta: (),
            payload: (),
        })
    }

    /// The action's tag
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Recover the typed action
    ///
    /// # Errors
    ///
    /// Returns the erased action unchanged if its payload is not a `P` or its
    /// meta is not an `M`.
    pub fn downcast<P, M>(self) -> Result<Action<P, M>, Self>
    where
        P: Any + Send,
        M: Any + Send,
    {
        let Self { tag, meta, payload } = self;

        let meta = match meta.downcast::<M>() {
            Ok(meta) => meta,
            Err(meta) => return Err(Self { tag, meta, payload }),
        };
        match payload.downcast::<P>() {
            Ok(payload) => Ok(Action {
                tag,
                meta: *meta,
                payload: *payload,
            }),
            Err(payload) => Err(Self {
                tag,
                meta,
                payload,
            }),
        }
    }
}

impl<P, M> From<Action<P, M>> for AnyAction
where
    P: Any + Send,
    M: Any + Send,
{
    fn from(action: Action<P, M>) -> Self {
        Self {
            tag: action.tag,
            meta: Box::new(action.meta),
            payload: Box::new(action.payload),
        }
    }
}

impl fmt::Debug for AnyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyAction")
            .field("tag", &self.tag)
            .finish_non_exhaustive()
    }
}
