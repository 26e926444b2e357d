//! # Users Example
//!
//! A users slice built with Sliver.
//!
//! This example showcases:
//! - Action creators with mapped payloads and meta information
//! - An action map deriving its tags from field names
//! - A reducer mixing draft edits and replacement states
//!
//! ## Example
//!
//! ```
//! use users::{user_actions, users_reducer};
//!
//! let actions = user_actions();
//! let reducer = users_reducer(&actions).unwrap();
//!
//! let state = reducer.call(None, actions.add_user.create("Jane")).unwrap();
//! assert_eq!(state.users[0].name, "Jane");
//! ```

use serde::{Deserialize, Serialize};
use sliver_core::prelude::*;
use sliver_core::{
    ActionFromMetaPayload, ActionFromPayload, BuildError, CreateAction, TagReducer,
};
use sliver_macros::ActionMap;
use std::sync::Arc;

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Display name, trimmed
    pub name: String,
    /// Whether the user may administer the workspace
    pub admin: bool,
}

/// Workspace-wide preferences, shared between snapshots until changed
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    /// UI theme name
    pub theme: String,
}

/// Users slice state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UsersState {
    /// Users in insertion order
    pub users: Vec<User>,
    /// Preferences, untouched by user actions
    pub preferences: Arc<Preferences>,
}

/// Actions of the users slice
///
/// Tags follow the field names once passed through [`actions_from`].
#[derive(ActionMap, Clone, Debug)]
pub struct UserActions {
    /// Add a user by name
    pub add_user: ActionFromPayload<&'static str, User>,
    /// Rename a user; meta is the current name, payload the new one
    pub rename_user: ActionFromMetaPayload<String, String>,
    /// Remove a user by name
    pub remove_user: ActionFromPayload<String>,
    /// Remove every user
    pub clear_users: CreateAction,
}

/// The users slice's action map with tags bound to field names
#[must_use]
pub fn user_actions() -> UserActions {
    actions_from(&UserActions {
        add_user: action_unnamed().payload_with(|name: &'static str| User {
            name: name.trim().to_string(),
            admin: false,
        }),
        rename_user: action_unnamed().meta().payload(),
        remove_user: action_unnamed().payload(),
        clear_users: action_unnamed(),
    })
}

/// The users slice's reducer
///
/// # Errors
///
/// Returns a [`BuildError`] if `actions` carry tags the handlers do not
/// cover.
pub fn users_reducer(actions: &UserActions) -> Result<TagReducer<UsersState>, BuildError> {
    let initial = UsersState {
        users: Vec::new(),
        preferences: Arc::new(Preferences {
            theme: "light".to_string(),
        }),
    };

    reducer_from(initial, actions)
        .named("users")
        .on(&actions.add_user, |state, action| {
            if !state.users.iter().any(|user| user.name == action.payload.name) {
                state.users.push(action.payload);
            }
        })
        .on(&actions.rename_user, |state, action| {
            let Some(index) = state.users.iter().position(|user| user.name == action.meta) else {
                return;
            };
            tracing::debug!(from = %action.meta, to = %action.payload, "renaming user");
            state.users[index].name = action.payload;
        })
        .on(&actions.remove_user, |state, action| {
            Replace(UsersState {
                users: state
                    .users
                    .iter()
                    .filter(|user| user.name != action.payload)
                    .cloned()
                    .collect(),
                preferences: Arc::clone(&state.preferences),
            })
        })
        .on(&actions.clear_users, |state, _| {
            Replace(UsersState {
                users: Vec::new(),
                preferences: Arc::clone(&state.preferences),
            })
        })
        .build()
}
