//! Users example binary
//!
//! Dispatches a handful of actions through the users reducer and prints
//! each action and the resulting state.

use sliver_core::prelude::*;
use sliver_core::ReduceError;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use users::{user_actions, users_reducer, UsersState};

fn print_state(state: &Snapshot<UsersState>) {
    let names: Vec<_> = state.users.iter().map(|user| user.name.as_str()).collect();
    println!("Users: {names:?} (theme: {})", state.preferences.theme);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "users=debug,sliver_core=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Users Example: Sliver ===\n");

    let actions = user_actions();
    let reducer = users_reducer(&actions)?;

    let steps = vec![
        actions.add_user.create("  Jane ").erase(),
        actions.add_user.create("John").erase(),
        actions
            .rename_user
            .create("John".to_string(), "Johnny".to_string())
            .erase(),
        AnyAction::new("unknown"),
        actions.remove_user.create("Jane".to_string()).erase(),
    ];

    let add = actions.add_user.create("Ada");
    println!(">>> Action as JSON: {}", serde_json::to_string(&add)?);

    let mut state = reducer.call(None, add)?;
    print_state(&state);

    for action in steps {
        println!("\n>>> Dispatching: {}", action.tag());
        let next = reducer.reduce(Some(Arc::clone(&state)), action)?;
        if Arc::ptr_eq(&next, &state) {
            println!("State unchanged");
        }
        state = next;
        print_state(&state);
    }

    println!("\n>>> Dispatching: clear_users");
    match reducer.call(Some(state), actions.clear_users.create()) {
        Ok(state) => print_state(&state),
        Err(ReduceError::ConflictingUpdate { tag }) => println!("Handler for {tag} is broken"),
        Err(error) => return Err(error.into()),
    }

    println!("\n=== Done ===");
    Ok(())
}
