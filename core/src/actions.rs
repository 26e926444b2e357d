//! Action maps whose creator tags follow their keys
//!
//! A map built from unnamed creators gets its tags from its keys:
//!
//! ```
//! use std::collections::BTreeMap;
//! use sliver_core::action::{action_unnamed, ActionCreator};
//! use sliver_core::actions::actions_from;
//!
//! let map = BTreeMap::from([
//!     ("addUser".to_string(), action_unnamed().payload::<String>()),
//!     ("removeUser".to_string(), action_unnamed().payload::<String>()),
//! ]);
//! let actions = actions_from(&map);
//!
//! assert_eq!(actions["addUser"].create("Jane".into()).tag, "addUser");
//! assert_eq!(map["addUser"].tag(), "");
//! ```
//!
//! Structs holding creators of different shapes derive [`ActionMap`] with
//! `sliver-macros`; the field names become the tags.

use crate::action::ActionCreator;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// A collection of action creators keyed by name
pub trait ActionMap: Sized {
    /// Returns a new map where every creator's tag equals its key
    ///
    /// `self` and the creators in it are left untouched.
    #[must_use]
    fn rebind(&self) -> Self;

    /// The tags the creators currently produce
    fn tags(&self) -> Vec<String>;
}

/// Returns `map` with every action creator renamed after its key
#[must_use]
pub fn actions_from<A: ActionMap>(map: &A) -> A {
    map.rebind()
}

impl<C: ActionCreator> ActionMap for BTreeMap<String, C> {
    fn rebind(&self) -> Self {
        self.iter()
            .map(|(key, creator)| (key.clone(), creator.rename(key.as_str())))
            .collect()
    }

    fn tags(&self) -> Vec<String> {
        self.values().map(|creator| creator.tag().to_owned()).collect()
    }
}

impl<C, H> ActionMap for HashMap<String, C, H>
where
    C: ActionCreator,
    H: BuildHasher + Clone,
{
    fn rebind(&self) -> Self {
        let mut rebound = Self::with_capacity_and_hasher(self.len(), self.hasher().clone());
        for (key, creator) in self {
            rebound.insert(key.clone(), creator.rename(key.as_str()));
        }
        rebound
    }

    fn tags(&self) -> Vec<String> {
        self.values().map(|creator| creator.tag().to_owned()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{action, action_unnamed};

    #[test]
    fn test_rebinds_tags_to_keys() {
        let map = HashMap::from([
            ("toggle".to_string(), action_unnamed().meta::<u32>()),
            ("select".to_string(), action("selectWithMeta").meta::<u32>()),
        ]);

        let actions = actions_from(&map);

        assert_eq!(actions["toggle"].create(42).tag, "toggle");
        assert_eq!(actions["select"].create(42).tag, "select");
        assert_eq!(actions["select"].create(42).meta, 42);
    }

    #[test]
    fn test_input_map_is_untouched() {
        let map = BTreeMap::from([("clear".to_string(), action("reset"))]);

        let actions = actions_from(&map);

        assert_eq!(actions.tags(), vec!["clear".to_string()]);
        assert_eq!(map.tags(), vec!["reset".to_string()]);
    }

    #[test]
    fn test_rebinding_one_key_leaves_others_alone() {
        let map = BTreeMap::from([
            ("k1".to_string(), action_unnamed().payload::<u8>()),
            ("k2".to_string(), action("k2").payload::<u8>()),
        ]);

        let actions = map.rebind();

        assert_eq!(actions["k1"].create(1).tag, "k1");
        assert_eq!(actions["k2"].create(2).tag, "k2");
        assert_eq!(actions["k2"].create(2).payload, 2);
    }

    #[test]
    fn test_empty_map() {
        let map: BTreeMap<String, crate::action::CreateAction> = BTreeMap::new();
        assert!(actions_from(&map).is_empty());
    }
}
