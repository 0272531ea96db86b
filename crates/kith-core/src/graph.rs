//! Social graph trait definition

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub(crate) static NO_FRIENDS: BTreeSet<String> = BTreeSet::new();

/// Read access to the friendship relation
///
/// Path search and friend suggestions run over this trait, so they work
/// on the registry as well as on a plain [`Adjacency`] map.
pub trait SocialGraph {
    /// Whether the user exists
    fn contains_user(&self, username: &str) -> bool;

    /// Friends of a user. Unknown users have no friends.
    fn neighbors(&self, username: &str) -> &BTreeSet<String>;

    /// Whether `a` and `b` are direct friends
    fn are_friends(&self, a: &str, b: &str) -> bool {
        self.neighbors(a).contains(b)
    }
}

/// Result of adding a friendship edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeOutcome {
    Created,
    AlreadyFriends,
}

/// Bare adjacency map, mostly useful for exercising the algorithms
pub type Adjacency = BTreeMap<String, BTreeSet<String>>;

impl SocialGraph for Adjacency {
    fn contains_user(&self, username: &str) -> bool {
        self.contains_key(username)
    }

    fn neighbors(&self, username: &str) -> &BTreeSet<String> {
        self.get(username).unwrap_or(&NO_FRIENDS)
    }
}

/// Build a symmetric adjacency map from an edge list
pub fn adjacency_from_edges<'a>(
    users: impl IntoIterator<Item = &'a str>,
    edges: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Adjacency {
    let mut adj: Adjacency = users
        .into_iter()
        .map(|u| (u.to_string(), BTreeSet::new()))
        .collect();

    for (a, b) in edges {
        if a == b {
            continue;
        }
        adj.entry(a.to_string()).or_default().insert(b.to_string());
        adj.entry(b.to_string()).or_default().insert(a.to_string());
    }
    adj
}
