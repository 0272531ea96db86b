//! User registry - the in-memory social network
//!
//! [`Registry`] owns every [`User`] together with the timestamp clock used
//! for posts. It is the only place friendships are created, which keeps
//! friend sets symmetric: both sides are updated inside one `&mut self`
//! call, so no reader can observe a half-added edge.

use crate::error::{Error, Result};
use crate::graph::{EdgeOutcome, SocialGraph, NO_FRIENDS};
use crate::limits::{validate_post, validate_username};
use crate::post::{Clock, Post, Timestamp};
use crate::post_index::RecentPosts;
use crate::suggest::{Recommender, Suggestion};
use crate::traversal::{FriendPath, Separation, TraversalEngine};
use crate::user::User;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Registry-wide counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    pub users: usize,
    pub friendships: usize,
    pub posts: u64,
}

/// All users of one session
#[derive(Debug, Default)]
pub struct Registry {
    users: HashMap<String, User>,
    clock: Clock,
    friendships: usize,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Users
    // ─────────────────────────────────────────────────────────────────────────

    /// Register a new user
    pub fn create_user(&mut self, name: &str) -> Result<&User> {
        validate_username(name)?;
        if self.users.contains_key(name) {
            return Err(Error::UserExists(name.to_string()));
        }

        tracing::debug!("Creating user: {}", name);
        let user: &User = self
            .users
            .entry(name.to_string())
            .or_insert_with(|| User::new(name));
        Ok(user)
    }

    /// Look up a user by name
    pub fn user(&self, name: &str) -> Option<&User> {
        self.users.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.users.contains_key(name)
    }

    /// All usernames, ascending
    pub fn users(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.users.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn require(&self, name: &str) -> Result<&User> {
        self.users
            .get(name)
            .ok_or_else(|| Error::UserNotFound(name.to_string()))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Friendships
    // ─────────────────────────────────────────────────────────────────────────

    /// Make `a` and `b` friends of each other
    ///
    /// Re-adding an existing friendship is not an error and reports
    /// [`EdgeOutcome::AlreadyFriends`].
    pub fn add_friendship(&mut self, a: &str, b: &str) -> Result<EdgeOutcome> {
        for name in [a, b] {
            if !self.users.contains_key(name) {
                return Err(Error::InvalidUser(name.to_string()));
            }
        }
        if a == b {
            return Err(Error::SelfFriendship(a.to_string()));
        }

        let created_ab = self
            .users
            .get_mut(a)
            .map_or(false, |user| user.add_friend(b));
        let created_ba = self
            .users
            .get_mut(b)
            .map_or(false, |user| user.add_friend(a));
        debug_assert_eq!(created_ab, created_ba, "friend sets out of sync");

        if created_ab {
            self.friendships += 1;
            tracing::debug!("Added friendship: {} <-> {}", a, b);
            Ok(EdgeOutcome::Created)
        } else {
            Ok(EdgeOutcome::AlreadyFriends)
        }
    }

    /// Friends of `name`, ascending
    pub fn list_friends(&self, name: &str) -> Result<Vec<String>> {
        let user = self.require(name)?;
        Ok(user.friends().iter().cloned().collect())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Posts
    // ─────────────────────────────────────────────────────────────────────────

    /// Add a post for `name`, returning the timestamp it was stored under
    pub fn add_post(&mut self, name: &str, content: &str) -> Result<Timestamp> {
        validate_post(content)?;
        let user = self
            .users
            .get_mut(name)
            .ok_or_else(|| Error::UserNotFound(name.to_string()))?;

        let timestamp = self.clock.tick();
        if !user.add_post(Post::new(timestamp, content)) {
            tracing::warn!("Duplicate post timestamp {} for {}", timestamp, name);
        }
        tracing::debug!("Added post {} for {}", timestamp, name);
        Ok(timestamp)
    }

    /// Contents of up to `limit` posts by `name`, most recent first
    pub fn recent_posts(&self, name: &str, limit: usize) -> Result<Vec<String>> {
        Ok(self
            .recent_post_entries(name, limit)?
            .map(|post| post.content.clone())
            .collect())
    }

    /// Up to `limit` posts by `name`, most recent first
    pub fn recent_post_entries(&self, name: &str, limit: usize) -> Result<RecentPosts<'_>> {
        Ok(self.require(name)?.recent_posts(limit))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Minimum number of friendships linking `a` and `b`
    pub fn degrees_of_separation(&self, a: &str, b: &str) -> Result<Separation> {
        self.require_both(a, b)?;
        Ok(TraversalEngine::degrees_of_separation(self, a, b))
    }

    /// One shortest chain of friendships from `a` to `b`
    pub fn shortest_path(&self, a: &str, b: &str) -> Result<Option<FriendPath>> {
        self.require_both(a, b)?;
        Ok(TraversalEngine::shortest_path(self, a, b))
    }

    /// Up to `limit` friend suggestions for `name`
    pub fn suggest_friends(&self, name: &str, limit: usize) -> Result<Vec<Suggestion>> {
        self.require(name)?;
        Ok(Recommender::suggest(self, name, limit))
    }

    fn require_both(&self, a: &str, b: &str) -> Result<()> {
        for name in [a, b] {
            if !self.users.contains_key(name) {
                return Err(Error::InvalidUser(name.to_string()));
            }
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────────────────────

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            users: self.users.len(),
            friendships: self.friendships,
            posts: self.clock.issued(),
        }
    }

    /// Drop every user and restart the post clock
    pub fn reset(&mut self) {
        tracing::info!("Resetting registry ({} users)", self.users.len());
        *self = Self::new();
    }
}

impl SocialGraph for Registry {
    fn contains_user(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    fn neighbors(&self, username: &str) -> &BTreeSet<String> {
        self.users
            .get(username)
            .map_or(&NO_FRIENDS, |user| user.friends())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(names: &[&str]) -> Registry {
        let mut registry = Registry::new();
        for name in names {
            registry.create_user(name).unwrap();
        }
        registry
    }

    fn chain() -> Registry {
        let mut registry = registry_with(&["A", "B", "C", "D"]);
        registry.add_friendship("A", "B").unwrap();
        registry.add_friendship("B", "C").unwrap();
        registry.add_friendship("C", "D").unwrap();
        registry
    }

    #[test]
    fn test_create_user() {
        let mut registry = Registry::new();
        let user = registry.create_user("alice").unwrap();
        assert_eq!(user.username, "alice");

        assert!(registry.contains("alice"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_user_rejected() {
        let mut registry = registry_with(&["alice"]);
        let err = registry.create_user("alice").unwrap_err();

        assert_eq!(err, Error::UserExists("alice".to_string()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_invalid_username_rejected() {
        let mut registry = Registry::new();
        assert!(matches!(registry.create_user(""), Err(Error::Validation(_))));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_friendship_is_symmetric() {
        let mut registry = registry_with(&["alice", "bob"]);
        let outcome = registry.add_friendship("alice", "bob").unwrap();

        assert_eq!(outcome, EdgeOutcome::Created);
        assert_eq!(registry.list_friends("alice").unwrap(), vec!["bob"]);
        assert_eq!(registry.list_friends("bob").unwrap(), vec!["alice"]);
    }

    #[test]
    fn test_friendship_is_idempotent() {
        let mut registry = registry_with(&["alice", "bob"]);
        registry.add_friendship("alice", "bob").unwrap();

        assert_eq!(
            registry.add_friendship("bob", "alice").unwrap(),
            EdgeOutcome::AlreadyFriends
        );
        assert_eq!(registry.stats().friendships, 1);
        assert_eq!(registry.list_friends("alice").unwrap().len(), 1);
    }

    #[test]
    fn test_friendship_with_unknown_user() {
        let mut registry = registry_with(&["alice"]);
        let err = registry.add_friendship("alice", "ghost").unwrap_err();

        assert_eq!(err, Error::InvalidUser("ghost".to_string()));
        assert!(registry.list_friends("alice").unwrap().is_empty());
    }

    #[test]
    fn test_self_friendship_rejected() {
        let mut registry = registry_with(&["alice"]);
        let err = registry.add_friendship("alice", "alice").unwrap_err();

        assert_eq!(err, Error::SelfFriendship("alice".to_string()));
        assert!(registry.list_friends("alice").unwrap().is_empty());
    }

    #[test]
    fn test_list_friends_sorted() {
        let mut registry = registry_with(&["me", "zoe", "amy", "kim"]);
        registry.add_friendship("me", "zoe").unwrap();
        registry.add_friendship("me", "amy").unwrap();
        registry.add_friendship("kim", "me").unwrap();

        assert_eq!(registry.list_friends("me").unwrap(), vec!["amy", "kim", "zoe"]);
        assert!(matches!(
            registry.list_friends("ghost"),
            Err(Error::UserNotFound(_))
        ));
    }

    #[test]
    fn test_recent_posts() {
        let mut registry = registry_with(&["A"]);
        for content in ["p1", "p2", "p3", "p4", "p5"] {
            registry.add_post("A", content).unwrap();
        }

        assert_eq!(registry.recent_posts("A", 3).unwrap(), vec!["p5", "p4", "p3"]);
        assert!(registry.recent_posts("A", 0).unwrap().is_empty());
    }

    #[test]
    fn test_post_timestamps_shared_across_users() {
        let mut registry = registry_with(&["a", "b"]);
        let t0 = registry.add_post("a", "one").unwrap();
        let t1 = registry.add_post("b", "two").unwrap();
        let t2 = registry.add_post("a", "three").unwrap();

        assert!(t0 < t1 && t1 < t2);
        assert_eq!(registry.stats().posts, 3);
        assert_eq!(registry.user("a").unwrap().posts().len(), 2);
    }

    #[test]
    fn test_post_for_unknown_user() {
        let mut registry = Registry::new();
        assert!(matches!(
            registry.add_post("ghost", "hi"),
            Err(Error::UserNotFound(_))
        ));
        // Rejected posts do not consume a timestamp
        assert_eq!(registry.stats().posts, 0);
        assert!(matches!(
            registry.recent_posts("ghost", 1),
            Err(Error::UserNotFound(_))
        ));
    }

    #[test]
    fn test_empty_post_rejected() {
        let mut registry = registry_with(&["a"]);
        assert!(matches!(registry.add_post("a", "  "), Err(Error::Validation(_))));
        assert_eq!(registry.stats().posts, 0);
    }

    #[test]
    fn test_chain_scenario() {
        let registry = chain();

        assert_eq!(
            registry.degrees_of_separation("A", "D").unwrap(),
            Separation::Degrees(3)
        );
        assert_eq!(
            registry.degrees_of_separation("A", "A").unwrap(),
            Separation::Degrees(0)
        );

        let suggestions = registry.suggest_friends("A", 5).unwrap();
        let names: Vec<&str> = suggestions.iter().map(|s| s.username.as_str()).collect();
        assert_eq!(names, vec!["C"]);

        assert_eq!(
            registry.degrees_of_separation("A", "ghost"),
            Err(Error::InvalidUser("ghost".to_string()))
        );
    }

    #[test]
    fn test_disconnected_users_unreachable() {
        let mut registry = chain();
        registry.create_user("E").unwrap();

        assert_eq!(
            registry.degrees_of_separation("A", "E").unwrap(),
            Separation::Unreachable
        );
        assert_eq!(registry.shortest_path("A", "E").unwrap(), None);
    }

    #[test]
    fn test_shortest_path() {
        let registry = chain();
        let path = registry.shortest_path("D", "A").unwrap().unwrap();
        assert_eq!(path.nodes, vec!["D", "C", "B", "A"]);
    }

    #[test]
    fn test_suggest_for_unknown_user() {
        let registry = chain();
        assert!(matches!(
            registry.suggest_friends("ghost", 3),
            Err(Error::UserNotFound(_))
        ));
    }

    #[test]
    fn test_users_sorted() {
        let registry = registry_with(&["carol", "alice", "bob"]);
        assert_eq!(registry.users(), vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn test_reset() {
        let mut registry = chain();
        registry.add_post("A", "hello").unwrap();
        registry.reset();

        assert!(registry.is_empty());
        assert_eq!(registry.stats(), RegistryStats::default());

        registry.create_user("A").unwrap();
        assert_eq!(registry.add_post("A", "again").unwrap(), Timestamp(0));
    }
}
