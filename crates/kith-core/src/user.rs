//! User (node) types

use crate::post::Post;
use crate::post_index::{PostIndex, RecentPosts};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use ulid::Ulid;

/// Unique identifier for a user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Ulid);

impl UserId {
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    pub fn from_string(s: &str) -> Result<Self, ulid::DecodeError> {
        Ok(Self(Ulid::from_string(s)?))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A member of the network
///
/// Friend sets are only mutated through the registry, which keeps them
/// symmetric.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique identifier
    pub id: UserId,

    /// Username (unique within a registry)
    pub username: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    friends: BTreeSet<String>,
    posts: PostIndex,
}

impl User {
    /// Create a new user with no friends and no posts
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            username: username.into(),
            created_at: Utc::now(),
            friends: BTreeSet::new(),
            posts: PostIndex::new(),
        }
    }

    /// Friend usernames, ascending
    pub fn friends(&self) -> &BTreeSet<String> {
        &self.friends
    }

    pub fn is_friend(&self, username: &str) -> bool {
        self.friends.contains(username)
    }

    /// The user's post index
    pub fn posts(&self) -> &PostIndex {
        &self.posts
    }

    /// Up to `limit` posts, most recent first
    pub fn recent_posts(&self, limit: usize) -> RecentPosts<'_> {
        self.posts.recent(limit)
    }

    pub(crate) fn add_friend(&mut self, username: &str) -> bool {
        self.friends.insert(username.to_string())
    }

    pub(crate) fn add_post(&mut self, post: Post) -> bool {
        self.posts.insert_post(post)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::Timestamp;

    #[test]
    fn test_user_creation() {
        let user = User::new("alice");

        assert_eq!(user.username, "alice");
        assert!(user.friends().is_empty());
        assert!(user.posts().is_empty());
    }

    #[test]
    fn test_friend_set_has_no_duplicates() {
        let mut user = User::new("alice");

        assert!(user.add_friend("bob"));
        assert!(!user.add_friend("bob"));
        assert!(user.add_friend("carol"));

        assert_eq!(user.friends().len(), 2);
        assert!(user.is_friend("bob"));
        assert!(!user.is_friend("dave"));
    }

    #[test]
    fn test_recent_posts() {
        let mut user = User::new("alice");
        user.add_post(Post::new(Timestamp(0), "first"));
        user.add_post(Post::new(Timestamp(1), "second"));

        let latest: Vec<&str> = user.recent_posts(1).map(|p| p.content.as_str()).collect();
        assert_eq!(latest, vec!["second"]);
    }

    #[test]
    fn test_user_id_roundtrip() {
        let id = UserId::new();
        let parsed = UserId::from_string(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }
}
