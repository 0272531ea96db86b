//! Post types - immutable timestamped content owned by a user

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Logical post timestamp
///
/// Assigned from a registry-wide counter, so timestamps are unique and
/// strictly ordered regardless of wall-clock resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic source of post timestamps
#[derive(Debug, Clone, Default)]
pub struct Clock {
    next: u64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next timestamp and advance the counter
    pub fn tick(&mut self) -> Timestamp {
        let ts = Timestamp(self.next);
        self.next += 1;
        ts
    }

    /// Number of timestamps issued so far
    pub fn issued(&self) -> u64 {
        self.next
    }
}

/// A post written by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Ordering key within the author's post index
    pub timestamp: Timestamp,

    /// The post content
    pub content: String,

    /// Wall-clock time the post was recorded (display only)
    pub posted_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post
    pub fn new(timestamp: Timestamp, content: impl Into<String>) -> Self {
        Self {
            timestamp,
            content: content.into(),
            posted_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_is_monotonic() {
        let mut clock = Clock::new();
        let a = clock.tick();
        let b = clock.tick();
        let c = clock.tick();

        assert_eq!(a, Timestamp(0));
        assert!(a < b && b < c);
        assert_eq!(clock.issued(), 3);
    }

    #[test]
    fn test_post_creation() {
        let post = Post::new(Timestamp(7), "hello world");
        assert_eq!(post.timestamp.value(), 7);
        assert_eq!(post.content, "hello world");
    }
}
