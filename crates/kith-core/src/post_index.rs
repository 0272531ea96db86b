//! Height-balanced post index
//!
//! Each user's posts live in an AVL tree keyed by [`Timestamp`]. Insertion
//! is `O(log n)` and [`PostIndex::recent`] walks the tree right-to-left,
//! stopping as soon as the requested number of posts has been produced.

use crate::post::{Post, Timestamp};
use std::cmp::Ordering;
use std::iter::FusedIterator;
use thiserror::Error;

type Link = Option<Box<Node>>;

#[derive(Debug, Clone)]
struct Node {
    post: Post,
    height: u32,
    left: Link,
    right: Link,
}

impl Node {
    fn leaf(post: Post) -> Box<Self> {
        Box::new(Self {
            post,
            height: 1,
            left: None,
            right: None,
        })
    }

    fn key(&self) -> Timestamp {
        self.post.timestamp
    }

    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    /// Left subtree height minus right subtree height
    fn balance_factor(&self) -> i64 {
        i64::from(height(&self.left)) - i64::from(height(&self.right))
    }
}

fn height(link: &Link) -> u32 {
    link.as_ref().map_or(0, |node| node.height)
}

/// Rotate `y` right around its left child. Returns the new subtree root.
fn rotate_right(mut y: Box<Node>) -> Box<Node> {
    let Some(mut x) = y.left.take() else {
        return y;
    };
    tracing::trace!("rotate right at {}", y.key());

    y.left = x.right.take();
    y.update_height();
    x.right = Some(y);
    x.update_height();
    x
}

/// Rotate `x` left around its right child. Returns the new subtree root.
fn rotate_left(mut x: Box<Node>) -> Box<Node> {
    let Some(mut r) = x.right.take() else {
        return x;
    };
    tracing::trace!("rotate left at {}", x.key());

    x.right = r.left.take();
    x.update_height();
    r.left = Some(x);
    r.update_height();
    r
}

/// Restore the AVL property at `node` after `key` was inserted below it
fn rebalance(mut node: Box<Node>, key: Timestamp) -> Box<Node> {
    let balance = node.balance_factor();

    if balance > 1 {
        let left_key = node.left.as_ref().map(|left| left.key());
        // Left-Right: straighten the zig-zag first
        if left_key.is_some_and(|lk| key > lk) {
            node.left = node.left.take().map(rotate_left);
        }
        return rotate_right(node);
    }

    if balance < -1 {
        let right_key = node.right.as_ref().map(|right| right.key());
        // Right-Left
        if right_key.is_some_and(|rk| key < rk) {
            node.right = node.right.take().map(rotate_right);
        }
        return rotate_left(node);
    }

    node
}

fn insert_at(link: Link, post: Post, inserted: &mut bool) -> Box<Node> {
    let Some(mut node) = link else {
        *inserted = true;
        return Node::leaf(post);
    };

    let key = post.timestamp;
    match key.cmp(&node.key()) {
        Ordering::Less => node.left = Some(insert_at(node.left.take(), post, inserted)),
        Ordering::Greater => node.right = Some(insert_at(node.right.take(), post, inserted)),
        // Timestamps are unique by construction; keep the existing post
        Ordering::Equal => return node,
    }

    node.update_height();
    rebalance(node, key)
}

/// Structural problems reported by [`PostIndex::check_invariants`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("Node {timestamp} is unbalanced (balance factor {balance})")]
    Unbalanced { timestamp: Timestamp, balance: i64 },

    #[error("Node {timestamp} stores height {stored}, actual height is {actual}")]
    StaleHeight {
        timestamp: Timestamp,
        stored: u32,
        actual: u32,
    },

    #[error("Keys out of order at {timestamp}")]
    OutOfOrder { timestamp: Timestamp },
}

/// AVL tree of posts ordered by timestamp
#[derive(Debug, Clone, Default)]
pub struct PostIndex {
    root: Link,
    len: usize,
}

impl PostIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a post. Returns `false` if a post with the same timestamp
    /// already exists, in which case the index is left unchanged.
    pub fn insert(&mut self, timestamp: Timestamp, content: impl Into<String>) -> bool {
        self.insert_post(Post::new(timestamp, content))
    }

    /// Insert an already constructed post
    pub fn insert_post(&mut self, post: Post) -> bool {
        let mut inserted = false;
        self.root = Some(insert_at(self.root.take(), post, &mut inserted));
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Up to `limit` posts, most recent first
    pub fn recent(&self, limit: usize) -> RecentPosts<'_> {
        RecentPosts::new(self.root.as_deref(), limit)
    }

    /// All posts, oldest first
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self.root.as_deref())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height of the tree (0 when empty)
    pub fn height(&self) -> u32 {
        height(&self.root)
    }

    /// Timestamp stored at the root, if any
    pub fn root_timestamp(&self) -> Option<Timestamp> {
        self.root.as_ref().map(|node| node.key())
    }

    /// Verify stored heights, balance factors and key ordering for every node
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        fn walk(link: &Link) -> Result<u32, InvariantViolation> {
            let Some(node) = link else {
                return Ok(0);
            };

            let left = walk(&node.left)?;
            let right = walk(&node.right)?;

            let ordered = node.left.as_ref().map_or(true, |l| l.key() < node.key())
                && node.right.as_ref().map_or(true, |r| r.key() > node.key());
            if !ordered {
                return Err(InvariantViolation::OutOfOrder {
                    timestamp: node.key(),
                });
            }

            let actual = 1 + left.max(right);
            if node.height != actual {
                return Err(InvariantViolation::StaleHeight {
                    timestamp: node.key(),
                    stored: node.height,
                    actual,
                });
            }

            let balance = i64::from(left) - i64::from(right);
            if balance.abs() > 1 {
                return Err(InvariantViolation::Unbalanced {
                    timestamp: node.key(),
                    balance,
                });
            }

            Ok(actual)
        }

        walk(&self.root)?;

        // Local parent/child ordering is not enough; check the whole sequence
        let mut prev: Option<Timestamp> = None;
        for post in self.iter() {
            if prev.is_some_and(|p| p >= post.timestamp) {
                return Err(InvariantViolation::OutOfOrder {
                    timestamp: post.timestamp,
                });
            }
            prev = Some(post.timestamp);
        }

        Ok(())
    }
}

/// Reverse-chronological iterator returned by [`PostIndex::recent`]
///
/// Keeps an explicit stack of pending nodes and a remaining budget. Once
/// the budget is spent no further subtrees are descended into.
pub struct RecentPosts<'a> {
    stack: Vec<&'a Node>,
    remaining: usize,
}

impl<'a> RecentPosts<'a> {
    fn new(root: Option<&'a Node>, limit: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: limit,
        };
        if limit > 0 {
            iter.push_right_spine(root);
        }
        iter
    }

    fn push_right_spine(&mut self, mut link: Option<&'a Node>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = node.right.as_deref();
        }
    }
}

impl<'a> Iterator for RecentPosts<'a> {
    type Item = &'a Post;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.stack.pop()?;
        self.remaining -= 1;
        if self.remaining > 0 {
            self.push_right_spine(node.left.as_deref());
        }
        Some(&node.post)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.remaining == 0 || self.stack.is_empty() {
            (0, Some(0))
        } else {
            (1, Some(self.remaining))
        }
    }
}

impl FusedIterator for RecentPosts<'_> {}

/// Chronological iterator returned by [`PostIndex::iter`]
pub struct Iter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iter<'a> {
    fn new(root: Option<&'a Node>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut link: Option<&'a Node>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = node.left.as_deref();
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Post;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some(&node.post)
    }
}

impl FusedIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a PostIndex {
    type Item = &'a Post;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_with(keys: &[u64]) -> PostIndex {
        let mut index = PostIndex::new();
        for &k in keys {
            assert!(index.insert(Timestamp(k), format!("p{}", k)));
            index.check_invariants().unwrap();
        }
        index
    }

    fn contents<'a>(posts: impl Iterator<Item = &'a Post>) -> Vec<String> {
        posts.map(|p| p.content.clone()).collect()
    }

    #[test]
    fn test_empty_index() {
        let index = PostIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.height(), 0);
        assert_eq!(index.root_timestamp(), None);
        assert_eq!(index.recent(5).count(), 0);
    }

    #[test]
    fn test_zero_limit_yields_nothing() {
        let index = index_with(&[1, 2, 3]);
        assert_eq!(index.recent(0).count(), 0);
    }

    #[test]
    fn test_left_left_case() {
        // Descending inserts force single right rotations
        let index = index_with(&[3, 2, 1]);
        assert_eq!(index.root_timestamp(), Some(Timestamp(2)));
        assert_eq!(index.height(), 2);
    }

    #[test]
    fn test_right_right_case() {
        let index = index_with(&[1, 2, 3]);
        assert_eq!(index.root_timestamp(), Some(Timestamp(2)));
        assert_eq!(index.height(), 2);
    }

    #[test]
    fn test_left_right_case() {
        let index = index_with(&[3, 1, 2]);
        assert_eq!(index.root_timestamp(), Some(Timestamp(2)));
        assert_eq!(index.height(), 2);
    }

    #[test]
    fn test_right_left_case() {
        let index = index_with(&[1, 3, 2]);
        assert_eq!(index.root_timestamp(), Some(Timestamp(2)));
        assert_eq!(index.height(), 2);
    }

    #[test]
    fn test_sequential_inserts_stay_logarithmic() {
        let keys: Vec<u64> = (0..1024).collect();
        let index = index_with(&keys);

        assert_eq!(index.len(), 1024);
        // AVL bound: h < 1.44 * log2(n + 2)
        assert!(index.height() <= 14, "height {}", index.height());
    }

    #[test]
    fn test_duplicate_timestamp_is_ignored() {
        let mut index = index_with(&[1, 2]);
        assert!(!index.insert(Timestamp(2), "replacement"));

        assert_eq!(index.len(), 2);
        let latest = index.recent(1).next().unwrap();
        assert_eq!(latest.content, "p2");
    }

    #[test]
    fn test_recent_most_recent_first() {
        let index = index_with(&[1, 2, 3, 4, 5]);
        assert_eq!(contents(index.recent(3)), vec!["p5", "p4", "p3"]);
    }

    #[test]
    fn test_recent_limit_larger_than_len() {
        let index = index_with(&[10, 20, 30]);
        assert_eq!(contents(index.recent(100)), vec!["p30", "p20", "p10"]);
    }

    #[test]
    fn test_recent_stops_early() {
        let keys: Vec<u64> = (0..100).collect();
        let index = index_with(&keys);

        let mut recent = index.recent(2);
        assert_eq!(recent.next().map(|p| p.timestamp), Some(Timestamp(99)));
        assert_eq!(recent.next().map(|p| p.timestamp), Some(Timestamp(98)));
        assert!(recent.next().is_none());
        assert!(recent.next().is_none());
    }

    #[test]
    fn test_iter_is_chronological() {
        let index = index_with(&[5, 1, 4, 2, 3]);
        let keys: Vec<u64> = index.iter().map(|p| p.timestamp.value()).collect();
        assert_eq!(keys, vec![1, 2, 3, 4, 5]);
    }
}
