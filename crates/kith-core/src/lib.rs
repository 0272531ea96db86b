//! Kith Core - In-memory social network engine
//!
//! This crate provides the user registry, the per-user post index and the
//! graph algorithms (degrees of separation, friend suggestions) for the
//! Kith social network.

pub mod error;
pub mod graph;
pub mod limits;
pub mod post;
pub mod post_index;
pub mod registry;
pub mod suggest;
pub mod traversal;
pub mod user;

pub use error::{Error, Result};
pub use graph::{adjacency_from_edges, Adjacency, EdgeOutcome, SocialGraph};
pub use post::{Clock, Post, Timestamp};
pub use post_index::{InvariantViolation, PostIndex, RecentPosts};
pub use registry::{Registry, RegistryStats};
pub use suggest::{Recommender, Suggestion};
pub use traversal::{FriendPath, Separation, TraversalEngine, TraversalStats};
pub use user::{User, UserId};
