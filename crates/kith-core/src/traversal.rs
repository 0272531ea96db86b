//! Degrees of separation and shortest friendship paths

use crate::graph::SocialGraph;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// Outcome of a degrees-of-separation query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Separation {
    /// Minimum number of friendship edges between the two users
    Degrees(u32),
    /// No chain of friendships connects the two users
    Unreachable,
}

impl Separation {
    pub fn degrees(&self) -> Option<u32> {
        match self {
            Self::Degrees(d) => Some(*d),
            Self::Unreachable => None,
        }
    }

    pub fn is_reachable(&self) -> bool {
        matches!(self, Self::Degrees(_))
    }
}

impl std::fmt::Display for Separation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Degrees(d) => write!(f, "{}", d),
            Self::Unreachable => write!(f, "unreachable"),
        }
    }
}

/// A chain of friendships from one user to another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendPath {
    /// Usernames in order, starting with the source and ending with the target
    pub nodes: Vec<String>,

    /// Number of edges (`nodes.len() - 1`)
    pub length: usize,
}

/// Traversal statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalStats {
    pub nodes_visited: usize,
    pub edges_traversed: usize,
    pub max_depth_reached: u32,
    pub path_found: bool,
}

struct Bfs<'a> {
    distance: Option<u32>,
    parent: HashMap<&'a str, &'a str>,
    stats: TraversalStats,
}

/// Breadth-first search over the friendship graph
pub struct TraversalEngine;

impl TraversalEngine {
    /// Minimum hop count between two users
    ///
    /// Unknown users are reported as [`Separation::Unreachable`].
    pub fn degrees_of_separation<G>(graph: &G, source: &str, target: &str) -> Separation
    where
        G: SocialGraph + ?Sized,
    {
        Self::degrees_with_stats(graph, source, target).0
    }

    /// Same as [`Self::degrees_of_separation`], also returning search statistics
    pub fn degrees_with_stats<G>(
        graph: &G,
        source: &str,
        target: &str,
    ) -> (Separation, TraversalStats)
    where
        G: SocialGraph + ?Sized,
    {
        let bfs = Self::bfs(graph, source, target, false);
        let separation = bfs
            .distance
            .map_or(Separation::Unreachable, Separation::Degrees);
        (separation, bfs.stats)
    }

    /// One shortest chain of friends from `source` to `target`
    pub fn shortest_path<G>(graph: &G, source: &str, target: &str) -> Option<FriendPath>
    where
        G: SocialGraph + ?Sized,
    {
        let bfs = Self::bfs(graph, source, target, true);
        bfs.distance?;
        Some(Self::reconstruct_path(source, target, &bfs.parent))
    }

    /// BFS that stops the moment `target` is discovered
    fn bfs<'a, G>(graph: &'a G, source: &'a str, target: &'a str, track_parents: bool) -> Bfs<'a>
    where
        G: SocialGraph + ?Sized,
    {
        let mut result = Bfs {
            distance: None,
            parent: HashMap::new(),
            stats: TraversalStats::default(),
        };

        if !graph.contains_user(source) || !graph.contains_user(target) {
            tracing::debug!("BFS skipped: unknown user in {} -> {}", source, target);
            return result;
        }

        if source == target {
            result.distance = Some(0);
            result.stats.path_found = true;
            return result;
        }

        let mut visited: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<(&str, u32)> = VecDeque::new();

        visited.insert(source);
        queue.push_back((source, 0));

        while let Some((current, depth)) = queue.pop_front() {
            result.stats.nodes_visited += 1;
            result.stats.max_depth_reached = result.stats.max_depth_reached.max(depth);

            for next in graph.neighbors(current) {
                result.stats.edges_traversed += 1;

                let next = next.as_str();
                if !visited.insert(next) {
                    continue;
                }
                if track_parents {
                    result.parent.insert(next, current);
                }

                if next == target {
                    result.distance = Some(depth + 1);
                    result.stats.path_found = true;
                    result.stats.max_depth_reached = depth + 1;
                    tracing::debug!(
                        "BFS reached {} at depth {} ({} nodes, {} edges)",
                        target,
                        depth + 1,
                        result.stats.nodes_visited,
                        result.stats.edges_traversed
                    );
                    return result;
                }

                queue.push_back((next, depth + 1));
            }
        }

        tracing::debug!(
            "BFS exhausted from {} without reaching {} ({} nodes, {} edges)",
            source,
            target,
            result.stats.nodes_visited,
            result.stats.edges_traversed
        );
        result
    }

    /// Reconstruct path from parent map
    fn reconstruct_path(start: &str, end: &str, parent: &HashMap<&str, &str>) -> FriendPath {
        let mut nodes = vec![end.to_string()];
        let mut current = end;

        while current != start {
            match parent.get(current) {
                Some(&prev) => {
                    nodes.push(prev.to_string());
                    current = prev;
                }
                None => break,
            }
        }

        nodes.reverse();
        FriendPath {
            length: nodes.len() - 1,
            nodes,
        }
    }
}
