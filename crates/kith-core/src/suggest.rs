//! Friend-of-friend recommendations ranked by mutual friends

use crate::graph::SocialGraph;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A recommended user and how many friends they share with the query user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub username: String,
    pub mutual_friends: usize,
}

/// Ranks second-degree connections
pub struct Recommender;

impl Recommender {
    /// Up to `limit` users who are friends of `user`'s friends but not
    /// already friends with `user`, ordered by descending mutual-friend
    /// count and then ascending username.
    pub fn suggest<G>(graph: &G, user: &str, limit: usize) -> Vec<Suggestion>
    where
        G: SocialGraph + ?Sized,
    {
        if limit == 0 {
            return Vec::new();
        }

        let friends = graph.neighbors(user);
        let mut mutual: HashMap<&str, usize> = HashMap::new();

        for friend in friends {
            for candidate in graph.neighbors(friend) {
                if candidate == user || friends.contains(candidate) {
                    continue;
                }
                *mutual.entry(candidate.as_str()).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<Suggestion> = mutual
            .into_iter()
            .map(|(username, mutual_friends)| Suggestion {
                username: username.to_string(),
                mutual_friends,
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.mutual_friends
                .cmp(&a.mutual_friends)
                .then_with(|| a.username.cmp(&b.username))
        });
        ranked.truncate(limit);

        tracing::debug!("Suggested {} users for {}", ranked.len(), user);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::adjacency_from_edges;

    fn names(suggestions: &[Suggestion]) -> Vec<&str> {
        suggestions.iter().map(|s| s.username.as_str()).collect()
    }

    #[test]
    fn test_chain_suggests_second_degree() {
        let graph = adjacency_from_edges(
            ["A", "B", "C", "D"],
            [("A", "B"), ("B", "C"), ("C", "D")],
        );

        let suggestions = Recommender::suggest(&graph, "A", 5);
        assert_eq!(names(&suggestions), vec!["C"]);
        assert_eq!(suggestions[0].mutual_friends, 1);
    }

    #[test]
    fn test_ranked_by_mutual_count_then_name() {
        // me - f1, f2, f3
        // x is a friend of f1, f2, f3; y of f1, f2; z and w of f3 only
        let graph = adjacency_from_edges(
            ["me", "f1", "f2", "f3", "x", "y", "z", "w"],
            [
                ("me", "f1"),
                ("me", "f2"),
                ("me", "f3"),
                ("x", "f1"),
                ("x", "f2"),
                ("x", "f3"),
                ("y", "f1"),
                ("y", "f2"),
                ("z", "f3"),
                ("w", "f3"),
            ],
        );

        let suggestions = Recommender::suggest(&graph, "me", 10);
        assert_eq!(names(&suggestions), vec!["x", "y", "w", "z"]);
        let counts: Vec<usize> = suggestions.iter().map(|s| s.mutual_friends).collect();
        assert_eq!(counts, vec![3, 2, 1, 1]);
    }

    #[test]
    fn test_excludes_self_and_direct_friends() {
        // Triangle: everyone already knows everyone
        let graph = adjacency_from_edges(
            ["a", "b", "c", "d"],
            [("a", "b"), ("b", "c"), ("a", "c"), ("c", "d")],
        );

        let suggestions = Recommender::suggest(&graph, "a", 10);
        assert_eq!(names(&suggestions), vec!["d"]);
    }

    #[test]
    fn test_truncates_to_limit() {
        let graph = adjacency_from_edges(
            ["me", "hub", "p", "q", "r"],
            [("me", "hub"), ("hub", "p"), ("hub", "q"), ("hub", "r")],
        );

        assert_eq!(names(&Recommender::suggest(&graph, "me", 2)), vec!["p", "q"]);
        assert!(Recommender::suggest(&graph, "me", 0).is_empty());
    }

    #[test]
    fn test_no_friends_no_suggestions() {
        let graph = adjacency_from_edges(["loner", "a", "b"], [("a", "b")]);
        assert!(Recommender::suggest(&graph, "loner", 5).is_empty());
    }
}
