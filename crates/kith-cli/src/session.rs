//! A command session over one registry
//!
//! Owns the [`Registry`] for the lifetime of a REPL or script run and turns
//! parsed commands into rendered output lines.

use kith_core::{EdgeOutcome, Registry, Separation};
use serde_json::json;

use crate::config::Config;
use crate::output::{json_line, plural, OutputFormat};
use crate::parse::{Command, Parser, HELP};

/// Rendered result of one input line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub lines: Vec<String>,
    /// The command was rejected
    pub failed: bool,
    /// The session should end
    pub exit: bool,
}

impl Reply {
    fn ok(lines: Vec<String>) -> Self {
        Self {
            lines,
            ..Default::default()
        }
    }

    fn line(line: impl Into<String>) -> Self {
        Self::ok(vec![line.into()])
    }

    fn error(line: String) -> Self {
        Self {
            lines: vec![line],
            failed: true,
            exit: false,
        }
    }
}

pub struct Session {
    registry: Registry,
    parser: Parser,
    format: OutputFormat,
    default_post_limit: usize,
    default_suggestion_limit: usize,
}

impl Session {
    pub fn new(config: &Config, format: OutputFormat) -> Self {
        Self {
            registry: Registry::new(),
            parser: Parser::new(config.normalize_case),
            format,
            default_post_limit: config.default_post_limit,
            default_suggestion_limit: config.default_suggestion_limit,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Parse and run one input line
    pub fn execute(&mut self, line: &str) -> Reply {
        match self.parser.parse(line) {
            Ok(Some(command)) => self.run(command),
            Ok(None) => Reply::default(),
            Err(e) => self.failure(&e.to_string()),
        }
    }

    fn failure(&self, message: &str) -> Reply {
        match self.format {
            OutputFormat::Text => Reply::error(format!("Error: {}", message)),
            OutputFormat::Json => Reply::error(json_line(&json!({ "error": message }))),
        }
    }

    fn json(&self, value: serde_json::Value) -> Reply {
        Reply::line(json_line(&value))
    }

    fn run(&mut self, command: Command) -> Reply {
        tracing::debug!("Running command: {:?}", command);
        let text = self.format == OutputFormat::Text;

        match command {
            Command::AddUser { name } => match self.registry.create_user(&name).map(|_| ()) {
                Ok(()) => {
                    tracing::info!("Created user: {}", name);
                    if text {
                        Reply::line(format!("{} is added!", name))
                    } else {
                        self.json(json!({ "added_user": name }))
                    }
                }
                Err(e) => self.failure(&e.to_string()),
            },
            Command::AddFriend { a, b } => match self.registry.add_friendship(&a, &b) {
                Ok(outcome) => {
                    tracing::info!("Friendship {} <-> {}: {:?}", a, b, outcome);
                    if !text {
                        return self.json(json!({ "friends": [a, b], "outcome": outcome }));
                    }
                    match outcome {
                        EdgeOutcome::Created => {
                            Reply::line(format!("{} and {} are added as friends!", a, b))
                        }
                        EdgeOutcome::AlreadyFriends => {
                            Reply::line(format!("{} and {} are already friends", a, b))
                        }
                    }
                }
                Err(e) => self.failure(&e.to_string()),
            },
            Command::AddPost { name, text: content } => {
                match self.registry.add_post(&name, &content) {
                    Ok(timestamp) => {
                        tracing::info!("Added post {} for {}", timestamp, name);
                        if text {
                            Reply::line(format!("Post added for {}", name))
                        } else {
                            self.json(json!({ "user": name, "timestamp": timestamp }))
                        }
                    }
                    Err(e) => self.failure(&e.to_string()),
                }
            }
            Command::OutputPosts { name, count } => {
                let limit = clamp_count(count, self.default_post_limit);
                match self.registry.recent_post_entries(&name, limit) {
                    Ok(posts) => {
                        let posts: Vec<_> = posts.collect();
                        if !text {
                            return self.json(json!({ "user": name, "posts": posts }));
                        }
                        if posts.is_empty() {
                            Reply::line(format!("{} has no posts to show", name))
                        } else {
                            Reply::ok(posts.iter().map(|p| p.content.clone()).collect())
                        }
                    }
                    Err(e) => self.failure(&e.to_string()),
                }
            }
            Command::ListFriends { name } => match self.registry.list_friends(&name) {
                Ok(friends) if !text => self.json(json!({ "user": name, "friends": friends })),
                Ok(friends) if friends.is_empty() => {
                    Reply::line(format!("{} doesn't have any friends.", name))
                }
                Ok(friends) => Reply::ok(friends),
                Err(e) => self.failure(&e.to_string()),
            },
            Command::ListUsers => {
                let users = self.registry.users();
                if !text {
                    return self.json(json!({ "users": users }));
                }
                if users.is_empty() {
                    Reply::line("No users yet.")
                } else {
                    Reply::ok(users.into_iter().map(str::to_string).collect())
                }
            }
            Command::SuggestFriends { name, count } => {
                let limit = clamp_count(count, self.default_suggestion_limit);
                match self.registry.suggest_friends(&name, limit) {
                    Ok(suggestions) if !text => {
                        self.json(json!({ "user": name, "suggestions": suggestions }))
                    }
                    Ok(suggestions) if suggestions.is_empty() => {
                        Reply::line(format!("No suggestions for {}", name))
                    }
                    Ok(suggestions) => Reply::ok(
                        suggestions
                            .iter()
                            .map(|s| {
                                format!(
                                    "{} ({})",
                                    s.username,
                                    plural(s.mutual_friends, "mutual friend", "mutual friends")
                                )
                            })
                            .collect(),
                    ),
                    Err(e) => self.failure(&e.to_string()),
                }
            }
            Command::Degrees { a, b } => match self.registry.degrees_of_separation(&a, &b) {
                Ok(separation) if !text => {
                    self.json(json!({ "from": a, "to": b, "separation": separation }))
                }
                Ok(Separation::Degrees(d)) => Reply::line(format!(
                    "Degree of separation between {} and {} is {}",
                    a, b, d
                )),
                Ok(Separation::Unreachable) => {
                    Reply::line(format!("No connection between {} and {}", a, b))
                }
                Err(e) => self.failure(&e.to_string()),
            },
            Command::Path { a, b } => match self.registry.shortest_path(&a, &b) {
                Ok(path) if !text => self.json(json!({ "from": a, "to": b, "path": path })),
                Ok(Some(path)) => Reply::line(format!(
                    "{} ({})",
                    path.nodes.join(" -> "),
                    plural(path.length, "hop", "hops")
                )),
                Ok(None) => Reply::line(format!("No connection between {} and {}", a, b)),
                Err(e) => self.failure(&e.to_string()),
            },
            Command::Stats => {
                let stats = self.registry.stats();
                if text {
                    Reply::line(format!(
                        "Users: {} | Friendships: {} | Posts: {}",
                        stats.users, stats.friendships, stats.posts
                    ))
                } else {
                    self.json(json!(stats))
                }
            }
            Command::Reset => {
                self.registry.reset();
                if text {
                    Reply::line("All data cleared!")
                } else {
                    self.json(json!({ "reset": true }))
                }
            }
            Command::Help => {
                let width = HELP.iter().map(|(usage, _)| usage.len()).max().unwrap_or(0);
                Reply::ok(
                    HELP.iter()
                        .map(|(usage, about)| format!("{:<width$}  {}", usage, about, width = width))
                        .collect(),
                )
            }
            Command::Exit => Reply {
                lines: if text { vec!["Goodbye!".to_string()] } else { Vec::new() },
                failed: false,
                exit: true,
            },
        }
    }
}

/// Negative counts behave like zero; a missing count uses the configured default
fn clamp_count(count: Option<i64>, default: usize) -> usize {
    match count {
        Some(n) => usize::try_from(n).unwrap_or(0),
        None => default,
    }
}
