//! REPL command parsing
//!
//! A line is a command word followed by arguments separated by whitespace.
//! `add_post` takes everything after the username verbatim as post text.

use thiserror::Error;

/// A parsed REPL command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddUser { name: String },
    AddFriend { a: String, b: String },
    AddPost { name: String, text: String },
    OutputPosts { name: String, count: Option<i64> },
    ListFriends { name: String },
    ListUsers,
    SuggestFriends { name: String, count: Option<i64> },
    Degrees { a: String, b: String },
    Path { a: String, b: String },
    Stats,
    Reset,
    Help,
    Exit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Missing {what} for '{command}'")]
    Missing {
        command: &'static str,
        what: &'static str,
    },

    #[error("Unexpected argument for '{command}': {arg}")]
    Unexpected { command: &'static str, arg: String },

    #[error("Invalid number: {0}")]
    InvalidCount(String),
}

/// One-line help for each command, in display order
pub const HELP: &[(&str, &str)] = &[
    ("add_user <name>", "Register a new user"),
    ("add_friend <a> <b>", "Make two users friends"),
    ("add_post <name> <text>", "Publish a post"),
    ("output_posts <name> [n]", "Show the n most recent posts"),
    ("list_friends <name>", "List a user's friends"),
    ("list_users", "List every user"),
    ("suggest_friends <name> [k]", "Top k friend suggestions"),
    ("degrees_of_separation <a> <b>", "Hops between two users"),
    ("path <a> <b>", "Shortest chain of friends between two users"),
    ("stats", "Show user, friendship and post counts"),
    ("reset", "Clear all data"),
    ("help", "Show this help"),
    ("exit", "Leave the session"),
];

struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Tokens<'a> {
    fn new(line: &'a str) -> Self {
        Self { rest: line.trim() }
    }

    fn word(&mut self) -> Option<&'a str> {
        let rest = self.rest.trim_start();
        if rest.is_empty() {
            return None;
        }
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let (word, tail) = rest.split_at(end);
        self.rest = tail;
        Some(word)
    }

    /// Everything not consumed yet, trimmed
    fn remainder(&mut self) -> Option<&'a str> {
        let rest = self.rest.trim();
        self.rest = "";
        (!rest.is_empty()).then_some(rest)
    }
}

/// Parser settings
#[derive(Debug, Clone, Copy)]
pub struct Parser {
    /// Lower-case usernames before they reach the registry
    pub normalize_case: bool,
}

impl Parser {
    pub fn new(normalize_case: bool) -> Self {
        Self { normalize_case }
    }

    /// Parse one line. Blank lines and `#` comments yield `Ok(None)`.
    pub fn parse(&self, line: &str) -> Result<Option<Command>, ParseError> {
        let mut tokens = Tokens::new(line);
        let Some(word) = tokens.word() else {
            return Ok(None);
        };
        if word.starts_with('#') {
            return Ok(None);
        }

        let command = match word.to_lowercase().as_str() {
            "add_user" => Command::AddUser {
                name: self.name(&mut tokens, "add_user", "username")?,
            },
            "add_friend" => {
                let a = self.name(&mut tokens, "add_friend", "usernames")?;
                let b = self.name(&mut tokens, "add_friend", "usernames")?;
                Command::AddFriend { a, b }
            }
            "add_post" => {
                let name = self.name(&mut tokens, "add_post", "username")?;
                let text = tokens.remainder().ok_or(ParseError::Missing {
                    command: "add_post",
                    what: "post text",
                })?;
                return Ok(Some(Command::AddPost {
                    name,
                    text: text.to_string(),
                }));
            }
            "output_posts" => Command::OutputPosts {
                name: self.name(&mut tokens, "output_posts", "username")?,
                count: count(&mut tokens)?,
            },
            "list_friends" => Command::ListFriends {
                name: self.name(&mut tokens, "list_friends", "username")?,
            },
            "list_users" => Command::ListUsers,
            "suggest_friends" => Command::SuggestFriends {
                name: self.name(&mut tokens, "suggest_friends", "username")?,
                count: count(&mut tokens)?,
            },
            "degrees_of_separation" => {
                let a = self.name(&mut tokens, "degrees_of_separation", "usernames")?;
                let b = self.name(&mut tokens, "degrees_of_separation", "usernames")?;
                Command::Degrees { a, b }
            }
            "path" => {
                let a = self.name(&mut tokens, "path", "usernames")?;
                let b = self.name(&mut tokens, "path", "usernames")?;
                Command::Path { a, b }
            }
            "stats" => Command::Stats,
            "reset" => Command::Reset,
            "help" => Command::Help,
            "exit" | "quit" => Command::Exit,
            other => return Err(ParseError::UnknownCommand(other.to_string())),
        };

        if let Some(extra) = tokens.remainder() {
            return Err(ParseError::Unexpected {
                command: command.keyword(),
                arg: extra.to_string(),
            });
        }
        Ok(Some(command))
    }

    fn name(
        &self,
        tokens: &mut Tokens<'_>,
        command: &'static str,
        what: &'static str,
    ) -> Result<String, ParseError> {
        let word = tokens.word().ok_or(ParseError::Missing { command, what })?;
        Ok(if self.normalize_case {
            word.to_lowercase()
        } else {
            word.to_string()
        })
    }
}

fn count(tokens: &mut Tokens<'_>) -> Result<Option<i64>, ParseError> {
    tokens
        .word()
        .map(|w| w.parse::<i64>().map_err(|_| ParseError::InvalidCount(w.to_string())))
        .transpose()
}

impl Command {
    /// The command word this command is written with
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::AddUser { .. } => "add_user",
            Self::AddFriend { .. } => "add_friend",
            Self::AddPost { .. } => "add_post",
            Self::OutputPosts { .. } => "output_posts",
            Self::ListFriends { .. } => "list_friends",
            Self::ListUsers => "list_users",
            Self::SuggestFriends { .. } => "suggest_friends",
            Self::Degrees { .. } => "degrees_of_separation",
            Self::Path { .. } => "path",
            Self::Stats => "stats",
            Self::Reset => "reset",
            Self::Help => "help",
            Self::Exit => "exit",
        }
    }
}
