//! Input validation limits

/// Maximum length for usernames (64 bytes)
pub const MAX_USERNAME_LEN: usize = 64;

/// Maximum length for a single post (4KB)
pub const MAX_POST_LEN: usize = 4 * 1024;

/// Validation error type
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyUsername,
    UsernameTooLong { len: usize, max: usize },
    UsernameWhitespace(String),
    EmptyPost,
    PostTooLong { len: usize, max: usize },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "Username cannot be empty"),
            Self::UsernameTooLong { len, max } => {
                write!(f, "Username too long: {} chars (max {})", len, max)
            }
            Self::UsernameWhitespace(name) => {
                write!(f, "Username cannot contain whitespace: {:?}", name)
            }
            Self::EmptyPost => write!(f, "Post content cannot be empty"),
            Self::PostTooLong { len, max } => {
                write!(f, "Post too long: {} chars (max {})", len, max)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate username
pub fn validate_username(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyUsername);
    }
    if name.len() > MAX_USERNAME_LEN {
        return Err(ValidationError::UsernameTooLong {
            len: name.len(),
            max: MAX_USERNAME_LEN,
        });
    }
    if name.chars().any(char::is_whitespace) {
        return Err(ValidationError::UsernameWhitespace(name.to_string()));
    }
    Ok(())
}

/// Validate post content
pub fn validate_post(content: &str) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        return Err(ValidationError::EmptyPost);
    }
    if content.len() > MAX_POST_LEN {
        return Err(ValidationError::PostTooLong {
            len: content.len(),
            max: MAX_POST_LEN,
        });
    }
    Ok(())
}
