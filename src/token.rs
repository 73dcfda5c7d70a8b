//! Authentication token loading
//!
//! The forum session is carried by a single cookie whose value lives on the
//! first line of a local file.

use crate::TokenError;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Session token sent as the auth cookie value
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keep the token out of logs
impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// Reads the token from the first line of `path`
///
/// The line terminator and surrounding whitespace are stripped. Anything after
/// the first line is ignored.
///
/// # Returns
///
/// * `Ok(AuthToken)` - The token
/// * `Err(TokenError::Io)` - The file is missing or unreadable
/// * `Err(TokenError::Empty)` - The first line is blank
pub fn load_token(path: &Path) -> Result<AuthToken, TokenError> {
    let io_error = |source| TokenError::Io {
        path: path.display().to_string(),
        source,
    };

    let file = File::open(path).map_err(io_error)?;
    let mut line = String::new();
    BufReader::new(file).read_line(&mut line).map_err(io_error)?;

    let token = line.trim();
    if token.is_empty() {
        return Err(TokenError::Empty {
            path: path.display().to_string(),
        });
    }

    tracing::debug!("Loaded auth token from {}", path.display());
    Ok(AuthToken::new(token))
}
