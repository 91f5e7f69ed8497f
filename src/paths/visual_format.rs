use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use super::*;

static PATH_SYNTAX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[a-zA-Z0-9_]+|\[\d+\])(?:\.[a-zA-Z0-9_]+|\[\d+\])*$")
        .expect("Failed to init path syntax regex")
});

static PATH_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?<argument>[a-zA-Z0-9_]+)|\[(?<index>\d+)\]")
        .expect("Failed to init path token regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathParseError {
    #[error("empty path")]
    Empty,
    #[error("malformed path '{0}'")]
    Malformed(String),
    #[error("index '{0}' does not fit in usize")]
    IndexOverflow(String),
}

/// Parses the display syntax: names joined by `.`, indices in brackets,
/// e.g. `name[3].field[0]` or `[2].i`.
impl FromStr for SymbolicPath {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(PathParseError::Empty);
        }
        if !PATH_SYNTAX.is_match(s) {
            return Err(PathParseError::Malformed(s.to_string()));
        }

        let mut tokens = vec![];
        for captures in PATH_TOKEN.captures_iter(s) {
            if let Some(name) = captures.name("argument") {
                tokens.push(PathToken::Named(name.as_str().to_string()));
            } else if let Some(index) = captures.name("index") {
                let index = index
                    .as_str()
                    .parse()
                    .map_err(|_| PathParseError::IndexOverflow(index.as_str().to_string()))?;
                tokens.push(PathToken::Indexed(index));
            }
        }

        SymbolicPath::new(tokens).ok_or_else(|| PathParseError::Malformed(s.to_string()))
    }
}
