use std::fmt;

mod visual_format;
pub use visual_format::*;

/// One step of a symbolic path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathToken {
    Named(String),
    Indexed(usize),
}

impl PathToken {
    pub fn key(&self) -> PathKey {
        match self {
            PathToken::Named(name) => PathKey::Named(name.clone()),
            PathToken::Indexed(_) => PathKey::Indexed,
        }
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            PathToken::Indexed(index) => Some(*index),
            PathToken::Named(_) => None,
        }
    }
}

/// A path token with the index value erased, as stored in the path index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathKey {
    Named(String),
    Indexed,
}

/// A non-empty sequence of names and indices, e.g. `arr[3].buff`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolicPath(Vec<PathToken>);

impl SymbolicPath {
    pub fn new(tokens: Vec<PathToken>) -> Option<Self> {
        if tokens.is_empty() {
            return None;
        }

        Some(Self(tokens))
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self(vec![PathToken::Named(name.into())])
    }

    pub fn indexed(index: usize) -> Self {
        Self(vec![PathToken::Indexed(index)])
    }

    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.0.push(PathToken::Named(name.into()));
        self
    }

    pub fn index(mut self, index: usize) -> Self {
        self.0.push(PathToken::Indexed(index));
        self
    }

    pub fn tokens(&self) -> &[PathToken] {
        &self.0
    }

    pub fn keys(&self) -> Vec<PathKey> {
        self.0.iter().map(PathToken::key).collect()
    }

    pub fn last(&self) -> &PathToken {
        // never empty
        &self.0[self.0.len() - 1]
    }

    /// the path without a trailing index, along with that index
    pub fn split_trailing_index(&self) -> (Option<SymbolicPath>, Option<usize>) {
        match self.last().index() {
            Some(index) => (Self::new(self.0[..self.0.len() - 1].to_vec()), Some(index)),
            None => (Some(self.clone()), None),
        }
    }
}

impl fmt::Display for SymbolicPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.0.iter().enumerate() {
            match token {
                PathToken::Named(name) if i == 0 => write!(f, "{name}")?,
                PathToken::Named(name) => write!(f, ".{name}")?,
                PathToken::Indexed(index) => write!(f, "[{index}]")?,
            }
        }

        Ok(())
    }
}

/// display form of an index key, indices shown as `[]`
pub fn describe_keys(keys: &[PathKey]) -> String {
    let mut described = String::new();
    for (i, key) in keys.iter().enumerate() {
        match key {
            PathKey::Named(name) if i == 0 => described.push_str(name),
            PathKey::Named(name) => {
                described.push('.');
                described.push_str(name);
            }
            PathKey::Indexed => described.push_str("[]"),
        }
    }

    described
}
