//! Property paths locating nodes within an aggregate tree.

use std::fmt;
use std::str::FromStr;

/// A dotted sequence of association names from the aggregate root to a
/// nested entity or collection element.
///
/// The empty path refers to the root itself. Paths are cheap to clone and
/// extend; the builder extends them segment by segment while walking an
/// aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PropertyPath {
    segments: Vec<String>,
}

impl PropertyPath {
    /// The empty path, referring to the aggregate root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Number of segments in this path; zero for the root.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check whether this is the root path.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Get the segment at the given index.
    pub fn segment(&self, index: usize) -> Option<&str> {
        self.segments.get(index).map(String::as_str)
    }

    /// The last segment, naming the association that connects this node
    /// to its immediate parent. `None` for the root.
    pub fn leaf(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// The parent path, or `None` for the root.
    pub fn parent(&self) -> Option<PropertyPath> {
        if self.segments.is_empty() {
            return None;
        }
        Some(PropertyPath {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Return a new path with `segment` appended.
    pub fn append(&self, segment: &str) -> PropertyPath {
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        PropertyPath { segments }
    }

    /// Iterate over the segments from root to leaf.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    /// Check whether `self` is a strict prefix of `other`.
    pub fn is_ancestor_of(&self, other: &PropertyPath) -> bool {
        self.len() < other.len()
            && self
                .segments()
                .zip(other.segments())
                .all(|(a, b)| a == b)
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl From<&str> for PropertyPath {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            return PropertyPath::root();
        }
        PropertyPath {
            segments: s.split('.').map(str::to_string).collect(),
        }
    }
}

impl FromStr for PropertyPath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(PropertyPath::from(s))
    }
}
