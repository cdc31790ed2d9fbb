//! Structural paths.
//!
//! A structural path addresses one node relative to an assertion call, as
//! the `/`-joined sequence of child keys and indices walked from the call
//! (`arguments/0/left/object`). The instrumenter writes paths into the
//! rewritten source; the diagram matcher rebuilds them by walking a fresh
//! parse of the statement. Both sides spell keys with the constants in
//! [`keys`], so the two walks cannot disagree on naming.

use std::fmt;

use smallvec::SmallVec;

/// Child keys, spelled as ESTree field names.
pub mod keys {
    pub const ARGUMENTS: &str = "arguments";
    pub const CALLEE: &str = "callee";
    pub const OBJECT: &str = "object";
    pub const PROPERTY: &str = "property";
    pub const PROPERTIES: &str = "properties";
    pub const KEY: &str = "key";
    pub const VALUE: &str = "value";
    pub const ELEMENTS: &str = "elements";
    pub const ARGUMENT: &str = "argument";
    pub const LEFT: &str = "left";
    pub const RIGHT: &str = "right";
    pub const TEST: &str = "test";
    pub const CONSEQUENT: &str = "consequent";
    pub const ALTERNATE: &str = "alternate";
    pub const EXPRESSIONS: &str = "expressions";
    pub const SOURCE: &str = "source";
}

/// One step of a structural path.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(&'static str),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Address of a node below an assertion call. The call itself is the root
/// (empty) path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct StructuralPath {
    segments: SmallVec<[PathSegment; 8]>,
}

impl StructuralPath {
    pub fn root() -> Self {
        StructuralPath::default()
    }

    /// Path of the `index`-th assertion argument.
    pub fn argument(index: usize) -> Self {
        StructuralPath::root()
            .key(keys::ARGUMENTS)
            .index(index)
    }

    /// Extend with a child key.
    #[must_use]
    pub fn key(&self, key: &'static str) -> Self {
        let mut next = self.clone();
        next.segments.push(PathSegment::Key(key));
        next
    }

    /// Extend with a list index.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut next = self.clone();
        next.segments.push(PathSegment::Index(index));
        next
    }

    /// Extend with a relative suffix.
    #[must_use]
    pub fn join(&self, suffix: &[PathSegment]) -> Self {
        let mut next = self.clone();
        next.segments.extend_from_slice(suffix);
        next
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn starts_with(&self, prefix: &StructuralPath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }
}

impl fmt::Display for StructuralPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}
