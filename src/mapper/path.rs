//! Field paths for contextualized errors
//!
//! A path is a sequence of segments (`Field(name)` or `Wildcard`) and is
//! rendered as `parent.child.*.leaf` only when an error or message key needs it.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Field(String),
    /// Any element of an array
    Wildcard,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// `self.name`
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Field(name.to_string()));
        Self { segments }
    }

    /// `self.*`
    pub fn wildcard(&self) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Wildcard);
        Self { segments }
    }

    /// Prefixes a payload-relative key (such as a message-bag field) with this path.
    pub fn qualify(&self, key: &str) -> String {
        if self.is_root() {
            key.to_string()
        } else {
            format!("{}.{}", self, key)
        }
    }

    /// Rendered form, `$root` for the empty path
    pub fn render(&self) -> String {
        if self.is_root() {
            "$root".to_string()
        } else {
            self.to_string()
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            match segment {
                PathSegment::Field(name) => f.write_str(name)?,
                PathSegment::Wildcard => f.write_str("*")?,
            }
        }
        Ok(())
    }
}
