//! Source locations.
//!
//! Resolution never looks at source text; it only carries the location of the
//! syntax node a declaration came from so that diagnostics can be keyed by it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Byte range within a file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub length: u32,
}

impl Span {
    #[inline]
    pub const fn new(start: u32, length: u32) -> Self {
        Self { start, length }
    }

    #[inline]
    pub const fn end(self) -> u32 {
        self.start + self.length
    }
}

/// The syntax node a declaration was produced from: file plus span.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Anchor {
    #[serde(default)]
    pub file: Arc<str>,
    #[serde(default)]
    pub span: Span,
}

impl Anchor {
    pub fn new(file: &str, start: u32, length: u32) -> Self {
        Self {
            file: Arc::from(file),
            span: Span::new(start, length),
        }
    }

    /// Re-home an anchor into `file` (used when fixtures omit per-node files).
    pub fn in_file(&self, file: &Arc<str>) -> Self {
        if self.file.is_empty() {
            Self {
                file: Arc::clone(file),
                span: self.span,
            }
        } else {
            self.clone()
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.span.start)
    }
}
