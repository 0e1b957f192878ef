//! Identifier names.
//!
//! A `Name` is cheap to clone (a shared `Arc<str>`) and compares by content.
//! Special names are wrapped in angle brackets (`<init>`, `<class-object-for-A>`)
//! so they can never collide with an identifier written in source.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Prefix of the synthesized data-class component accessors (`component1`, ...).
pub const COMPONENT_FUNCTION_PREFIX: &str = "component";

/// Name of the synthesized data-class `copy` function.
pub const COPY_FUNCTION_NAME: &str = "copy";

/// An identifier or special name.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Name(Arc<str>);

impl Name {
    pub fn identifier(text: &str) -> Self {
        debug_assert!(
            !text.starts_with('<'),
            "identifier names must not look like special names: {text}"
        );
        Self(Arc::from(text))
    }

    /// Create a special name. `text` must be bracketed, e.g. `<init>`.
    pub fn special(text: &str) -> Self {
        debug_assert!(
            text.starts_with('<') && text.ends_with('>'),
            "special names must be bracketed: {text}"
        );
        Self(Arc::from(text))
    }

    /// Name of every constructor.
    pub fn init() -> Self {
        Self::special("<init>")
    }

    /// Name of the implicit class object nested in `owner`.
    pub fn class_object_for(owner: &Name) -> Self {
        Self(Arc::from(format!("<class-object-for-{owner}>")))
    }

    /// `componentN` accessor name for a data class.
    pub fn component(index: usize) -> Self {
        Self(Arc::from(format!("{COMPONENT_FUNCTION_PREFIX}{index}")))
    }

    pub fn copy_function() -> Self {
        Self::identifier(COPY_FUNCTION_NAME)
    }

    /// If this is `componentN` (N >= 1), return N.
    pub fn component_index(&self) -> Option<usize> {
        let digits = self.0.strip_prefix(COMPONENT_FUNCTION_PREFIX)?;
        if digits.starts_with('0') {
            return None;
        }
        digits.parse::<usize>().ok().filter(|&n| n >= 1)
    }

    #[inline]
    pub fn is_special(&self) -> bool {
        self.0.starts_with('<')
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}

impl From<&str> for Name {
    fn from(text: &str) -> Self {
        Self(Arc::from(text))
    }
}

/// Fully-qualified package name (`a.b.c`). The root package is the empty string.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FqName(Arc<str>);

impl FqName {
    pub fn root() -> Self {
        Self(Arc::from(""))
    }

    pub fn new(text: &str) -> Self {
        Self(Arc::from(text))
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn child(&self, name: &Name) -> Self {
        if self.is_root() {
            Self(Arc::from(name.as_str()))
        } else {
            Self(Arc::from(format!("{}.{}", self.0, name)))
        }
    }

    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        Some(match self.0.rfind('.') {
            Some(dot) => Self(Arc::from(&self.0[..dot])),
            None => Self::root(),
        })
    }

    pub fn short_name(&self) -> Name {
        match self.0.rfind('.') {
            Some(dot) => Name::from(&self.0[dot + 1..]),
            None => Name::from(&*self.0),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FqName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("<root>")
        } else {
            f.write_str(&self.0)
        }
    }
}

impl fmt::Debug for FqName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FqName({self})")
    }
}

#[cfg(test)]
#[path = "tests/name_tests.rs"]
mod tests;
