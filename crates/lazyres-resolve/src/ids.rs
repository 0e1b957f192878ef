//! Arena identifiers.
//!
//! Class and package descriptors live in the session's arenas and refer to
//! each other by id, never by owning pointer, so mutually-referential
//! hierarchies need no reference cycles.

use serde::Serialize;
use std::fmt;

/// Identity of a class descriptor within one [`ResolveSession`](crate::ResolveSession).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ClassId(pub u32);

/// Identity of a package descriptor within one session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PackageId(pub u32);

/// Identity of a callable that owns type parameters of its own.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CallableId(pub u32);

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class#{}", self.0)
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "package#{}", self.0)
    }
}

/// The declaration that contains a class or member.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Container {
    Package(PackageId),
    Class(ClassId),
}

impl Container {
    pub fn as_class(self) -> Option<ClassId> {
        match self {
            Self::Class(id) => Some(id),
            Self::Package(_) => None,
        }
    }
}
