//! Resolved types.

use crate::ids::{CallableId, ClassId};
use lazyres_common::Name;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Who declared a type parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeParamOwner {
    Class(ClassId),
    Callable(CallableId),
}

/// Identity of a type parameter: owner plus position.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeParamKey {
    pub owner: TypeParamOwner,
    pub index: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    /// A class instantiated with type arguments.
    Class {
        class: ClassId,
        args: Vec<Type>,
        nullable: bool,
    },
    /// A reference to a type parameter.
    Parameter {
        key: TypeParamKey,
        name: Name,
        nullable: bool,
    },
    /// An unresolvable type. Carries the text that failed to resolve.
    Error { text: Arc<str> },
}

impl Type {
    pub fn class(class: ClassId) -> Self {
        Self::Class {
            class,
            args: Vec::new(),
            nullable: false,
        }
    }

    pub fn class_with_args(class: ClassId, args: Vec<Type>) -> Self {
        Self::Class {
            class,
            args,
            nullable: false,
        }
    }

    pub fn error(text: &str) -> Self {
        Self::Error {
            text: Arc::from(text),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    pub fn is_nullable(&self) -> bool {
        match self {
            Self::Class { nullable, .. } | Self::Parameter { nullable, .. } => *nullable,
            Self::Error { .. } => false,
        }
    }

    pub fn class_id(&self) -> Option<ClassId> {
        match self {
            Self::Class { class, .. } => Some(*class),
            _ => None,
        }
    }

    #[must_use]
    pub fn with_nullability(self, nullable: bool) -> Self {
        match self {
            Self::Class { class, args, .. } => Self::Class {
                class,
                args,
                nullable,
            },
            Self::Parameter { key, name, .. } => Self::Parameter {
                key,
                name,
                nullable,
            },
            error @ Self::Error { .. } => error,
        }
    }

    #[must_use]
    pub fn substitute(&self, substitution: &TypeSubstitution) -> Self {
        if substitution.is_empty() {
            return self.clone();
        }
        match self {
            Self::Class {
                class,
                args,
                nullable,
            } => Self::Class {
                class: *class,
                args: args.iter().map(|arg| arg.substitute(substitution)).collect(),
                nullable: *nullable,
            },
            Self::Parameter { key, nullable, .. } => match substitution.get(key) {
                Some(replacement) => {
                    let nullable = *nullable || replacement.is_nullable();
                    replacement.clone().with_nullability(nullable)
                }
                None => self.clone(),
            },
            Self::Error { .. } => self.clone(),
        }
    }

    /// Structural equality where type parameters of one signature are
    /// identified with the matching ones of another (`axioms`). Two error
    /// types are equal.
    pub fn equal_modulo(&self, other: &Type, axioms: &FxHashMap<TypeParamKey, TypeParamKey>) -> bool {
        match (self, other) {
            (Self::Error { .. }, Self::Error { .. }) => true,
            (
                Self::Class {
                    class: a,
                    args: a_args,
                    nullable: a_null,
                },
                Self::Class {
                    class: b,
                    args: b_args,
                    nullable: b_null,
                },
            ) => {
                a == b
                    && a_null == b_null
                    && a_args.len() == b_args.len()
                    && a_args
                        .iter()
                        .zip(b_args)
                        .all(|(x, y)| x.equal_modulo(y, axioms))
            }
            (
                Self::Parameter {
                    key: a,
                    nullable: a_null,
                    ..
                },
                Self::Parameter {
                    key: b,
                    nullable: b_null,
                    ..
                },
            ) => a_null == b_null && (a == b || axioms.get(a) == Some(b)),
            _ => false,
        }
    }
}

/// Mapping from type parameters to the types that replace them.
#[derive(Clone, Debug, Default)]
pub struct TypeSubstitution {
    map: FxHashMap<TypeParamKey, Type>,
}

impl TypeSubstitution {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Substitution for members seen through `class<args...>`.
    pub fn for_class(class: ClassId, args: &[Type]) -> Self {
        let map = args
            .iter()
            .enumerate()
            .map(|(index, arg)| {
                (
                    TypeParamKey {
                        owner: TypeParamOwner::Class(class),
                        index: index as u32,
                    },
                    arg.clone(),
                )
            })
            .collect();
        Self { map }
    }

    pub fn insert(&mut self, key: TypeParamKey, replacement: Type) {
        self.map.insert(key, replacement);
    }

    pub fn get(&self, key: &TypeParamKey) -> Option<&Type> {
        self.map.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/types_tests.rs"]
mod tests;
