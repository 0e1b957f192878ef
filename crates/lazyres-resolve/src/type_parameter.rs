//! Type parameter descriptors.
//!
//! Class type parameters resolve their upper bounds lazily: the where-clause
//! constraints of the enclosing class that name the parameter come first,
//! then the inline bound. Bounds form a set, so a bound written twice
//! collapses. With no bound at all the parameter gets the nullable root type.

use crate::diagnostics::report;
use crate::error::ResolveResult;
use crate::ids::ClassId;
use crate::session::ResolveSession;
use crate::types::{Type, TypeParamKey, TypeParamOwner};
use indexmap::IndexSet;
use lazyres_common::diagnostics::diagnostic_codes;
use lazyres_common::{Anchor, Name};
use lazyres_storage::LazyValue;
use lazyres_syntax::{TypeParameterDecl, TypeRef, Variance};
use rustc_hash::FxBuildHasher;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

enum Bounds {
    /// Resolved on first read against the owning class's header scope.
    ClassHeader {
        class: ClassId,
        inline: Option<TypeRef>,
        cell: LazyValue<Arc<[Type]>>,
    },
    /// Resolved by the creator (function type parameters).
    Fixed(Arc<[Type]>),
}

pub struct TypeParameterDescriptor {
    key: TypeParamKey,
    name: Name,
    variance: Variance,
    reified: bool,
    anchor: Anchor,
    bounds: Bounds,
}

impl TypeParameterDescriptor {
    /// A type parameter of `class` at `index`, bounds resolved lazily.
    pub fn for_class(class: ClassId, index: usize, decl: &TypeParameterDecl) -> Self {
        Self {
            key: TypeParamKey {
                owner: TypeParamOwner::Class(class),
                index: index as u32,
            },
            name: decl.name.clone(),
            variance: decl.variance,
            reified: decl.reified,
            anchor: decl.anchor.clone(),
            bounds: Bounds::ClassHeader {
                class,
                inline: decl.bound.clone(),
                cell: LazyValue::new(),
            },
        }
    }

    /// A type parameter whose bounds are already known.
    pub fn with_bounds(key: TypeParamKey, decl: &TypeParameterDecl, bounds: Vec<Type>) -> Self {
        Self {
            key,
            name: decl.name.clone(),
            variance: decl.variance,
            reified: decl.reified,
            anchor: decl.anchor.clone(),
            bounds: Bounds::Fixed(Arc::from(bounds)),
        }
    }

    pub fn key(&self) -> TypeParamKey {
        self.key
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn index(&self) -> usize {
        self.key.index as usize
    }

    pub fn variance(&self) -> Variance {
        self.variance
    }

    pub fn is_reified(&self) -> bool {
        self.reified
    }

    pub fn anchor(&self) -> &Anchor {
        &self.anchor
    }

    pub fn default_type(&self) -> Type {
        Type::Parameter {
            key: self.key,
            name: self.name.clone(),
            nullable: false,
        }
    }

    pub fn upper_bounds(&self, ctx: &ResolveSession) -> ResolveResult<Arc<[Type]>> {
        match &self.bounds {
            Bounds::Fixed(bounds) => Ok(Arc::clone(bounds)),
            Bounds::ClassHeader {
                class,
                inline,
                cell,
            } => cell.get_or_try_init(|| self.compute_class_bounds(ctx, *class, inline.as_ref())),
        }
    }

    fn compute_class_bounds(
        &self,
        ctx: &ResolveSession,
        class: ClassId,
        inline: Option<&TypeRef>,
    ) -> ResolveResult<Arc<[Type]>> {
        trace!(param = %self.name, %class, "resolving type parameter bounds");
        let owner = ctx.class(class)?;
        let header = owner.header_scope(ctx)?;
        let mut bounds: IndexSet<Type, FxBuildHasher> = IndexSet::default();

        for constraint in owner.info().type_constraints() {
            if constraint.subject != self.name {
                continue;
            }
            if constraint.class_object {
                report(
                    ctx.sink(),
                    &constraint.anchor,
                    diagnostic_codes::UNSUPPORTED_CLASS_OBJECT_CONSTRAINT,
                    &[self.name.as_str()],
                );
                continue;
            }
            bounds.insert(ctx.resolver().resolve_type(ctx, &header, &constraint.bound)?);
        }

        if let Some(bound) = inline {
            bounds.insert(ctx.resolver().resolve_type(ctx, &header, bound)?);
        }

        if bounds.is_empty() {
            bounds.insert(ctx.default_bound()?);
        }
        Ok(bounds.into_iter().collect())
    }
}

impl fmt::Debug for TypeParameterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeParameterDescriptor")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("variance", &self.variance)
            .field("reified", &self.reified)
            .finish()
    }
}
