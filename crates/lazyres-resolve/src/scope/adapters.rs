//! Scopes that reach a descriptor's scopes through the session by id.
//!
//! A class's resolution scopes mention the class's own member scope, and a
//! nested class's outer scope is its container's member-declaration scope.
//! Going through ids keeps construction order free: an adapter can be built
//! before the scope it points at exists.

use super::Scope;
use crate::descriptors::{CallableDescriptor, Classifier, Descriptor, ValueParameterDescriptor};
use crate::error::ResolveResult;
use crate::ids::{ClassId, PackageId};
use crate::session::ResolveSession;
use lazyres_common::Name;
use std::sync::Arc;

/// Member scope of a class or package, by id.
#[derive(Debug)]
pub enum MemberScopeAdapter {
    Class { class: ClassId, label: String },
    Package { package: PackageId, label: String },
}

impl MemberScopeAdapter {
    pub fn class(class: ClassId, label: impl Into<String>) -> Self {
        Self::Class {
            class,
            label: label.into(),
        }
    }

    pub fn package(package: PackageId, label: impl Into<String>) -> Self {
        Self::Package {
            package,
            label: label.into(),
        }
    }
}

impl Scope for MemberScopeAdapter {
    fn label(&self) -> &str {
        match self {
            Self::Class { label, .. } | Self::Package { label, .. } => label,
        }
    }

    fn classifier(&self, ctx: &ResolveSession, name: &Name) -> ResolveResult<Option<Classifier>> {
        let found = match self {
            Self::Class { class, .. } => ctx.class(*class)?.member_scope().classifier(ctx, name)?,
            Self::Package { package, .. } => ctx
                .package_descriptor(*package)?
                .member_scope()
                .classifier(ctx, name)?,
        };
        Ok(found.map(Classifier::Class))
    }

    fn functions(&self, ctx: &ResolveSession, name: &Name) -> ResolveResult<Vec<Arc<CallableDescriptor>>> {
        let found = match self {
            Self::Class { class, .. } => ctx.class(*class)?.member_scope().functions(ctx, name)?,
            Self::Package { package, .. } => ctx
                .package_descriptor(*package)?
                .member_scope()
                .functions(ctx, name)?,
        };
        Ok(found.to_vec())
    }

    fn properties(&self, ctx: &ResolveSession, name: &Name) -> ResolveResult<Vec<Arc<CallableDescriptor>>> {
        let found = match self {
            Self::Class { class, .. } => ctx.class(*class)?.member_scope().properties(ctx, name)?,
            Self::Package { package, .. } => ctx
                .package_descriptor(*package)?
                .member_scope()
                .properties(ctx, name)?,
        };
        Ok(found.to_vec())
    }

    fn all_descriptors(&self, ctx: &ResolveSession) -> ResolveResult<Vec<Descriptor>> {
        match self {
            Self::Class { class, .. } => ctx.class(*class)?.member_scope().all_descriptors(ctx),
            Self::Package { package, .. } => ctx
                .package_descriptor(*package)?
                .member_scope()
                .all_descriptors(ctx),
        }
    }
}

/// Which of a class's resolution scopes a [`ClassRegionScope`] forwards to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassRegion {
    Header,
    MemberDeclaration,
    Initializer,
}

/// Forwards every lookup to one resolution scope of a class, computing that
/// scope on first use.
#[derive(Debug)]
pub struct ClassRegionScope {
    class: ClassId,
    region: ClassRegion,
}

impl ClassRegionScope {
    pub fn new(class: ClassId, region: ClassRegion) -> Self {
        Self { class, region }
    }

    fn target(&self, ctx: &ResolveSession) -> ResolveResult<super::ScopeRef> {
        let class = ctx.class(self.class)?;
        match self.region {
            ClassRegion::Header => class.header_scope(ctx),
            ClassRegion::MemberDeclaration => class.member_declaration_scope(ctx),
            ClassRegion::Initializer => class.initializer_scope(ctx),
        }
    }
}

impl Scope for ClassRegionScope {
    fn label(&self) -> &str {
        match self.region {
            ClassRegion::Header => "class header (deferred)",
            ClassRegion::MemberDeclaration => "class member declarations (deferred)",
            ClassRegion::Initializer => "class initializers (deferred)",
        }
    }

    fn classifier(&self, ctx: &ResolveSession, name: &Name) -> ResolveResult<Option<Classifier>> {
        self.target(ctx)?.classifier(ctx, name)
    }

    fn functions(&self, ctx: &ResolveSession, name: &Name) -> ResolveResult<Vec<Arc<CallableDescriptor>>> {
        self.target(ctx)?.functions(ctx, name)
    }

    fn properties(&self, ctx: &ResolveSession, name: &Name) -> ResolveResult<Vec<Arc<CallableDescriptor>>> {
        self.target(ctx)?.properties(ctx, name)
    }

    fn local_variable(
        &self,
        ctx: &ResolveSession,
        name: &Name,
    ) -> ResolveResult<Option<ValueParameterDescriptor>> {
        self.target(ctx)?.local_variable(ctx, name)
    }

    fn implicit_receivers_hierarchy(&self, ctx: &ResolveSession) -> ResolveResult<Vec<ClassId>> {
        self.target(ctx)?.implicit_receivers_hierarchy(ctx)
    }
}
