//! The generic lazy member scope.
//!
//! [`LazyMemberScope`] owns one memoized function per member kind, keyed by
//! name, plus the two lazy descriptor lists behind `all_descriptors`. What
//! differs between containers (which scope a declaration resolves in, which
//! members are synthesized or inherited) comes from a [`MemberScopeStrategy`].

use crate::class_descriptor::LazyClassDescriptor;
use crate::descriptors::{CallableDescriptor, Descriptor};
use crate::error::{ResolveError, ResolveResult};
use crate::ids::{ClassId, Container};
use crate::scope::ScopeRef;
use crate::session::ResolveSession;
use indexmap::IndexSet;
use lazyres_common::{FqName, Name};
use lazyres_storage::{LazyValue, MemoizedFunction};
use lazyres_syntax::{ClassDecl, ClassLikeInfo, Declaration, DeclarationProvider};
use rustc_hash::FxBuildHasher;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// A frozen, insertion-ordered set of callables.
pub type CallableSet = Arc<[Arc<CallableDescriptor>]>;

/// Container-specific behavior plugged into [`LazyMemberScope`].
///
/// Every hook receives the scope it is plugged into so it can read the
/// scope's own memoized lookups.
pub trait MemberScopeStrategy: Send + Sync + Sized {
    fn container(&self) -> Container;

    /// Scope a declaration of this container is resolved in.
    fn scope_for_declaration(
        &self,
        scope: &LazyMemberScope<Self>,
        ctx: &ResolveSession,
        decl: &Declaration,
    ) -> ResolveResult<ScopeRef>;

    /// Everything needed to build the descriptor of a nested class-like
    /// declaration. Registration happens in the scope, once every seed of a
    /// name has been built.
    fn classifier_seed(
        &self,
        scope: &LazyMemberScope<Self>,
        ctx: &ResolveSession,
        decl: &Arc<ClassDecl>,
    ) -> ResolveResult<ClassifierSeed>;

    /// Add functions named `name` that no declaration here produces.
    /// `result` already holds the declared ones.
    fn non_declared_functions(
        &self,
        _scope: &LazyMemberScope<Self>,
        _ctx: &ResolveSession,
        _name: &Name,
        _result: &mut Vec<Arc<CallableDescriptor>>,
    ) -> ResolveResult<()> {
        Ok(())
    }

    fn non_declared_properties(
        &self,
        _scope: &LazyMemberScope<Self>,
        _ctx: &ResolveSession,
        _name: &Name,
        _result: &mut Vec<Arc<CallableDescriptor>>,
    ) -> ResolveResult<()> {
        Ok(())
    }

    /// Members with no single backing declaration, for `all_descriptors`.
    fn extra_descriptors(
        &self,
        _scope: &LazyMemberScope<Self>,
        _ctx: &ResolveSession,
    ) -> ResolveResult<Vec<Descriptor>> {
        Ok(Vec::new())
    }
}

/// Inputs of one not yet registered class descriptor.
pub struct ClassifierSeed {
    pub info: ClassLikeInfo,
    pub container: Container,
    pub fq_name: FqName,
    pub outer: ScopeRef,
}

impl ClassifierSeed {
    fn register(self, ctx: &ResolveSession) -> ClassId {
        ctx.register_class(|id| {
            LazyClassDescriptor::new(ctx, id, self.info, self.container, self.fq_name, self.outer)
        })
    }
}

pub struct LazyMemberScope<S: MemberScopeStrategy> {
    strategy: S,
    provider: Arc<dyn DeclarationProvider>,
    label: String,
    classifiers: MemoizedFunction<Name, Arc<[ClassId]>>,
    functions: MemoizedFunction<Name, CallableSet>,
    properties: MemoizedFunction<Name, CallableSet>,
    declared: LazyValue<Arc<[Descriptor]>>,
    extra: LazyValue<Arc<[Descriptor]>>,
}

impl<S: MemberScopeStrategy> LazyMemberScope<S> {
    pub fn new(strategy: S, provider: Arc<dyn DeclarationProvider>, label: impl Into<String>) -> Self {
        Self {
            strategy,
            provider,
            label: label.into(),
            classifiers: MemoizedFunction::new(),
            functions: MemoizedFunction::new(),
            properties: MemoizedFunction::new(),
            declared: LazyValue::new(),
            extra: LazyValue::new(),
        }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn provider(&self) -> &Arc<dyn DeclarationProvider> {
        &self.provider
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn container(&self) -> Container {
        self.strategy.container()
    }

    /// First classifier named `name`.
    pub fn classifier(&self, ctx: &ResolveSession, name: &Name) -> ResolveResult<Option<ClassId>> {
        Ok(self.classifiers(ctx, name)?.first().copied())
    }

    /// Every classifier named `name`, one per class-like declaration.
    pub fn classifiers(&self, ctx: &ResolveSession, name: &Name) -> ResolveResult<Arc<[ClassId]>> {
        self.classifiers.get_or_try_compute(name, |name| {
            let decls = self.provider.declarations_named(name).classes;
            trace!(scope = %self.label, %name, count = decls.len(), "resolving classifiers");
            let seeds = decls
                .iter()
                .map(|decl| self.strategy.classifier_seed(self, ctx, decl))
                .collect::<ResolveResult<Vec<_>>>()?;
            Ok(seeds.into_iter().map(|seed| seed.register(ctx)).collect())
        })
    }

    pub fn functions(&self, ctx: &ResolveSession, name: &Name) -> ResolveResult<CallableSet> {
        self.functions.get_or_try_compute(name, |name| {
            let decls = self.provider.declarations_named(name).functions;
            trace!(scope = %self.label, %name, declared = decls.len(), "resolving functions");
            let mut result = Vec::with_capacity(decls.len());
            for decl in decls {
                let wrapped = Declaration::Function(Arc::clone(&decl));
                let resolution_scope = self.strategy.scope_for_declaration(self, ctx, &wrapped)?;
                result.push(ctx.resolver().resolve_function(
                    ctx,
                    &resolution_scope,
                    self.container(),
                    &decl,
                )?);
            }
            self.strategy
                .non_declared_functions(self, ctx, name, &mut result)?;
            Ok(Arc::from(result))
        })
    }

    pub fn properties(&self, ctx: &ResolveSession, name: &Name) -> ResolveResult<CallableSet> {
        self.properties.get_or_try_compute(name, |name| {
            let decls = self.provider.declarations_named(name).properties;
            trace!(scope = %self.label, %name, declared = decls.len(), "resolving properties");
            let mut result = Vec::with_capacity(decls.len());
            for decl in decls {
                let wrapped = Declaration::Property(Arc::clone(&decl));
                let resolution_scope = self.strategy.scope_for_declaration(self, ctx, &wrapped)?;
                result.push(ctx.resolver().resolve_property(
                    ctx,
                    &resolution_scope,
                    self.container(),
                    &decl,
                )?);
            }
            self.strategy
                .non_declared_properties(self, ctx, name, &mut result)?;
            Ok(Arc::from(result))
        })
    }

    /// Members resolved from declarations plus the strategy's extra members,
    /// without duplicates, in first-seen order.
    pub fn all_descriptors(&self, ctx: &ResolveSession) -> ResolveResult<Vec<Descriptor>> {
        let declared = self
            .declared
            .get_or_try_init(|| self.compute_declared_descriptors(ctx))?;
        let extra = self.extra.get_or_try_init(|| {
            let extra = self.strategy.extra_descriptors(self, ctx)?;
            trace!(scope = %self.label, count = extra.len(), "computed extra descriptors");
            Ok::<_, ResolveError>(Arc::from(extra))
        })?;

        let mut all: IndexSet<Descriptor, FxBuildHasher> = IndexSet::default();
        all.extend(declared.iter().cloned());
        all.extend(extra.iter().cloned());
        Ok(all.into_iter().collect())
    }

    fn compute_declared_descriptors(&self, ctx: &ResolveSession) -> ResolveResult<Arc<[Descriptor]>> {
        let mut result: IndexSet<Descriptor, FxBuildHasher> = IndexSet::default();
        for decl in self.provider.all_declarations() {
            match decl {
                Declaration::Class(class) => {
                    result.extend(
                        self.classifiers(ctx, &class.name)?
                            .iter()
                            .map(|id| Descriptor::Class(*id)),
                    );
                }
                Declaration::Function(function) => {
                    result.extend(
                        self.functions(ctx, &function.name)?
                            .iter()
                            .map(|f| Descriptor::Callable(Arc::clone(f))),
                    );
                }
                Declaration::Property(property) => {
                    result.extend(
                        self.properties(ctx, &property.name)?
                            .iter()
                            .map(|p| Descriptor::Callable(Arc::clone(p))),
                    );
                }
                Declaration::TypeAlias(alias) => {
                    return Err(ResolveError::UnsupportedDeclaration {
                        kind: decl.kind_name(),
                        name: alias.name.clone(),
                    });
                }
                Declaration::MultiDeclaration(_) => {
                    return Err(ResolveError::UnsupportedDeclaration {
                        kind: decl.kind_name(),
                        name: Name::special("<multi-declaration>"),
                    });
                }
            }
        }
        trace!(scope = %self.label, count = result.len(), "computed declared descriptors");
        Ok(result.into_iter().collect())
    }
}

impl<S: MemberScopeStrategy> fmt::Debug for LazyMemberScope<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyMemberScope")
            .field("label", &self.label)
            .field("container", &self.strategy.container())
            .field("functions", &self.functions.computed_len())
            .field("properties", &self.properties.computed_len())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/member_scope_tests.rs"]
mod tests;
