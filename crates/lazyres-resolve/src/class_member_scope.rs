//! Member scope strategy for classes.
//!
//! On top of the declared members a class scope contributes, per name:
//! properties promoted from primary-constructor parameters, members
//! re-exposed through delegation, data-class and enum class-object members,
//! and fake overrides of inherited members. Each name is computed once; the
//! fake overrides created for it are therefore created once.

use crate::class_descriptor::LazyClassDescriptor;
use crate::delegation;
use crate::descriptors::{CallableDescriptor, CallableKind, Descriptor, ValueParameterDescriptor};
use crate::error::ResolveResult;
use crate::ids::{ClassId, Container};
use crate::member_scope::{ClassifierSeed, LazyMemberScope, MemberScopeStrategy};
use crate::overriding;
use crate::scope::{ClassRegion, ClassRegionScope, ScopeRef};
use crate::session::ResolveSession;
use crate::synthesis;
use crate::types::{Type, TypeSubstitution};
use crate::visibility;
use indexmap::IndexSet;
use lazyres_common::Name;
use lazyres_common::limits::MAX_DATA_COMPONENTS;
use lazyres_storage::LazyValue;
use lazyres_syntax::{ClassDecl, ClassLikeInfo, Declaration, ParameterDecl};
use rustc_hash::FxBuildHasher;
use std::sync::Arc;
use tracing::{debug, trace};

pub struct ClassMemberStrategy {
    class: ClassId,
    primary_constructor: LazyValue<Option<Arc<CallableDescriptor>>>,
}

impl ClassMemberStrategy {
    pub fn new(class: ClassId) -> Self {
        Self {
            class,
            primary_constructor: LazyValue::new(),
        }
    }

    pub fn class(&self) -> ClassId {
        self.class
    }

    /// Resolve the primary constructor. Interfaces have none; singletons get a
    /// private no-argument one.
    pub fn primary_constructor(
        &self,
        ctx: &ResolveSession,
    ) -> ResolveResult<Option<Arc<CallableDescriptor>>> {
        self.primary_constructor.get_or_try_init(|| {
            let class = ctx.class(self.class)?;
            let kind = class.kind();
            if !kind.has_constructors() {
                return Ok(None);
            }
            if kind.is_singleton() {
                return Ok(Some(synthesis::singleton_constructor(&class)));
            }
            let parameters = class.info().primary_constructor_parameters().unwrap_or(&[]);
            let header = class.header_scope(ctx)?;
            let constructor = ctx.resolver().resolve_primary_constructor(
                ctx,
                self.class,
                &header,
                parameters,
                class.anchor(),
            )?;
            trace!(class = %class.fq_name(), parameters = parameters.len(), "resolved primary constructor");
            Ok(Some(constructor))
        })
    }

    /// Syntactic primary-constructor parameters paired with their resolved
    /// descriptors, by position.
    pub fn constructor_parameters(
        &self,
        ctx: &ResolveSession,
    ) -> ResolveResult<Vec<(ParameterDecl, ValueParameterDescriptor)>> {
        let Some(constructor) = self.primary_constructor(ctx)? else {
            return Ok(Vec::new());
        };
        let class = ctx.class(self.class)?;
        let decls = class.info().primary_constructor_parameters().unwrap_or(&[]);
        Ok(decls
            .iter()
            .cloned()
            .zip(constructor.value_parameters.iter().cloned())
            .collect())
    }

    fn constructor_parameter_properties(
        &self,
        ctx: &ResolveSession,
        class: &LazyClassDescriptor,
        name: &Name,
        result: &mut Vec<Arc<CallableDescriptor>>,
    ) -> ResolveResult<()> {
        for (index, (decl, descriptor)) in self.constructor_parameters(ctx)?.iter().enumerate() {
            if !decl.is_property() || &decl.name != name {
                continue;
            }
            result.push(ctx.resolver().resolve_constructor_parameter_to_property(
                ctx,
                class.id(),
                decl,
                descriptor,
                index,
            )?);
        }
        Ok(())
    }

    /// Same-named members of every direct supertype, seen through the
    /// supertype's type arguments.
    fn members_from_supertypes(
        &self,
        ctx: &ResolveSession,
        class: &LazyClassDescriptor,
        name: &Name,
        kind: CallableKind,
    ) -> ResolveResult<Vec<Arc<CallableDescriptor>>> {
        let mut result = Vec::new();
        for supertype in class.supertypes(ctx)?.true_supertypes.iter() {
            let Type::Class { class: id, args, .. } = supertype else {
                continue;
            };
            let superclass = ctx.class(*id)?;
            let members = match kind {
                CallableKind::Function => superclass.member_scope().functions(ctx, name)?,
                CallableKind::Property => superclass.member_scope().properties(ctx, name)?,
                CallableKind::Constructor => continue,
            };
            let substitution = TypeSubstitution::for_class(*id, args);
            result.extend(members.iter().map(|member| member.substitute(&substitution)));
        }
        Ok(result)
    }

    fn complete_members(
        &self,
        ctx: &ResolveSession,
        class: &LazyClassDescriptor,
        name: &Name,
        kind: CallableKind,
        result: &mut Vec<Arc<CallableDescriptor>>,
    ) -> ResolveResult<()> {
        let from_supertypes = self.members_from_supertypes(ctx, class, name, kind)?;

        if ctx.options().generate_delegated_members {
            let delegated = delegation::delegated_members(ctx, class, name, kind, result)?;
            result.extend(delegated);
        }
        if kind == CallableKind::Function {
            if let Some(function) = synthesis::data_class_function(ctx, class, self, name)? {
                result.push(function);
            }
            result.extend(synthesis::enum_class_object_functions(ctx, class, name)?);
        }

        let before = result.len();
        overriding::generate_overrides(ctx, class, name, &from_supertypes, result)?;
        if result.len() > before {
            debug!(
                class = %class.fq_name(),
                %name,
                fake_overrides = result.len() - before,
                "generated fake overrides"
            );
        }
        visibility::resolve_unknown_visibilities(ctx, class, result);
        Ok(())
    }
}

impl MemberScopeStrategy for ClassMemberStrategy {
    fn container(&self) -> Container {
        Container::Class(self.class)
    }

    fn scope_for_declaration(
        &self,
        _scope: &LazyMemberScope<Self>,
        ctx: &ResolveSession,
        decl: &Declaration,
    ) -> ResolveResult<ScopeRef> {
        let class = ctx.class(self.class)?;
        match decl {
            Declaration::Property(_) => class.initializer_scope(ctx),
            _ => class.member_declaration_scope(ctx),
        }
    }

    fn classifier_seed(
        &self,
        _scope: &LazyMemberScope<Self>,
        ctx: &ResolveSession,
        decl: &Arc<ClassDecl>,
    ) -> ResolveResult<ClassifierSeed> {
        let owner = ctx.class(self.class)?;
        Ok(ClassifierSeed {
            info: ClassLikeInfo::Declared(Arc::clone(decl)),
            container: Container::Class(self.class),
            fq_name: owner.fq_name().child(&decl.name),
            outer: Arc::new(ClassRegionScope::new(self.class, ClassRegion::MemberDeclaration)),
        })
    }

    fn non_declared_functions(
        &self,
        _scope: &LazyMemberScope<Self>,
        ctx: &ResolveSession,
        name: &Name,
        result: &mut Vec<Arc<CallableDescriptor>>,
    ) -> ResolveResult<()> {
        let class = ctx.class(self.class)?;
        self.complete_members(ctx, &class, name, CallableKind::Function, result)
    }

    fn non_declared_properties(
        &self,
        _scope: &LazyMemberScope<Self>,
        ctx: &ResolveSession,
        name: &Name,
        result: &mut Vec<Arc<CallableDescriptor>>,
    ) -> ResolveResult<()> {
        let class = ctx.class(self.class)?;
        self.constructor_parameter_properties(ctx, &class, name, result)?;
        self.complete_members(ctx, &class, name, CallableKind::Property, result)
    }

    fn extra_descriptors(
        &self,
        scope: &LazyMemberScope<Self>,
        ctx: &ResolveSession,
    ) -> ResolveResult<Vec<Descriptor>> {
        let class = ctx.class(self.class)?;
        let mut result: IndexSet<Descriptor, FxBuildHasher> = IndexSet::default();
        let mut add_all = |set: &[Arc<CallableDescriptor>]| {
            result.extend(set.iter().map(|d| Descriptor::Callable(Arc::clone(d))));
        };

        for (decl, _) in self.constructor_parameters(ctx)? {
            if decl.is_property() {
                add_all(&scope.properties(ctx, &decl.name)?);
            }
        }

        if class.is_data() && ctx.options().synthesize_data_members {
            for index in 1..=MAX_DATA_COMPONENTS {
                let components = scope.functions(ctx, &Name::component(index))?;
                if components.is_empty() {
                    break;
                }
                add_all(&components);
            }
            add_all(&scope.functions(ctx, &Name::copy_function())?);
        }

        if synthesis::is_enum_class_object(ctx, &class)? {
            for name in synthesis::enum_class_object_function_names() {
                add_all(&scope.functions(ctx, &name)?);
            }
        }

        if let Some(constructor) = self.primary_constructor(ctx)? {
            add_all(std::slice::from_ref(&constructor));
        }

        let mut inherited_names: IndexSet<(Name, CallableKind), FxBuildHasher> = IndexSet::default();
        for supertype in class.supertypes(ctx)?.true_supertypes.iter() {
            let Some(id) = supertype.class_id() else {
                continue;
            };
            for descriptor in ctx.class(id)?.member_scope().all_descriptors(ctx)? {
                if let Some(callable) = descriptor.as_callable() {
                    if callable.kind != CallableKind::Constructor {
                        inherited_names.insert((callable.name.clone(), callable.kind));
                    }
                }
            }
        }
        for (name, kind) in inherited_names {
            match kind {
                CallableKind::Function => add_all(&scope.functions(ctx, &name)?),
                CallableKind::Property => add_all(&scope.properties(ctx, &name)?),
                CallableKind::Constructor => {}
            }
        }

        Ok(result.into_iter().collect())
    }
}

#[cfg(test)]
#[path = "tests/class_member_scope_tests.rs"]
mod tests;
