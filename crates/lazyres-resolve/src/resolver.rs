//! The descriptor resolver: the collaborator that turns one declaration plus
//! a resolution scope into a typed descriptor.
//!
//! The member scope engine decides *where* a declaration is resolved and
//! caches the result; a [`DescriptorResolver`] decides *how*. Sessions take
//! any implementation; [`BasicDescriptorResolver`] resolves type references
//! by name through scopes and infers nothing from bodies.

use crate::descriptors::{
    AnnotationDescriptor, CallableDescriptor, CallableKind, CallableParts, Classifier, DefaultValue,
    DeferredType, MemberKind, Modality, Origin, ReturnType, ValueParameterDescriptor, Visibility,
};
use crate::diagnostics::report;
use crate::error::ResolveResult;
use crate::ids::{ClassId, Container};
use crate::scope::{ChainedScope, ScopeRef, TypeParameterScope};
use crate::session::ResolveSession;
use crate::type_parameter::TypeParameterDescriptor;
use crate::types::{Type, TypeParamKey, TypeParamOwner};
use lazyres_common::diagnostics::diagnostic_codes;
use lazyres_common::{Anchor, Name};
use lazyres_syntax::builtins::UNIT;
use lazyres_syntax::{
    AnnotationEntry, ClassKind, FunctionDecl, Modifiers, ParameterDecl, PropertyDecl,
    SuperTypeEntry, TypeParameterDecl, TypeRef, ValOrVar, VisibilityModifier,
};
use std::sync::Arc;
use tracing::trace;

pub trait DescriptorResolver: Send + Sync {
    fn resolve_function(
        &self,
        ctx: &ResolveSession,
        scope: &ScopeRef,
        container: Container,
        decl: &FunctionDecl,
    ) -> ResolveResult<Arc<CallableDescriptor>>;

    fn resolve_property(
        &self,
        ctx: &ResolveSession,
        scope: &ScopeRef,
        container: Container,
        decl: &PropertyDecl,
    ) -> ResolveResult<Arc<CallableDescriptor>>;

    /// The primary constructor of `class`. Its return type must be deferred:
    /// the class's own type may not be computable yet.
    fn resolve_primary_constructor(
        &self,
        ctx: &ResolveSession,
        class: ClassId,
        scope: &ScopeRef,
        parameters: &[ParameterDecl],
        anchor: &Anchor,
    ) -> ResolveResult<Arc<CallableDescriptor>>;

    /// The property a `val`/`var` constructor parameter declares.
    /// `parameter` is the already-resolved constructor parameter.
    fn resolve_constructor_parameter_to_property(
        &self,
        ctx: &ResolveSession,
        class: ClassId,
        decl: &ParameterDecl,
        parameter: &ValueParameterDescriptor,
        index: usize,
    ) -> ResolveResult<Arc<CallableDescriptor>>;

    /// One type per entry, in order. Unresolvable entries yield error types.
    fn resolve_supertypes(
        &self,
        ctx: &ResolveSession,
        scope: &ScopeRef,
        entries: &[SuperTypeEntry],
    ) -> ResolveResult<Vec<Type>>;

    fn resolve_type(&self, ctx: &ResolveSession, scope: &ScopeRef, type_ref: &TypeRef) -> ResolveResult<Type>;

    fn resolve_annotations(
        &self,
        ctx: &ResolveSession,
        scope: &ScopeRef,
        entries: &[AnnotationEntry],
    ) -> ResolveResult<Vec<AnnotationDescriptor>>;
}

#[derive(Debug, Default)]
pub struct BasicDescriptorResolver;

impl BasicDescriptorResolver {
    pub fn new() -> Self {
        Self
    }

    fn lookup_classifier(
        &self,
        ctx: &ResolveSession,
        scope: &ScopeRef,
        type_ref: &TypeRef,
    ) -> ResolveResult<Option<Classifier>> {
        let mut segments = type_ref.segments();
        let Some(first) = segments.next() else {
            return Ok(None);
        };
        let mut current = scope.classifier(ctx, &first)?;
        for segment in segments {
            current = match current {
                Some(Classifier::Class(id)) => ctx
                    .class(id)?
                    .member_scope()
                    .classifier(ctx, &segment)?
                    .map(Classifier::Class),
                _ => None,
            };
        }
        Ok(current)
    }

    fn value_parameters(
        &self,
        ctx: &ResolveSession,
        scope: &ScopeRef,
        decls: &[ParameterDecl],
    ) -> ResolveResult<Vec<ValueParameterDescriptor>> {
        decls
            .iter()
            .enumerate()
            .map(|(index, decl)| {
                Ok(ValueParameterDescriptor {
                    name: decl.name.clone(),
                    index,
                    ty: self.resolve_type(ctx, scope, &decl.type_ref)?,
                    default: if decl.has_default {
                        DefaultValue::Declared
                    } else {
                        DefaultValue::None
                    },
                    vararg: decl.vararg,
                    anchor: Some(decl.anchor.clone()),
                })
            })
            .collect()
    }

    /// Type parameters of a function. Bounds may mention the parameters
    /// themselves, so they are resolved in a scope that already has them.
    fn function_type_parameters(
        &self,
        ctx: &ResolveSession,
        scope: &ScopeRef,
        decls: &[TypeParameterDecl],
    ) -> ResolveResult<(Vec<Arc<TypeParameterDescriptor>>, ScopeRef)> {
        if decls.is_empty() {
            return Ok((Vec::new(), Arc::clone(scope)));
        }
        let owner = TypeParamOwner::Callable(ctx.next_callable_id());
        let key = |index: usize| TypeParamKey {
            owner,
            index: index as u32,
        };
        let provisional: Vec<_> = decls
            .iter()
            .enumerate()
            .map(|(index, decl)| Arc::new(TypeParameterDescriptor::with_bounds(key(index), decl, Vec::new())))
            .collect();
        let bound_scope: ScopeRef = Arc::new(ChainedScope::new(
            "function type parameter bounds",
            vec![
                Arc::new(TypeParameterScope::new("function type parameters", provisional)),
                Arc::clone(scope),
            ],
        ));

        let mut parameters = Vec::with_capacity(decls.len());
        for (index, decl) in decls.iter().enumerate() {
            let bounds = match &decl.bound {
                Some(bound) => vec![self.resolve_type(ctx, &bound_scope, bound)?],
                None => vec![ctx.default_bound()?],
            };
            parameters.push(Arc::new(TypeParameterDescriptor::with_bounds(key(index), decl, bounds)));
        }
        let function_scope: ScopeRef = Arc::new(ChainedScope::new(
            "function scope",
            vec![
                Arc::new(TypeParameterScope::new("function type parameters", parameters.clone())),
                Arc::clone(scope),
            ],
        ));
        Ok((parameters, function_scope))
    }
}

fn member_visibility(visibility: Option<VisibilityModifier>, modifiers: Modifiers) -> Visibility {
    match visibility {
        Some(VisibilityModifier::Public) => Visibility::Public,
        Some(VisibilityModifier::Protected) => Visibility::Protected,
        Some(VisibilityModifier::Internal) => Visibility::Internal,
        Some(VisibilityModifier::Private) => Visibility::Private,
        None if modifiers.contains(Modifiers::OVERRIDE) => Visibility::Inherited,
        None => Visibility::Public,
    }
}

/// Explicit modifier first; otherwise interface members with a body are
/// open and without one abstract, overrides are open, everything else final.
fn member_modality(
    ctx: &ResolveSession,
    container: Container,
    modifiers: Modifiers,
    has_body: bool,
) -> ResolveResult<Modality> {
    if modifiers.contains(Modifiers::ABSTRACT) {
        return Ok(Modality::Abstract);
    }
    if modifiers.contains(Modifiers::OPEN) {
        return Ok(Modality::Open);
    }
    if modifiers.contains(Modifiers::FINAL) {
        return Ok(Modality::Final);
    }
    if let Some(class) = container.as_class() {
        if ctx.class(class)?.kind() == ClassKind::Interface {
            return Ok(if has_body {
                Modality::Open
            } else {
                Modality::Abstract
            });
        }
    }
    if modifiers.contains(Modifiers::OVERRIDE) {
        return Ok(Modality::Open);
    }
    Ok(Modality::Final)
}

impl DescriptorResolver for BasicDescriptorResolver {
    fn resolve_function(
        &self,
        ctx: &ResolveSession,
        scope: &ScopeRef,
        container: Container,
        decl: &FunctionDecl,
    ) -> ResolveResult<Arc<CallableDescriptor>> {
        trace!(function = %decl.name, "resolving function");
        let (type_parameters, scope) = self.function_type_parameters(ctx, scope, &decl.type_parameters)?;
        let value_parameters = self.value_parameters(ctx, &scope, &decl.value_parameters)?;
        let receiver = decl
            .receiver
            .as_ref()
            .map(|receiver| self.resolve_type(ctx, &scope, receiver))
            .transpose()?;
        let return_type = match &decl.return_type {
            Some(type_ref) => self.resolve_type(ctx, &scope, type_ref)?,
            None => match ctx.builtin_class(UNIT)? {
                Some(unit) => Type::class(unit),
                None => Type::error(UNIT),
            },
        };
        Ok(Arc::new(CallableDescriptor::new(CallableParts {
            kind: CallableKind::Function,
            name: decl.name.clone(),
            container,
            member_kind: MemberKind::Declaration,
            modality: member_modality(ctx, container, decl.modifiers, decl.has_body)?,
            visibility: member_visibility(decl.visibility, decl.modifiers),
            type_parameters,
            value_parameters,
            receiver,
            return_type: ReturnType::Resolved(return_type),
            is_var: false,
            is_primary: false,
            origin: Origin::Source,
            anchor: Some(decl.anchor.clone()),
        })))
    }

    fn resolve_property(
        &self,
        ctx: &ResolveSession,
        scope: &ScopeRef,
        container: Container,
        decl: &PropertyDecl,
    ) -> ResolveResult<Arc<CallableDescriptor>> {
        trace!(property = %decl.name, "resolving property");
        let receiver = decl
            .receiver
            .as_ref()
            .map(|receiver| self.resolve_type(ctx, scope, receiver))
            .transpose()?;
        let ty = match &decl.type_ref {
            Some(type_ref) => self.resolve_type(ctx, scope, type_ref)?,
            None => Type::error(&format!("<inferred type of {}>", decl.name)),
        };
        Ok(Arc::new(CallableDescriptor::new(CallableParts {
            kind: CallableKind::Property,
            name: decl.name.clone(),
            container,
            member_kind: MemberKind::Declaration,
            modality: member_modality(ctx, container, decl.modifiers, decl.has_initializer)?,
            visibility: member_visibility(decl.visibility, decl.modifiers),
            type_parameters: Vec::new(),
            value_parameters: Vec::new(),
            receiver,
            return_type: ReturnType::Resolved(ty),
            is_var: decl.is_var,
            is_primary: false,
            origin: Origin::Source,
            anchor: Some(decl.anchor.clone()),
        })))
    }

    fn resolve_primary_constructor(
        &self,
        ctx: &ResolveSession,
        class: ClassId,
        scope: &ScopeRef,
        parameters: &[ParameterDecl],
        anchor: &Anchor,
    ) -> ResolveResult<Arc<CallableDescriptor>> {
        let value_parameters = self.value_parameters(ctx, scope, parameters)?;
        Ok(Arc::new(CallableDescriptor::new(CallableParts {
            kind: CallableKind::Constructor,
            name: Name::init(),
            container: Container::Class(class),
            member_kind: MemberKind::Declaration,
            modality: Modality::Final,
            visibility: Visibility::Public,
            type_parameters: Vec::new(),
            value_parameters,
            receiver: None,
            return_type: ReturnType::Deferred(DeferredType::default_type_of(class)),
            is_var: false,
            is_primary: true,
            origin: Origin::Source,
            anchor: Some(anchor.clone()),
        })))
    }

    fn resolve_constructor_parameter_to_property(
        &self,
        ctx: &ResolveSession,
        class: ClassId,
        decl: &ParameterDecl,
        parameter: &ValueParameterDescriptor,
        index: usize,
    ) -> ResolveResult<Arc<CallableDescriptor>> {
        let container = Container::Class(class);
        Ok(Arc::new(CallableDescriptor::new(CallableParts {
            kind: CallableKind::Property,
            name: decl.name.clone(),
            container,
            member_kind: MemberKind::Declaration,
            modality: member_modality(ctx, container, decl.modifiers, true)?,
            visibility: member_visibility(decl.visibility, decl.modifiers),
            type_parameters: Vec::new(),
            value_parameters: Vec::new(),
            receiver: None,
            return_type: ReturnType::Resolved(parameter.ty.clone()),
            is_var: decl.val_or_var == Some(ValOrVar::Var),
            is_primary: false,
            origin: Origin::ConstructorParameter(index),
            anchor: Some(decl.anchor.clone()),
        })))
    }

    fn resolve_supertypes(
        &self,
        ctx: &ResolveSession,
        scope: &ScopeRef,
        entries: &[SuperTypeEntry],
    ) -> ResolveResult<Vec<Type>> {
        entries
            .iter()
            .map(|entry| self.resolve_type(ctx, scope, &entry.type_ref))
            .collect()
    }

    fn resolve_type(&self, ctx: &ResolveSession, scope: &ScopeRef, type_ref: &TypeRef) -> ResolveResult<Type> {
        match self.lookup_classifier(ctx, scope, type_ref)? {
            None => {
                report(
                    ctx.sink(),
                    &type_ref.anchor,
                    diagnostic_codes::UNRESOLVED_REFERENCE,
                    &[type_ref.name.as_str()],
                );
                Ok(Type::error(&type_ref.name))
            }
            Some(Classifier::TypeParameter(param)) => {
                if !type_ref.args.is_empty() {
                    report(
                        ctx.sink(),
                        &type_ref.anchor,
                        diagnostic_codes::WRONG_NUMBER_OF_TYPE_ARGUMENTS,
                        &["0", type_ref.name.as_str()],
                    );
                }
                Ok(param.default_type().with_nullability(type_ref.nullable))
            }
            Some(Classifier::Class(id)) => {
                let expected = ctx.class(id)?.info().type_parameters().len();
                let mut args = type_ref
                    .args
                    .iter()
                    .map(|arg| self.resolve_type(ctx, scope, arg))
                    .collect::<ResolveResult<Vec<_>>>()?;
                if args.len() != expected {
                    report(
                        ctx.sink(),
                        &type_ref.anchor,
                        diagnostic_codes::WRONG_NUMBER_OF_TYPE_ARGUMENTS,
                        &[expected.to_string().as_str(), type_ref.name.as_str()],
                    );
                    args.resize_with(expected, || Type::error(&type_ref.name));
                }
                Ok(Type::Class {
                    class: id,
                    args,
                    nullable: type_ref.nullable,
                })
            }
        }
    }

    fn resolve_annotations(
        &self,
        ctx: &ResolveSession,
        scope: &ScopeRef,
        entries: &[AnnotationEntry],
    ) -> ResolveResult<Vec<AnnotationDescriptor>> {
        entries
            .iter()
            .map(|entry| {
                Ok(AnnotationDescriptor {
                    ty: self.resolve_type(ctx, scope, &entry.type_ref)?,
                    arguments: entry.arguments.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "tests/resolver_tests.rs"]
mod tests;
