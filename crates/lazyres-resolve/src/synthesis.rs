//! Members generated by the engine rather than declared.
//!
//! Data classes get `componentN` accessors for their promoted constructor
//! parameters and a `copy` function; enum class objects get `values` and
//! `valueOf`; singletons get a private no-argument constructor.

use crate::class_descriptor::LazyClassDescriptor;
use crate::class_member_scope::ClassMemberStrategy;
use crate::descriptors::{
    CallableDescriptor, CallableKind, CallableParts, DefaultValue, DeferredType, MemberKind,
    Modality, Origin, ReturnType, ValueParameterDescriptor, Visibility,
};
use crate::error::ResolveResult;
use crate::ids::Container;
use crate::session::ResolveSession;
use crate::types::Type;
use lazyres_common::Name;
use lazyres_syntax::ClassKind;
use lazyres_syntax::builtins::{ARRAY, STRING};
use std::sync::Arc;
use tracing::trace;

const VALUES: &str = "values";
const VALUE_OF: &str = "valueOf";

fn synthesized(
    class: &LazyClassDescriptor,
    kind: CallableKind,
    name: Name,
    visibility: Visibility,
    value_parameters: Vec<ValueParameterDescriptor>,
    return_type: ReturnType,
) -> Arc<CallableDescriptor> {
    Arc::new(CallableDescriptor::new(CallableParts {
        kind,
        name,
        container: Container::Class(class.id()),
        member_kind: MemberKind::Synthesized,
        modality: Modality::Final,
        visibility,
        type_parameters: Vec::new(),
        value_parameters,
        receiver: None,
        return_type,
        is_var: false,
        is_primary: kind == CallableKind::Constructor,
        origin: Origin::Synthesized,
        anchor: None,
    }))
}

pub(crate) fn singleton_constructor(class: &LazyClassDescriptor) -> Arc<CallableDescriptor> {
    synthesized(
        class,
        CallableKind::Constructor,
        Name::init(),
        Visibility::Private,
        Vec::new(),
        ReturnType::Deferred(DeferredType::default_type_of(class.id())),
    )
}

/// `componentN` or `copy` of a data class, if `name` is one of them.
///
/// Components are numbered over the promoted parameters whose type resolved;
/// a parameter that is not a property does not consume a number.
pub(crate) fn data_class_function(
    ctx: &ResolveSession,
    class: &LazyClassDescriptor,
    strategy: &ClassMemberStrategy,
    name: &Name,
) -> ResolveResult<Option<Arc<CallableDescriptor>>> {
    if !class.is_data() || !ctx.options().synthesize_data_members {
        return Ok(None);
    }
    let parameters = strategy.constructor_parameters(ctx)?;

    if let Some(index) = name.component_index() {
        let component = parameters
            .iter()
            .filter(|(decl, descriptor)| decl.is_property() && !descriptor.ty.is_error())
            .nth(index - 1);
        return Ok(component.map(|(_, descriptor)| {
            trace!(class = %class.fq_name(), %name, "synthesizing component function");
            synthesized(
                class,
                CallableKind::Function,
                name.clone(),
                Visibility::Public,
                Vec::new(),
                ReturnType::Resolved(descriptor.ty.clone()),
            )
        }));
    }

    if name == &Name::copy_function() && !parameters.is_empty() {
        let value_parameters = parameters
            .iter()
            .map(|(decl, descriptor)| ValueParameterDescriptor {
                default: if decl.is_property() {
                    DefaultValue::ThisProperty(decl.name.clone())
                } else if decl.has_default {
                    DefaultValue::Declared
                } else {
                    DefaultValue::None
                },
                anchor: None,
                ..descriptor.clone()
            })
            .collect();
        trace!(class = %class.fq_name(), "synthesizing copy function");
        return Ok(Some(synthesized(
            class,
            CallableKind::Function,
            name.clone(),
            Visibility::Public,
            value_parameters,
            ReturnType::Deferred(DeferredType::default_type_of(class.id())),
        )));
    }
    Ok(None)
}

/// Whether `class` is the class object of an enum class.
pub(crate) fn is_enum_class_object(
    ctx: &ResolveSession,
    class: &LazyClassDescriptor,
) -> ResolveResult<bool> {
    if class.kind() != ClassKind::ClassObject {
        return Ok(false);
    }
    match class.container().as_class() {
        Some(owner) => Ok(ctx.class(owner)?.kind() == ClassKind::EnumClass),
        None => Ok(false),
    }
}

pub(crate) fn enum_class_object_function_names() -> [Name; 2] {
    [Name::from(VALUES), Name::from(VALUE_OF)]
}

/// `values(): Array<E>` and `valueOf(value: String): E` on the class object
/// of enum class `E`.
pub(crate) fn enum_class_object_functions(
    ctx: &ResolveSession,
    class: &LazyClassDescriptor,
    name: &Name,
) -> ResolveResult<Vec<Arc<CallableDescriptor>>> {
    if !matches!(name.as_str(), VALUES | VALUE_OF) || !is_enum_class_object(ctx, class)? {
        return Ok(Vec::new());
    }
    let Some(owner) = class.container().as_class() else {
        return Ok(Vec::new());
    };
    let enum_type = ctx.class(owner)?.default_type(ctx)?;

    let function = if name.as_str() == VALUES {
        let array = match ctx.builtin_class(ARRAY)? {
            Some(array) => Type::class_with_args(array, vec![enum_type]),
            None => Type::error(ARRAY),
        };
        synthesized(
            class,
            CallableKind::Function,
            name.clone(),
            Visibility::Public,
            Vec::new(),
            ReturnType::Resolved(array),
        )
    } else {
        let string = match ctx.builtin_class(STRING)? {
            Some(string) => Type::class(string),
            None => Type::error(STRING),
        };
        synthesized(
            class,
            CallableKind::Function,
            name.clone(),
            Visibility::Public,
            vec![ValueParameterDescriptor::new(Name::from("value"), 0, string)],
            ReturnType::Resolved(enum_type),
        )
    };
    Ok(vec![function])
}

#[cfg(test)]
#[path = "tests/synthesis_tests.rs"]
mod tests;
