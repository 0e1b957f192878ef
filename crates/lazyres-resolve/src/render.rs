//! Human-readable rendering of descriptors.
//!
//! Output is a declaration-like one-liner, e.g.
//! `public final fun copy(x: Int = this.x, y: Int = this.y): Point`.
//! Rendering reads lazy parts, so it may trigger resolution.

use crate::class_descriptor::LazyClassDescriptor;
use crate::descriptors::{CallableDescriptor, CallableKind, DefaultValue, Descriptor, MemberKind};
use crate::error::ResolveResult;
use crate::ids::{ClassId, Container};
use crate::session::ResolveSession;
use crate::type_parameter::TypeParameterDescriptor;
use crate::types::Type;
use lazyres_syntax::ClassKind;
use std::fmt::Write;
use std::sync::Arc;

pub fn render_type(ctx: &ResolveSession, ty: &Type) -> ResolveResult<String> {
    let mut out = String::new();
    write_type(ctx, &mut out, ty)?;
    Ok(out)
}

fn write_type(ctx: &ResolveSession, out: &mut String, ty: &Type) -> ResolveResult<()> {
    match ty {
        Type::Error { text } => {
            let _ = write!(out, "[ERROR : {text}]");
        }
        Type::Parameter { name, nullable, .. } => {
            out.push_str(name.as_str());
            if *nullable {
                out.push('?');
            }
        }
        Type::Class { class, args, nullable } => {
            out.push_str(ctx.class(*class)?.name().as_str());
            if !args.is_empty() {
                out.push('<');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    write_type(ctx, out, arg)?;
                }
                out.push('>');
            }
            if *nullable {
                out.push('?');
            }
        }
    }
    Ok(())
}

fn write_type_parameters(
    ctx: &ResolveSession,
    out: &mut String,
    params: &[Arc<TypeParameterDescriptor>],
) -> ResolveResult<()> {
    if params.is_empty() {
        return Ok(());
    }
    let default_bound = ctx.default_bound()?;
    out.push('<');
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(param.name().as_str());
        let bounds = param.upper_bounds(ctx)?;
        for (j, bound) in bounds.iter().filter(|b| **b != default_bound).enumerate() {
            out.push_str(if j == 0 { " : " } else { " & " });
            write_type(ctx, out, bound)?;
        }
    }
    out.push('>');
    Ok(())
}

pub fn render_callable(ctx: &ResolveSession, callable: &CallableDescriptor) -> ResolveResult<String> {
    let mut out = String::new();
    let _ = write!(out, "{} ", callable.visibility().keyword());
    if callable.kind != CallableKind::Constructor {
        let _ = write!(out, "{} ", callable.modality.keyword());
    }
    out.push_str(match callable.kind {
        CallableKind::Function => "fun",
        CallableKind::Property if callable.is_var => "var",
        CallableKind::Property => "val",
        CallableKind::Constructor => "constructor",
    });
    if !callable.type_parameters.is_empty() {
        out.push(' ');
        write_type_parameters(ctx, &mut out, &callable.type_parameters)?;
    }
    out.push(' ');
    if let Some(receiver) = &callable.receiver {
        write_type(ctx, &mut out, receiver)?;
        out.push('.');
    }
    match (callable.kind, callable.container) {
        (CallableKind::Constructor, Container::Class(class)) => {
            out.push_str(ctx.class(class)?.name().as_str());
        }
        _ => out.push_str(callable.name.as_str()),
    }

    if callable.kind != CallableKind::Property {
        out.push('(');
        for (i, param) in callable.value_parameters.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            if param.vararg {
                out.push_str("vararg ");
            }
            let _ = write!(out, "{}: ", param.name);
            write_type(ctx, &mut out, &param.ty)?;
            match &param.default {
                DefaultValue::None => {}
                DefaultValue::Declared => out.push_str(" = ..."),
                DefaultValue::ThisProperty(name) => {
                    let _ = write!(out, " = this.{name}");
                }
            }
        }
        out.push(')');
    }
    if callable.kind != CallableKind::Constructor {
        out.push_str(": ");
        write_type(ctx, &mut out, &callable.return_type(ctx)?)?;
    }

    match callable.member_kind {
        MemberKind::FakeOverride => out.push_str(" /* fake override */"),
        MemberKind::Delegation => out.push_str(" /* delegation */"),
        MemberKind::Synthesized => out.push_str(" /* synthesized */"),
        MemberKind::Declaration => {}
    }
    Ok(out)
}

fn kind_keyword(kind: ClassKind) -> &'static str {
    match kind {
        ClassKind::Class => "class",
        ClassKind::Interface => "interface",
        ClassKind::EnumClass => "enum class",
        ClassKind::EnumEntry => "enum entry",
        ClassKind::Object => "object",
        ClassKind::ClassObject => "class object",
        ClassKind::AnnotationClass => "annotation class",
    }
}

pub fn render_class(ctx: &ResolveSession, class: &LazyClassDescriptor) -> ResolveResult<String> {
    let mut out = String::new();
    let _ = write!(out, "{} {} ", class.visibility().keyword(), class.modality().keyword());
    if class.is_inner() {
        out.push_str("inner ");
    }
    if class.is_data() {
        out.push_str("data ");
    }
    let _ = write!(out, "{} {}", kind_keyword(class.kind()), class.name());
    write_type_parameters(ctx, &mut out, &class.type_parameters(ctx)?)?;

    let supertypes = class.supertypes(ctx)?;
    for (i, supertype) in supertypes.true_supertypes.iter().enumerate() {
        out.push_str(if i == 0 { " : " } else { ", " });
        write_type(ctx, &mut out, supertype)?;
    }
    Ok(out)
}

pub fn render_class_id(ctx: &ResolveSession, class: ClassId) -> ResolveResult<String> {
    let class = ctx.class(class)?;
    render_class(ctx, &class)
}

pub fn render_descriptor(ctx: &ResolveSession, descriptor: &Descriptor) -> ResolveResult<String> {
    match descriptor {
        Descriptor::Class(class) => render_class_id(ctx, *class),
        Descriptor::Callable(callable) => render_callable(ctx, callable),
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
