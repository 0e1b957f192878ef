//! Eager resolution of everything reachable from a descriptor.
//!
//! Forcing is how callers turn lazy resolution into a complete pass: after
//! `force_resolve_all` returns, every lazy part of the descriptor has been
//! computed and every diagnostic it can produce has been reported. Nested
//! classes and class objects are forced recursively; supertypes are forced
//! only as far as their own supertype lists.

use crate::descriptors::{CallableDescriptor, Descriptor};
use crate::error::ResolveResult;
use crate::ids::{ClassId, PackageId};
use crate::recursion::{RecursionGuard, RecursionProfile};
use crate::session::ResolveSession;
use tracing::{debug, trace, warn};

pub fn force_resolve_all(ctx: &ResolveSession, descriptor: &Descriptor) -> ResolveResult<()> {
    let mut guard = RecursionGuard::with_profile(RecursionProfile::ForceResolve);
    force_descriptor(ctx, &mut guard, descriptor)
}

pub fn force_resolve_package(ctx: &ResolveSession, package: PackageId) -> ResolveResult<()> {
    let descriptor = ctx.package_descriptor(package)?;
    debug!(package = %descriptor.fq_name(), "forcing package");
    descriptor.file_scope(ctx)?;
    let mut guard = RecursionGuard::with_profile(RecursionProfile::ForceResolve);
    for member in descriptor.member_scope().all_descriptors(ctx)? {
        force_descriptor(ctx, &mut guard, &member)?;
    }
    Ok(())
}

fn force_descriptor(
    ctx: &ResolveSession,
    guard: &mut RecursionGuard<ClassId>,
    descriptor: &Descriptor,
) -> ResolveResult<()> {
    match descriptor {
        Descriptor::Callable(callable) => force_callable(ctx, callable),
        Descriptor::Class(class) => {
            let entered = guard.enter(*class);
            if entered.is_exceeded() {
                warn!(%class, depth = guard.depth(), "force resolution depth limit reached");
                return Ok(());
            }
            if !entered.is_entered() {
                return Ok(());
            }
            let result = force_class(ctx, guard, *class);
            guard.leave(*class);
            result
        }
    }
}

fn force_class(ctx: &ResolveSession, guard: &mut RecursionGuard<ClassId>, id: ClassId) -> ResolveResult<()> {
    let class = ctx.class(id)?;
    trace!(class = %class.fq_name(), "forcing class");

    class.annotations(ctx)?;
    for param in class.type_parameters(ctx)?.iter() {
        param.upper_bounds(ctx)?;
    }
    class.supertypes(ctx)?;
    class.default_type(ctx)?;
    class.header_scope(ctx)?;
    class.member_declaration_scope(ctx)?;
    class.initializer_scope(ctx)?;

    for constructor in class.constructors(ctx)? {
        force_callable(ctx, &constructor)?;
    }
    if let Some(class_object) = class.class_object(ctx)? {
        force_descriptor(ctx, guard, &Descriptor::Class(class_object))?;
    }
    for member in class.member_scope().all_descriptors(ctx)? {
        force_descriptor(ctx, guard, &member)?;
    }
    Ok(())
}

fn force_callable(ctx: &ResolveSession, callable: &CallableDescriptor) -> ResolveResult<()> {
    callable.return_type(ctx)?;
    for param in &callable.type_parameters {
        param.upper_bounds(ctx)?;
    }
    for overridden in callable.overridden() {
        overridden.return_type(ctx)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/force_resolve_tests.rs"]
mod tests;
