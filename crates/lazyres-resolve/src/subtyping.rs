//! The subtype check used by override matching.
//!
//! Covers nominal class subtyping through resolved supertypes with invariant
//! type arguments, nullability, the root and bottom classes, and type
//! parameters through their bounds. Error types are compatible with
//! everything.

use crate::error::ResolveResult;
use crate::ids::ClassId;
use crate::recursion::{RecursionGuard, RecursionProfile};
use crate::session::ResolveSession;
use crate::types::{Type, TypeParamOwner, TypeSubstitution};
use rustc_hash::FxHashMap;
use tracing::warn;

pub fn is_subtype(ctx: &ResolveSession, sub: &Type, sup: &Type) -> ResolveResult<bool> {
    let mut guard = RecursionGuard::with_profile(RecursionProfile::SubtypeCheck);
    check(ctx, sub, sup, &mut guard)
}

fn check(
    ctx: &ResolveSession,
    sub: &Type,
    sup: &Type,
    guard: &mut RecursionGuard<ClassId>,
) -> ResolveResult<bool> {
    if sub.is_error() || sup.is_error() {
        return Ok(true);
    }
    if sub.is_nullable() && !sup.is_nullable() {
        return Ok(false);
    }
    if let Type::Class { class, .. } = sub {
        if ctx.is_nothing_class(*class)? {
            return Ok(true);
        }
    }
    if let Type::Class { class, args, .. } = sup {
        if args.is_empty() && ctx.is_root_class(*class)? {
            return Ok(true);
        }
    }

    match (sub, sup) {
        (Type::Parameter { key: a, .. }, Type::Parameter { key: b, .. }) if a == b => Ok(true),
        (Type::Parameter { key, nullable, .. }, _) => {
            let TypeParamOwner::Class(owner) = key.owner else {
                return Ok(false);
            };
            let params = ctx.class(owner)?.type_parameters(ctx)?;
            let Some(param) = params.get(key.index as usize) else {
                return Ok(false);
            };
            for bound in param.upper_bounds(ctx)?.iter() {
                let bound = bound.clone().with_nullability(bound.is_nullable() || *nullable);
                if check(ctx, &bound, sup, guard)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        (
            Type::Class {
                class: sub_class,
                args: sub_args,
                ..
            },
            Type::Class {
                class: sup_class,
                args: sup_args,
                ..
            },
        ) => {
            if sub_class == sup_class {
                let no_axioms = FxHashMap::default();
                return Ok(sub_args.len() == sup_args.len()
                    && sub_args
                        .iter()
                        .zip(sup_args)
                        .all(|(a, b)| a.equal_modulo(b, &no_axioms)));
            }
            if !guard.enter(*sub_class).is_entered() {
                if guard.is_exceeded() {
                    warn!(class = %sub_class, "subtype check limit reached");
                }
                return Ok(false);
            }
            let result = check_supertypes(ctx, *sub_class, sub_args, sup, guard);
            guard.leave(*sub_class);
            result
        }
        _ => Ok(false),
    }
}

fn check_supertypes(
    ctx: &ResolveSession,
    class: ClassId,
    args: &[Type],
    sup: &Type,
    guard: &mut RecursionGuard<ClassId>,
) -> ResolveResult<bool> {
    let substitution = TypeSubstitution::for_class(class, args);
    let supertypes = ctx.class(class)?.supertypes(ctx)?;
    for supertype in supertypes.true_supertypes.iter() {
        if check(ctx, &supertype.substitute(&substitution), sup, guard)? {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
#[path = "tests/subtyping_tests.rs"]
mod tests;
