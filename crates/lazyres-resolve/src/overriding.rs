//! Override matching and fake override generation.
//!
//! For one name, the members a class declares are matched against the
//! same-named members of its direct supertypes. Every supertype member that
//! nothing here overrides ends up in a group of members that override each
//! other both ways, and each group becomes one fake override attributed to the
//! class.

use crate::class_descriptor::LazyClassDescriptor;
use crate::descriptors::{
    CallableDescriptor, CallableKind, MemberKind, Modality, Visibility, find_max_visibility,
};
use crate::diagnostics::report;
use crate::error::ResolveResult;
use crate::ids::Container;
use crate::session::ResolveSession;
use crate::subtyping::is_subtype;
use crate::types::{Type, TypeParamKey, TypeParamOwner, TypeSubstitution};
use lazyres_common::Name;
use lazyres_common::diagnostics::diagnostic_codes;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Overridability {
    Overridable,
    /// Not an override; the two members simply coexist.
    Incompatible,
    /// Same signature but the members cannot override each other.
    Conflict,
}

/// Whether `sub` can override `sup`, looking only at the signature.
pub fn is_overridable_by(
    ctx: &ResolveSession,
    sup: &CallableDescriptor,
    sub: &CallableDescriptor,
) -> ResolveResult<Overridability> {
    if sup.kind != sub.kind || sup.kind == CallableKind::Constructor || sup.name != sub.name {
        return Ok(Overridability::Incompatible);
    }
    if sup.receiver.is_some() != sub.receiver.is_some() {
        return Ok(Overridability::Incompatible);
    }
    if sup.value_parameters.len() != sub.value_parameters.len() {
        return Ok(Overridability::Incompatible);
    }

    let sup_parameters = signature_types(sup);
    let sub_parameters = signature_types(sub);

    if sup.type_parameters.len() != sub.type_parameters.len() {
        let no_axioms = FxHashMap::default();
        for (a, b) in sup_parameters.iter().zip(&sub_parameters) {
            let a = upper_bound(ctx, sup, a)?;
            let b = upper_bound(ctx, sub, b)?;
            if !a.equal_modulo(&b, &no_axioms) {
                return Ok(Overridability::Incompatible);
            }
        }
        return Ok(Overridability::Conflict);
    }

    let axioms = axioms(sup, sub);
    for (a, b) in sup.type_parameters.iter().zip(&sub.type_parameters) {
        let a_bounds = a.upper_bounds(ctx)?;
        let b_bounds = b.upper_bounds(ctx)?;
        let same = a_bounds.len() == b_bounds.len()
            && a_bounds
                .iter()
                .zip(b_bounds.iter())
                .all(|(x, y)| x.equal_modulo(y, &axioms));
        if !same {
            return Ok(Overridability::Incompatible);
        }
    }

    for (a, b) in sup_parameters.iter().zip(&sub_parameters) {
        if !a.equal_modulo(b, &axioms) {
            return Ok(Overridability::Incompatible);
        }
    }
    Ok(Overridability::Overridable)
}

/// [`is_overridable_by`] plus the return type: an override with the same
/// signature and a return type that does not fit is a conflict.
pub fn check_override(
    ctx: &ResolveSession,
    sup: &CallableDescriptor,
    sub: &CallableDescriptor,
) -> ResolveResult<Overridability> {
    let overridability = is_overridable_by(ctx, sup, sub)?;
    if overridability != Overridability::Overridable {
        return Ok(overridability);
    }

    let substitution = rename_type_parameters(sup, sub);
    let sup_return = sup.return_type(ctx)?.substitute(&substitution);
    let sub_return = sub.return_type(ctx)?;

    if sup.kind == CallableKind::Property {
        if sup.is_var && !sub.is_var {
            return Ok(Overridability::Conflict);
        }
        if sup.is_var && !sup_return.equal_modulo(&sub_return, &axioms(sup, sub)) {
            return Ok(Overridability::Conflict);
        }
    }
    if !is_subtype(ctx, &sub_return, &sup_return)? {
        return Ok(Overridability::Conflict);
    }
    Ok(Overridability::Overridable)
}

fn signature_types(descriptor: &CallableDescriptor) -> SmallVec<[Type; 4]> {
    descriptor
        .receiver
        .iter()
        .cloned()
        .chain(descriptor.value_parameters.iter().map(|p| p.ty.clone()))
        .collect()
}

/// Identify the type parameters of `sup` with those of `sub`, by position.
fn axioms(sup: &CallableDescriptor, sub: &CallableDescriptor) -> FxHashMap<TypeParamKey, TypeParamKey> {
    sup.type_parameters
        .iter()
        .zip(&sub.type_parameters)
        .map(|(a, b)| (a.key(), b.key()))
        .collect()
}

fn rename_type_parameters(sup: &CallableDescriptor, sub: &CallableDescriptor) -> TypeSubstitution {
    let mut substitution = TypeSubstitution::empty();
    for (a, b) in sup.type_parameters.iter().zip(&sub.type_parameters) {
        substitution.insert(a.key(), b.default_type());
    }
    substitution
}

/// A type parameter's first bound; any other type is its own bound.
fn upper_bound(ctx: &ResolveSession, owner: &CallableDescriptor, ty: &Type) -> ResolveResult<Type> {
    let Type::Parameter { key, .. } = ty else {
        return Ok(ty.clone());
    };
    let bounds = match key.owner {
        TypeParamOwner::Callable(_) => match owner.type_parameters.iter().find(|p| p.key() == *key) {
            Some(param) => param.upper_bounds(ctx)?,
            None => return Ok(ty.clone()),
        },
        TypeParamOwner::Class(class) => {
            let params = ctx.class(class)?.type_parameters(ctx)?;
            match params.get(key.index as usize) {
                Some(param) => param.upper_bounds(ctx)?,
                None => return Ok(ty.clone()),
            }
        }
    };
    Ok(bounds.first().cloned().unwrap_or_else(|| ty.clone()))
}

// =============================================================================
// Generation
// =============================================================================

/// Bind the overrides of every member in `current` and append one fake
/// override per group of supertype members nothing here overrides.
pub(crate) fn generate_overrides(
    ctx: &ResolveSession,
    class: &LazyClassDescriptor,
    name: &Name,
    from_supertypes: &[Arc<CallableDescriptor>],
    current: &mut Vec<Arc<CallableDescriptor>>,
) -> ResolveResult<()> {
    let mut not_overridden: Vec<Arc<CallableDescriptor>> = from_supertypes.to_vec();
    for member in current.iter() {
        let bound = extract_and_bind_overrides(ctx, class, member, from_supertypes)?;
        not_overridden.retain(|candidate| !bound.iter().any(|b| Arc::ptr_eq(b, candidate)));
    }
    trace!(
        class = %class.fq_name(),
        %name,
        inherited = from_supertypes.len(),
        not_overridden = not_overridden.len(),
        "matched overrides"
    );
    create_and_bind_fake_overrides(ctx, class, not_overridden, current)
}

/// Returns every supertype member `member` binds, overridden or conflicting.
fn extract_and_bind_overrides(
    ctx: &ResolveSession,
    class: &LazyClassDescriptor,
    member: &Arc<CallableDescriptor>,
    from_supertypes: &[Arc<CallableDescriptor>],
) -> ResolveResult<Vec<Arc<CallableDescriptor>>> {
    let mut overridden = Vec::new();
    let mut bound = Vec::new();
    for candidate in from_supertypes {
        let visible = candidate.visibility().is_visible_to_subclasses();
        match check_override(ctx, candidate, member)? {
            Overridability::Overridable => {
                if visible {
                    overridden.push(Arc::clone(candidate));
                }
                bound.push(Arc::clone(candidate));
            }
            Overridability::Conflict => {
                if visible {
                    report_conflict(ctx, class, Some(member), &member.name);
                }
                bound.push(Arc::clone(candidate));
            }
            Overridability::Incompatible => {}
        }
    }
    if member.member_kind != MemberKind::Delegation {
        member.bind_overridden(overridden);
    }
    Ok(bound)
}

fn create_and_bind_fake_overrides(
    ctx: &ResolveSession,
    class: &LazyClassDescriptor,
    mut queue: Vec<Arc<CallableDescriptor>>,
    current: &mut Vec<Arc<CallableDescriptor>>,
) -> ResolveResult<()> {
    while !queue.is_empty() {
        let pivot = queue.remove(most_visible_index(&queue));
        let mut group = vec![Arc::clone(&pivot)];
        let mut remaining = Vec::with_capacity(queue.len());
        for other in queue {
            let forward = is_overridable_by(ctx, &pivot, &other)?;
            let backward = is_overridable_by(ctx, &other, &pivot)?;
            if forward == Overridability::Overridable && backward == Overridability::Overridable {
                group.push(other);
            } else if forward == Overridability::Conflict || backward == Overridability::Conflict {
                report_conflict(ctx, class, None, &other.name);
            } else {
                remaining.push(other);
            }
        }
        queue = remaining;
        current.push(create_fake_override(ctx, class, group)?);
    }
    Ok(())
}

fn most_visible_index(members: &[Arc<CallableDescriptor>]) -> usize {
    let mut best = 0;
    for (index, member) in members.iter().enumerate().skip(1) {
        if member.visibility().compare(members[best].visibility()) == Some(Ordering::Greater) {
            best = index;
        }
    }
    best
}

fn create_fake_override(
    ctx: &ResolveSession,
    class: &LazyClassDescriptor,
    group: Vec<Arc<CallableDescriptor>>,
) -> ResolveResult<Arc<CallableDescriptor>> {
    let visible: Vec<_> = group
        .iter()
        .filter(|m| m.visibility().is_visible_to_subclasses())
        .cloned()
        .collect();
    let all_invisible = visible.is_empty();
    let effective = if all_invisible { group } else { visible };

    let modality = effective
        .iter()
        .map(|m| m.modality)
        .fold(Modality::Abstract, Ord::min);
    let visibility = if all_invisible {
        Visibility::InvisibleFake
    } else {
        find_max_visibility(&effective).unwrap_or(Visibility::Public)
    };
    let template = select_most_specific(ctx, &effective)?;
    let fake = template.copy_for_container(
        Container::Class(class.id()),
        modality,
        visibility,
        MemberKind::FakeOverride,
    );
    fake.bind_overridden(effective);
    Ok(Arc::new(fake))
}

/// The member whose type is most specific: for functions the one whose return
/// type is a subtype of all others; for properties a `var` beats a `val`.
fn select_most_specific(
    ctx: &ResolveSession,
    members: &[Arc<CallableDescriptor>],
) -> ResolveResult<Arc<CallableDescriptor>> {
    'candidates: for candidate in members {
        let candidate_type = candidate.return_type(ctx)?;
        for other in members {
            if Arc::ptr_eq(candidate, other) {
                continue;
            }
            let other_type = other.return_type(ctx)?;
            let more_specific = if candidate.kind == CallableKind::Property && other.is_var {
                candidate.is_var && candidate_type.equal_modulo(&other_type, &FxHashMap::default())
            } else {
                is_subtype(ctx, &candidate_type, &other_type)?
            };
            if !more_specific {
                continue 'candidates;
            }
        }
        return Ok(Arc::clone(candidate));
    }
    Ok(Arc::clone(&members[0]))
}

/// Report conflicting overloads. Never anchored at a fake override: the
/// declared member if there is one, else any member declared in the class,
/// else the class itself.
fn report_conflict(
    ctx: &ResolveSession,
    class: &LazyClassDescriptor,
    member: Option<&Arc<CallableDescriptor>>,
    name: &Name,
) {
    let declared_anchor = member
        .filter(|m| m.member_kind == MemberKind::Declaration)
        .and_then(|m| m.anchor.as_ref());
    let own_anchor = class
        .info()
        .members()
        .iter()
        .find(|decl| decl.name() == Some(name))
        .map(|decl| decl.anchor());
    let anchor = declared_anchor
        .or(own_anchor)
        .unwrap_or_else(|| class.anchor());
    report(
        ctx.sink(),
        anchor,
        diagnostic_codes::CONFLICTING_OVERLOADS,
        &[name.as_str(), class.name().as_str()],
    );
}

#[cfg(test)]
#[path = "tests/overriding_tests.rs"]
mod tests;
