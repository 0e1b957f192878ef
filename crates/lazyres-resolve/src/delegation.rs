//! Members re-exposed through `Iface by delegate` supertype entries.

use crate::class_descriptor::LazyClassDescriptor;
use crate::descriptors::{CallableDescriptor, CallableKind, MemberKind, Modality};
use crate::error::ResolveResult;
use crate::ids::Container;
use crate::overriding::{Overridability, is_overridable_by};
use crate::session::ResolveSession;
use crate::types::{Type, TypeSubstitution};
use lazyres_common::Name;
use std::sync::Arc;
use tracing::trace;

/// Copies of the delegated interfaces' members named `name`, attributed to
/// `class`. Members some declared member already overrides are skipped.
pub(crate) fn delegated_members(
    ctx: &ResolveSession,
    class: &LazyClassDescriptor,
    name: &Name,
    kind: CallableKind,
    declared: &[Arc<CallableDescriptor>],
) -> ResolveResult<Vec<Arc<CallableDescriptor>>> {
    let supertypes = class.supertypes(ctx)?;
    let mut result = Vec::new();
    for delegated in supertypes.delegated.iter() {
        let Type::Class { class: id, args, .. } = delegated else {
            continue;
        };
        let interface = ctx.class(*id)?;
        let members = match kind {
            CallableKind::Function => interface.member_scope().functions(ctx, name)?,
            CallableKind::Property => interface.member_scope().properties(ctx, name)?,
            CallableKind::Constructor => continue,
        };
        let substitution = TypeSubstitution::for_class(*id, args);

        'members: for member in members.iter() {
            if !member.visibility().is_visible_to_subclasses() {
                continue;
            }
            let member = member.substitute(&substitution);
            for own in declared {
                if is_overridable_by(ctx, &member, own)? != Overridability::Incompatible {
                    continue 'members;
                }
            }
            let copy = member.copy_for_container(
                Container::Class(class.id()),
                Modality::Open,
                member.visibility(),
                MemberKind::Delegation,
            );
            copy.bind_overridden(vec![Arc::clone(&member)]);
            trace!(
                class = %class.fq_name(),
                interface = %interface.fq_name(),
                %name,
                "delegating member"
            );
            result.push(Arc::new(copy));
        }
    }
    Ok(result)
}

#[cfg(test)]
#[path = "tests/delegation_tests.rs"]
mod tests;
