//! Visibility inference for members declared without a visibility.
//!
//! A member that overrides something and states no visibility inherits the
//! most open visibility of what it overrides. With nothing to inherit from, or
//! an ambiguous maximum, the member is reported and falls back to public.

use crate::class_descriptor::LazyClassDescriptor;
use crate::descriptors::{CallableDescriptor, MemberKind, Visibility, find_max_visibility};
use crate::diagnostics::report;
use crate::session::ResolveSession;
use lazyres_common::diagnostics::diagnostic_codes;
use std::sync::Arc;
use tracing::trace;

/// Infer visibilities of the `Inherited` members in `members`. Fake overrides
/// and delegated members are skipped; their visibility is derived on creation.
pub(crate) fn resolve_unknown_visibilities(
    ctx: &ResolveSession,
    class: &LazyClassDescriptor,
    members: &[Arc<CallableDescriptor>],
) {
    for member in members {
        if matches!(
            member.member_kind,
            MemberKind::FakeOverride | MemberKind::Delegation
        ) {
            continue;
        }
        resolve_for_member(ctx, class, member);
    }
}

fn resolve_for_member(ctx: &ResolveSession, class: &LazyClassDescriptor, member: &CallableDescriptor) {
    if member.visibility() != Visibility::Inherited {
        return;
    }
    for overridden in member.overridden() {
        if overridden.visibility() == Visibility::Inherited {
            resolve_for_member(ctx, class, overridden);
        }
    }
    let visibility = match find_max_visibility(member.overridden()) {
        Some(visibility) => visibility,
        None => {
            let anchor = member.anchor.as_ref().unwrap_or_else(|| class.anchor());
            report(
                ctx.sink(),
                anchor,
                diagnostic_codes::CANNOT_INFER_VISIBILITY,
                &[member.name.as_str()],
            );
            Visibility::Public
        }
    };
    trace!(member = %member.name, visibility = visibility.keyword(), "inferred visibility");
    member.set_resolved_visibility(visibility);
}

#[cfg(test)]
#[path = "tests/visibility_tests.rs"]
mod tests;
