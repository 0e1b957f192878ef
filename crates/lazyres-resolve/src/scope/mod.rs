//! Name lookup surfaces.
//!
//! A [`Scope`] answers lookups by name. Resolution scopes are composed by
//! chaining ([`ChainedScope`]); member scopes of classes and packages are
//! reached through id-based adapters so scopes never own descriptors.

mod adapters;
mod chained;
mod simple;

pub use adapters::{ClassRegion, ClassRegionScope, MemberScopeAdapter};
pub use chained::ChainedScope;
pub use simple::{ReceiverScope, TypeParameterScope, ValueParameterScope};

use crate::descriptors::{CallableDescriptor, Classifier, Descriptor, ValueParameterDescriptor};
use crate::error::ResolveResult;
use crate::ids::ClassId;
use crate::session::ResolveSession;
use lazyres_common::Name;
use std::fmt;
use std::sync::Arc;

pub type ScopeRef = Arc<dyn Scope>;

/// A queryable namespace. Every lookup may trigger lazy resolution, hence the
/// session parameter and the fallible results.
///
/// Defaults answer "nothing here", so each scope implements only the lookups
/// it can contribute to.
pub trait Scope: Send + Sync + fmt::Debug {
    /// Diagnostic label; no behavioral effect.
    fn label(&self) -> &str;

    fn classifier(&self, _ctx: &ResolveSession, _name: &Name) -> ResolveResult<Option<Classifier>> {
        Ok(None)
    }

    fn functions(
        &self,
        _ctx: &ResolveSession,
        _name: &Name,
    ) -> ResolveResult<Vec<Arc<CallableDescriptor>>> {
        Ok(Vec::new())
    }

    fn properties(
        &self,
        _ctx: &ResolveSession,
        _name: &Name,
    ) -> ResolveResult<Vec<Arc<CallableDescriptor>>> {
        Ok(Vec::new())
    }

    fn local_variable(
        &self,
        _ctx: &ResolveSession,
        _name: &Name,
    ) -> ResolveResult<Option<ValueParameterDescriptor>> {
        Ok(None)
    }

    fn declarations_by_label(
        &self,
        _ctx: &ResolveSession,
        _label: &Name,
    ) -> ResolveResult<Vec<Descriptor>> {
        Ok(Vec::new())
    }

    /// Classes whose `this` is implicitly available, innermost first.
    fn implicit_receivers_hierarchy(&self, _ctx: &ResolveSession) -> ResolveResult<Vec<ClassId>> {
        Ok(Vec::new())
    }

    fn all_descriptors(&self, _ctx: &ResolveSession) -> ResolveResult<Vec<Descriptor>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
#[path = "../tests/scope_tests.rs"]
mod tests;
