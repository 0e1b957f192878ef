use super::{Scope, ScopeRef};
use crate::descriptors::{CallableDescriptor, Classifier, Descriptor, ValueParameterDescriptor};
use crate::error::ResolveResult;
use crate::ids::ClassId;
use crate::session::ResolveSession;
use indexmap::IndexSet;
use lazyres_common::Name;
use rustc_hash::FxBuildHasher;
use std::fmt;
use std::sync::Arc;

/// Ordered composition of scopes.
///
/// Classifiers and local variables come from the first delegate that has
/// one. Functions and properties are the union over every delegate in order;
/// duplicates are kept, de-duplication is the caller's business.
pub struct ChainedScope {
    label: String,
    scopes: Vec<ScopeRef>,
}

impl ChainedScope {
    pub fn new(label: impl Into<String>, scopes: Vec<ScopeRef>) -> Self {
        Self {
            label: label.into(),
            scopes,
        }
    }

    pub fn delegates(&self) -> &[ScopeRef] {
        &self.scopes
    }
}

impl Scope for ChainedScope {
    fn label(&self) -> &str {
        &self.label
    }

    fn classifier(&self, ctx: &ResolveSession, name: &Name) -> ResolveResult<Option<Classifier>> {
        for scope in &self.scopes {
            if let Some(found) = scope.classifier(ctx, name)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    fn functions(&self, ctx: &ResolveSession, name: &Name) -> ResolveResult<Vec<Arc<CallableDescriptor>>> {
        let mut result = Vec::new();
        for scope in &self.scopes {
            result.extend(scope.functions(ctx, name)?);
        }
        Ok(result)
    }

    fn properties(&self, ctx: &ResolveSession, name: &Name) -> ResolveResult<Vec<Arc<CallableDescriptor>>> {
        let mut result = Vec::new();
        for scope in &self.scopes {
            result.extend(scope.properties(ctx, name)?);
        }
        Ok(result)
    }

    fn local_variable(
        &self,
        ctx: &ResolveSession,
        name: &Name,
    ) -> ResolveResult<Option<ValueParameterDescriptor>> {
        for scope in &self.scopes {
            if let Some(found) = scope.local_variable(ctx, name)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    fn declarations_by_label(&self, ctx: &ResolveSession, label: &Name) -> ResolveResult<Vec<Descriptor>> {
        let mut result = Vec::new();
        for scope in &self.scopes {
            result.extend(scope.declarations_by_label(ctx, label)?);
        }
        Ok(result)
    }

    fn implicit_receivers_hierarchy(&self, ctx: &ResolveSession) -> ResolveResult<Vec<ClassId>> {
        let mut result = Vec::new();
        for scope in &self.scopes {
            result.extend(scope.implicit_receivers_hierarchy(ctx)?);
        }
        Ok(result)
    }

    fn all_descriptors(&self, ctx: &ResolveSession) -> ResolveResult<Vec<Descriptor>> {
        let mut result: IndexSet<Descriptor, FxBuildHasher> = IndexSet::default();
        for scope in &self.scopes {
            result.extend(scope.all_descriptors(ctx)?);
        }
        Ok(result.into_iter().collect())
    }
}

impl fmt::Debug for ChainedScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainedScope")
            .field("label", &self.label)
            .field(
                "scopes",
                &self.scopes.iter().map(|s| s.label()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
