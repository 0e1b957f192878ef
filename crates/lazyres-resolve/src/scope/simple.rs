use super::Scope;
use crate::descriptors::{Classifier, ValueParameterDescriptor};
use crate::error::ResolveResult;
use crate::ids::ClassId;
use crate::session::ResolveSession;
use crate::type_parameter::TypeParameterDescriptor;
use lazyres_common::Name;
use std::sync::Arc;

/// Exposes a fixed list of type parameters as classifiers.
#[derive(Debug)]
pub struct TypeParameterScope {
    label: String,
    parameters: Vec<Arc<TypeParameterDescriptor>>,
}

impl TypeParameterScope {
    pub fn new(label: impl Into<String>, parameters: Vec<Arc<TypeParameterDescriptor>>) -> Self {
        Self {
            label: label.into(),
            parameters,
        }
    }
}

impl Scope for TypeParameterScope {
    fn label(&self) -> &str {
        &self.label
    }

    fn classifier(&self, _ctx: &ResolveSession, name: &Name) -> ResolveResult<Option<Classifier>> {
        Ok(self
            .parameters
            .iter()
            .find(|param| param.name() == name)
            .map(|param| Classifier::TypeParameter(Arc::clone(param))))
    }
}

/// Contributes only the implicit `this` of a class.
#[derive(Debug)]
pub struct ReceiverScope {
    class: ClassId,
}

impl ReceiverScope {
    pub fn new(class: ClassId) -> Self {
        Self { class }
    }
}

impl Scope for ReceiverScope {
    fn label(&self) -> &str {
        "this"
    }

    fn implicit_receivers_hierarchy(&self, _ctx: &ResolveSession) -> ResolveResult<Vec<ClassId>> {
        Ok(vec![self.class])
    }
}

/// Constructor parameters visible as local variables (property initializers).
#[derive(Debug)]
pub struct ValueParameterScope {
    label: String,
    parameters: Vec<ValueParameterDescriptor>,
}

impl ValueParameterScope {
    pub fn new(label: impl Into<String>, parameters: Vec<ValueParameterDescriptor>) -> Self {
        Self {
            label: label.into(),
            parameters,
        }
    }
}

impl Scope for ValueParameterScope {
    fn label(&self) -> &str {
        &self.label
    }

    fn local_variable(
        &self,
        _ctx: &ResolveSession,
        name: &Name,
    ) -> ResolveResult<Option<ValueParameterDescriptor>> {
        Ok(self.parameters.iter().find(|p| &p.name == name).cloned())
    }
}
