//! Member descriptors and the small value types they are built from.

use crate::error::ResolveResult;
use crate::ids::{ClassId, Container};
use crate::session::ResolveSession;
use crate::type_parameter::TypeParameterDescriptor;
use crate::types::{Type, TypeSubstitution};
use lazyres_common::{Anchor, Name};
use lazyres_storage::LazyValue;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

// =============================================================================
// Modality / Visibility
// =============================================================================

/// Ordered from most to least restrictive for overriding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub enum Modality {
    Final,
    Open,
    Abstract,
}

impl Modality {
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Final => "final",
            Self::Open => "open",
            Self::Abstract => "abstract",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Visibility {
    Public,
    Protected,
    Internal,
    Private,
    /// Unspecified on an overriding member; inferred from what it overrides.
    Inherited,
    /// A fake override of members that are all private to their class.
    InvisibleFake,
}

impl Visibility {
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Internal => "internal",
            Self::Private => "private",
            Self::Inherited => "inherited",
            Self::InvisibleFake => "invisible_fake",
        }
    }

    /// Partial order by openness. `Protected` and `Internal` are incomparable;
    /// `Inherited` compares with nothing.
    pub fn compare(self, other: Visibility) -> Option<Ordering> {
        use Visibility::{Inherited, Internal, Protected};
        if self == other {
            return Some(Ordering::Equal);
        }
        match (self, other) {
            (Inherited, _) | (_, Inherited) => None,
            (Protected, Internal) | (Internal, Protected) => None,
            _ => Some(self.rank().cmp(&other.rank())),
        }
    }

    /// Whether a subclass can see (and so override) a member with this visibility.
    pub const fn is_visible_to_subclasses(self) -> bool {
        !matches!(self, Self::Private | Self::InvisibleFake)
    }

    const fn rank(self) -> u8 {
        match self {
            Self::InvisibleFake => 0,
            Self::Private => 1,
            Self::Protected | Self::Internal => 2,
            Self::Public => 3,
            Self::Inherited => 0,
        }
    }
}

/// The most open visibility among `descriptors` that every one of them is
/// comparable with. `None` when the set is empty or the maximum is ambiguous.
pub fn find_max_visibility(descriptors: &[Arc<CallableDescriptor>]) -> Option<Visibility> {
    let mut max: Option<Visibility> = None;
    for descriptor in descriptors {
        let visibility = descriptor.visibility();
        max = match max {
            None => Some(visibility),
            Some(current) => match visibility.compare(current) {
                None => return None,
                Some(Ordering::Greater) => Some(visibility),
                Some(_) => Some(current),
            },
        };
    }
    let max = max?;
    let dominates_all = descriptors.iter().all(|d| {
        matches!(
            max.compare(d.visibility()),
            Some(Ordering::Greater | Ordering::Equal)
        )
    });
    dominates_all.then_some(max)
}

// =============================================================================
// Callable descriptors
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum CallableKind {
    Function,
    Property,
    Constructor,
}

/// How a member came to exist in its container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum MemberKind {
    /// Written in source (including constructor-parameter properties).
    Declaration,
    /// Inherited member re-exposed in a subclass without an explicit override.
    FakeOverride,
    /// Interface member re-exposed through `Iface by delegate`.
    Delegation,
    /// Generated by the engine (data-class and enum members, object constructors).
    Synthesized,
}

/// Source construct a callable was produced from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Origin {
    Source,
    /// A primary-constructor parameter promoted to a property, by position.
    ConstructorParameter(usize),
    Synthesized,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DefaultValue {
    None,
    /// The parameter declares a default expression.
    Declared,
    /// Defaults to the receiver's current value of the named property
    /// (`copy` of data classes).
    ThisProperty(Name),
}

#[derive(Clone, Debug)]
pub struct ValueParameterDescriptor {
    pub name: Name,
    pub index: usize,
    pub ty: Type,
    pub default: DefaultValue,
    pub vararg: bool,
    pub anchor: Option<Anchor>,
}

impl ValueParameterDescriptor {
    pub fn new(name: Name, index: usize, ty: Type) -> Self {
        Self {
            name,
            index,
            ty,
            default: DefaultValue::None,
            vararg: false,
            anchor: None,
        }
    }

    #[must_use]
    fn substitute(&self, substitution: &TypeSubstitution) -> Self {
        Self {
            ty: self.ty.substitute(substitution),
            ..self.clone()
        }
    }
}

/// A type that is computed on first read. Constructors use it for their
/// return type so building a constructor never forces the class's own type.
#[derive(Clone)]
pub struct DeferredType {
    class: ClassId,
    cell: Arc<LazyValue<Type>>,
}

impl DeferredType {
    /// The default instantiated type of `class`.
    pub fn default_type_of(class: ClassId) -> Self {
        Self {
            class,
            cell: Arc::new(LazyValue::new()),
        }
    }

    pub fn is_computed(&self) -> bool {
        self.cell.is_computed()
    }

    pub fn get(&self, ctx: &ResolveSession) -> ResolveResult<Type> {
        self.cell
            .get_or_try_init(|| ctx.class(self.class)?.default_type(ctx))
    }
}

impl fmt::Debug for DeferredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.get() {
            Some(ty) => write!(f, "DeferredType({ty:?})"),
            None => write!(f, "DeferredType(<default type of {}>)", self.class),
        }
    }
}

#[derive(Clone, Debug)]
pub enum ReturnType {
    Resolved(Type),
    Deferred(DeferredType),
}

impl ReturnType {
    pub fn get(&self, ctx: &ResolveSession) -> ResolveResult<Type> {
        match self {
            Self::Resolved(ty) => Ok(ty.clone()),
            Self::Deferred(deferred) => deferred.get(ctx),
        }
    }

    #[must_use]
    fn substitute(&self, substitution: &TypeSubstitution) -> Self {
        match self {
            Self::Resolved(ty) => Self::Resolved(ty.substitute(substitution)),
            Self::Deferred(deferred) => Self::Deferred(deferred.clone()),
        }
    }
}

/// Everything needed to build a [`CallableDescriptor`].
#[derive(Clone, Debug)]
pub struct CallableParts {
    pub kind: CallableKind,
    pub name: Name,
    pub container: Container,
    pub member_kind: MemberKind,
    pub modality: Modality,
    pub visibility: Visibility,
    pub type_parameters: Vec<Arc<TypeParameterDescriptor>>,
    pub value_parameters: Vec<ValueParameterDescriptor>,
    pub receiver: Option<Type>,
    pub return_type: ReturnType,
    pub is_var: bool,
    pub is_primary: bool,
    pub origin: Origin,
    pub anchor: Option<Anchor>,
}

/// A function, property or constructor.
///
/// Immutable after construction except for two write-once slots filled by
/// the member scope that owns the descriptor: the overridden members and the
/// inferred visibility of members declared with `Visibility::Inherited`.
pub struct CallableDescriptor {
    pub kind: CallableKind,
    pub name: Name,
    pub container: Container,
    pub member_kind: MemberKind,
    pub modality: Modality,
    pub type_parameters: Vec<Arc<TypeParameterDescriptor>>,
    pub value_parameters: Vec<ValueParameterDescriptor>,
    pub receiver: Option<Type>,
    pub is_var: bool,
    pub is_primary: bool,
    pub origin: Origin,
    pub anchor: Option<Anchor>,
    return_type: ReturnType,
    declared_visibility: Visibility,
    resolved_visibility: OnceLock<Visibility>,
    overridden: OnceLock<Vec<Arc<CallableDescriptor>>>,
    /// For substituted copies, the descriptor they were copied from.
    original: Option<Arc<CallableDescriptor>>,
}

impl CallableDescriptor {
    pub fn new(parts: CallableParts) -> Self {
        Self {
            kind: parts.kind,
            name: parts.name,
            container: parts.container,
            member_kind: parts.member_kind,
            modality: parts.modality,
            type_parameters: parts.type_parameters,
            value_parameters: parts.value_parameters,
            receiver: parts.receiver,
            is_var: parts.is_var,
            is_primary: parts.is_primary,
            origin: parts.origin,
            anchor: parts.anchor,
            return_type: parts.return_type,
            declared_visibility: parts.visibility,
            resolved_visibility: OnceLock::new(),
            overridden: OnceLock::new(),
            original: None,
        }
    }

    /// Effective visibility: the inferred one if inference ran, else the declared one.
    pub fn visibility(&self) -> Visibility {
        self.resolved_visibility
            .get()
            .copied()
            .unwrap_or(self.declared_visibility)
    }

    pub fn declared_visibility(&self) -> Visibility {
        self.declared_visibility
    }

    /// Install the inferred visibility. Returns `false` if one was already set.
    pub(crate) fn set_resolved_visibility(&self, visibility: Visibility) -> bool {
        self.resolved_visibility.set(visibility).is_ok()
    }

    pub fn overridden(&self) -> &[Arc<CallableDescriptor>] {
        self.overridden.get().map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn bind_overridden(&self, overridden: Vec<Arc<CallableDescriptor>>) -> bool {
        self.overridden.set(overridden).is_ok()
    }

    pub fn return_type(&self, ctx: &ResolveSession) -> ResolveResult<Type> {
        self.return_type.get(ctx)
    }

    pub fn return_type_slot(&self) -> &ReturnType {
        &self.return_type
    }

    /// The descriptor this one was substituted from, or itself.
    pub fn original(&self) -> &CallableDescriptor {
        match &self.original {
            Some(original) => original.original(),
            None => self,
        }
    }

    pub fn same_original(&self, other: &CallableDescriptor) -> bool {
        std::ptr::eq(self.original(), other.original())
    }

    /// Copy of this member attributed to `container`, for fake overrides and
    /// delegation. Overridden members are bound by the caller.
    pub(crate) fn copy_for_container(
        &self,
        container: Container,
        modality: Modality,
        visibility: Visibility,
        member_kind: MemberKind,
    ) -> CallableDescriptor {
        CallableDescriptor::new(CallableParts {
            kind: self.kind,
            name: self.name.clone(),
            container,
            member_kind,
            modality,
            visibility,
            type_parameters: self.type_parameters.clone(),
            value_parameters: self.value_parameters.clone(),
            receiver: self.receiver.clone(),
            return_type: self.return_type.clone(),
            is_var: self.is_var,
            is_primary: false,
            origin: Origin::Synthesized,
            anchor: None,
        })
    }

    /// This member as seen through a parameterized supertype.
    pub(crate) fn substitute(
        self: &Arc<Self>,
        substitution: &TypeSubstitution,
    ) -> Arc<CallableDescriptor> {
        if substitution.is_empty() {
            return Arc::clone(self);
        }
        let copy = CallableDescriptor {
            kind: self.kind,
            name: self.name.clone(),
            container: self.container,
            member_kind: self.member_kind,
            modality: self.modality,
            type_parameters: self.type_parameters.clone(),
            value_parameters: self
                .value_parameters
                .iter()
                .map(|p| p.substitute(substitution))
                .collect(),
            receiver: self.receiver.as_ref().map(|r| r.substitute(substitution)),
            is_var: self.is_var,
            is_primary: self.is_primary,
            origin: self.origin,
            anchor: self.anchor.clone(),
            return_type: self.return_type.substitute(substitution),
            declared_visibility: self.visibility(),
            resolved_visibility: OnceLock::new(),
            overridden: OnceLock::new(),
            original: Some(Arc::clone(self)),
        };
        let _ = copy.overridden.set(self.overridden().to_vec());
        Arc::new(copy)
    }
}

impl fmt::Debug for CallableDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallableDescriptor")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("container", &self.container)
            .field("member_kind", &self.member_kind)
            .field("modality", &self.modality)
            .field("visibility", &self.visibility())
            .field("value_parameters", &self.value_parameters.len())
            .field("overridden", &self.overridden().len())
            .finish()
    }
}

// =============================================================================
// Descriptor handles
// =============================================================================

/// A resolved annotation application.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnotationDescriptor {
    pub ty: Type,
    pub arguments: Vec<String>,
}

/// A classifier visible in a scope.
#[derive(Clone, Debug)]
pub enum Classifier {
    Class(ClassId),
    TypeParameter(Arc<TypeParameterDescriptor>),
}

/// Any member a scope can enumerate. Compares by identity.
#[derive(Clone, Debug)]
pub enum Descriptor {
    Class(ClassId),
    Callable(Arc<CallableDescriptor>),
}

impl Descriptor {
    pub fn name(&self, ctx: &ResolveSession) -> ResolveResult<Name> {
        match self {
            Self::Class(id) => Ok(ctx.class(*id)?.name().clone()),
            Self::Callable(callable) => Ok(callable.name.clone()),
        }
    }

    pub fn as_callable(&self) -> Option<&Arc<CallableDescriptor>> {
        match self {
            Self::Callable(callable) => Some(callable),
            Self::Class(_) => None,
        }
    }
}

impl PartialEq for Descriptor {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Class(a), Self::Class(b)) => a == b,
            (Self::Callable(a), Self::Callable(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Descriptor {}

impl Hash for Descriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Class(id) => {
                0u8.hash(state);
                id.hash(state);
            }
            Self::Callable(callable) => {
                1u8.hash(state);
                std::ptr::hash(Arc::as_ptr(callable), state);
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/descriptors_tests.rs"]
mod tests;
