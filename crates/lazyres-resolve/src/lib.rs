//! Lazy descriptor resolution.
//!
//! This crate turns raw declarations into semantic descriptors on demand:
//! - Member scopes (`member_scope`) that resolve one name at a time and cache
//!   the result per name, with class and package strategies
//! - Class descriptors (`class_descriptor`) whose supertypes, type
//!   parameters, scopes and class object are computed lazily, with
//!   inheritance-cycle detection
//! - Inherited-member completion: fake overrides (`overriding`), visibility
//!   inference (`visibility`), delegation (`delegation`) and data/enum
//!   member synthesis (`synthesis`)
//! - Eager forcing (`force_resolve`) and rendering (`render`)
//!
//! All entry points take a [`ResolveSession`], which owns the descriptor
//! arenas and the external collaborators.

// Errors and configuration
pub mod error;
pub use error::{ResolveError, ResolveResult};
pub mod options;
pub use options::ResolveOptions;

// Diagnostics sink
pub mod diagnostics;
pub use diagnostics::{CollectingDiagnosticSink, DiagnosticSink};

// Recursion guard for subtype checks and forcing
pub mod recursion;
pub use recursion::{RecursionGuard, RecursionProfile, RecursionResult};

// Ids, types and descriptors
pub mod ids;
pub use ids::{CallableId, ClassId, Container, PackageId};
pub mod types;
pub use types::{Type, TypeParamKey, TypeParamOwner, TypeSubstitution};
pub mod descriptors;
pub use descriptors::{
    AnnotationDescriptor, CallableDescriptor, CallableKind, CallableParts, Classifier, DefaultValue,
    Descriptor, MemberKind, Modality, Origin, ReturnType, ValueParameterDescriptor, Visibility,
};
pub mod type_parameter;
pub use type_parameter::TypeParameterDescriptor;

// Scopes
pub mod scope;
pub use scope::{Scope, ScopeRef};
pub mod member_scope;
pub use member_scope::{CallableSet, ClassifierSeed, LazyMemberScope, MemberScopeStrategy};

// Classes and packages
pub mod class_descriptor;
pub use class_descriptor::{LazyClassDescriptor, Supertypes};
mod hierarchy;
pub mod class_member_scope;
pub use class_member_scope::ClassMemberStrategy;
pub mod package;
pub use package::{PackageDescriptor, PackageMemberStrategy};

// Inherited member completion
pub mod overriding;
pub use overriding::{Overridability, check_override, is_overridable_by};
pub mod visibility;
pub mod subtyping;
pub use subtyping::is_subtype;
pub mod synthesis;
pub mod delegation;

// Collaborators and session
pub mod resolver;
pub use resolver::{BasicDescriptorResolver, DescriptorResolver};
pub mod session;
pub use session::ResolveSession;

// Forcing and rendering
pub mod force_resolve;
pub mod render;
pub use render::{render_callable, render_class, render_class_id, render_descriptor, render_type};
