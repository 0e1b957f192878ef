//! Raw syntactic declarations and the providers that serve them.
//!
//! The resolution engine never parses source. It consumes declarations
//! through [`DeclarationProvider`]: given a name, the class/function/property
//! declarations bound to it inside one syntactic container, plus a full list
//! for enumeration. Declaration kinds form a closed sum type ([`Declaration`])
//! so the engine can match on them exhaustively.

pub mod ast;
pub mod builder;
pub mod builtins;
pub mod project;
pub mod provider;

pub use ast::{
    AnnotationEntry, ClassDecl, ClassKind, Declaration, FunctionDecl, Modifiers, MultiDeclaration,
    ParameterDecl, PropertyDecl, SuperTypeEntry, TypeAliasDecl, TypeConstraintDecl,
    TypeParameterDecl, TypeRef, ValOrVar, Variance, VisibilityModifier,
};
pub use project::{Project, ProjectError, SourceFile};
pub use provider::{
    ClassLikeInfo, DeclarationProvider, DeclarationProviderFactory, FileBasedDeclarationProviderFactory,
    IndexedDeclarationProvider, NamedDeclarations,
};
