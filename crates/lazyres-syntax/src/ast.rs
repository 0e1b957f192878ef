//! Declaration model.
//!
//! These are the raw syntactic declarations the engine resolves. Every node
//! carries an [`Anchor`] that identifies it for diagnostics; fixture files may
//! omit anchors, in which case they default to an empty span.
//!
//! Nested payloads are shared through `Arc` so providers, scopes and
//! descriptors can hold on to the exact node they were created from.

use bitflags::bitflags;
use lazyres_common::{Anchor, Name};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// =============================================================================
// Modifiers
// =============================================================================

bitflags! {
    /// Declaration modifiers that affect resolution.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Modifiers: u16 {
        const ABSTRACT = 1 << 0;
        const OPEN = 1 << 1;
        const FINAL = 1 << 2;
        const OVERRIDE = 1 << 3;
        const DATA = 1 << 4;
        const INNER = 1 << 5;
        const ANNOTATION = 1 << 6;
        const ENUM = 1 << 7;
    }
}

/// Visibility as written in source. Absent means "unspecified".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityModifier {
    Public,
    Protected,
    Internal,
    Private,
}

/// Declaration-site variance of a type parameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variance {
    #[default]
    Invariant,
    In,
    Out,
}

/// `val` / `var` marker on a constructor parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValOrVar {
    Val,
    Var,
}

/// The flavour of a class-like declaration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    EnumClass,
    EnumEntry,
    Object,
    ClassObject,
    AnnotationClass,
}

impl ClassKind {
    /// Objects, enum entries and class objects have exactly one instance.
    pub const fn is_singleton(self) -> bool {
        matches!(self, Self::Object | Self::EnumEntry | Self::ClassObject)
    }

    /// Every kind except interfaces gets a primary constructor.
    pub const fn has_constructors(self) -> bool {
        !matches!(self, Self::Interface)
    }
}

// =============================================================================
// Type references
// =============================================================================

/// An unresolved type reference, e.g. `Map<K, List<V>>?`.
///
/// `name` may be dotted (`Outer.Inner`); each segment is looked up in turn.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    #[serde(default)]
    pub anchor: Anchor,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<TypeRef>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub nullable: bool,
}

impl TypeRef {
    pub fn segments(&self) -> impl Iterator<Item = Name> + '_ {
        self.name.split('.').map(Name::from)
    }

    pub fn short_name(&self) -> Name {
        Name::from(self.name.rsplit('.').next().unwrap_or(&self.name))
    }
}

// =============================================================================
// Declarations
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationEntry {
    #[serde(default)]
    pub anchor: Anchor,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParameterDecl {
    #[serde(default)]
    pub anchor: Anchor,
    pub name: Name,
    #[serde(default)]
    pub variance: Variance,
    #[serde(default)]
    pub reified: bool,
    /// Inline upper bound (`T : Bound`).
    #[serde(default)]
    pub bound: Option<TypeRef>,
}

/// A `where` clause entry: `where T : Bound` or `where class object T : Bound`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeConstraintDecl {
    #[serde(default)]
    pub anchor: Anchor,
    pub subject: Name,
    pub bound: TypeRef,
    #[serde(default)]
    pub class_object: bool,
}

/// A value parameter of a function or constructor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDecl {
    #[serde(default)]
    pub anchor: Anchor,
    pub name: Name,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default)]
    pub has_default: bool,
    #[serde(default)]
    pub vararg: bool,
    /// Present on primary-constructor parameters that are also properties.
    #[serde(default)]
    pub val_or_var: Option<ValOrVar>,
    #[serde(default)]
    pub visibility: Option<VisibilityModifier>,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl ParameterDecl {
    pub fn is_property(&self) -> bool {
        self.val_or_var.is_some()
    }
}

/// A supertype list entry: `Base()`, `Iface`, or `Iface by expr`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuperTypeEntry {
    #[serde(default)]
    pub anchor: Anchor,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    /// Whether the entry calls a superclass constructor.
    #[serde(default)]
    pub call: bool,
    /// Delegate expression of `Iface by expr`; kept only by name.
    #[serde(default)]
    pub delegate: Option<Name>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDecl {
    #[serde(default)]
    pub anchor: Anchor,
    pub name: Name,
    #[serde(default)]
    pub kind: ClassKind,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub visibility: Option<VisibilityModifier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<AnnotationEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<TypeParameterDecl>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_constraints: Vec<TypeConstraintDecl>,
    /// Primary constructor parameters. `None` means no explicit primary
    /// constructor; classes still get an implicit one.
    #[serde(default)]
    pub primary_constructor: Option<Vec<ParameterDecl>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supertypes: Vec<SuperTypeEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<Declaration>,
    /// Explicit class objects. More than one is reported and only the first
    /// is used.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub class_objects: Vec<Arc<ClassDecl>>,
}

impl ClassDecl {
    pub fn is_data(&self) -> bool {
        self.modifiers.contains(Modifiers::DATA)
    }

    pub fn primary_constructor_parameters(&self) -> &[ParameterDecl] {
        self.primary_constructor.as_deref().unwrap_or(&[])
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDecl {
    #[serde(default)]
    pub anchor: Anchor,
    pub name: Name,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub visibility: Option<VisibilityModifier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<AnnotationEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<TypeParameterDecl>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value_parameters: Vec<ParameterDecl>,
    #[serde(default)]
    pub receiver: Option<TypeRef>,
    /// Declared return type. Absent means it must be inferred from the body.
    #[serde(default)]
    pub return_type: Option<TypeRef>,
    #[serde(default)]
    pub has_body: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDecl {
    #[serde(default)]
    pub anchor: Anchor,
    pub name: Name,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub visibility: Option<VisibilityModifier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<AnnotationEntry>,
    #[serde(default)]
    pub is_var: bool,
    #[serde(default)]
    pub receiver: Option<TypeRef>,
    #[serde(default, rename = "type")]
    pub type_ref: Option<TypeRef>,
    #[serde(default)]
    pub has_initializer: bool,
}

/// `typealias Name = Target`. Not handled by the member scope engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeAliasDecl {
    #[serde(default)]
    pub anchor: Anchor,
    pub name: Name,
    pub target: TypeRef,
}

/// A destructuring declaration (`val (a, b) = ...`) at member level. Not
/// handled by the member scope engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiDeclaration {
    #[serde(default)]
    pub anchor: Anchor,
    pub entries: Vec<Name>,
}

/// A member-level declaration. Closed set so consumers match exhaustively.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decl", rename_all = "snake_case")]
pub enum Declaration {
    Class(Arc<ClassDecl>),
    Function(Arc<FunctionDecl>),
    Property(Arc<PropertyDecl>),
    TypeAlias(Arc<TypeAliasDecl>),
    MultiDeclaration(Arc<MultiDeclaration>),
}

impl Declaration {
    pub fn anchor(&self) -> &Anchor {
        match self {
            Self::Class(decl) => &decl.anchor,
            Self::Function(decl) => &decl.anchor,
            Self::Property(decl) => &decl.anchor,
            Self::TypeAlias(decl) => &decl.anchor,
            Self::MultiDeclaration(decl) => &decl.anchor,
        }
    }

    /// Declared name. Multi-declarations bind several names and report none.
    pub fn name(&self) -> Option<&Name> {
        match self {
            Self::Class(decl) => Some(&decl.name),
            Self::Function(decl) => Some(&decl.name),
            Self::Property(decl) => Some(&decl.name),
            Self::TypeAlias(decl) => Some(&decl.name),
            Self::MultiDeclaration(_) => None,
        }
    }

    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Class(_) => "class",
            Self::Function(_) => "function",
            Self::Property(_) => "property",
            Self::TypeAlias(_) => "type alias",
            Self::MultiDeclaration(_) => "multi-declaration",
        }
    }

    /// Fill in `file` on every anchor that lacks one, recursively.
    pub fn assign_file(&mut self, file: &Arc<str>) {
        match self {
            Self::Class(decl) => Arc::make_mut(decl).assign_file(file),
            Self::Function(decl) => Arc::make_mut(decl).assign_file(file),
            Self::Property(decl) => Arc::make_mut(decl).assign_file(file),
            Self::TypeAlias(decl) => {
                let decl = Arc::make_mut(decl);
                decl.anchor = decl.anchor.in_file(file);
                decl.target.assign_file(file);
            }
            Self::MultiDeclaration(decl) => {
                let decl = Arc::make_mut(decl);
                decl.anchor = decl.anchor.in_file(file);
            }
        }
    }
}

impl From<ClassDecl> for Declaration {
    fn from(decl: ClassDecl) -> Self {
        Self::Class(Arc::new(decl))
    }
}

impl From<FunctionDecl> for Declaration {
    fn from(decl: FunctionDecl) -> Self {
        Self::Function(Arc::new(decl))
    }
}

impl From<PropertyDecl> for Declaration {
    fn from(decl: PropertyDecl) -> Self {
        Self::Property(Arc::new(decl))
    }
}

impl From<TypeAliasDecl> for Declaration {
    fn from(decl: TypeAliasDecl) -> Self {
        Self::TypeAlias(Arc::new(decl))
    }
}

impl From<MultiDeclaration> for Declaration {
    fn from(decl: MultiDeclaration) -> Self {
        Self::MultiDeclaration(Arc::new(decl))
    }
}

// =============================================================================
// Anchor assignment
// =============================================================================

impl TypeRef {
    fn assign_file(&mut self, file: &Arc<str>) {
        self.anchor = self.anchor.in_file(file);
        for arg in &mut self.args {
            arg.assign_file(file);
        }
    }
}

impl ParameterDecl {
    fn assign_file(&mut self, file: &Arc<str>) {
        self.anchor = self.anchor.in_file(file);
        self.type_ref.assign_file(file);
    }
}

impl TypeParameterDecl {
    fn assign_file(&mut self, file: &Arc<str>) {
        self.anchor = self.anchor.in_file(file);
        if let Some(bound) = &mut self.bound {
            bound.assign_file(file);
        }
    }
}

fn assign_annotations(annotations: &mut [AnnotationEntry], file: &Arc<str>) {
    for annotation in annotations {
        annotation.anchor = annotation.anchor.in_file(file);
        annotation.type_ref.assign_file(file);
    }
}

impl ClassDecl {
    pub fn assign_file(&mut self, file: &Arc<str>) {
        self.anchor = self.anchor.in_file(file);
        assign_annotations(&mut self.annotations, file);
        for param in &mut self.type_parameters {
            param.assign_file(file);
        }
        for constraint in &mut self.type_constraints {
            constraint.anchor = constraint.anchor.in_file(file);
            constraint.bound.assign_file(file);
        }
        if let Some(params) = &mut self.primary_constructor {
            for param in params {
                param.assign_file(file);
            }
        }
        for entry in &mut self.supertypes {
            entry.anchor = entry.anchor.in_file(file);
            entry.type_ref.assign_file(file);
        }
        for member in &mut self.members {
            member.assign_file(file);
        }
        for class_object in &mut self.class_objects {
            Arc::make_mut(class_object).assign_file(file);
        }
    }
}

impl FunctionDecl {
    fn assign_file(&mut self, file: &Arc<str>) {
        self.anchor = self.anchor.in_file(file);
        assign_annotations(&mut self.annotations, file);
        for param in &mut self.type_parameters {
            param.assign_file(file);
        }
        for param in &mut self.value_parameters {
            param.assign_file(file);
        }
        if let Some(receiver) = &mut self.receiver {
            receiver.assign_file(file);
        }
        if let Some(ret) = &mut self.return_type {
            ret.assign_file(file);
        }
    }
}

impl PropertyDecl {
    fn assign_file(&mut self, file: &Arc<str>) {
        self.anchor = self.anchor.in_file(file);
        assign_annotations(&mut self.annotations, file);
        if let Some(receiver) = &mut self.receiver {
            receiver.assign_file(file);
        }
        if let Some(type_ref) = &mut self.type_ref {
            type_ref.assign_file(file);
        }
    }
}
