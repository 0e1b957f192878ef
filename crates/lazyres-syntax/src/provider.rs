//! Declaration providers.
//!
//! A provider answers "which declarations in this container are named `x`?"
//! and "what does this container declare?". Package providers merge every file
//! fragment of a package; class providers serve the body of one class-like
//! declaration. The name index is built on first lookup.

use crate::ast::{
    AnnotationEntry, ClassDecl, ClassKind, Declaration, FunctionDecl, Modifiers, ParameterDecl,
    PropertyDecl, SuperTypeEntry, TypeConstraintDecl, TypeParameterDecl, VisibilityModifier,
};
use crate::project::Project;
use indexmap::IndexMap;
use lazyres_common::{Anchor, FqName, Name};
use rustc_hash::FxBuildHasher;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::trace;

/// All declarations bound to one name inside a container, grouped by kind.
#[derive(Clone, Debug, Default)]
pub struct NamedDeclarations {
    pub classes: Vec<Arc<ClassDecl>>,
    pub functions: Vec<Arc<FunctionDecl>>,
    pub properties: Vec<Arc<PropertyDecl>>,
    /// Type aliases bound to the name. The member scope engine rejects them.
    pub type_aliases: Vec<Declaration>,
}

impl NamedDeclarations {
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
            && self.functions.is_empty()
            && self.properties.is_empty()
            && self.type_aliases.is_empty()
    }
}

pub trait DeclarationProvider: Send + Sync + fmt::Debug {
    /// Declarations named `name`, in source order within each kind.
    fn declarations_named(&self, name: &Name) -> NamedDeclarations;

    /// Every declaration of the container, in source order.
    fn all_declarations(&self) -> &[Declaration];

    /// The syntax node owning this container, if any.
    fn owner_anchor(&self) -> Option<&Anchor>;
}

/// Provider backed by an in-memory list with a lazily built name index.
pub struct IndexedDeclarationProvider {
    owner: Option<Anchor>,
    declarations: Vec<Declaration>,
    index: OnceLock<IndexMap<Name, NamedDeclarations, FxBuildHasher>>,
}

impl IndexedDeclarationProvider {
    pub fn new(owner: Option<Anchor>, declarations: Vec<Declaration>) -> Self {
        Self {
            owner,
            declarations,
            index: OnceLock::new(),
        }
    }

    pub fn empty(owner: Option<Anchor>) -> Self {
        Self::new(owner, Vec::new())
    }

    /// Names declared in this container, in first-declaration order.
    pub fn declared_names(&self) -> Vec<Name> {
        self.index().keys().cloned().collect()
    }

    fn index(&self) -> &IndexMap<Name, NamedDeclarations, FxBuildHasher> {
        self.index.get_or_init(|| {
            let mut index: IndexMap<Name, NamedDeclarations, FxBuildHasher> = IndexMap::default();
            for decl in &self.declarations {
                let Some(name) = decl.name() else {
                    continue;
                };
                let slot = index.entry(name.clone()).or_default();
                match decl {
                    Declaration::Class(class) => slot.classes.push(Arc::clone(class)),
                    Declaration::Function(function) => slot.functions.push(Arc::clone(function)),
                    Declaration::Property(property) => slot.properties.push(Arc::clone(property)),
                    Declaration::TypeAlias(_) => slot.type_aliases.push(decl.clone()),
                    Declaration::MultiDeclaration(_) => {}
                }
            }
            trace!(
                names = index.len(),
                declarations = self.declarations.len(),
                "built declaration index"
            );
            index
        })
    }
}

impl DeclarationProvider for IndexedDeclarationProvider {
    fn declarations_named(&self, name: &Name) -> NamedDeclarations {
        self.index().get(name).cloned().unwrap_or_default()
    }

    fn all_declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    fn owner_anchor(&self) -> Option<&Anchor> {
        self.owner.as_ref()
    }
}

impl fmt::Debug for IndexedDeclarationProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexedDeclarationProvider")
            .field("owner", &self.owner)
            .field("declarations", &self.declarations.len())
            .finish()
    }
}

// =============================================================================
// Class-like info
// =============================================================================

/// What a class descriptor is built from: a real declaration, or the
/// synthesized class object of a declaration that needs one but wrote none.
#[derive(Clone, Debug)]
pub enum ClassLikeInfo {
    Declared(Arc<ClassDecl>),
    SyntheticClassObject { owner: Arc<ClassDecl> },
}

impl ClassLikeInfo {
    pub fn name(&self) -> Name {
        match self {
            Self::Declared(decl) => decl.name.clone(),
            Self::SyntheticClassObject { owner } => Name::class_object_for(&owner.name),
        }
    }

    pub fn kind(&self) -> ClassKind {
        match self {
            Self::Declared(decl) => decl.kind,
            Self::SyntheticClassObject { .. } => ClassKind::ClassObject,
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        match self {
            Self::Declared(decl) => decl.modifiers,
            Self::SyntheticClassObject { .. } => Modifiers::FINAL,
        }
    }

    pub fn visibility(&self) -> Option<VisibilityModifier> {
        match self {
            Self::Declared(decl) => decl.visibility,
            Self::SyntheticClassObject { .. } => Some(VisibilityModifier::Public),
        }
    }

    pub fn anchor(&self) -> &Anchor {
        match self {
            Self::Declared(decl) => &decl.anchor,
            Self::SyntheticClassObject { owner } => &owner.anchor,
        }
    }

    pub fn annotations(&self) -> &[AnnotationEntry] {
        match self {
            Self::Declared(decl) => &decl.annotations,
            Self::SyntheticClassObject { .. } => &[],
        }
    }

    pub fn type_parameters(&self) -> &[TypeParameterDecl] {
        match self {
            Self::Declared(decl) => &decl.type_parameters,
            Self::SyntheticClassObject { .. } => &[],
        }
    }

    pub fn type_constraints(&self) -> &[TypeConstraintDecl] {
        match self {
            Self::Declared(decl) => &decl.type_constraints,
            Self::SyntheticClassObject { .. } => &[],
        }
    }

    /// Explicit primary constructor parameters, if a primary constructor was written.
    pub fn primary_constructor_parameters(&self) -> Option<&[ParameterDecl]> {
        match self {
            Self::Declared(decl) => decl.primary_constructor.as_deref(),
            Self::SyntheticClassObject { .. } => None,
        }
    }

    pub fn supertypes(&self) -> &[SuperTypeEntry] {
        match self {
            Self::Declared(decl) => &decl.supertypes,
            Self::SyntheticClassObject { .. } => &[],
        }
    }

    pub fn class_objects(&self) -> &[Arc<ClassDecl>] {
        match self {
            Self::Declared(decl) => &decl.class_objects,
            Self::SyntheticClassObject { .. } => &[],
        }
    }

    pub fn members(&self) -> &[Declaration] {
        match self {
            Self::Declared(decl) => &decl.members,
            Self::SyntheticClassObject { .. } => &[],
        }
    }

    /// The declaration this info was built from, or `None` when synthesized.
    pub fn corresponding_class_or_object(&self) -> Option<&Arc<ClassDecl>> {
        match self {
            Self::Declared(decl) => Some(decl),
            Self::SyntheticClassObject { .. } => None,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, Self::SyntheticClassObject { .. })
    }
}

// =============================================================================
// Factory
// =============================================================================

pub trait DeclarationProviderFactory: Send + Sync {
    /// Provider for all files of a package, or `None` if nothing declares it.
    fn package_provider(&self, fq_name: &FqName) -> Option<Arc<dyn DeclarationProvider>>;

    /// Provider for the body of a class-like declaration.
    fn class_member_provider(&self, info: &ClassLikeInfo) -> Arc<dyn DeclarationProvider>;

    /// Every package with at least one fragment, in project order.
    fn package_names(&self) -> Vec<FqName>;
}

/// Factory over an in-memory [`Project`]. Fragments of the same package from
/// different files are merged into one provider.
pub struct FileBasedDeclarationProviderFactory {
    packages: IndexMap<FqName, Arc<IndexedDeclarationProvider>, FxBuildHasher>,
}

impl FileBasedDeclarationProviderFactory {
    pub fn new(project: &Project) -> Self {
        let mut grouped: IndexMap<FqName, Vec<Declaration>, FxBuildHasher> = IndexMap::default();
        for file in &project.files {
            grouped
                .entry(file.package.clone())
                .or_default()
                .extend(file.declarations.iter().cloned());
        }
        let packages = grouped
            .into_iter()
            .map(|(fq_name, declarations)| {
                (
                    fq_name,
                    Arc::new(IndexedDeclarationProvider::new(None, declarations)),
                )
            })
            .collect();
        Self { packages }
    }
}

impl DeclarationProviderFactory for FileBasedDeclarationProviderFactory {
    fn package_provider(&self, fq_name: &FqName) -> Option<Arc<dyn DeclarationProvider>> {
        self.packages
            .get(fq_name)
            .map(|provider| Arc::clone(provider) as Arc<dyn DeclarationProvider>)
    }

    fn class_member_provider(&self, info: &ClassLikeInfo) -> Arc<dyn DeclarationProvider> {
        Arc::new(IndexedDeclarationProvider::new(
            Some(info.anchor().clone()),
            info.members().to_vec(),
        ))
    }

    fn package_names(&self) -> Vec<FqName> {
        self.packages.keys().cloned().collect()
    }
}

#[cfg(test)]
#[path = "tests/provider_tests.rs"]
mod tests;
