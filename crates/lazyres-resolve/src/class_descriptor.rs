//! Lazy class descriptors and their type constructor.
//!
//! Kind, modality, visibility and the inner flag are cheap modifier reads and
//! are computed when the descriptor is created. Everything else (type
//! parameters, supertypes, annotations, the class object, the three
//! resolution scopes, the default type) is computed on first request and
//! cached for the life of the session.
//!
//! Supertypes are computed in two layers. The declared supertypes (resolved
//! entries, error types dropped, default added when nothing resolved) never
//! look at another class's supertypes. The final supertypes live in a
//! recursion-tolerant cell whose post-compute hook cuts the edges that close
//! an inheritance cycle, as decided over the declared graph by
//! [`crate::hierarchy`], and reports each cut once.

use crate::class_member_scope::ClassMemberStrategy;
use crate::descriptors::{AnnotationDescriptor, CallableDescriptor, Modality, Visibility};
use crate::diagnostics::report;
use crate::error::ResolveResult;
use crate::hierarchy;
use crate::ids::{ClassId, Container};
use crate::member_scope::LazyMemberScope;
use crate::scope::{
    ChainedScope, ClassRegion, ClassRegionScope, MemberScopeAdapter, ReceiverScope, ScopeRef,
    TypeParameterScope, ValueParameterScope,
};
use crate::session::ResolveSession;
use crate::type_parameter::TypeParameterDescriptor;
use crate::types::Type;
use lazyres_common::diagnostics::diagnostic_codes;
use lazyres_common::{Anchor, FqName, Name};
use lazyres_storage::{LazyValue, RecursionTolerantLazyValue};
use lazyres_syntax::builtins::ENUM;
use lazyres_syntax::{ClassKind, ClassLikeInfo, Modifiers, VisibilityModifier};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Resolved supertypes of a class.
#[derive(Clone, Debug, Default)]
pub struct Supertypes {
    /// Supertypes after cycle breaking, in declaration order.
    pub true_supertypes: Arc<[Type]>,
    /// Supertypes removed because they lead back to this class.
    pub cyclic_supertypes: Arc<[Type]>,
    /// Interface supertypes declared with `by`, among `true_supertypes`.
    pub delegated: Arc<[Type]>,
}

impl Supertypes {
    fn empty() -> Self {
        Self::default()
    }
}

pub struct LazyClassDescriptor {
    id: ClassId,
    name: Name,
    fq_name: FqName,
    info: ClassLikeInfo,
    container: Container,
    outer_scope: ScopeRef,

    kind: ClassKind,
    modality: Modality,
    visibility: Visibility,
    is_inner: bool,

    member_scope: LazyMemberScope<ClassMemberStrategy>,

    type_parameters: LazyValue<Arc<[Arc<TypeParameterDescriptor>]>>,
    declared_supertypes: LazyValue<Arc<Supertypes>>,
    supertypes: RecursionTolerantLazyValue<Arc<Supertypes>>,
    annotations: LazyValue<Arc<[AnnotationDescriptor]>>,
    class_object: LazyValue<Option<ClassId>>,
    header_scope: LazyValue<ScopeRef>,
    member_declaration_scope: LazyValue<ScopeRef>,
    initializer_scope: LazyValue<ScopeRef>,
    default_type: LazyValue<Type>,
}

impl LazyClassDescriptor {
    pub fn new(
        ctx: &ResolveSession,
        id: ClassId,
        info: ClassLikeInfo,
        container: Container,
        fq_name: FqName,
        outer_scope: ScopeRef,
    ) -> Self {
        let name = info.name();
        let kind = info.kind();
        let modifiers = info.modifiers();
        let visibility = match info.visibility() {
            Some(VisibilityModifier::Public) | None => Visibility::Public,
            Some(VisibilityModifier::Protected) => Visibility::Protected,
            Some(VisibilityModifier::Internal) => Visibility::Internal,
            Some(VisibilityModifier::Private) => Visibility::Private,
        };
        let provider = ctx.providers().class_member_provider(&info);
        let member_scope = LazyMemberScope::new(
            ClassMemberStrategy::new(id),
            provider,
            format!("member scope of {fq_name}"),
        );
        Self {
            id,
            name,
            info,
            container,
            outer_scope,
            kind,
            modality: class_modality(kind, modifiers),
            visibility,
            is_inner: modifiers.contains(Modifiers::INNER),
            fq_name,
            member_scope,
            type_parameters: LazyValue::new(),
            declared_supertypes: LazyValue::new(),
            supertypes: RecursionTolerantLazyValue::new(),
            annotations: LazyValue::new(),
            class_object: LazyValue::new(),
            header_scope: LazyValue::new(),
            member_declaration_scope: LazyValue::new(),
            initializer_scope: LazyValue::new(),
            default_type: LazyValue::new(),
        }
    }

    pub fn id(&self) -> ClassId {
        self.id
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn fq_name(&self) -> &FqName {
        &self.fq_name
    }

    pub fn info(&self) -> &ClassLikeInfo {
        &self.info
    }

    pub fn container(&self) -> Container {
        self.container
    }

    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    pub fn modality(&self) -> Modality {
        self.modality
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_inner(&self) -> bool {
        self.is_inner
    }

    pub fn is_data(&self) -> bool {
        self.info
            .corresponding_class_or_object()
            .is_some_and(|decl| decl.is_data())
    }

    pub fn anchor(&self) -> &Anchor {
        self.info.anchor()
    }

    pub fn outer_scope(&self) -> &ScopeRef {
        &self.outer_scope
    }

    pub fn member_scope(&self) -> &LazyMemberScope<ClassMemberStrategy> {
        &self.member_scope
    }

    /// The primary constructor, or `None` for interfaces.
    pub fn primary_constructor(
        &self,
        ctx: &ResolveSession,
    ) -> ResolveResult<Option<Arc<CallableDescriptor>>> {
        self.member_scope.strategy().primary_constructor(ctx)
    }

    pub fn constructors(&self, ctx: &ResolveSession) -> ResolveResult<Vec<Arc<CallableDescriptor>>> {
        Ok(self.primary_constructor(ctx)?.into_iter().collect())
    }

    // =========================================================================
    // Type constructor
    // =========================================================================

    pub fn type_parameters(
        &self,
        ctx: &ResolveSession,
    ) -> ResolveResult<Arc<[Arc<TypeParameterDescriptor>]>> {
        self.type_parameters.get_or_try_init(|| {
            let decls = self.info.type_parameters();
            if let Some(first) = decls.first() {
                let code = match self.kind {
                    ClassKind::EnumClass => Some(diagnostic_codes::TYPE_PARAMETERS_IN_ENUM),
                    ClassKind::Object | ClassKind::ClassObject => {
                        Some(diagnostic_codes::TYPE_PARAMETERS_IN_OBJECT)
                    }
                    _ => None,
                };
                if let Some(code) = code {
                    report(ctx.sink(), &first.anchor, code, &[self.name.as_str()]);
                }
            }
            Ok(decls
                .iter()
                .enumerate()
                .map(|(index, decl)| Arc::new(TypeParameterDescriptor::for_class(self.id, index, decl)))
                .collect())
        })
    }

    /// `Name<T1, ..., Tn>` over this class's own type parameters.
    pub fn default_type(&self, ctx: &ResolveSession) -> ResolveResult<Type> {
        self.default_type.get_or_try_init(|| {
            let args = self
                .type_parameters(ctx)?
                .iter()
                .map(|param| param.default_type())
                .collect();
            Ok(Type::class_with_args(self.id, args))
        })
    }

    pub fn supertypes(&self, ctx: &ResolveSession) -> ResolveResult<Arc<Supertypes>> {
        self.supertypes.get_or_try_init_with_post_compute(
            || self.declared_supertypes(ctx),
            || {
                trace!(class = %self.fq_name, "reentrant supertype read, using provisional empty set");
                Arc::new(Supertypes::empty())
            },
            |supertypes| self.break_cycles(ctx, supertypes),
        )
    }

    /// Supertypes before cycle breaking. Never reads another class's
    /// supertypes, so it cannot take part in a cycle of lazy reads.
    pub fn declared_supertypes(&self, ctx: &ResolveSession) -> ResolveResult<Arc<Supertypes>> {
        self.declared_supertypes
            .get_or_try_init(|| self.compute_declared_supertypes(ctx).map(Arc::new))
    }

    fn compute_declared_supertypes(&self, ctx: &ResolveSession) -> ResolveResult<Supertypes> {
        let root = ctx
            .builtins_package_name()
            .child(&Name::from(ctx.options().root_class.as_str()));
        if self.fq_name == root {
            return Ok(Supertypes::empty());
        }

        let mut resolved = Vec::new();
        let mut delegated = Vec::new();
        if !self.info.is_synthetic() {
            let entries = self.info.supertypes();
            let header = self.header_scope(ctx)?;
            let types = ctx.resolver().resolve_supertypes(ctx, &header, entries)?;
            for (entry, ty) in entries.iter().zip(types) {
                if ty.is_error() {
                    continue;
                }
                if entry.delegate.is_some() {
                    match ty.class_id() {
                        Some(id) if ctx.class(id)?.kind() == ClassKind::Interface => {
                            delegated.push(ty.clone());
                        }
                        _ => report(
                            ctx.sink(),
                            &entry.anchor,
                            diagnostic_codes::DELEGATION_NOT_TO_INTERFACE,
                            &[entry.type_ref.name.as_str()],
                        ),
                    }
                }
                resolved.push(ty);
            }
        }

        if resolved.is_empty() {
            if let Some(default) = self.default_supertype(ctx)?.filter(|ty| !ty.is_error()) {
                resolved.push(default);
            }
        }
        trace!(class = %self.fq_name, count = resolved.len(), "resolved supertypes");
        Ok(Supertypes {
            true_supertypes: Arc::from(resolved),
            cyclic_supertypes: Arc::from(Vec::new()),
            delegated: Arc::from(delegated),
        })
    }

    fn default_supertype(&self, ctx: &ResolveSession) -> ResolveResult<Option<Type>> {
        match self.kind {
            ClassKind::EnumEntry => {
                if let Some(owner) = self.container.as_class() {
                    let owner = ctx.class(owner)?;
                    if owner.kind() == ClassKind::EnumClass {
                        return owner.default_type(ctx).map(Some);
                    }
                }
                ctx.root_type().map(Some)
            }
            ClassKind::EnumClass => match ctx.builtin_class(ENUM)? {
                Some(id) => Ok(Some(Type::class(id))),
                None => ctx.root_type().map(Some),
            },
            _ => ctx.root_type().map(Some),
        }
    }

    /// Post-compute hook: move the supertypes cut by the hierarchy analysis
    /// into the cyclic list and report each of them.
    fn break_cycles(&self, ctx: &ResolveSession, supertypes: &mut Arc<Supertypes>) -> ResolveResult<()> {
        let cuts = hierarchy::cut_edges(ctx, self.id)?;
        if cuts.is_empty() {
            return Ok(());
        }
        let mut kept = Vec::new();
        let mut cyclic = Vec::new();
        for (index, ty) in supertypes.true_supertypes.iter().enumerate() {
            match ty.class_id() {
                Some(superclass) if cuts.contains(&index) => {
                    debug!(class = %self.fq_name, %superclass, "breaking inheritance cycle");
                    self.report_cycle(ctx, superclass)?;
                    cyclic.push(ty.clone());
                }
                _ => kept.push(ty.clone()),
            }
        }
        let delegated = supertypes
            .delegated
            .iter()
            .filter(|ty| !cyclic.contains(ty))
            .cloned()
            .collect::<Vec<_>>();
        *supertypes = Arc::new(Supertypes {
            true_supertypes: Arc::from(kept),
            cyclic_supertypes: Arc::from(cyclic),
            delegated: Arc::from(delegated),
        });
        Ok(())
    }

    fn report_cycle(&self, ctx: &ResolveSession, superclass: ClassId) -> ResolveResult<()> {
        let superclass = ctx.class(superclass)?;
        let anchor = self
            .info
            .supertypes()
            .iter()
            .find(|entry| &entry.type_ref.short_name() == superclass.name())
            .map_or_else(|| self.anchor(), |entry| &entry.anchor);
        report(
            ctx.sink(),
            anchor,
            diagnostic_codes::CYCLIC_INHERITANCE_HIERARCHY,
            &[self.name.as_str(), superclass.name().as_str()],
        );
        Ok(())
    }

    // =========================================================================
    // Annotations and class object
    // =========================================================================

    pub fn annotations(&self, ctx: &ResolveSession) -> ResolveResult<Arc<[AnnotationDescriptor]>> {
        self.annotations.get_or_try_init(|| {
            let annotations =
                ctx.resolver()
                    .resolve_annotations(ctx, &self.outer_scope, self.info.annotations())?;
            Ok(Arc::from(annotations))
        })
    }

    /// The class object: the first one declared, or a synthetic one for enum
    /// classes that declare none.
    pub fn class_object(&self, ctx: &ResolveSession) -> ResolveResult<Option<ClassId>> {
        self.class_object.get_or_try_init(|| {
            let declared = self.info.class_objects();
            if let Some(extra) = declared.get(1) {
                report(
                    ctx.sink(),
                    &extra.anchor,
                    diagnostic_codes::MANY_CLASS_OBJECTS,
                    &[self.name.as_str()],
                );
            }
            let info = match (declared.first(), self.info.corresponding_class_or_object()) {
                (Some(decl), _) => ClassLikeInfo::Declared(Arc::clone(decl)),
                (None, Some(owner)) if self.kind == ClassKind::EnumClass => {
                    ClassLikeInfo::SyntheticClassObject {
                        owner: Arc::clone(owner),
                    }
                }
                _ => return Ok(None),
            };
            let fq_name = self.fq_name.child(&info.name());
            let outer: ScopeRef = Arc::new(ClassRegionScope::new(self.id, ClassRegion::MemberDeclaration));
            let id = ctx.register_class(|id| {
                LazyClassDescriptor::new(ctx, id, info, Container::Class(self.id), fq_name, outer)
            });
            Ok(Some(id))
        })
    }

    // =========================================================================
    // Resolution scopes
    // =========================================================================

    /// Type parameters, then the enclosing scope.
    pub fn header_scope(&self, ctx: &ResolveSession) -> ResolveResult<ScopeRef> {
        self.header_scope.get_or_try_init(|| {
            let parameters = self.type_parameters(ctx)?.to_vec();
            let scope: ScopeRef = Arc::new(ChainedScope::new(
                format!("header scope of {}", self.fq_name),
                vec![
                    Arc::new(TypeParameterScope::new(
                        format!("type parameters of {}", self.fq_name),
                        parameters,
                    )),
                    Arc::clone(&self.outer_scope),
                ],
            ));
            Ok(scope)
        })
    }

    /// `this`, own members, the header scope, then class object members.
    pub fn member_declaration_scope(&self, ctx: &ResolveSession) -> ResolveResult<ScopeRef> {
        self.member_declaration_scope.get_or_try_init(|| {
            let mut scopes: Vec<ScopeRef> = vec![
                Arc::new(ReceiverScope::new(self.id)),
                Arc::new(MemberScopeAdapter::class(
                    self.id,
                    format!("members of {}", self.fq_name),
                )),
                self.header_scope(ctx)?,
            ];
            if let Some(class_object) = self.class_object(ctx)? {
                scopes.push(Arc::new(MemberScopeAdapter::class(
                    class_object,
                    format!("class object members of {}", self.fq_name),
                )));
            }
            let scope: ScopeRef = Arc::new(ChainedScope::new(
                format!("member declaration scope of {}", self.fq_name),
                scopes,
            ));
            Ok(scope)
        })
    }

    /// Primary constructor parameters that are not properties, over the
    /// member declaration scope.
    pub fn initializer_scope(&self, ctx: &ResolveSession) -> ResolveResult<ScopeRef> {
        self.initializer_scope.get_or_try_init(|| {
            let parameters = self
                .member_scope
                .strategy()
                .constructor_parameters(ctx)?
                .into_iter()
                .filter(|(decl, _)| !decl.is_property())
                .map(|(_, descriptor)| descriptor)
                .collect();
            let scope: ScopeRef = Arc::new(ChainedScope::new(
                format!("initializer scope of {}", self.fq_name),
                vec![
                    Arc::new(ValueParameterScope::new(
                        format!("constructor parameters of {}", self.fq_name),
                        parameters,
                    )),
                    self.member_declaration_scope(ctx)?,
                ],
            ));
            Ok(scope)
        })
    }
}

fn class_modality(kind: ClassKind, modifiers: Modifiers) -> Modality {
    if modifiers.contains(Modifiers::ABSTRACT) {
        Modality::Abstract
    } else if modifiers.contains(Modifiers::OPEN) {
        Modality::Open
    } else if modifiers.contains(Modifiers::FINAL) {
        Modality::Final
    } else if kind == ClassKind::Interface {
        Modality::Abstract
    } else {
        Modality::Final
    }
}

impl fmt::Debug for LazyClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyClassDescriptor")
            .field("id", &self.id)
            .field("fq_name", &self.fq_name)
            .field("kind", &self.kind)
            .field("modality", &self.modality)
            .field("supertypes", &self.supertypes)
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/class_descriptor_tests.rs"]
mod tests;
