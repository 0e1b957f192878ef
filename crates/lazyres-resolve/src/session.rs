//! The resolution session.
//!
//! A [`ResolveSession`] owns the descriptor arenas and the external
//! collaborators (declaration providers, descriptor resolver, diagnostic
//! sink). It is passed explicitly to every resolution call; nothing in the
//! engine reaches for ambient state.
//!
//! ## Usage
//!
//! ```ignore
//! let session = ResolveSession::new(project, ResolveOptions::default());
//! let point = session.find_class("demo.Point")?.expect("declared");
//! let members = session.resolve_all_members(Container::Class(point))?;
//! ```

use crate::class_descriptor::LazyClassDescriptor;
use crate::descriptors::Descriptor;
use crate::diagnostics::{CollectingDiagnosticSink, DiagnosticSink};
use crate::error::{ResolveError, ResolveResult};
use crate::force_resolve;
use crate::ids::{CallableId, ClassId, Container, PackageId};
use crate::member_scope::CallableSet;
use crate::options::ResolveOptions;
use crate::package::PackageDescriptor;
use crate::resolver::{BasicDescriptorResolver, DescriptorResolver};
use crate::types::Type;
use dashmap::DashMap;
use lazyres_common::{Diagnostic, FqName, Name};
use lazyres_storage::MemoizedFunction;
use lazyres_syntax::builtins::{self, NOTHING};
use lazyres_syntax::{DeclarationProviderFactory, FileBasedDeclarationProviderFactory, Project};
use rustc_hash::FxBuildHasher;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::{debug, trace};

pub struct ResolveSession {
    options: ResolveOptions,
    builtins_package: FqName,
    providers: Arc<dyn DeclarationProviderFactory>,
    resolver: Arc<dyn DescriptorResolver>,
    sink: Arc<dyn DiagnosticSink>,
    /// Set when the session owns an in-memory sink.
    collector: Option<Arc<CollectingDiagnosticSink>>,

    classes: DashMap<ClassId, Arc<LazyClassDescriptor>, FxBuildHasher>,
    packages: DashMap<PackageId, Arc<PackageDescriptor>, FxBuildHasher>,
    package_ids: MemoizedFunction<FqName, Option<PackageId>>,
    /// Supertype indices cut per class, filled one cyclic component at a time.
    cycle_cuts: DashMap<ClassId, Arc<[usize]>, FxBuildHasher>,

    next_class_id: AtomicU32,
    next_package_id: AtomicU32,
    next_callable_id: AtomicU32,
}

impl ResolveSession {
    /// Session over an in-memory project with the basic resolver and a
    /// collecting sink. The builtin prelude is added unless the project
    /// already declares the builtins package or injection is disabled.
    pub fn new(mut project: Project, options: ResolveOptions) -> Self {
        let builtins_package = FqName::new(&options.builtins_package);
        if options.inject_builtins && !project.packages().contains(&builtins_package) {
            debug!(package = %builtins_package, "injecting builtin prelude");
            project.push_file(builtins::prelude(&builtins_package));
        }
        let providers = Arc::new(FileBasedDeclarationProviderFactory::new(&project));
        let collector = Arc::new(CollectingDiagnosticSink::new());
        let mut session = Self::with_collaborators(
            options,
            providers,
            Arc::new(BasicDescriptorResolver::new()),
            Arc::clone(&collector) as Arc<dyn DiagnosticSink>,
        );
        session.collector = Some(collector);
        session
    }

    /// Session with caller-supplied collaborators.
    pub fn with_collaborators(
        options: ResolveOptions,
        providers: Arc<dyn DeclarationProviderFactory>,
        resolver: Arc<dyn DescriptorResolver>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        let builtins_package = FqName::new(&options.builtins_package);
        Self {
            options,
            builtins_package,
            providers,
            resolver,
            sink,
            collector: None,
            classes: DashMap::with_hasher(FxBuildHasher),
            packages: DashMap::with_hasher(FxBuildHasher),
            package_ids: MemoizedFunction::new(),
            cycle_cuts: DashMap::with_hasher(FxBuildHasher),
            next_class_id: AtomicU32::new(0),
            next_package_id: AtomicU32::new(0),
            next_callable_id: AtomicU32::new(0),
        }
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    pub fn resolver(&self) -> &dyn DescriptorResolver {
        self.resolver.as_ref()
    }

    pub fn sink(&self) -> &dyn DiagnosticSink {
        self.sink.as_ref()
    }

    pub fn providers(&self) -> &dyn DeclarationProviderFactory {
        self.providers.as_ref()
    }

    pub fn builtins_package_name(&self) -> &FqName {
        &self.builtins_package
    }

    /// The in-memory sink, when the session was built with [`ResolveSession::new`].
    pub fn collector(&self) -> Option<&Arc<CollectingDiagnosticSink>> {
        self.collector.as_ref()
    }

    /// Diagnostics reported so far, sorted by position. Empty when the
    /// session reports into a caller-supplied sink.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.collector
            .as_ref()
            .map(|collector| collector.sorted())
            .unwrap_or_default()
    }

    // =========================================================================
    // Arenas
    // =========================================================================

    pub fn class(&self, id: ClassId) -> ResolveResult<Arc<LazyClassDescriptor>> {
        self.classes
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| ResolveError::MissingDescriptor(id.to_string()))
    }

    pub fn package_descriptor(&self, id: PackageId) -> ResolveResult<Arc<PackageDescriptor>> {
        self.packages
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| ResolveError::MissingDescriptor(id.to_string()))
    }

    /// Number of class descriptors created so far.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub(crate) fn cycle_cuts(&self) -> &DashMap<ClassId, Arc<[usize]>, FxBuildHasher> {
        &self.cycle_cuts
    }

    /// The package named `fq_name`, created on first request. `None` when no
    /// file declares the package.
    pub fn package(&self, fq_name: &FqName) -> ResolveResult<Option<PackageId>> {
        self.package_ids.get_or_try_compute(fq_name, |fq_name| {
            let Some(provider) = self.providers.package_provider(fq_name) else {
                return Ok(None);
            };
            let id = PackageId(self.next_package_id.fetch_add(1, Ordering::SeqCst));
            trace!(package_id = %id, package = %fq_name, "registering package");
            let descriptor = PackageDescriptor::new(id, fq_name.clone(), provider);
            self.packages.insert(id, Arc::new(descriptor));
            Ok(Some(id))
        })
    }

    pub(crate) fn register_class(
        &self,
        build: impl FnOnce(ClassId) -> LazyClassDescriptor,
    ) -> ClassId {
        let id = ClassId(self.next_class_id.fetch_add(1, Ordering::SeqCst));
        let descriptor = build(id);
        trace!(class_id = %id, class = %descriptor.fq_name(), "registering class");
        self.classes.insert(id, Arc::new(descriptor));
        id
    }

    pub(crate) fn next_callable_id(&self) -> CallableId {
        CallableId(self.next_callable_id.fetch_add(1, Ordering::SeqCst))
    }

    // =========================================================================
    // Builtins
    // =========================================================================

    /// A class of the builtins package by short name.
    pub fn builtin_class(&self, name: &str) -> ResolveResult<Option<ClassId>> {
        let Some(package) = self.package(&self.builtins_package)? else {
            return Ok(None);
        };
        self.package_descriptor(package)?
            .member_scope()
            .classifier(self, &Name::from(name))
    }

    /// The root type every class implicitly extends.
    pub fn root_type(&self) -> ResolveResult<Type> {
        Ok(match self.builtin_class(&self.options.root_class)? {
            Some(id) => Type::class(id),
            None => Type::error(&self.options.root_class),
        })
    }

    /// Upper bound of a type parameter declared without one.
    pub fn default_bound(&self) -> ResolveResult<Type> {
        Ok(self.root_type()?.with_nullability(true))
    }

    pub fn is_root_class(&self, id: ClassId) -> ResolveResult<bool> {
        self.is_builtin(id, &self.options.root_class)
    }

    pub fn is_nothing_class(&self, id: ClassId) -> ResolveResult<bool> {
        self.is_builtin(id, NOTHING)
    }

    fn is_builtin(&self, id: ClassId, name: &str) -> ResolveResult<bool> {
        let expected = self.builtins_package.child(&Name::from(name));
        Ok(self.class(id)?.fq_name() == &expected)
    }

    // =========================================================================
    // Lookup entry points
    // =========================================================================

    /// Find a class by dotted path, e.g. `demo.Outer.Inner`. Longer package
    /// prefixes win.
    pub fn find_class(&self, path: &str) -> ResolveResult<Option<ClassId>> {
        let segments: Vec<&str> = path.split('.').filter(|s| !s.is_empty()).collect();
        for split in (0..segments.len()).rev() {
            let package_name = if split == 0 {
                FqName::root()
            } else {
                FqName::new(&segments[..split].join("."))
            };
            let Some(package) = self.package(&package_name)? else {
                continue;
            };
            let mut current = self
                .package_descriptor(package)?
                .member_scope()
                .classifier(self, &Name::from(segments[split]))?;
            for segment in &segments[split + 1..] {
                current = match current {
                    Some(class) => self
                        .class(class)?
                        .member_scope()
                        .classifier(self, &Name::from(*segment))?,
                    None => None,
                };
            }
            if current.is_some() {
                return Ok(current);
            }
        }
        Ok(None)
    }

    pub fn resolve_classifier(&self, container: Container, name: &Name) -> ResolveResult<Option<ClassId>> {
        match container {
            Container::Package(id) => self.package_descriptor(id)?.member_scope().classifier(self, name),
            Container::Class(id) => self.class(id)?.member_scope().classifier(self, name),
        }
    }

    pub fn resolve_functions(&self, container: Container, name: &Name) -> ResolveResult<CallableSet> {
        match container {
            Container::Package(id) => self.package_descriptor(id)?.member_scope().functions(self, name),
            Container::Class(id) => self.class(id)?.member_scope().functions(self, name),
        }
    }

    pub fn resolve_properties(&self, container: Container, name: &Name) -> ResolveResult<CallableSet> {
        match container {
            Container::Package(id) => self.package_descriptor(id)?.member_scope().properties(self, name),
            Container::Class(id) => self.class(id)?.member_scope().properties(self, name),
        }
    }

    pub fn resolve_all_members(&self, container: Container) -> ResolveResult<Vec<Descriptor>> {
        match container {
            Container::Package(id) => self.package_descriptor(id)?.member_scope().all_descriptors(self),
            Container::Class(id) => self.class(id)?.member_scope().all_descriptors(self),
        }
    }

    /// Acyclic supertypes of `class`.
    pub fn resolve_supertypes(&self, class: ClassId) -> ResolveResult<Arc<[Type]>> {
        Ok(Arc::clone(&self.class(class)?.supertypes(self)?.true_supertypes))
    }

    /// Force every lazy part reachable from `descriptor`.
    pub fn force_resolve_all(&self, descriptor: &Descriptor) -> ResolveResult<()> {
        force_resolve::force_resolve_all(self, descriptor)
    }

    /// Force every declaration of a package and everything reachable from it.
    pub fn force_resolve_package(&self, package: PackageId) -> ResolveResult<()> {
        force_resolve::force_resolve_package(self, package)
    }
}

impl fmt::Debug for ResolveSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolveSession")
            .field("options", &self.options)
            .field("classes", &self.classes.len())
            .field("packages", &self.packages.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
