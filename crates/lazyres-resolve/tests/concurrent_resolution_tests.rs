//! Concurrent readers of one session: every lazy part is computed at most
//! once and every reader sees the same descriptor.

use lazyres_common::diagnostics::diagnostic_codes;
use lazyres_common::{Anchor, FqName, Name};
use lazyres_resolve::{
    AnnotationDescriptor, BasicDescriptorResolver, CallableDescriptor, ClassId,
    CollectingDiagnosticSink, Container, DescriptorResolver, DiagnosticSink, ResolveOptions,
    ResolveResult, ResolveSession, ScopeRef, Type, ValueParameterDescriptor,
};
use lazyres_syntax::builtins;
use lazyres_syntax::{
    AnnotationEntry, ClassDecl, Declaration, FileBasedDeclarationProviderFactory, FunctionDecl,
    Modifiers, ParameterDecl, Project, PropertyDecl, SourceFile, SuperTypeEntry, TypeRef,
};
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::mpsc;
use std::sync::{Arc, Barrier, Mutex};
use std::thread;
use std::time::Duration;

const CLASSES: usize = 16;
const FUNCTIONS: usize = 6;

/// Counts how often each member is resolved, then defers to the basic resolver.
#[derive(Default)]
struct CountingResolver {
    inner: BasicDescriptorResolver,
    functions: Mutex<HashMap<(Container, Name), usize>>,
    constructors: Mutex<HashMap<ClassId, usize>>,
    /// Widens the window in which two threads resolve supertypes together.
    supertype_delay: Duration,
}

impl CountingResolver {
    fn function_counts(&self) -> HashMap<(Container, Name), usize> {
        self.functions.lock().unwrap().clone()
    }
}

impl DescriptorResolver for CountingResolver {
    fn resolve_function(
        &self,
        ctx: &ResolveSession,
        scope: &ScopeRef,
        container: Container,
        decl: &FunctionDecl,
    ) -> ResolveResult<Arc<CallableDescriptor>> {
        *self
            .functions
            .lock()
            .unwrap()
            .entry((container, decl.name.clone()))
            .or_default() += 1;
        self.inner.resolve_function(ctx, scope, container, decl)
    }

    fn resolve_property(
        &self,
        ctx: &ResolveSession,
        scope: &ScopeRef,
        container: Container,
        decl: &PropertyDecl,
    ) -> ResolveResult<Arc<CallableDescriptor>> {
        self.inner.resolve_property(ctx, scope, container, decl)
    }

    fn resolve_primary_constructor(
        &self,
        ctx: &ResolveSession,
        class: ClassId,
        scope: &ScopeRef,
        parameters: &[ParameterDecl],
        anchor: &Anchor,
    ) -> ResolveResult<Arc<CallableDescriptor>> {
        *self.constructors.lock().unwrap().entry(class).or_default() += 1;
        self.inner
            .resolve_primary_constructor(ctx, class, scope, parameters, anchor)
    }

    fn resolve_constructor_parameter_to_property(
        &self,
        ctx: &ResolveSession,
        class: ClassId,
        decl: &ParameterDecl,
        parameter: &ValueParameterDescriptor,
        index: usize,
    ) -> ResolveResult<Arc<CallableDescriptor>> {
        self.inner
            .resolve_constructor_parameter_to_property(ctx, class, decl, parameter, index)
    }

    fn resolve_supertypes(
        &self,
        ctx: &ResolveSession,
        scope: &ScopeRef,
        entries: &[SuperTypeEntry],
    ) -> ResolveResult<Vec<Type>> {
        thread::sleep(self.supertype_delay);
        self.inner.resolve_supertypes(ctx, scope, entries)
    }

    fn resolve_type(&self, ctx: &ResolveSession, scope: &ScopeRef, type_ref: &TypeRef) -> ResolveResult<Type> {
        self.inner.resolve_type(ctx, scope, type_ref)
    }

    fn resolve_annotations(
        &self,
        ctx: &ResolveSession,
        scope: &ScopeRef,
        entries: &[AnnotationEntry],
    ) -> ResolveResult<Vec<AnnotationDescriptor>> {
        self.inner.resolve_annotations(ctx, scope, entries)
    }
}

/// `interface Base { fun shared() }` plus `CLASSES` implementations, each
/// with `FUNCTIONS` own functions; `f0` refers to an unknown type.
fn declarations() -> Vec<Declaration> {
    let mut declarations: Vec<Declaration> = vec![
        ClassDecl::interface("Base")
            .member(FunctionDecl::new("shared").without_body())
            .into(),
    ];
    for i in 0..CLASSES {
        let mut class = ClassDecl::class(&format!("Impl{i}"))
            .with_primary_constructor(vec![ParameterDecl::new("id", TypeRef::simple("Int")).val()])
            .implements(TypeRef::simple("Base"))
            .member(FunctionDecl::new("shared").with_modifiers(Modifiers::OVERRIDE));
        for f in 0..FUNCTIONS {
            let param = if f == 0 { "Unknown" } else { "Int" };
            class = class.member(
                FunctionDecl::new(&format!("f{f}")).param(ParameterDecl::new("x", TypeRef::simple(param))),
            );
        }
        declarations.push(class.into());
    }
    declarations
}

fn counting_session() -> (ResolveSession, Arc<CountingResolver>, Arc<CollectingDiagnosticSink>) {
    counting_session_with(declarations(), Duration::ZERO)
}

fn counting_session_with(
    declarations: Vec<Declaration>,
    supertype_delay: Duration,
) -> (ResolveSession, Arc<CountingResolver>, Arc<CollectingDiagnosticSink>) {
    let options = ResolveOptions::default();
    let mut project = Project::new(vec![SourceFile::new(
        "impls.kt",
        FqName::new("demo"),
        declarations,
    )]);
    project.push_file(builtins::prelude(&FqName::new(&options.builtins_package)));

    let resolver = Arc::new(CountingResolver {
        supertype_delay,
        ..CountingResolver::default()
    });
    let sink = Arc::new(CollectingDiagnosticSink::new());
    let session = ResolveSession::with_collaborators(
        options,
        Arc::new(FileBasedDeclarationProviderFactory::new(&project)),
        Arc::clone(&resolver) as Arc<dyn DescriptorResolver>,
        Arc::clone(&sink) as Arc<dyn DiagnosticSink>,
    );
    (session, resolver, sink)
}

fn impl_ids(ctx: &ResolveSession) -> Vec<ClassId> {
    (0..CLASSES)
        .map(|i| ctx.find_class(&format!("demo.Impl{i}")).unwrap().unwrap())
        .collect()
}

#[test]
fn test_member_functions_resolved_at_most_once() {
    let (ctx, resolver, _sink) = counting_session();
    let classes = impl_ids(&ctx);

    let lookups: Vec<(ClassId, Name)> = (0..8)
        .flat_map(|_| {
            classes.iter().flat_map(|class| {
                (0..FUNCTIONS).map(move |f| (*class, Name::from(format!("f{f}").as_str())))
            })
        })
        .collect();
    let results: Vec<((ClassId, Name), Arc<CallableDescriptor>)> = lookups
        .into_par_iter()
        .map(|(class, name)| {
            let found = ctx
                .resolve_functions(Container::Class(class), &name)
                .unwrap();
            assert_eq!(found.len(), 1);
            ((class, name), Arc::clone(&found[0]))
        })
        .collect();

    let mut first_seen: HashMap<(ClassId, Name), Arc<CallableDescriptor>> = HashMap::new();
    for (key, descriptor) in results {
        let first = first_seen.entry(key).or_insert_with(|| Arc::clone(&descriptor));
        assert!(Arc::ptr_eq(first, &descriptor));
    }

    let counts = resolver.function_counts();
    for class in &classes {
        for f in 0..FUNCTIONS {
            let key = (Container::Class(*class), Name::from(format!("f{f}").as_str()));
            assert_eq!(counts.get(&key), Some(&1), "{key:?}");
        }
    }
}

#[test]
fn test_concurrent_diagnostics_reported_once() {
    let (ctx, _resolver, sink) = counting_session();
    let classes = impl_ids(&ctx);
    (0..4).into_par_iter().for_each(|_| {
        classes.par_iter().for_each(|class| {
            ctx.resolve_functions(Container::Class(*class), &Name::from("f0"))
                .unwrap();
        });
    });
    assert_eq!(sink.count_code(diagnostic_codes::UNRESOLVED_REFERENCE), CLASSES);
    assert_eq!(sink.len(), CLASSES);
}

#[test]
fn test_concurrent_headers_and_inherited_members() {
    let (ctx, resolver, sink) = counting_session();
    let classes = impl_ids(&ctx);

    let per_thread: Vec<Vec<String>> = (0..8)
        .into_par_iter()
        .map(|_| {
            classes
                .par_iter()
                .map(|class| {
                    let descriptor = ctx.class(*class).unwrap();
                    let supertypes = descriptor.supertypes(&ctx).unwrap();
                    assert_eq!(supertypes.true_supertypes.len(), 1);
                    let shared = ctx
                        .resolve_functions(Container::Class(*class), &Name::from("shared"))
                        .unwrap();
                    assert_eq!(shared.len(), 1);
                    assert_eq!(shared[0].overridden().len(), 1);
                    descriptor.constructors(&ctx).unwrap();
                    lazyres_resolve::render_callable(&ctx, &shared[0]).unwrap()
                })
                .collect()
        })
        .collect();

    for rendered in &per_thread {
        assert_eq!(rendered, &per_thread[0]);
    }
    assert!(per_thread[0].iter().all(|r| r == "public open fun shared(): Unit"));

    let constructors = resolver.constructors.lock().unwrap();
    assert_eq!(constructors.len(), CLASSES);
    assert!(constructors.values().all(|count| *count == 1));
    assert_eq!(sink.count_code(diagnostic_codes::CYCLIC_INHERITANCE_HIERARCHY), 0);
}

#[test]
fn test_parallel_force_matches_sequential() {
    let (parallel, _, parallel_sink) = counting_session();
    let classes = impl_ids(&parallel);
    classes.par_iter().for_each(|class| {
        parallel
            .force_resolve_all(&lazyres_resolve::Descriptor::Class(*class))
            .unwrap();
    });

    let (sequential, _, sequential_sink) = counting_session();
    for class in impl_ids(&sequential) {
        sequential
            .force_resolve_all(&lazyres_resolve::Descriptor::Class(class))
            .unwrap();
    }
    assert_eq!(parallel_sink.sorted(), sequential_sink.sorted());
}

#[test]
fn test_cycle_resolved_from_both_ends_on_two_threads() {
    let (ctx, _resolver, sink) = counting_session_with(
        vec![
            ClassDecl::class("A").extends(TypeRef::simple("B")).into(),
            ClassDecl::class("B").extends(TypeRef::simple("A")).into(),
        ],
        Duration::from_millis(50),
    );
    let ctx = Arc::new(ctx);
    let a = ctx.find_class("demo.A").unwrap().unwrap();
    let b = ctx.find_class("demo.B").unwrap().unwrap();
    let start = Arc::new(Barrier::new(2));
    let (done, finished) = mpsc::channel();

    for class in [a, b] {
        let ctx = Arc::clone(&ctx);
        let start = Arc::clone(&start);
        let done = done.clone();
        thread::spawn(move || {
            start.wait();
            let supertypes = ctx.class(class).unwrap().supertypes(&ctx).unwrap();
            let counts = (
                supertypes.true_supertypes.len(),
                supertypes.cyclic_supertypes.len(),
            );
            done.send((class, counts)).unwrap();
        });
    }

    let mut results = HashMap::new();
    for _ in 0..2 {
        let (class, counts) = finished
            .recv_timeout(Duration::from_secs(10))
            .expect("both sides of the cycle finish");
        results.insert(class, counts);
    }
    assert_eq!(results[&a], (0, 1));
    assert_eq!(results[&b], (1, 0));
    assert_eq!(sink.count_code(diagnostic_codes::CYCLIC_INHERITANCE_HIERARCHY), 1);
}
