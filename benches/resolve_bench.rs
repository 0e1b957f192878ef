//! Full-project force resolution benchmarks.
//!
//! Measures a cold session resolving a generated hierarchy: interfaces with
//! generic members, implementation classes with data-class synthesis, and
//! fake overrides across several levels.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use lazyres::ResolveSession;
use lazyres::common::FqName;
use lazyres::resolve::{Container, Descriptor, ResolveOptions};
use lazyres::syntax::{
    ClassDecl, Declaration, FunctionDecl, Modifiers, ParameterDecl, Project, SourceFile,
    TypeParameterDecl, TypeRef,
};
use rayon::prelude::*;

/// `depth` levels of open classes, each level with `width` siblings that all
/// extend the previous level's first class and implement a generic interface.
fn hierarchy(depth: usize, width: usize) -> Project {
    let mut declarations: Vec<Declaration> = vec![
        ClassDecl::interface("Source")
            .type_parameter(TypeParameterDecl::new("T"))
            .member(FunctionDecl::new("next").returns(TypeRef::simple("T")).without_body())
            .into(),
    ];
    for level in 0..depth {
        for sibling in 0..width {
            let mut class = ClassDecl::class(&format!("C{level}_{sibling}"))
                .open()
                .with_primary_constructor(vec![
                    ParameterDecl::new("id", TypeRef::simple("Int")).val(),
                ])
                .implements(TypeRef::generic("Source", vec![TypeRef::simple("Int")]))
                .member(
                    FunctionDecl::new("next")
                        .with_modifiers(Modifiers::OVERRIDE)
                        .returns(TypeRef::simple("Int")),
                )
                .member(
                    FunctionDecl::new(&format!("own{level}"))
                        .with_modifiers(Modifiers::OPEN)
                        .param(ParameterDecl::new("x", TypeRef::simple("String"))),
                );
            if level > 0 {
                class = class.extends(TypeRef::simple(&format!("C{}_0", level - 1)));
            }
            declarations.push(class.into());
        }
    }
    Project::new(vec![SourceFile::new("bench.kt", FqName::new("bench"), declarations)])
}

fn force_all(project: Project, parallel: bool) -> usize {
    let session = ResolveSession::new(project, ResolveOptions::default());
    let package = session
        .package(&FqName::new("bench"))
        .unwrap()
        .expect("bench package");
    if parallel {
        let members = session
            .resolve_all_members(Container::Package(package))
            .unwrap();
        members.par_iter().for_each(|member| {
            if let Descriptor::Class(_) = member {
                session.force_resolve_all(member).unwrap();
            }
        });
    }
    session.force_resolve_package(package).unwrap();
    session.class_count()
}

fn bench_force_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("force_resolve");
    for (depth, width) in [(4, 4), (8, 8), (16, 8)] {
        let id = format!("{depth}x{width}");
        group.bench_with_input(BenchmarkId::new("sequential", &id), &(depth, width), |b, &(d, w)| {
            b.iter(|| black_box(force_all(hierarchy(d, w), false)));
        });
        group.bench_with_input(BenchmarkId::new("parallel", &id), &(depth, width), |b, &(d, w)| {
            b.iter(|| black_box(force_all(hierarchy(d, w), true)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_force_resolve);
criterion_main!(benches);
