use super::*;
use crate::ids::ClassId;
use crate::options::ResolveOptions;
use crate::types::Type;
use lazyres_common::FqName;
use lazyres_syntax::{
    ClassDecl, Declaration, FunctionDecl, Project, SourceFile, TypeParameterDecl,
};

fn session(declarations: Vec<Declaration>) -> ResolveSession {
    let file = SourceFile::new("main.kt", FqName::new("demo"), declarations);
    ResolveSession::new(Project::new(vec![file]), ResolveOptions::default())
}

fn class(session: &ResolveSession, path: &str) -> ClassId {
    session.find_class(path).unwrap().expect(path)
}

#[derive(Debug)]
struct Empty;

impl Scope for Empty {
    fn label(&self) -> &str {
        "empty"
    }
}

#[test]
fn test_default_scope_is_empty() {
    let session = session(Vec::new());
    let name = Name::from("x");
    assert!(Empty.classifier(&session, &name).unwrap().is_none());
    assert!(Empty.functions(&session, &name).unwrap().is_empty());
    assert!(Empty.local_variable(&session, &name).unwrap().is_none());
    assert!(Empty.implicit_receivers_hierarchy(&session).unwrap().is_empty());
    assert!(Empty.all_descriptors(&session).unwrap().is_empty());
}

#[test]
fn test_chained_classifier_takes_first_hit() {
    let session = session(vec![ClassDecl::class("T").into()]);
    let package = session.package(&FqName::new("demo")).unwrap().unwrap();
    let param = Arc::new(crate::type_parameter::TypeParameterDescriptor::with_bounds(
        crate::types::TypeParamKey {
            owner: crate::types::TypeParamOwner::Class(ClassId(0)),
            index: 0,
        },
        &TypeParameterDecl::new("T"),
        Vec::new(),
    ));
    let params: ScopeRef = Arc::new(TypeParameterScope::new("params", vec![param]));
    let members: ScopeRef = Arc::new(MemberScopeAdapter::package(package, "demo"));

    let shadowed = ChainedScope::new("chain", vec![Arc::clone(&params), Arc::clone(&members)]);
    assert!(matches!(
        shadowed.classifier(&session, &Name::from("T")).unwrap(),
        Some(Classifier::TypeParameter(_))
    ));
    let reversed = ChainedScope::new("chain", vec![members, params]);
    assert!(matches!(
        reversed.classifier(&session, &Name::from("T")).unwrap(),
        Some(Classifier::Class(_))
    ));
    assert_eq!(reversed.delegates().len(), 2);
}

#[test]
fn test_chained_functions_are_a_union() {
    let session = session(vec![
        FunctionDecl::new("run").into(),
        ClassDecl::class("Task").member(FunctionDecl::new("run")).into(),
    ]);
    let package = session.package(&FqName::new("demo")).unwrap().unwrap();
    let task = class(&session, "demo.Task");
    let chain = ChainedScope::new(
        "chain",
        vec![
            Arc::new(MemberScopeAdapter::class(task, "task")),
            Arc::new(MemberScopeAdapter::package(package, "demo")),
        ],
    );
    let run = chain.functions(&session, &Name::from("run")).unwrap();
    assert_eq!(run.len(), 2);
    assert_eq!(run[0].container, crate::ids::Container::Class(task));
}

#[test]
fn test_value_parameter_scope() {
    let session = session(Vec::new());
    let scope = ValueParameterScope::new(
        "params",
        vec![ValueParameterDescriptor::new(Name::from("a"), 0, Type::error("?"))],
    );
    assert!(scope.local_variable(&session, &Name::from("a")).unwrap().is_some());
    assert!(scope.local_variable(&session, &Name::from("b")).unwrap().is_none());
}

#[test]
fn test_implicit_receivers_of_nested_class() {
    let session = session(vec![
        ClassDecl::class("Outer")
            .member(ClassDecl::class("Inner"))
            .into(),
    ]);
    let outer = class(&session, "demo.Outer");
    let inner = class(&session, "demo.Outer.Inner");
    let scope = session.class(inner).unwrap().member_declaration_scope(&session).unwrap();
    assert_eq!(
        scope.implicit_receivers_hierarchy(&session).unwrap(),
        vec![inner, outer]
    );
}

#[test]
fn test_class_region_scope_is_deferred() {
    let session = session(vec![
        ClassDecl::class("Box")
            .type_parameter(TypeParameterDecl::new("T"))
            .into(),
    ]);
    let boxed = class(&session, "demo.Box");
    let region = ClassRegionScope::new(boxed, ClassRegion::Header);
    assert_eq!(region.label(), "class header (deferred)");
    assert!(matches!(
        region.classifier(&session, &Name::from("T")).unwrap(),
        Some(Classifier::TypeParameter(_))
    ));
}
