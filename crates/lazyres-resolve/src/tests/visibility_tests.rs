use super::*;
use crate::options::ResolveOptions;
use lazyres_common::{FqName, Name};
use lazyres_syntax::{
    ClassDecl, Declaration, FunctionDecl, Modifiers, Project, PropertyDecl, SourceFile, TypeRef,
    VisibilityModifier,
};

fn session(declarations: Vec<Declaration>) -> ResolveSession {
    let file = SourceFile::new("main.kt", FqName::new("demo"), declarations);
    ResolveSession::new(Project::new(vec![file]), ResolveOptions::default())
}

fn function_in(session: &ResolveSession, path: &str, name: &str) -> Arc<CallableDescriptor> {
    let id = session.find_class(path).unwrap().expect(path);
    let functions = session
        .class(id)
        .unwrap()
        .member_scope()
        .functions(session, &Name::from(name))
        .unwrap();
    Arc::clone(&functions[0])
}

fn cannot_infer(session: &ResolveSession) -> usize {
    session
        .collector()
        .unwrap()
        .count_code(diagnostic_codes::CANNOT_INFER_VISIBILITY)
}

fn open_fun(name: &str, visibility: VisibilityModifier) -> FunctionDecl {
    FunctionDecl::new(name)
        .with_modifiers(Modifiers::OPEN)
        .with_visibility(visibility)
}

#[test]
fn test_override_inherits_visibility() {
    let session = session(vec![
        ClassDecl::class("Base")
            .open()
            .member(open_fun("f", VisibilityModifier::Protected))
            .into(),
        ClassDecl::class("Derived")
            .open()
            .extends(TypeRef::simple("Base"))
            .member(FunctionDecl::new("f").with_modifiers(Modifiers::OVERRIDE))
            .into(),
        ClassDecl::class("Leaf")
            .extends(TypeRef::simple("Derived"))
            .member(FunctionDecl::new("f").with_modifiers(Modifiers::OVERRIDE))
            .into(),
    ]);
    let leaf = function_in(&session, "demo.Leaf", "f");
    assert_eq!(leaf.declared_visibility(), Visibility::Inherited);
    assert_eq!(leaf.visibility(), Visibility::Protected);
    assert_eq!(function_in(&session, "demo.Derived", "f").visibility(), Visibility::Protected);
    assert_eq!(cannot_infer(&session), 0);
}

#[test]
fn test_override_of_nothing_is_reported_once() {
    let session = session(vec![
        ClassDecl::class("Lonely")
            .member(FunctionDecl::new("f").with_modifiers(Modifiers::OVERRIDE))
            .into(),
    ]);
    let f = function_in(&session, "demo.Lonely", "f");
    assert_eq!(f.visibility(), Visibility::Public);
    function_in(&session, "demo.Lonely", "f");
    assert_eq!(cannot_infer(&session), 1);
}

#[test]
fn test_ambiguous_maximum_is_reported() {
    let session = session(vec![
        ClassDecl::interface("A")
            .member(
                FunctionDecl::new("f")
                    .with_visibility(VisibilityModifier::Protected)
                    .without_body(),
            )
            .into(),
        ClassDecl::interface("B")
            .member(
                FunctionDecl::new("f")
                    .with_visibility(VisibilityModifier::Internal)
                    .without_body(),
            )
            .into(),
        ClassDecl::class("C")
            .implements(TypeRef::simple("A"))
            .implements(TypeRef::simple("B"))
            .member(FunctionDecl::new("f").with_modifiers(Modifiers::OVERRIDE))
            .into(),
    ]);
    let f = function_in(&session, "demo.C", "f");
    assert_eq!(f.overridden().len(), 2);
    assert_eq!(f.visibility(), Visibility::Public);
    assert_eq!(cannot_infer(&session), 1);
}

#[test]
fn test_explicit_visibility_is_kept() {
    let session = session(vec![
        ClassDecl::class("Base")
            .open()
            .member(PropertyDecl::val("p", Some(TypeRef::simple("Int"))).with_modifiers(Modifiers::OPEN))
            .into(),
        ClassDecl::class("Derived")
            .extends(TypeRef::simple("Base"))
            .member(
                PropertyDecl::val("p", Some(TypeRef::simple("Int")))
                    .with_modifiers(Modifiers::OVERRIDE)
                    .with_visibility(VisibilityModifier::Internal),
            )
            .into(),
    ]);
    let id = session.find_class("demo.Derived").unwrap().unwrap();
    let p = session
        .class(id)
        .unwrap()
        .member_scope()
        .properties(&session, &Name::from("p"))
        .unwrap();
    assert_eq!(p[0].visibility(), Visibility::Internal);
    assert_eq!(cannot_infer(&session), 0);
}
