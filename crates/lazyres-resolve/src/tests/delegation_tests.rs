use super::*;
use crate::class_descriptor::LazyClassDescriptor;
use crate::descriptors::Visibility;
use crate::options::ResolveOptions;
use lazyres_common::FqName;
use lazyres_syntax::{
    ClassDecl, Declaration, FunctionDecl, Modifiers, ParameterDecl, Project, PropertyDecl,
    SourceFile, TypeParameterDecl, TypeRef, VisibilityModifier,
};

fn session_with(declarations: Vec<Declaration>, options: ResolveOptions) -> ResolveSession {
    let file = SourceFile::new("main.kt", FqName::new("demo"), declarations);
    ResolveSession::new(Project::new(vec![file]), options)
}

fn class(session: &ResolveSession, path: &str) -> Arc<LazyClassDescriptor> {
    let id = session.find_class(path).unwrap().expect(path);
    session.class(id).unwrap()
}

fn printer() -> Declaration {
    ClassDecl::interface("Printer")
        .member(FunctionDecl::new("print").without_body())
        .member(
            FunctionDecl::new("hidden")
                .with_visibility(VisibilityModifier::Private),
        )
        .member(PropertyDecl::val("prefix", Some(TypeRef::simple("String"))))
        .into()
}

fn delegating() -> Declaration {
    ClassDecl::class("Console")
        .with_primary_constructor(vec![ParameterDecl::new("inner", TypeRef::simple("Printer"))])
        .delegates(TypeRef::simple("Printer"), "inner")
        .into()
}

#[test]
fn test_interface_members_are_delegated() {
    let session = session_with(vec![printer(), delegating()], ResolveOptions::default());
    let console = class(&session, "demo.Console");
    let scope = console.member_scope();

    let print = scope.functions(&session, &Name::from("print")).unwrap();
    assert_eq!(print.len(), 1);
    assert_eq!(print[0].member_kind, MemberKind::Delegation);
    assert_eq!(print[0].modality, Modality::Open);
    assert_eq!(print[0].container, Container::Class(console.id()));
    assert_eq!(print[0].overridden().len(), 1);

    let prefix = scope.properties(&session, &Name::from("prefix")).unwrap();
    assert_eq!(prefix.len(), 1);
    assert_eq!(prefix[0].member_kind, MemberKind::Delegation);

    // Private interface members are neither delegated nor fake-overridden
    // as visible members.
    let hidden = scope.functions(&session, &Name::from("hidden")).unwrap();
    assert!(hidden.iter().all(|m| m.member_kind != MemberKind::Delegation));
    assert!(hidden.iter().all(|m| m.visibility() == Visibility::InvisibleFake));
}

#[test]
fn test_declared_member_wins_over_delegation() {
    let session = session_with(
        vec![
            printer(),
            ClassDecl::class("Console")
                .with_primary_constructor(vec![ParameterDecl::new("inner", TypeRef::simple("Printer"))])
                .delegates(TypeRef::simple("Printer"), "inner")
                .member(FunctionDecl::new("print").with_modifiers(Modifiers::OVERRIDE))
                .into(),
        ],
        ResolveOptions::default(),
    );
    let console = class(&session, "demo.Console");
    let print = console.member_scope().functions(&session, &Name::from("print")).unwrap();
    assert_eq!(print.len(), 1);
    assert_eq!(print[0].member_kind, MemberKind::Declaration);
    assert_eq!(print[0].overridden().len(), 1);
    assert!(session.diagnostics().is_empty());
}

#[test]
fn test_delegated_members_are_substituted() {
    let session = session_with(
        vec![
            ClassDecl::interface("Source")
                .type_parameter(TypeParameterDecl::new("T"))
                .member(FunctionDecl::new("next").returns(TypeRef::simple("T")).without_body())
                .into(),
            ClassDecl::class("Numbers")
                .delegates(
                    TypeRef::generic("Source", vec![TypeRef::simple("Int")]),
                    "impl",
                )
                .into(),
        ],
        ResolveOptions::default(),
    );
    let numbers = class(&session, "demo.Numbers");
    let next = numbers.member_scope().functions(&session, &Name::from("next")).unwrap();
    assert_eq!(next.len(), 1);
    let int = session.builtin_class("Int").unwrap().unwrap();
    assert_eq!(next[0].return_type(&session).unwrap(), Type::class(int));
}

#[test]
fn test_delegation_can_be_disabled() {
    let options = ResolveOptions {
        generate_delegated_members: false,
        ..ResolveOptions::default()
    };
    let session = session_with(vec![printer(), delegating()], options);
    let console = class(&session, "demo.Console");
    let print = console.member_scope().functions(&session, &Name::from("print")).unwrap();
    assert_eq!(print.len(), 1);
    assert_eq!(print[0].member_kind, MemberKind::FakeOverride);
    assert_eq!(print[0].modality, Modality::Abstract);
}
