use super::*;
use crate::descriptors::{
    CallableParts, Origin, ReturnType, ValueParameterDescriptor, Visibility,
};
use crate::ids::PackageId;
use crate::options::ResolveOptions;
use crate::type_parameter::TypeParameterDescriptor;
use lazyres_common::{Anchor, FqName};
use lazyres_syntax::{
    ClassDecl, Declaration, FunctionDecl, Modifiers, ParameterDecl, Project, PropertyDecl,
    SourceFile, TypeParameterDecl, TypeRef,
};

fn session(declarations: Vec<Declaration>) -> ResolveSession {
    let file = SourceFile::new("main.kt", FqName::new("demo"), declarations);
    ResolveSession::new(Project::new(vec![file]), ResolveOptions::default())
}

fn builtin(session: &ResolveSession, name: &str) -> Type {
    Type::class(session.builtin_class(name).unwrap().expect(name))
}

fn function(name: &str, params: Vec<Type>, ret: Type) -> CallableDescriptor {
    CallableDescriptor::new(CallableParts {
        kind: CallableKind::Function,
        name: Name::from(name),
        container: Container::Package(PackageId(0)),
        member_kind: MemberKind::Declaration,
        modality: Modality::Open,
        visibility: Visibility::Public,
        type_parameters: Vec::new(),
        value_parameters: params
            .into_iter()
            .enumerate()
            .map(|(i, ty)| ValueParameterDescriptor::new(Name::from(format!("p{i}").as_str()), i, ty))
            .collect(),
        receiver: None,
        return_type: ReturnType::Resolved(ret),
        is_var: false,
        is_primary: false,
        origin: Origin::Source,
        anchor: None,
    })
}

fn generic_function(session: &ResolveSession, id: u32, bound: Option<Type>) -> CallableDescriptor {
    let key = TypeParamKey {
        owner: TypeParamOwner::Callable(crate::ids::CallableId(id)),
        index: 0,
    };
    let bounds = vec![bound.unwrap_or_else(|| session.default_bound().unwrap())];
    let param = Arc::new(TypeParameterDescriptor::with_bounds(key, &TypeParameterDecl::new("T"), bounds));
    let mut descriptor = function("f", vec![param.default_type()], builtin(session, "Unit"));
    descriptor.type_parameters = vec![param];
    descriptor
}

#[test]
fn test_parameter_types_decide_overridability() {
    let session = session(Vec::new());
    let int = builtin(&session, "Int");
    let string = builtin(&session, "String");
    let unit = builtin(&session, "Unit");

    let base = function("f", vec![int.clone()], unit.clone());
    let same = function("f", vec![int.clone()], unit.clone());
    let other = function("f", vec![string], unit.clone());
    let renamed = function("g", vec![int], unit);

    assert_eq!(is_overridable_by(&session, &base, &same).unwrap(), Overridability::Overridable);
    assert_eq!(is_overridable_by(&session, &base, &other).unwrap(), Overridability::Incompatible);
    assert_eq!(is_overridable_by(&session, &base, &renamed).unwrap(), Overridability::Incompatible);
}

#[test]
fn test_type_parameters_are_matched_by_position() {
    let session = session(Vec::new());
    let a = generic_function(&session, 1, None);
    let b = generic_function(&session, 2, None);
    assert_eq!(is_overridable_by(&session, &a, &b).unwrap(), Overridability::Overridable);

    let bounded = generic_function(&session, 3, Some(builtin(&session, "Int")));
    assert_eq!(is_overridable_by(&session, &a, &bounded).unwrap(), Overridability::Incompatible);
}

#[test]
fn test_type_parameter_count_mismatch_is_a_conflict() {
    let session = session(Vec::new());
    let generic = generic_function(&session, 1, None);
    // Same erased signature: `fun <T> f(p: T)` against `fun f(p: Any?)`.
    let plain = function(
        "f",
        vec![session.default_bound().unwrap()],
        builtin(&session, "Unit"),
    );
    assert_eq!(is_overridable_by(&session, &generic, &plain).unwrap(), Overridability::Conflict);

    let unrelated = function("f", vec![builtin(&session, "Int")], builtin(&session, "Unit"));
    assert_eq!(
        is_overridable_by(&session, &generic, &unrelated).unwrap(),
        Overridability::Incompatible
    );
}

#[test]
fn test_return_type_must_be_a_subtype() {
    let session = session(Vec::new());
    let any = builtin(&session, "Any");
    let int = builtin(&session, "Int");
    let string = builtin(&session, "String");

    let base = function("f", Vec::new(), any);
    let narrower = function("f", Vec::new(), int.clone());
    assert_eq!(check_override(&session, &base, &narrower).unwrap(), Overridability::Overridable);

    let base = function("f", Vec::new(), int);
    let wrong = function("f", Vec::new(), string);
    assert_eq!(check_override(&session, &base, &wrong).unwrap(), Overridability::Conflict);
}

#[test]
fn test_val_cannot_override_var() {
    let session = session(Vec::new());
    let int = builtin(&session, "Int");
    let mut var = function("p", Vec::new(), int.clone());
    var.kind = CallableKind::Property;
    var.is_var = true;
    let mut val = function("p", Vec::new(), int);
    val.kind = CallableKind::Property;

    assert_eq!(check_override(&session, &var, &val).unwrap(), Overridability::Conflict);
    assert_eq!(check_override(&session, &val, &var).unwrap(), Overridability::Overridable);
}

#[test]
fn test_conflicting_override_is_reported_at_declaration() {
    let anchor = Anchor::new("main.kt", 120, 8);
    let session = session(vec![
        ClassDecl::class("Base")
            .open()
            .member(
                FunctionDecl::new("f")
                    .with_modifiers(Modifiers::OPEN)
                    .returns(TypeRef::simple("Int")),
            )
            .into(),
        ClassDecl::class("Derived")
            .extends(TypeRef::simple("Base"))
            .member(
                FunctionDecl::new("f")
                    .with_modifiers(Modifiers::OVERRIDE)
                    .returns(TypeRef::simple("String"))
                    .at(anchor),
            )
            .into(),
    ]);
    let derived = session.find_class("demo.Derived").unwrap().unwrap();
    let f = session
        .class(derived)
        .unwrap()
        .member_scope()
        .functions(&session, &Name::from("f"))
        .unwrap();
    assert_eq!(f.len(), 1);

    let conflicts: Vec<_> = session
        .diagnostics()
        .into_iter()
        .filter(|d| d.code == diagnostic_codes::CONFLICTING_OVERLOADS)
        .collect();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].start, 120);
    assert_eq!(conflicts[0].message_text, "Conflicting overloads: 'f' in 'Derived'.");
}

#[test]
fn test_diamond_collapses_into_one_fake_override() {
    let session = session(vec![
        ClassDecl::interface("A")
            .member(FunctionDecl::new("f").without_body())
            .into(),
        ClassDecl::interface("B")
            .member(FunctionDecl::new("f").returns(TypeRef::simple("Unit")))
            .into(),
        ClassDecl::interface("C")
            .implements(TypeRef::simple("A"))
            .implements(TypeRef::simple("B"))
            .into(),
    ]);
    let c = session.find_class("demo.C").unwrap().unwrap();
    let f = session
        .class(c)
        .unwrap()
        .member_scope()
        .functions(&session, &Name::from("f"))
        .unwrap();
    assert_eq!(f.len(), 1);
    assert_eq!(f[0].member_kind, MemberKind::FakeOverride);
    assert_eq!(f[0].overridden().len(), 2);
    // One open, one abstract: the fake override is open.
    assert_eq!(f[0].modality, Modality::Open);
}

#[test]
fn test_incompatible_inherited_overloads_stay_separate() {
    let session = session(vec![
        ClassDecl::interface("A")
            .member(
                FunctionDecl::new("f")
                    .param(ParameterDecl::new("x", TypeRef::simple("Int")))
                    .without_body(),
            )
            .into(),
        ClassDecl::interface("B")
            .member(
                FunctionDecl::new("f")
                    .param(ParameterDecl::new("x", TypeRef::simple("String")))
                    .without_body(),
            )
            .into(),
        ClassDecl::interface("C")
            .implements(TypeRef::simple("A"))
            .implements(TypeRef::simple("B"))
            .into(),
    ]);
    let c = session.find_class("demo.C").unwrap().unwrap();
    let f = session
        .class(c)
        .unwrap()
        .member_scope()
        .functions(&session, &Name::from("f"))
        .unwrap();
    assert_eq!(f.len(), 2);
    assert!(session.diagnostics().is_empty());
}

#[test]
fn test_most_specific_property_type_wins() {
    let session = session(vec![
        ClassDecl::interface("A")
            .member(PropertyDecl::val("p", Some(TypeRef::simple("Any"))))
            .into(),
        ClassDecl::interface("B")
            .member(PropertyDecl::val("p", Some(TypeRef::simple("Int"))))
            .into(),
        ClassDecl::interface("C")
            .implements(TypeRef::simple("A"))
            .implements(TypeRef::simple("B"))
            .into(),
    ]);
    let c = session.find_class("demo.C").unwrap().unwrap();
    let p = session
        .class(c)
        .unwrap()
        .member_scope()
        .properties(&session, &Name::from("p"))
        .unwrap();
    // Property signatures ignore the type, so both collapse into one.
    assert_eq!(p.len(), 1);
    let int = session.builtin_class("Int").unwrap().unwrap();
    assert_eq!(p[0].return_type(&session).unwrap(), Type::class(int));
}
