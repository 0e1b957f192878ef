use super::*;
use crate::descriptors::Descriptor;
use crate::options::ResolveOptions;
use crate::render::{render_callable, render_type};
use lazyres_common::{Anchor, FqName};
use lazyres_syntax::{ClassDecl, Declaration, Project, SourceFile};

fn session(declarations: Vec<Declaration>) -> ResolveSession {
    let file = SourceFile::new("main.kt", FqName::new("demo"), declarations);
    ResolveSession::new(Project::new(vec![file]), ResolveOptions::default())
}

fn file_scope(ctx: &ResolveSession) -> ScopeRef {
    let id = ctx.package(&FqName::new("demo")).unwrap().unwrap();
    ctx.package_descriptor(id).unwrap().file_scope(ctx).unwrap()
}

fn resolve(ctx: &ResolveSession, type_ref: TypeRef) -> Type {
    ctx.resolver()
        .resolve_type(ctx, &file_scope(ctx), &type_ref)
        .unwrap()
}

fn function(ctx: &ResolveSession, container: Container, name: &str) -> Arc<CallableDescriptor> {
    let found = ctx.resolve_functions(container, &Name::from(name)).unwrap();
    assert_eq!(found.len(), 1, "expected one function named {name}");
    Arc::clone(&found[0])
}

fn container_of(ctx: &ResolveSession, path: &str) -> Container {
    Container::Class(ctx.find_class(path).unwrap().expect(path))
}

#[test]
fn test_resolves_builtin_and_local_classes() {
    let ctx = session(vec![ClassDecl::class("Local").into()]);
    let int = resolve(&ctx, TypeRef::simple("Int"));
    assert_eq!(int.class_id(), ctx.builtin_class("Int").unwrap());
    let local = resolve(&ctx, TypeRef::simple("Local").nullable());
    assert_eq!(local.class_id(), ctx.find_class("demo.Local").unwrap());
    assert!(local.is_nullable());
    assert!(ctx.diagnostics().is_empty());
}

#[test]
fn test_resolves_dotted_nested_class() {
    let ctx = session(vec![
        ClassDecl::class("Outer")
            .member(ClassDecl::class("Inner"))
            .into(),
    ]);
    let inner = resolve(&ctx, TypeRef::simple("Outer.Inner"));
    assert_eq!(inner.class_id(), ctx.find_class("demo.Outer.Inner").unwrap());
    let missing = resolve(&ctx, TypeRef::simple("Outer.Missing"));
    assert!(missing.is_error());
}

#[test]
fn test_unresolved_reference_is_reported() {
    let ctx = session(Vec::new());
    let ty = resolve(
        &ctx,
        TypeRef::simple("Missing").at(Anchor::new("main.kt", 7, 7)),
    );
    assert!(ty.is_error());
    assert_eq!(render_type(&ctx, &ty).unwrap(), "[ERROR : Missing]");

    let diagnostics = ctx.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, diagnostic_codes::UNRESOLVED_REFERENCE);
    assert_eq!(diagnostics[0].start, 7);
    assert_eq!(diagnostics[0].message_text, "Unresolved reference: 'Missing'.");
}

#[test]
fn test_wrong_argument_count_pads_with_errors() {
    let ctx = session(Vec::new());
    let ty = resolve(&ctx, TypeRef::simple("Array"));
    assert_eq!(render_type(&ctx, &ty).unwrap(), "Array<[ERROR : Array]>");

    let diagnostics = ctx.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, diagnostic_codes::WRONG_NUMBER_OF_TYPE_ARGUMENTS);
    assert_eq!(diagnostics[0].message_text, "1 type arguments expected for 'Array'.");
}

#[test]
fn test_extra_arguments_are_truncated() {
    let ctx = session(Vec::new());
    let ty = resolve(
        &ctx,
        TypeRef::generic("Int", vec![TypeRef::simple("String")]),
    );
    assert_eq!(render_type(&ctx, &ty).unwrap(), "Int");
    assert_eq!(ctx.diagnostics()[0].message_text, "0 type arguments expected for 'Int'.");
}

#[test]
fn test_type_parameter_with_arguments_is_reported() {
    let ctx = session(vec![
        FunctionDecl::new("f")
            .type_parameter(TypeParameterDecl::new("T"))
            .param(ParameterDecl::new(
                "x",
                TypeRef::generic("T", vec![TypeRef::simple("Int")]),
            ))
            .into(),
    ]);
    let package = Container::Package(ctx.package(&FqName::new("demo")).unwrap().unwrap());
    let f = function(&ctx, package, "f");
    assert!(matches!(f.value_parameters[0].ty, Type::Parameter { .. }));
    assert_eq!(ctx.diagnostics()[0].message_text, "0 type arguments expected for 'T'.");
}

#[test]
fn test_function_defaults() {
    let ctx = session(vec![
        FunctionDecl::new("log")
            .param(ParameterDecl::new("message", TypeRef::simple("String")).with_default())
            .into(),
    ]);
    let package = Container::Package(ctx.package(&FqName::new("demo")).unwrap().unwrap());
    let log = function(&ctx, package, "log");
    assert_eq!(log.kind, CallableKind::Function);
    assert_eq!(log.origin, Origin::Source);
    assert_eq!(log.value_parameters[0].default, DefaultValue::Declared);
    assert_eq!(
        render_callable(&ctx, &log).unwrap(),
        "public final fun log(message: String = ...): Unit"
    );
}

#[test]
fn test_function_type_parameter_bounds_see_each_other() {
    let ctx = session(vec![
        FunctionDecl::new("pick")
            .type_parameter(TypeParameterDecl::new("T"))
            .type_parameter(TypeParameterDecl::new("R").bounded(TypeRef::simple("T")))
            .param(ParameterDecl::new("value", TypeRef::simple("R")))
            .returns(TypeRef::simple("T"))
            .into(),
    ]);
    let package = Container::Package(ctx.package(&FqName::new("demo")).unwrap().unwrap());
    let pick = function(&ctx, package, "pick");
    assert_eq!(pick.type_parameters.len(), 2);

    let t = pick.type_parameters[0].upper_bounds(&ctx).unwrap();
    assert_eq!(t.as_ref(), &[ctx.default_bound().unwrap()]);
    let r = pick.type_parameters[1].upper_bounds(&ctx).unwrap();
    assert_eq!(r.as_ref(), &[pick.type_parameters[0].default_type()]);
    assert_eq!(
        pick.return_type(&ctx).unwrap(),
        pick.type_parameters[0].default_type()
    );
    assert_eq!(pick.value_parameters[0].ty, pick.type_parameters[1].default_type());
    assert!(ctx.diagnostics().is_empty());
}

#[test]
fn test_interface_member_modality() {
    let ctx = session(vec![
        ClassDecl::interface("Shape")
            .member(FunctionDecl::new("area").returns(TypeRef::simple("Double")).without_body())
            .member(FunctionDecl::new("describe").returns(TypeRef::simple("String")))
            .member(PropertyDecl::val("sides", Some(TypeRef::simple("Int"))))
            .member(PropertyDecl::val("name", None))
            .into(),
    ]);
    let shape = container_of(&ctx, "demo.Shape");
    assert_eq!(function(&ctx, shape, "area").modality, Modality::Abstract);
    assert_eq!(function(&ctx, shape, "describe").modality, Modality::Open);

    let sides = ctx.resolve_properties(shape, &Name::from("sides")).unwrap();
    assert_eq!(sides[0].modality, Modality::Abstract);
    let name = ctx.resolve_properties(shape, &Name::from("name")).unwrap();
    assert_eq!(name[0].modality, Modality::Open);
}

#[test]
fn test_class_member_modality_and_visibility() {
    let ctx = session(vec![
        ClassDecl::class("Base")
            .open()
            .member(FunctionDecl::new("plain"))
            .member(FunctionDecl::new("hook").with_modifiers(Modifiers::OPEN))
            .member(
                FunctionDecl::new("secret")
                    .with_visibility(VisibilityModifier::Private),
            )
            .into(),
    ]);
    let base = container_of(&ctx, "demo.Base");
    let plain = function(&ctx, base, "plain");
    assert_eq!(plain.modality, Modality::Final);
    assert_eq!(plain.visibility(), Visibility::Public);
    assert_eq!(function(&ctx, base, "hook").modality, Modality::Open);
    assert_eq!(function(&ctx, base, "secret").visibility(), Visibility::Private);
}

#[test]
fn test_member_visibility_mapping() {
    assert_eq!(member_visibility(None, Modifiers::empty()), Visibility::Public);
    assert_eq!(member_visibility(None, Modifiers::OVERRIDE), Visibility::Inherited);
    assert_eq!(
        member_visibility(Some(VisibilityModifier::Internal), Modifiers::OVERRIDE),
        Visibility::Internal
    );
    assert_eq!(
        member_visibility(Some(VisibilityModifier::Protected), Modifiers::empty()),
        Visibility::Protected
    );
}

#[test]
fn test_untyped_property_gets_error_type_silently() {
    let ctx = session(vec![PropertyDecl::var("counter", None).into()]);
    let package = Container::Package(ctx.package(&FqName::new("demo")).unwrap().unwrap());
    let counter = ctx.resolve_properties(package, &Name::from("counter")).unwrap();
    assert!(counter[0].is_var);
    assert!(counter[0].return_type(&ctx).unwrap().is_error());
    assert!(ctx.diagnostics().is_empty());
}

#[test]
fn test_annotations_resolve_their_type() {
    let ctx = session(vec![ClassDecl::class("Marker").into()]);
    let entries = ClassDecl::class("X").annotated("Marker").annotations;
    let annotations = ctx
        .resolver()
        .resolve_annotations(&ctx, &file_scope(&ctx), &entries)
        .unwrap();
    assert_eq!(annotations.len(), 1);
    assert_eq!(annotations[0].ty.class_id(), ctx.find_class("demo.Marker").unwrap());
}

#[test]
fn test_constructor_returns_deferred_class_type() {
    let ctx = session(vec![
        ClassDecl::class("Box")
            .type_parameter(TypeParameterDecl::new("T"))
            .with_primary_constructor(vec![ParameterDecl::new("item", TypeRef::simple("T")).val()])
            .into(),
    ]);
    let id = ctx.find_class("demo.Box").unwrap().unwrap();
    let class = ctx.class(id).unwrap();
    let ctor = class.primary_constructor(&ctx).unwrap().unwrap();
    assert!(ctor.is_primary);
    assert_eq!(ctor.kind, CallableKind::Constructor);
    assert!(matches!(ctor.return_type_slot(), ReturnType::Deferred(_)));
    assert_eq!(ctor.return_type(&ctx).unwrap(), class.default_type(&ctx).unwrap());

    let item = ctx.resolve_properties(Container::Class(id), &Name::from("item")).unwrap();
    assert_eq!(item[0].origin, Origin::ConstructorParameter(0));
    assert!(!item[0].is_var);
    assert!(matches!(
        ctx.resolve_all_members(Container::Class(id)).unwrap()[0],
        Descriptor::Callable(_)
    ));
}
