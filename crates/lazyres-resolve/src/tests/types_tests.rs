use super::*;

fn param(owner: TypeParamOwner, index: u32, name: &str) -> Type {
    Type::Parameter {
        key: TypeParamKey { owner, index },
        name: Name::from(name),
        nullable: false,
    }
}

#[test]
fn test_substitute_class_parameters() {
    let list = ClassId(1);
    let int = Type::class(ClassId(2));
    let t = param(TypeParamOwner::Class(list), 0, "T");
    let wrapped = Type::class_with_args(ClassId(3), vec![t.clone()]);

    let subst = TypeSubstitution::for_class(list, &[int.clone()]);
    assert_eq!(t.substitute(&subst), int);
    assert_eq!(
        wrapped.substitute(&subst),
        Type::class_with_args(ClassId(3), vec![int])
    );
}

#[test]
fn test_substitute_keeps_nullability_of_reference() {
    let owner = TypeParamOwner::Class(ClassId(1));
    let nullable_t = param(owner, 0, "T").with_nullability(true);
    let subst = TypeSubstitution::for_class(ClassId(1), &[Type::class(ClassId(2))]);

    let result = nullable_t.substitute(&subst);
    assert!(result.is_nullable());
    assert_eq!(result.class_id(), Some(ClassId(2)));
}

#[test]
fn test_foreign_parameters_are_untouched() {
    let t = param(TypeParamOwner::Callable(CallableId(9)), 0, "T");
    let subst = TypeSubstitution::for_class(ClassId(1), &[Type::class(ClassId(2))]);
    assert_eq!(t.substitute(&subst), t);
}

#[test]
fn test_equal_modulo_axioms() {
    let a = TypeParamKey {
        owner: TypeParamOwner::Callable(CallableId(1)),
        index: 0,
    };
    let b = TypeParamKey {
        owner: TypeParamOwner::Callable(CallableId(2)),
        index: 0,
    };
    let ta = param(a.owner, 0, "T");
    let tb = param(b.owner, 0, "U");

    let mut axioms = FxHashMap::default();
    assert!(!ta.equal_modulo(&tb, &axioms));
    axioms.insert(a, b);
    assert!(ta.equal_modulo(&tb, &axioms));

    let list_a = Type::class_with_args(ClassId(5), vec![ta]);
    let list_b = Type::class_with_args(ClassId(5), vec![tb]);
    assert!(list_a.equal_modulo(&list_b, &axioms));
}

#[test]
fn test_errors_compare_equal_and_ignore_nullability() {
    let e1 = Type::error("Foo");
    let e2 = Type::error("Bar");
    assert!(e1.equal_modulo(&e2, &FxHashMap::default()));
    assert!(!e1.clone().with_nullability(true).is_nullable());
    assert!(e1.is_error());
    assert_eq!(e1.class_id(), None);
}
