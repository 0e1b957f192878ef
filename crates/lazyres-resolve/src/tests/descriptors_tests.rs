use super::*;
use crate::ids::PackageId;
use indexmap::IndexSet;

fn function(name: &str, visibility: Visibility) -> Arc<CallableDescriptor> {
    Arc::new(CallableDescriptor::new(CallableParts {
        kind: CallableKind::Function,
        name: Name::from(name),
        container: Container::Package(PackageId(0)),
        member_kind: MemberKind::Declaration,
        modality: Modality::Final,
        visibility,
        type_parameters: Vec::new(),
        value_parameters: Vec::new(),
        receiver: None,
        return_type: ReturnType::Resolved(Type::error("Unit")),
        is_var: false,
        is_primary: false,
        origin: Origin::Source,
        anchor: None,
    }))
}

#[test]
fn test_visibility_partial_order() {
    use Visibility::*;
    assert_eq!(Public.compare(Private), Some(Ordering::Greater));
    assert_eq!(Private.compare(Protected), Some(Ordering::Less));
    assert_eq!(Internal.compare(Internal), Some(Ordering::Equal));
    assert_eq!(Protected.compare(Internal), None);
    assert_eq!(Inherited.compare(Public), None);
    assert!(Protected.is_visible_to_subclasses());
    assert!(!Private.is_visible_to_subclasses());
    assert!(!InvisibleFake.is_visible_to_subclasses());
}

#[test]
fn test_find_max_visibility() {
    let public = function("f", Visibility::Public);
    let protected = function("f", Visibility::Protected);
    let internal = function("f", Visibility::Internal);

    assert_eq!(find_max_visibility(&[]), None);
    assert_eq!(
        find_max_visibility(&[protected.clone(), public.clone()]),
        Some(Visibility::Public)
    );
    assert_eq!(
        find_max_visibility(&[protected.clone()]),
        Some(Visibility::Protected)
    );
    // Protected and internal have no common maximum.
    assert_eq!(find_max_visibility(&[protected, internal]), None);
}

#[test]
fn test_inferred_visibility_is_write_once() {
    let f = function("f", Visibility::Inherited);
    assert_eq!(f.visibility(), Visibility::Inherited);
    assert!(f.set_resolved_visibility(Visibility::Protected));
    assert!(!f.set_resolved_visibility(Visibility::Public));
    assert_eq!(f.visibility(), Visibility::Protected);
    assert_eq!(f.declared_visibility(), Visibility::Inherited);
}

#[test]
fn test_overridden_binding_is_write_once() {
    let base = function("f", Visibility::Public);
    let derived = function("f", Visibility::Public);
    assert!(derived.overridden().is_empty());
    assert!(derived.bind_overridden(vec![base.clone()]));
    assert!(!derived.bind_overridden(Vec::new()));
    assert!(Arc::ptr_eq(&derived.overridden()[0], &base));
}

#[test]
fn test_substituted_copy_keeps_original() {
    let f = function("f", Visibility::Public);
    let mut substitution = TypeSubstitution::empty();
    assert!(Arc::ptr_eq(&f.substitute(&substitution), &f));

    substitution.insert(
        crate::types::TypeParamKey {
            owner: crate::types::TypeParamOwner::Class(ClassId(1)),
            index: 0,
        },
        Type::class(ClassId(2)),
    );
    let copy = f.substitute(&substitution);
    assert!(!Arc::ptr_eq(&copy, &f));
    assert!(copy.same_original(&f));
}

#[test]
fn test_descriptor_identity() {
    let a = function("f", Visibility::Public);
    let b = function("f", Visibility::Public);
    let mut set = IndexSet::new();
    assert!(set.insert(Descriptor::Callable(a.clone())));
    assert!(!set.insert(Descriptor::Callable(a)));
    assert!(set.insert(Descriptor::Callable(b)));
    assert!(set.insert(Descriptor::Class(ClassId(1))));
    assert!(!set.insert(Descriptor::Class(ClassId(1))));
    assert_eq!(set.len(), 3);
}
