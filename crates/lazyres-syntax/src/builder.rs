//! Fluent constructors for declarations.
//!
//! Used by the builtin prelude, tests and benches to describe declarations
//! without spelling out every field.

use crate::ast::{
    AnnotationEntry, ClassDecl, ClassKind, Declaration, FunctionDecl, Modifiers, ParameterDecl,
    PropertyDecl, SuperTypeEntry, TypeConstraintDecl, TypeParameterDecl, TypeRef, ValOrVar,
    Variance, VisibilityModifier,
};
use lazyres_common::{Anchor, Name};
use std::sync::Arc;

impl TypeRef {
    pub fn simple(name: &str) -> Self {
        Self {
            anchor: Anchor::default(),
            name: name.to_string(),
            args: Vec::new(),
            nullable: false,
        }
    }

    pub fn generic(name: &str, args: Vec<TypeRef>) -> Self {
        Self {
            args,
            ..Self::simple(name)
        }
    }

    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    #[must_use]
    pub fn at(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }
}

impl ParameterDecl {
    pub fn new(name: &str, type_ref: TypeRef) -> Self {
        Self {
            anchor: Anchor::default(),
            name: Name::from(name),
            type_ref,
            has_default: false,
            vararg: false,
            val_or_var: None,
            visibility: None,
            modifiers: Modifiers::empty(),
        }
    }

    #[must_use]
    pub fn val(mut self) -> Self {
        self.val_or_var = Some(ValOrVar::Val);
        self
    }

    #[must_use]
    pub fn var(mut self) -> Self {
        self.val_or_var = Some(ValOrVar::Var);
        self
    }

    #[must_use]
    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    #[must_use]
    pub fn with_visibility(mut self, visibility: VisibilityModifier) -> Self {
        self.visibility = Some(visibility);
        self
    }

    #[must_use]
    pub fn at(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }
}

impl TypeParameterDecl {
    pub fn new(name: &str) -> Self {
        Self {
            anchor: Anchor::default(),
            name: Name::from(name),
            variance: Variance::Invariant,
            reified: false,
            bound: None,
        }
    }

    #[must_use]
    pub fn bounded(mut self, bound: TypeRef) -> Self {
        self.bound = Some(bound);
        self
    }

    #[must_use]
    pub fn with_variance(mut self, variance: Variance) -> Self {
        self.variance = variance;
        self
    }
}

impl TypeConstraintDecl {
    pub fn new(subject: &str, bound: TypeRef) -> Self {
        Self {
            anchor: Anchor::default(),
            subject: Name::from(subject),
            bound,
            class_object: false,
        }
    }

    #[must_use]
    pub fn for_class_object(mut self) -> Self {
        self.class_object = true;
        self
    }
}

impl ClassDecl {
    pub fn new(kind: ClassKind, name: &str) -> Self {
        Self {
            anchor: Anchor::default(),
            name: Name::from(name),
            kind,
            modifiers: Modifiers::empty(),
            visibility: None,
            annotations: Vec::new(),
            type_parameters: Vec::new(),
            type_constraints: Vec::new(),
            primary_constructor: None,
            supertypes: Vec::new(),
            members: Vec::new(),
            class_objects: Vec::new(),
        }
    }

    pub fn class(name: &str) -> Self {
        Self::new(ClassKind::Class, name)
    }

    pub fn interface(name: &str) -> Self {
        Self::new(ClassKind::Interface, name)
    }

    pub fn object(name: &str) -> Self {
        Self::new(ClassKind::Object, name)
    }

    pub fn enum_class(name: &str) -> Self {
        Self::new(ClassKind::EnumClass, name)
    }

    pub fn enum_entry(name: &str) -> Self {
        Self::new(ClassKind::EnumEntry, name)
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers |= modifiers;
        self
    }

    #[must_use]
    pub fn with_visibility(mut self, visibility: VisibilityModifier) -> Self {
        self.visibility = Some(visibility);
        self
    }

    #[must_use]
    pub fn data(self) -> Self {
        self.with_modifiers(Modifiers::DATA)
    }

    #[must_use]
    pub fn open(self) -> Self {
        self.with_modifiers(Modifiers::OPEN)
    }

    #[must_use]
    pub fn with_primary_constructor(mut self, params: Vec<ParameterDecl>) -> Self {
        self.primary_constructor = Some(params);
        self
    }

    #[must_use]
    pub fn type_parameter(mut self, param: TypeParameterDecl) -> Self {
        self.type_parameters.push(param);
        self
    }

    #[must_use]
    pub fn constraint(mut self, constraint: TypeConstraintDecl) -> Self {
        self.type_constraints.push(constraint);
        self
    }

    /// Superclass entry with a constructor call (`: Base()`).
    #[must_use]
    pub fn extends(mut self, type_ref: TypeRef) -> Self {
        self.supertypes.push(SuperTypeEntry {
            anchor: type_ref.anchor.clone(),
            type_ref,
            call: true,
            delegate: None,
        });
        self
    }

    /// Supertype entry without a constructor call (`: Iface`).
    #[must_use]
    pub fn implements(mut self, type_ref: TypeRef) -> Self {
        self.supertypes.push(SuperTypeEntry {
            anchor: type_ref.anchor.clone(),
            type_ref,
            call: false,
            delegate: None,
        });
        self
    }

    /// Delegated supertype entry (`: Iface by delegate`).
    #[must_use]
    pub fn delegates(mut self, type_ref: TypeRef, delegate: &str) -> Self {
        self.supertypes.push(SuperTypeEntry {
            anchor: type_ref.anchor.clone(),
            type_ref,
            call: false,
            delegate: Some(Name::from(delegate)),
        });
        self
    }

    #[must_use]
    pub fn member(mut self, member: impl Into<Declaration>) -> Self {
        self.members.push(member.into());
        self
    }

    #[must_use]
    pub fn class_object(mut self, class_object: ClassDecl) -> Self {
        self.class_objects.push(Arc::new(class_object));
        self
    }

    #[must_use]
    pub fn annotated(mut self, name: &str) -> Self {
        self.annotations.push(AnnotationEntry {
            anchor: Anchor::default(),
            type_ref: TypeRef::simple(name),
            arguments: Vec::new(),
        });
        self
    }

    #[must_use]
    pub fn at(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }
}

impl FunctionDecl {
    pub fn new(name: &str) -> Self {
        Self {
            anchor: Anchor::default(),
            name: Name::from(name),
            modifiers: Modifiers::empty(),
            visibility: None,
            annotations: Vec::new(),
            type_parameters: Vec::new(),
            value_parameters: Vec::new(),
            receiver: None,
            return_type: None,
            has_body: true,
        }
    }

    #[must_use]
    pub fn param(mut self, param: ParameterDecl) -> Self {
        self.value_parameters.push(param);
        self
    }

    #[must_use]
    pub fn type_parameter(mut self, param: TypeParameterDecl) -> Self {
        self.type_parameters.push(param);
        self
    }

    #[must_use]
    pub fn returns(mut self, type_ref: TypeRef) -> Self {
        self.return_type = Some(type_ref);
        self
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers |= modifiers;
        self
    }

    #[must_use]
    pub fn with_visibility(mut self, visibility: VisibilityModifier) -> Self {
        self.visibility = Some(visibility);
        self
    }

    #[must_use]
    pub fn without_body(mut self) -> Self {
        self.has_body = false;
        self
    }

    #[must_use]
    pub fn at(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }
}

impl PropertyDecl {
    pub fn val(name: &str, type_ref: Option<TypeRef>) -> Self {
        Self {
            anchor: Anchor::default(),
            name: Name::from(name),
            modifiers: Modifiers::empty(),
            visibility: None,
            annotations: Vec::new(),
            is_var: false,
            receiver: None,
            has_initializer: type_ref.is_none(),
            type_ref,
        }
    }

    pub fn var(name: &str, type_ref: Option<TypeRef>) -> Self {
        Self {
            is_var: true,
            ..Self::val(name, type_ref)
        }
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers |= modifiers;
        self
    }

    #[must_use]
    pub fn with_visibility(mut self, visibility: VisibilityModifier) -> Self {
        self.visibility = Some(visibility);
        self
    }

    #[must_use]
    pub fn at(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }
}
