//! The builtin prelude package.
//!
//! Every project implicitly imports one package holding the root class and the
//! primitive classes. Builtin classes have no members; they only anchor the
//! type hierarchy and give type references something to resolve to.

use crate::ast::{ClassDecl, Declaration, Modifiers, TypeParameterDecl};
use crate::project::SourceFile;
use lazyres_common::FqName;

/// Path used for anchors of builtin declarations.
pub const BUILTINS_FILE: &str = "<builtins>";

/// Default name of the builtin package.
pub const DEFAULT_BUILTINS_PACKAGE: &str = "lang";

pub const ANY: &str = "Any";
pub const NOTHING: &str = "Nothing";
pub const UNIT: &str = "Unit";
pub const BOOLEAN: &str = "Boolean";
pub const CHAR: &str = "Char";
pub const INT: &str = "Int";
pub const LONG: &str = "Long";
pub const DOUBLE: &str = "Double";
pub const STRING: &str = "String";
pub const ARRAY: &str = "Array";
pub const ENUM: &str = "Enum";

/// The prelude declarations placed in `package`.
pub fn prelude(package: &FqName) -> SourceFile {
    let final_class = |name: &str| ClassDecl::class(name).with_modifiers(Modifiers::FINAL);

    let declarations: Vec<Declaration> = vec![
        ClassDecl::class(ANY).open().into(),
        final_class(NOTHING).into(),
        ClassDecl::object(UNIT).into(),
        final_class(BOOLEAN).into(),
        final_class(CHAR).into(),
        final_class(INT).into(),
        final_class(LONG).into(),
        final_class(DOUBLE).into(),
        final_class(STRING).into(),
        final_class(ARRAY)
            .type_parameter(TypeParameterDecl::new("T"))
            .into(),
        ClassDecl::class(ENUM).with_modifiers(Modifiers::ABSTRACT).into(),
    ];
    SourceFile::new(BUILTINS_FILE, package.clone(), declarations)
}
