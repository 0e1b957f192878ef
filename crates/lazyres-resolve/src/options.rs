use lazyres_syntax::builtins::{ANY, DEFAULT_BUILTINS_PACKAGE};
use serde::{Deserialize, Serialize};

/// Session-wide resolution options. Every field has a default, so a config
/// file only needs to name what it changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// Package holding the root class and primitives; implicitly imported.
    pub builtins_package: String,
    /// Root class of every hierarchy. It is the only class with no supertypes.
    pub root_class: String,
    /// Generate `componentN` and `copy` for data classes.
    pub synthesize_data_members: bool,
    /// Re-expose interface members for `Iface by delegate` entries.
    pub generate_delegated_members: bool,
    /// Add the builtin prelude when the project does not declare the package.
    pub inject_builtins: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            builtins_package: DEFAULT_BUILTINS_PACKAGE.to_string(),
            root_class: ANY.to_string(),
            synthesize_data_members: true,
            generate_delegated_members: true,
            inject_builtins: true,
        }
    }
}
