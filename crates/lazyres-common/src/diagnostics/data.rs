//! Diagnostic message table.

use super::{DiagnosticCategory, DiagnosticMessage};

pub mod diagnostic_codes {
    pub const CYCLIC_INHERITANCE_HIERARCHY: u32 = 1001;
    pub const CONFLICTING_OVERLOADS: u32 = 1002;
    pub const CANNOT_INFER_VISIBILITY: u32 = 1003;
    pub const UNSUPPORTED_CLASS_OBJECT_CONSTRAINT: u32 = 1004;
    pub const TYPE_PARAMETERS_IN_ENUM: u32 = 1005;
    pub const TYPE_PARAMETERS_IN_OBJECT: u32 = 1006;
    pub const UNRESOLVED_REFERENCE: u32 = 1007;
    pub const WRONG_NUMBER_OF_TYPE_ARGUMENTS: u32 = 1008;
    pub const DELEGATION_NOT_TO_INTERFACE: u32 = 1009;
    pub const MANY_CLASS_OBJECTS: u32 = 1010;
}

pub mod diagnostic_messages {
    pub const CYCLIC_INHERITANCE_HIERARCHY: &str =
        "There's a cycle in the inheritance hierarchy for this type: '{0}' inherits '{1}'.";
    pub const CONFLICTING_OVERLOADS: &str = "Conflicting overloads: '{0}' in '{1}'.";
    pub const CANNOT_INFER_VISIBILITY: &str =
        "Cannot infer visibility for '{0}'. Please specify it explicitly.";
    pub const UNSUPPORTED_CLASS_OBJECT_CONSTRAINT: &str =
        "Class object constraints are not supported: '{0}'.";
    pub const TYPE_PARAMETERS_IN_ENUM: &str = "Enum class '{0}' cannot have type parameters.";
    pub const TYPE_PARAMETERS_IN_OBJECT: &str = "Type parameters are not allowed for object '{0}'.";
    pub const UNRESOLVED_REFERENCE: &str = "Unresolved reference: '{0}'.";
    pub const WRONG_NUMBER_OF_TYPE_ARGUMENTS: &str = "{0} type arguments expected for '{1}'.";
    pub const DELEGATION_NOT_TO_INTERFACE: &str =
        "Only interfaces can be delegated to, '{0}' is not an interface.";
    pub const MANY_CLASS_OBJECTS: &str = "Only one class object is allowed per class: '{0}'.";
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: diagnostic_codes::CYCLIC_INHERITANCE_HIERARCHY,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::CYCLIC_INHERITANCE_HIERARCHY,
    },
    DiagnosticMessage {
        code: diagnostic_codes::CONFLICTING_OVERLOADS,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::CONFLICTING_OVERLOADS,
    },
    DiagnosticMessage {
        code: diagnostic_codes::CANNOT_INFER_VISIBILITY,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::CANNOT_INFER_VISIBILITY,
    },
    DiagnosticMessage {
        code: diagnostic_codes::UNSUPPORTED_CLASS_OBJECT_CONSTRAINT,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::UNSUPPORTED_CLASS_OBJECT_CONSTRAINT,
    },
    DiagnosticMessage {
        code: diagnostic_codes::TYPE_PARAMETERS_IN_ENUM,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::TYPE_PARAMETERS_IN_ENUM,
    },
    DiagnosticMessage {
        code: diagnostic_codes::TYPE_PARAMETERS_IN_OBJECT,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::TYPE_PARAMETERS_IN_OBJECT,
    },
    DiagnosticMessage {
        code: diagnostic_codes::UNRESOLVED_REFERENCE,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::UNRESOLVED_REFERENCE,
    },
    DiagnosticMessage {
        code: diagnostic_codes::WRONG_NUMBER_OF_TYPE_ARGUMENTS,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::WRONG_NUMBER_OF_TYPE_ARGUMENTS,
    },
    DiagnosticMessage {
        code: diagnostic_codes::DELEGATION_NOT_TO_INTERFACE,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::DELEGATION_NOT_TO_INTERFACE,
    },
    DiagnosticMessage {
        code: diagnostic_codes::MANY_CLASS_OBJECTS,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::MANY_CLASS_OBJECTS,
    },
];
