//! Common types and utilities for the lazyres resolution engine.
//!
//! This crate provides foundational types used across all lazyres crates:
//! - Names (`Name`, `FqName`) and special names for synthesized members
//! - Source anchors (`Span`, `Anchor`) used to key diagnostics
//! - Diagnostic types and the diagnostic message table
//! - Centralized limits for recursive walks

// Identifier names and fully-qualified package names
pub mod name;
pub use name::{FqName, Name};

// Source location of the syntax node a descriptor or diagnostic refers to
pub mod span;
pub use span::{Anchor, Span};

// Diagnostic types and the message table
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory};

// Centralized limits and thresholds
pub mod limits;
