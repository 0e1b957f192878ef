//! Centralized limits and thresholds for the resolution engine.
//!
//! Resolution walks are bounded graphs in well-formed programs, but the graph
//! is built from user input and may be arbitrarily deep. These limits keep the
//! recursive walks from overflowing the stack.

/// Maximum depth of the class-hierarchy walk used by the override subtype check.
pub const MAX_SUBTYPE_CHECK_DEPTH: u32 = 128;

/// Maximum iterations of any single hierarchy walk.
pub const MAX_HIERARCHY_WALK_ITERATIONS: u32 = 100_000;

/// Maximum nesting depth of `force_resolve_all` through nested classes and
/// class objects.
pub const MAX_FORCE_RESOLVE_DEPTH: u32 = 64;

/// Upper bound on the `componentN` probe when enumerating data-class members.
///
/// The probe normally stops at the first absent component; this cap only
/// matters for pathological constructors.
pub const MAX_DATA_COMPONENTS: usize = 255;
