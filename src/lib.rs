//! Lazy semantic-descriptor resolution for a compiler front end.
//!
//! The engine lives in the workspace crates; this crate re-exports them and
//! adds the tracing setup, the batch driver and the `lazyres` binary.

pub use lazyres_common as common;
pub use lazyres_resolve as resolve;
pub use lazyres_storage as storage;
pub use lazyres_syntax as syntax;

pub use lazyres_resolve::{ResolveOptions, ResolveSession};
pub use lazyres_syntax::Project;

pub mod cli;
pub mod tracing_config;
