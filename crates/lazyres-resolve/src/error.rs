use lazyres_common::Name;
use lazyres_storage::RecursionDetected;
use thiserror::Error;

/// Internal failures of a resolution computation.
///
/// User-facing problems are never errors; they go to the diagnostic sink.
/// An error aborts the current computation, is not cached, and the next read
/// of the same lazy value retries.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("declaration provider produced an unsupported {kind} declaration '{name}'")]
    UnsupportedDeclaration { kind: &'static str, name: Name },
    #[error("recursive read of a lazy {what} while it was being computed")]
    RecursionDetected { what: &'static str },
    #[error("external resolver failed: {0}")]
    External(String),
    #[error("no descriptor registered for {0}")]
    MissingDescriptor(String),
}

impl From<RecursionDetected> for ResolveError {
    fn from(err: RecursionDetected) -> Self {
        Self::RecursionDetected {
            what: err.value_type,
        }
    }
}

pub type ResolveResult<T> = Result<T, ResolveError>;
