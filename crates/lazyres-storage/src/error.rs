use thiserror::Error;

/// A non-tolerant lazy value was read from inside its own computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("recursion detected while computing a lazy {value_type}")]
pub struct RecursionDetected {
    pub value_type: &'static str,
}
