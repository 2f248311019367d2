use thiserror::Error;

/// Raised by the caller-side input gate before entries reach the insight
/// generators. The generators themselves assume well-typed input and are
/// total over it.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Non-finite value: {0}")]
    NonFiniteValue(String),

    #[error("Readiness out of range: {0}")]
    ReadinessOutOfRange(String),
}
