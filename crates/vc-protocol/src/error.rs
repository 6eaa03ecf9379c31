//! Error taxonomy shared across the VoCart core crates.

/// Failures the core surfaces to its caller. Parsing itself never fails
/// (it degrades to low confidence instead); errors arise from invalid
/// caller input, missing confirmations, and unreachable collaborators.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The caller's input was structurally unusable (empty transcript,
    /// missing SKU, option not part of the proposal).
    #[error("invalid input: {0}")]
    InputValidation(String),

    /// A referenced confirmation token was already used, expired, or
    /// never existed.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request contradicts current state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// An external collaborator (the generative endpoint) could not be
    /// reached; callers downgrade this to the rule path.
    #[error("external service unavailable: {0}")]
    ExternalUnavailable(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
