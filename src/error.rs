use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the arena engine.
///
/// The simulation itself has almost no failure modes; most variants cover
/// configuration and seed input at the edges of the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Arena configuration rejected by validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Seed text that is not a decimal or 0x-prefixed hex integer.
    #[error("invalid seed: {0}")]
    InvalidSeed(String),

    /// Engine state that conservation rules out (e.g. no surviving kinds).
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
