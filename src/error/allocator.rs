use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, AllocatorError>;

/// Errors the allocator can surface.
///
/// `InvalidArgument` is the only variant a well-behaved caller should ever
/// see in production: it fires at construction time, before any routing
/// state has been touched. `ModelInvariant` guards the Model's invariants and is
/// only ever raised by `debug_assert!`-style checks; it indicates a bug in
/// this crate or in a caller-supplied `RoutingNodes`/decider implementation,
/// never a normal cluster condition.
#[derive(Debug, Error)]
pub enum AllocatorError {
    /// Raised by [`crate::weight::WeightFunction::new`] and by
    /// [`crate::config::BalancerSettings::validate`] when the shard/index
    /// balance factors sum to zero or a factor/threshold is negative.
    #[error("invalid weight configuration: {0}")]
    InvalidArgument(String),

    /// A Model invariant was violated. Should never trigger in a correct
    /// implementation; kept as a typed error rather than a bare panic so
    /// callers that run with debug assertions enabled can log and fall back
    /// to the pre-pass routing snapshot instead of aborting the process.
    #[error("model invariant violated: {0}")]
    ModelInvariant(String),

    /// Layered configuration (file + env) failed to load or deserialize.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
