use std::fmt::Display;

/// Errors the engine can raise. Every variant corresponds to one of the
/// taxonomies described for the engine: an invariant that a well-formed
/// input must never violate, a bad startup configuration, or a mismatch
/// observed between two peers during the reduction.
///
/// I/O failures (missing/corrupt input file) are not represented here; the
/// reader surfaces those as `anyhow::Error` since they originate outside the
/// engine's own invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A programmer-error-class invariant was violated (e.g. a label
    /// reclassification conflict during merge, a self-edge contraction).
    /// Must never occur on well-formed input.
    InvariantViolation(String),
    /// Bad startup configuration (V < P, P not a power of two).
    Configuration(String),
    /// Two peers disagreed on a protocol detail (mismatched payload sizes).
    Protocol(String),
}

impl Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::InvariantViolation(msg) => write!(f, "invariant violation: {msg}"),
            EngineError::Configuration(msg) => write!(f, "configuration error: {msg}"),
            EngineError::Protocol(msg) => write!(f, "protocol error: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}
