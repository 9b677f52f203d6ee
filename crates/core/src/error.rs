use thiserror::Error;

/// Crate-wide error type for `freifahren-core` and for topology loading
/// failures that other crates propagate through it.
#[derive(Error, Debug)]
pub enum FfError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("deserialize error: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("topology invariant violated: {0}")]
    TopologyInvariant(String),

    #[error("unknown station: {0}")]
    UnknownStation(String),

    #[error("unknown line: {0}")]
    UnknownLine(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}
