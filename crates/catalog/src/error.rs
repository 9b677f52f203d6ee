use thiserror::Error;

/// Egress failures surfaced as a typed sum rather than a bare `Option`,
/// so callers can tell "not found" from "could not ask".
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("catalog response could not be parsed: {0}")]
    Deserialize(#[from] serde_json::Error),
    #[error("catalog call timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("catalog returned unexpected status {0}")]
    UnexpectedStatus(u16),
}
