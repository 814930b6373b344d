use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("role registry lock poisoned")]
    LockPoisoned,

    #[error("failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
}
