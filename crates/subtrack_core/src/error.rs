use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("subscription payload is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("no subscription at position {index} (collection holds {len})")]
    IndexOutOfRange { index: usize, len: usize },
}
