#[derive(thiserror::Error, Debug)]
pub enum SlotError {
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("serialize failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("persist failed: {0}")]
    Persist(#[from] SlotError),
}
