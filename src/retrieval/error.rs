use std::path::PathBuf;
use thiserror::Error;

/// Failures that leave a request without grounding context
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("vector index is empty")]
    EmptyIndex,

    #[error("index has {vectors} vectors but {documents} documents")]
    CountMismatch { vectors: usize, documents: usize },

    #[error("embedding dimension mismatch: index expects {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("vector {position} contains a non-finite component")]
    NonFiniteVector { position: usize },

    #[error("query embedding contains a non-finite component")]
    NonFiniteQuery,

    #[error("index was built with embedding model '{index}' but the embedder uses '{embedder}'")]
    ModelMismatch { index: String, embedder: String },

    #[error("query embedding failed: {0}")]
    Embedding(#[source] anyhow::Error),
}
