//! Context Retriever
//!
//! Information Hiding:
//! - Index file format and validation hidden in `index`
//! - Embedding backend hidden behind the `Embedder` trait
//! - Index caching policy hidden from callers

pub mod embedder;
mod error;
pub mod index;

pub use embedder::{Embedder, OpenAIEmbedder};
pub use error::RetrievalError;
pub use index::{Neighbor, VectorIndex};

use crate::config::RetrievalConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Separator placed between retrieved documents
pub const CONTEXT_SEPARATOR: &str = "\n";

pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    index_path: PathBuf,
    documents_path: PathBuf,
    top_k: usize,
    cache: Option<OnceCell<Arc<VectorIndex>>>,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn Embedder>, config: &RetrievalConfig) -> Self {
        Self {
            embedder,
            index_path: config.index_path.clone(),
            documents_path: config.documents_path.clone(),
            top_k: config.top_k,
            cache: config.cache_index.then(OnceCell::new),
        }
    }

    async fn index(&self) -> Result<Arc<VectorIndex>, RetrievalError> {
        match &self.cache {
            Some(cell) => cell.get_or_try_init(|| self.load()).await.cloned(),
            None => self.load().await,
        }
    }

    /// Load the index and check it was built with the embedder's model.
    async fn load(&self) -> Result<Arc<VectorIndex>, RetrievalError> {
        let index = VectorIndex::load(&self.index_path, &self.documents_path).await?;
        if index.model() != self.embedder.model() {
            return Err(RetrievalError::ModelMismatch {
                index: index.model().to_string(),
                embedder: self.embedder.model().to_string(),
            });
        }
        Ok(Arc::new(index))
    }

    /// Retrieve with the configured `top_k`.
    pub async fn retrieve_default(&self, query: &str) -> Result<String, RetrievalError> {
        self.retrieve(query, self.top_k).await
    }

    /// The `k` nearest documents joined by newline, nearest first.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<String, RetrievalError> {
        let index = self.index().await?;

        let embedding = self
            .embedder
            .embed(query)
            .await
            .map_err(RetrievalError::Embedding)?;

        let neighbors = index.search(&embedding, k)?;
        tracing::debug!(
            "[Retriever] {} neighbours: {:?}",
            neighbors.len(),
            neighbors.iter().map(|n| n.position).collect::<Vec<_>>()
        );

        let context = neighbors
            .iter()
            .filter_map(|n| index.document(n.position))
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR);

        Ok(context)
    }
}
