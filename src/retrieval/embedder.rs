use crate::core::llm::LLMClient;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Text to vector. Ingestion and querying must use the same implementation.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Model name recorded in the index at build time and checked on load
    fn model(&self) -> &str;

    async fn embed(&self, input: &str) -> Result<Vec<f32>>;
}

/// Embeddings endpoint of the hosted model API
pub struct OpenAIEmbedder {
    client: Arc<LLMClient>,
}

impl OpenAIEmbedder {
    pub fn new(client: Arc<LLMClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    fn model(&self) -> &str {
        &self.client.config().embedding_model
    }

    async fn embed(&self, input: &str) -> Result<Vec<f32>> {
        self.client.embed(input).await
    }
}
