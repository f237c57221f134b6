//! Offline index build from a directory of policy documents

use crate::retrieval::{Embedder, VectorIndex};
use anyhow::{Context, Result};
use futures::{stream, StreamExt, TryStreamExt};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Read every regular, non-hidden file in `dir`, ordered by file name.
pub async fn read_documents(dir: &Path) -> Result<Vec<String>> {
    let mut paths: Vec<PathBuf> = Vec::new();
    let mut entries = fs::read_dir(dir)
        .await
        .context(format!("Failed to read source directory: {:?}", dir))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .context("Failed to read directory entry")?
    {
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if !hidden && entry.file_type().await?.is_file() {
            paths.push(entry.path());
        }
    }
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in &paths {
        let text = fs::read_to_string(path)
            .await
            .context(format!("Failed to read policy document: {:?}", path))?;
        documents.push(text);
    }

    tracing::debug!("[Ingest] Read {} documents from {:?}", documents.len(), dir);
    Ok(documents)
}

/// Embed `documents` with at most `concurrency` requests in flight, keeping order.
pub async fn build_index(
    embedder: &dyn Embedder,
    documents: Vec<String>,
    concurrency: usize,
) -> Result<VectorIndex> {
    if documents.is_empty() {
        anyhow::bail!("No policy documents to ingest");
    }

    let vectors: Vec<Vec<f32>> = stream::iter(documents.iter())
        .map(|doc| embedder.embed(doc))
        .buffered(concurrency.max(1))
        .try_collect()
        .await
        .context("Failed to embed policy documents")?;

    let index = VectorIndex::new(embedder.model(), vectors, documents)?;
    tracing::info!(
        "[Ingest] Built index with {} documents (dimension {})",
        index.len(),
        index.dimension()
    );
    Ok(index)
}

pub async fn ingest_directory(
    embedder: &dyn Embedder,
    source_dir: &Path,
    concurrency: usize,
) -> Result<VectorIndex> {
    let documents = read_documents(source_dir).await?;
    build_index(embedder, documents, concurrency).await
}
