//! Flat L2 vector index
//!
//! Two JSON files make up an index: `index.json` holds the model name, the
//! dimension and one vector per document; `documents.json` holds the document
//! texts in the same order. Both are validated together on load.

use super::RetrievalError;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

#[derive(Debug, Serialize, Deserialize)]
struct IndexFile {
    model: String,
    dimension: usize,
    vectors: Vec<Vec<f32>>,
}

/// One search hit: a document position and its squared L2 distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub position: usize,
    pub distance: f32,
}

#[derive(Debug, Clone)]
pub struct VectorIndex {
    model: String,
    dimension: usize,
    vectors: Vec<Vec<f32>>,
    documents: Vec<String>,
}

impl VectorIndex {
    /// Build an index, taking the dimension from the first vector.
    pub fn new(
        model: impl Into<String>,
        vectors: Vec<Vec<f32>>,
        documents: Vec<String>,
    ) -> Result<Self, RetrievalError> {
        let dimension = vectors.first().map(Vec::len).unwrap_or(0);
        Self::validated(model.into(), dimension, vectors, documents)
    }

    fn validated(
        model: String,
        dimension: usize,
        vectors: Vec<Vec<f32>>,
        documents: Vec<String>,
    ) -> Result<Self, RetrievalError> {
        if vectors.is_empty() || dimension == 0 {
            return Err(RetrievalError::EmptyIndex);
        }
        if vectors.len() != documents.len() {
            return Err(RetrievalError::CountMismatch {
                vectors: vectors.len(),
                documents: documents.len(),
            });
        }
        if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
            return Err(RetrievalError::DimensionMismatch {
                expected: dimension,
                actual: bad.len(),
            });
        }
        if let Some(position) = vectors.iter().position(|v| !all_finite(v)) {
            return Err(RetrievalError::NonFiniteVector { position });
        }

        Ok(Self {
            model,
            dimension,
            vectors,
            documents,
        })
    }

    pub async fn load(index_path: &Path, documents_path: &Path) -> Result<Self, RetrievalError> {
        let index: IndexFile = read_json(index_path).await?;
        let documents: Vec<String> = read_json(documents_path).await?;

        let loaded = Self::validated(index.model, index.dimension, index.vectors, documents)?;
        tracing::debug!(
            "[VectorIndex] Loaded {} documents (dimension {}, model '{}')",
            loaded.len(),
            loaded.dimension,
            loaded.model
        );
        Ok(loaded)
    }

    pub async fn save(&self, index_path: &Path, documents_path: &Path) -> anyhow::Result<()> {
        for path in [index_path, documents_path] {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .await
                    .context(format!("Failed to create directory {:?}", parent))?;
            }
        }

        let index = IndexFile {
            model: self.model.clone(),
            dimension: self.dimension,
            vectors: self.vectors.clone(),
        };
        fs::write(index_path, serde_json::to_vec(&index)?)
            .await
            .context(format!("Failed to write index file: {:?}", index_path))?;
        fs::write(documents_path, serde_json::to_vec_pretty(&self.documents)?)
            .await
            .context(format!("Failed to write documents file: {:?}", documents_path))?;

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn document(&self, position: usize) -> Option<&str> {
        self.documents.get(position).map(String::as_str)
    }

    /// Exact k-nearest-neighbour search, nearest first.
    ///
    /// Equal distances are ordered by position so results are stable.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, RetrievalError> {
        if query.len() != self.dimension {
            return Err(RetrievalError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }
        if !all_finite(query) {
            return Err(RetrievalError::NonFiniteQuery);
        }

        let mut neighbors: Vec<Neighbor> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(position, v)| Neighbor {
                position,
                distance: squared_l2(query, v),
            })
            .collect();

        // Finite inputs never yield a NaN distance, at worst +inf.
        neighbors.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then(a.position.cmp(&b.position))
        });
        neighbors.truncate(k);
        Ok(neighbors)
    }
}

pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

fn all_finite(v: &[f32]) -> bool {
    v.iter().all(|x| x.is_finite())
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, RetrievalError> {
    let bytes = fs::read(path).await.map_err(|source| RetrievalError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| RetrievalError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn docs(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("doc {}", i)).collect()
    }

    fn sample_index() -> VectorIndex {
        VectorIndex::new(
            "test",
            vec![
                vec![10.0, 0.0],
                vec![1.0, 0.0],
                vec![0.0, 2.0],
                vec![-3.0, 0.0],
            ],
            docs(4),
        )
        .unwrap()
    }

    #[test]
    fn test_squared_l2() {
        assert_eq!(squared_l2(&[1.0, 2.0], &[4.0, 6.0]), 25.0);
        assert_eq!(squared_l2(&[0.5], &[0.5]), 0.0);
    }

    #[test]
    fn test_search_orders_nearest_first() {
        let hits = sample_index().search(&[0.0, 0.0], 3).unwrap();
        let positions: Vec<usize> = hits.iter().map(|n| n.position).collect();
        assert_eq!(positions, vec![1, 2, 3]);
        assert_eq!(hits[0].distance, 1.0);
        assert_eq!(hits[1].distance, 4.0);
        assert_eq!(hits[2].distance, 9.0);
    }

    #[test]
    fn test_search_k_larger_than_index() {
        let hits = sample_index().search(&[0.0, 0.0], 10).unwrap();
        assert_eq!(hits.len(), 4);
    }

    #[test]
    fn test_ties_break_by_position() {
        let index = VectorIndex::new("t", vec![vec![1.0], vec![-1.0], vec![1.0]], docs(3)).unwrap();
        let positions: Vec<usize> = index
            .search(&[0.0], 3)
            .unwrap()
            .iter()
            .map(|n| n.position)
            .collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn test_query_dimension_mismatch() {
        let err = sample_index().search(&[0.0, 0.0, 0.0], 3).unwrap_err();
        assert!(matches!(
            err,
            RetrievalError::DimensionMismatch { expected: 2, actual: 3 }
        ));
    }

    #[test]
    fn test_rejects_inconsistent_contents() {
        assert!(matches!(
            VectorIndex::new("t", vec![], vec![]),
            Err(RetrievalError::EmptyIndex)
        ));
        assert!(matches!(
            VectorIndex::new("t", vec![vec![1.0]], docs(2)),
            Err(RetrievalError::CountMismatch { vectors: 1, documents: 2 })
        ));
        assert!(matches!(
            VectorIndex::new("t", vec![vec![1.0, 2.0], vec![1.0]], docs(2)),
            Err(RetrievalError::DimensionMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_rejects_non_finite_vectors() {
        let err = VectorIndex::new(
            "t",
            vec![vec![1.0, 0.0], vec![f32::INFINITY, 0.0], vec![0.0, f32::NAN]],
            docs(3),
        )
        .unwrap_err();
        assert!(matches!(err, RetrievalError::NonFiniteVector { position: 1 }));
    }

    #[test]
    fn test_non_finite_query_is_error() {
        let index = sample_index();
        assert!(matches!(
            index.search(&[f32::NAN, 0.0], 3),
            Err(RetrievalError::NonFiniteQuery)
        ));
        assert!(matches!(
            index.search(&[f32::INFINITY, 0.0], 3),
            Err(RetrievalError::NonFiniteQuery)
        ));
    }

    #[test]
    fn test_overflowing_distance_sorts_last() {
        let index = VectorIndex::new(
            "t",
            vec![vec![f32::MAX], vec![0.0], vec![-f32::MAX]],
            docs(3),
        )
        .unwrap();
        let hits = index.search(&[1.0], 3).unwrap();
        let positions: Vec<usize> = hits.iter().map(|n| n.position).collect();
        assert_eq!(positions, vec![1, 0, 2]);
        assert_eq!(hits[1].distance, f32::INFINITY);
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let index_path = dir.path().join("store/index.json");
        let documents_path = dir.path().join("store/documents.json");

        sample_index().save(&index_path, &documents_path).await.unwrap();
        let loaded = VectorIndex::load(&index_path, &documents_path).await.unwrap();

        assert_eq!(loaded.len(), 4);
        assert_eq!(loaded.dimension(), 2);
        assert_eq!(loaded.model(), "test");
        assert_eq!(loaded.document(2), Some("doc 2"));
    }

    #[tokio::test]
    async fn test_load_validates_declared_dimension() {
        let dir = TempDir::new().unwrap();
        let index_path = dir.path().join("index.json");
        let documents_path = dir.path().join("documents.json");
        std::fs::write(
            &index_path,
            r#"{"model": "m", "dimension": 3, "vectors": [[1.0, 2.0]]}"#,
        )
        .unwrap();
        std::fs::write(&documents_path, r#"["only doc"]"#).unwrap();

        let err = VectorIndex::load(&index_path, &documents_path).await.unwrap_err();
        assert!(matches!(
            err,
            RetrievalError::DimensionMismatch { expected: 3, actual: 2 }
        ));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = VectorIndex::load(&dir.path().join("nope.json"), &dir.path().join("docs.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, RetrievalError::Read { .. }));
    }
}
