//! In-memory similarity index over chunk embeddings.
//!
//! Brute-force cosine scan. Corpora here are one knowledge file split into
//! at most a few hundred chunks, so there is no approximate structure.

use std::path::{Path, PathBuf};

use nexus_core::types::{DocumentChunk, ScoredChunk};

pub struct EmbeddingIndex {
    chunks: Vec<DocumentChunk>,
    vectors: Vec<Vec<f32>>,
    dim: usize,
    source_path: PathBuf,
}

impl EmbeddingIndex {
    pub(crate) fn new(
        chunks: Vec<DocumentChunk>,
        vectors: Vec<Vec<f32>>,
        dim: usize,
        source_path: PathBuf,
    ) -> Self {
        assert_eq!(chunks.len(), vectors.len(), "one vector per chunk");
        Self { chunks, vectors, dim, source_path }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// The `k` nearest chunks to `query_vec`, nearest first. Equal scores
    /// keep chunk insertion order.
    pub fn top_k(&self, query_vec: &[f32], k: usize) -> Vec<ScoredChunk> {
        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, cosine_similarity(query_vec, v)))
            .collect();
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        scored.truncate(k);
        scored
            .into_iter()
            .map(|(i, score)| ScoredChunk { chunk: self.chunks[i].clone(), score })
            .collect()
    }
}

#[inline]
fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[inline]
fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Cosine similarity in [-1, 1]; zero vectors score 0.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot_product(a, b) / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(i: usize, text: &str) -> DocumentChunk {
        DocumentChunk {
            content: text.to_string(),
            doc_path: "mem".to_string(),
            chunk_index: i,
            total_chunks: 3,
        }
    }

    #[test]
    fn cosine_identical_is_one() {
        let v = vec![0.5f32; 16];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-3);
    }

    #[test]
    fn cosine_orthogonal_is_zero() {
        let mut a = vec![0.0f32; 16];
        a[0] = 1.0;
        let mut b = vec![0.0f32; 16];
        b[1] = 1.0;
        assert!(cosine_similarity(&a, &b).abs() < 1e-3);
    }

    #[test]
    fn cosine_zero_vector_is_zero() {
        let a = vec![0.0f32; 16];
        let b = vec![1.0f32; 16];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn top_k_orders_nearest_first_and_breaks_ties_by_position() {
        let chunks = vec![chunk(0, "a"), chunk(1, "b"), chunk(2, "c")];
        let vectors = vec![
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
        ];
        let index = EmbeddingIndex::new(chunks, vectors, 2, "mem".into());
        let hits = index.top_k(&[1.0, 0.0], 3);
        assert_eq!(hits[0].chunk.chunk_index, 1, "exact match first");
        // remaining two tie at score 0; insertion order decides
        assert_eq!(hits[1].chunk.chunk_index, 0);
        assert_eq!(hits[2].chunk.chunk_index, 2);
    }

    #[test]
    fn top_k_caps_at_k() {
        let chunks = vec![chunk(0, "a"), chunk(1, "b"), chunk(2, "c")];
        let vectors = vec![vec![1.0, 0.0]; 3];
        let index = EmbeddingIndex::new(chunks, vectors, 2, "mem".into());
        assert_eq!(index.top_k(&[1.0, 0.0], 2).len(), 2);
        assert_eq!(index.top_k(&[1.0, 0.0], 10).len(), 3, "k larger than corpus");
    }
}
