//! Chunk store builder and the process-lifetime index cache.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};

use nexus_core::error::{Error, Result};
use nexus_core::splitter::TextSplitter;
use nexus_core::traits::Embedder;

use crate::index::EmbeddingIndex;

/// Load `path`, split it, embed every chunk and assemble the index.
/// Fails with `Error::MissingFile` before touching anything else if the
/// path does not exist; the interactive host halts on that error.
pub fn build(path: &Path, splitter: &TextSplitter, embedder: &dyn Embedder) -> Result<EmbeddingIndex> {
    if !path.exists() {
        return Err(Error::MissingFile(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Computation(format!("read {}: {}", path.display(), e)))?;
    let chunks = splitter.split(&content, &path.to_string_lossy());
    tracing::info!(chunks = chunks.len(), path = %path.display(), "building embedding index");

    let pb = ProgressBar::new(chunks.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%)")
            .unwrap()
            .progress_chars("#>-"),
    );
    let mut vectors = Vec::with_capacity(chunks.len());
    for chunk in &chunks {
        let vector = embedder
            .embed(&chunk.content)
            .map_err(|e| Error::Computation(e.to_string()))?;
        vectors.push(vector);
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(EmbeddingIndex::new(chunks, vectors, embedder.dim(), path.to_path_buf()))
}

/// Memo of built indexes, keyed by source path as given.
///
/// Built indexes live for the process lifetime: no eviction, no TTL, and no
/// invalidation when the backing file changes on disk. Loading a different
/// path is the only way to get a different index.
pub struct KnowledgeCache {
    splitter: TextSplitter,
    built: HashMap<PathBuf, Arc<EmbeddingIndex>>,
}

impl KnowledgeCache {
    pub fn new(splitter: TextSplitter) -> Self {
        Self { splitter, built: HashMap::new() }
    }

    /// Return the cached index for `path`, building it on first request.
    /// A second call with the same path hands back the same allocation.
    pub fn get_or_build(&mut self, path: &Path, embedder: &dyn Embedder) -> Result<Arc<EmbeddingIndex>> {
        if let Some(index) = self.built.get(path) {
            tracing::debug!(path = %path.display(), "index cache hit");
            return Ok(Arc::clone(index));
        }
        let index = Arc::new(build(path, &self.splitter, embedder)?);
        self.built.insert(path.to_path_buf(), Arc::clone(&index));
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.built.len()
    }

    pub fn is_empty(&self) -> bool {
        self.built.is_empty()
    }
}
