use std::fs;
use std::sync::Arc;

use tempfile::TempDir;

use nexus_core::error::Error;
use nexus_core::splitter::{SplitterConfig, TextSplitter};
use nexus_core::traits::Embedder;
use nexus_embed::{HashEmbedder, EMBEDDING_DIM};
use nexus_retrieval::{respond, KnowledgeCache, NO_MATCH_MESSAGE};

fn embedder() -> HashEmbedder {
    HashEmbedder::new(EMBEDDING_DIM)
}

/// Twelve uniform paragraphs, one five-letter word each, sized so every
/// paragraph lands in its own chunk under a 100-char budget.
fn paragraphs_fixture() -> String {
    let words = [
        "alpha", "bravo", "gamma", "delta", "theta", "kappa", "sigma", "omega", "lemon", "mango",
        "peach", "grape",
    ];
    words
        .iter()
        .map(|w| vec![*w; 10].join(" "))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn paragraph_splitter() -> TextSplitter {
    TextSplitter::new(SplitterConfig { chunk_size: 100, chunk_overlap: 0 })
}

#[test]
fn cache_returns_the_same_index_for_the_same_path() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("kb.txt");
    fs::write(&path, "Pointers store addresses. Destructors free resources.").expect("write");

    let embedder = embedder();
    let mut cache = KnowledgeCache::new(TextSplitter::default());
    let first = cache.get_or_build(&path, &embedder).expect("build");
    let second = cache.get_or_build(&path, &embedder).expect("cached");

    assert!(Arc::ptr_eq(&first, &second), "second call reuses the built index");
    assert_eq!(cache.len(), 1);
}

#[test]
fn missing_file_fails_with_no_partial_state() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("nowhere.txt");

    let embedder = embedder();
    let mut cache = KnowledgeCache::new(TextSplitter::default());
    match cache.get_or_build(&path, &embedder) {
        Err(Error::MissingFile(p)) => assert_eq!(p, path),
        Err(e) => panic!("expected MissingFile, got {e}"),
        Ok(_) => panic!("expected MissingFile, got an index"),
    }
    assert!(cache.is_empty(), "a failed build leaves nothing behind");
}

#[test]
fn single_paragraph_file_answers_destructor_query() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("kb.txt");
    fs::write(&path, "Pointers store addresses. Destructors free resources.").expect("write");

    let embedder = embedder();
    let mut cache = KnowledgeCache::new(TextSplitter::default());
    let index = cache.get_or_build(&path, &embedder).expect("build");

    let answer = respond("How do destructors work?", 1, true, &index, &embedder).expect("respond");
    assert!(answer.contains("Destructors free resources."), "answer: {answer}");

    let source_lines: Vec<&str> = answer.lines().filter(|l| l.starts_with("- Fragment from:")).collect();
    assert_eq!(source_lines.len(), 1);
    assert!(source_lines[0].contains(&path.to_string_lossy().to_string()));
}

#[test]
fn empty_file_yields_the_fixed_no_match_message() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("empty.txt");
    fs::write(&path, "").expect("write");

    let embedder = embedder();
    let mut cache = KnowledgeCache::new(TextSplitter::default());
    let index = cache.get_or_build(&path, &embedder).expect("build");
    assert!(index.is_empty());

    let answer = respond("anything", 3, true, &index, &embedder).expect("respond");
    assert_eq!(answer, NO_MATCH_MESSAGE);
}

#[test]
fn response_body_holds_at_most_k_chunks() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("kb.txt");
    fs::write(&path, paragraphs_fixture()).expect("write");

    let embedder = embedder();
    let mut cache = KnowledgeCache::new(paragraph_splitter());
    let index = cache.get_or_build(&path, &embedder).expect("build");
    assert_eq!(index.len(), 12, "one chunk per paragraph");

    for k in [1usize, 3, 5, 10] {
        let answer = respond("alpha", k, false, &index, &embedder).expect("respond");
        assert_eq!(answer.matches("🔹").count(), k.min(12), "k={k}");
    }
}

#[test]
fn nearest_chunk_comes_first() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("kb.txt");
    fs::write(&path, paragraphs_fixture()).expect("write");

    let embedder = embedder();
    let mut cache = KnowledgeCache::new(paragraph_splitter());
    let index = cache.get_or_build(&path, &embedder).expect("build");

    let answer = respond("bravo", 3, false, &index, &embedder).expect("respond");
    assert!(
        answer.starts_with("Retrieval success:\n\n🔹 bravo"),
        "the bravo paragraph leads: {answer}"
    );

    let query_vec = embedder.embed("bravo").expect("embed");
    let hits = index.top_k(&query_vec, 12);
    for pair in hits.windows(2) {
        assert!(pair[0].score >= pair[1].score, "scores are non-increasing");
    }
}

#[test]
fn sources_trailer_lists_one_line_per_retrieved_chunk() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("kb.txt");
    fs::write(&path, paragraphs_fixture()).expect("write");

    let embedder = embedder();
    let mut cache = KnowledgeCache::new(paragraph_splitter());
    let index = cache.get_or_build(&path, &embedder).expect("build");

    let answer = respond("gamma", 2, true, &index, &embedder).expect("respond");
    let source_lines: Vec<&str> = answer.lines().filter(|l| l.starts_with("- Fragment from:")).collect();
    assert_eq!(source_lines.len(), 2);
    for line in source_lines {
        assert!(line.contains(&path.to_string_lossy().to_string()));
    }

    let without = respond("gamma", 2, false, &index, &embedder).expect("respond");
    assert!(!without.contains("Data Sources:"));
}
