use std::env;
use std::sync::Arc;

use nexus_core::config::{expand_path, Config};
use nexus_core::splitter::{SplitterConfig, TextSplitter};
use nexus_core::traits::Embedder;
use nexus_embed::default_embedder;
use nexus_retrieval::{respond, KnowledgeCache};

fn parse_args() -> (String, Option<usize>) {
    let mut args: Vec<String> = env::args().collect();
    let prog = args.remove(0);
    if args.is_empty() {
        eprintln!("Usage: {} \"<query>\" [k]", prog);
        std::process::exit(1);
    }
    let query = args.remove(0);
    let k = args.first().and_then(|s| s.parse().ok());
    (query, k)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let (query, k_arg) = parse_args();

    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let knowledge_file: String = config
        .get("knowledge.file")
        .unwrap_or_else(|_| "data/cpp_introduction.txt".to_string());
    let knowledge_path = expand_path(&knowledge_file);
    let chunk_size: usize = config.get("chunking.chunk_size").unwrap_or(900);
    let chunk_overlap: usize = config.get("chunking.chunk_overlap").unwrap_or(180);
    let k = k_arg
        .unwrap_or_else(|| config.get("retrieval.default_k").unwrap_or(3))
        .clamp(1, 10);
    let show_sources: bool = config.get("retrieval.show_sources").unwrap_or(true);

    if !knowledge_path.exists() {
        eprintln!("🚨 Missing knowledge file: {}", knowledge_path.display());
        std::process::exit(1);
    }

    let embedder: Arc<dyn Embedder> = Arc::from(default_embedder()?);
    let splitter = TextSplitter::new(SplitterConfig { chunk_size, chunk_overlap });
    let mut cache = KnowledgeCache::new(splitter);
    let index = cache.get_or_build(&knowledge_path, embedder.as_ref())?;

    let answer = respond(&query, k, show_sources, &index, embedder.as_ref())?;
    println!("{answer}");
    Ok(())
}
