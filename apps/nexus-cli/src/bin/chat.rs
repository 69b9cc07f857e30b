use std::io::{self, Write};
use std::sync::Arc;

use nexus_chat::{ChatSession, QueryConfig, K_MAX, K_MIN};
use nexus_core::config::{expand_path, Config};
use nexus_core::splitter::{SplitterConfig, TextSplitter};
use nexus_core::traits::Embedder;
use nexus_core::types::Role;
use nexus_embed::default_embedder;
use nexus_retrieval::KnowledgeCache;

fn print_help() {
    println!("Commands:");
    println!("  /k N            set how many chunks a query retrieves ({K_MIN}-{K_MAX})");
    println!("  /sources on|off toggle the data-sources trailer");
    println!("  /load PATH      switch to another knowledge file");
    println!("  /reset          clear the conversation");
    println!("  /history        print the conversation so far");
    println!("  /help           this text");
    println!("  /quit           exit");
    println!("Anything else is a query.");
    println!();
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

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
    let default_k: usize = config.get("retrieval.default_k").unwrap_or(3);
    let show_sources: bool = config.get("retrieval.show_sources").unwrap_or(true);

    if !knowledge_path.exists() {
        eprintln!("🚨 Missing knowledge file: {}", knowledge_path.display());
        std::process::exit(1);
    }

    let embedder: Arc<dyn Embedder> = Arc::from(default_embedder()?);
    let splitter = TextSplitter::new(SplitterConfig { chunk_size, chunk_overlap });
    let mut cache = KnowledgeCache::new(splitter);
    let index = cache.get_or_build(&knowledge_path, embedder.as_ref())?;

    println!("🔍 Nexus Retrieval Chat");
    println!("=======================");
    println!("📁 Knowledge file: {}", knowledge_path.display());
    println!("📊 Indexed {} chunks", index.len());
    println!();
    print_help();

    let mut session = ChatSession::new(index, Arc::clone(&embedder), QueryConfig::new(default_k, show_sources));

    loop {
        print!("💬 > ");
        io::stdout().flush()?;
        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = line.strip_prefix('/') {
            let mut parts = command.splitn(2, char::is_whitespace);
            let name = parts.next().unwrap_or_default();
            let arg = parts.next().unwrap_or_default().trim();
            match name {
                "k" => match arg.parse::<usize>() {
                    Ok(k) if (K_MIN..=K_MAX).contains(&k) => {
                        session.set_k(k);
                        println!("✅ k = {k}");
                    }
                    _ => println!("⚠️ k must be an integer between {K_MIN} and {K_MAX}"),
                },
                "sources" => match arg {
                    "on" => {
                        session.set_show_sources(true);
                        println!("✅ sources on");
                    }
                    "off" => {
                        session.set_show_sources(false);
                        println!("✅ sources off");
                    }
                    _ => println!("⚠️ usage: /sources on|off"),
                },
                "load" => {
                    if arg.is_empty() {
                        println!("⚠️ usage: /load PATH");
                        continue;
                    }
                    let path = expand_path(arg);
                    match session.on_upload(&path, &mut cache) {
                        Ok(()) => println!(
                            "📁 Now using {} ({} chunks)",
                            session.index().source_path().display(),
                            session.index().len()
                        ),
                        Err(e) => println!("⚠️ {e}"),
                    }
                }
                "reset" => {
                    session.on_reset();
                    println!("🧹 Conversation cleared");
                }
                "history" => {
                    if session.history().is_empty() {
                        println!("(empty)");
                    }
                    for turn in session.history() {
                        let who = match turn.role {
                            Role::User => "you",
                            Role::Assistant => "nexus",
                        };
                        println!("[{who}] {}", turn.content);
                    }
                }
                "help" => print_help(),
                "quit" | "exit" => break,
                _ => println!("⚠️ Unknown command: /{name} (try /help)"),
            }
            continue;
        }

        match session.on_query(line) {
            Ok(answer) => {
                println!("{answer}");
                println!();
            }
            Err(e) => println!("⚠️ Retrieval failed: {e}"),
        }
    }

    Ok(())
}
