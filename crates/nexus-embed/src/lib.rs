use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::Tokenizer;

use nexus_core::traits::Embedder;

mod pool;

/// Output dimension of all-MiniLM-L6-v2. The hashed embedder mirrors it so
/// the two are interchangeable behind the trait.
pub const EMBEDDING_DIM: usize = 384;

const MAX_TOKENS: usize = 256;

pub struct EmbeddingModel {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
}

impl EmbeddingModel {
    pub fn new(model_dir: &Path) -> Result<Self> {
        let device = Device::Cpu;
        println!("🔄 Loading MiniLM model from {}...", model_dir.display());
        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;
        let config_path = model_dir.join("config.json");
        let config: BertConfig = serde_json::from_str(&std::fs::read_to_string(&config_path)?)?;
        let weights_path = model_dir.join("pytorch_model.bin");
        let weights = candle_core::pickle::read_all(&weights_path)?;
        let weights_map: std::collections::HashMap<String, Tensor> = weights.into_iter().collect();
        let vb = VarBuilder::from_tensors(weights_map, DType::F32, &device);
        let model = BertModel::load(vb, &config)?;
        println!("✅ MiniLM model loaded");
        Ok(Self { model, tokenizer, device })
    }

    fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let enc = self.tokenizer.encode(text, true).map_err(|e| anyhow!("Tokenization failed: {}", e))?;
        let mut ids = enc.get_ids().to_vec();
        let mut mask = enc.get_attention_mask().to_vec();
        if ids.len() > MAX_TOKENS {
            ids.truncate(MAX_TOKENS);
            mask.truncate(MAX_TOKENS);
        }
        let input_ids = Tensor::new(ids.as_slice(), &self.device)?.unsqueeze(0)?;
        let attention_mask = Tensor::new(mask.as_slice(), &self.device)?.unsqueeze(0)?;
        let token_type_ids = input_ids.zeros_like()?;
        let hidden = self.model.forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let pooled = pool::masked_mean_l2(&hidden, &attention_mask)?;
        let emb = pooled.squeeze(0)?.to_vec1::<f32>()?;
        if emb.len() != EMBEDDING_DIM {
            return Err(anyhow!("Unexpected embedding dim {} (wanted {})", emb.len(), EMBEDDING_DIM));
        }
        Ok(emb)
    }
}

impl Embedder for EmbeddingModel {
    fn dim(&self) -> usize { EMBEDDING_DIM }
    fn embed(&self, text: &str) -> Result<Vec<f32>> { self.embed_text(text) }
}

/// Deterministic bag-of-words embedder: tokens are case-folded, stripped of
/// punctuation and hashed into `dim` buckets; the result is L2-normalized.
/// Offline stand-in for the model (tests, machines without the weights).
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self { Self { dim } }
}

impl Embedder for HashEmbedder {
    fn dim(&self) -> usize { self.dim }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        use std::hash::{Hash, Hasher};
        use twox_hash::XxHash64;
        let mut v = vec![0f32; self.dim];
        for raw in text.split_whitespace() {
            let token: String = raw
                .chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect();
            if token.is_empty() { continue; }
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            v[idx] += 1.0 + (((h >> 32) as u32) as f32) / (u32::MAX as f32);
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt().max(1e-6);
        for x in &mut v { *x /= norm; }
        Ok(v)
    }
}

/// Embedder used by the binaries: the MiniLM model, unless
/// `APP_USE_FAKE_EMBEDDINGS` asks for the hashed stand-in.
pub fn default_embedder() -> Result<Box<dyn Embedder>> {
    let use_fake = std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if use_fake {
        println!("🧪 Using HashEmbedder");
        return Ok(Box::new(HashEmbedder::new(EMBEDDING_DIM)));
    }
    Ok(Box::new(EmbeddingModel::new(&resolve_model_dir()?)?))
}

fn resolve_model_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("APP_MODEL_DIR") {
        let p = PathBuf::from(&dir);
        if p.exists() { println!("📦 Using APP_MODEL_DIR: {}", p.display()); return Ok(p); }
    }
    if let Ok(dir) = std::env::var("MODEL_DIR") {
        let p = PathBuf::from(&dir);
        if p.exists() { println!("📦 Using MODEL_DIR: {}", p.display()); return Ok(p); }
    }
    let root = Path::new("models/all-minilm-l6-v2");
    if root.exists() { println!("📦 Using model dir: {}", root.display()); return Ok(root.to_path_buf()); }
    let parent = Path::new("../models/all-minilm-l6-v2");
    if parent.exists() { println!("📦 Using model dir: {}", parent.display()); return Ok(parent.to_path_buf()); }
    Err(anyhow!(
        "Could not locate the all-MiniLM-L6-v2 model directory; set APP_MODEL_DIR or APP_USE_FAKE_EMBEDDINGS=1"
    ))
}
