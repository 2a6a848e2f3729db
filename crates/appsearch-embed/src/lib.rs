//! appsearch-embed
//!
//! Sentence embeddings for catalog entries and queries. `LocalEmbedder` runs a
//! BERT-family sentence-transformer (all-MiniLM-L6-v2 by default) with candle
//! and mean pooling; `FakeEmbedder` is a deterministic stand-in for tests and
//! development, selected with `APP_USE_FAKE_EMBEDDINGS=1`.

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use appsearch_core::config::Settings;
use appsearch_core::traits::Embedder;
use candle_core::{DType, Device};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::Tokenizer;
use tracing::{info, warn};

pub mod device;
pub mod fake;
pub mod pool;
pub mod tokenize;

pub use fake::FakeEmbedder;
pub use pool::masked_mean_l2;

const MAX_LEN: usize = 256;

pub struct LocalEmbedder { model: BertModel, tokenizer: Tokenizer, device: Device, model_id: String, dim: usize }

impl LocalEmbedder {
    pub fn load(model_dir: &Path, model_id: &str, device: Device) -> Result<Self> {
        info!(model = model_id, dir = %model_dir.display(), "loading sentence embedding model");
        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;
        let config_path = model_dir.join("config.json");
        let config: BertConfig = serde_json::from_str(
            &std::fs::read_to_string(&config_path).with_context(|| format!("reading {}", config_path.display()))?,
        )?;
        let safetensors = model_dir.join("model.safetensors");
        let vb = if safetensors.exists() {
            // SAFETY: the weights file is not modified while the model is alive.
            unsafe { VarBuilder::from_mmaped_safetensors(&[safetensors], DType::F32, &device)? }
        } else {
            VarBuilder::from_pth(model_dir.join("pytorch_model.bin"), DType::F32, &device)?
        };
        let model = BertModel::load(vb, &config)?;
        info!(dim = config.hidden_size, "embedding model loaded");
        Ok(Self { model, tokenizer, device, model_id: model_id.to_string(), dim: config.hidden_size })
    }
}

impl Embedder for LocalEmbedder {
    fn model_id(&self) -> &str { &self.model_id }

    fn dim(&self) -> usize { self.dim }

    fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let start = Instant::now();
        let enc = tokenize::tokenize_on_device(&self.tokenizer, text, MAX_LEN, &self.device)?;
        let hidden = self.model.forward(&enc.input_ids, &enc.token_type_ids, Some(&enc.attention_mask))?;
        let pooled = masked_mean_l2(&hidden, &enc.attention_mask)?;
        let emb = pooled.to_device(&Device::Cpu)?.squeeze(0)?.to_vec1::<f32>()?;
        if start.elapsed().as_millis() > 100 { warn!(elapsed_ms = start.elapsed().as_millis() as u64, "slow embedding"); }
        Ok(emb)
    }
}

pub fn get_default_embedder(settings: &Settings) -> Result<Arc<dyn Embedder>> {
    let use_fake = std::env::var("APP_USE_FAKE_EMBEDDINGS").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(settings.use_fake_embeddings);
    if use_fake { info!(dim = settings.fake_dim, "using FakeEmbedder"); return Ok(Arc::new(FakeEmbedder::new(settings.fake_dim))); }
    let device = device::resolve_device(device::DevicePreference::parse(&settings.device)?)?;
    let dir = resolve_model_dir(settings)?;
    Ok(Arc::new(LocalEmbedder::load(&dir, &settings.model_id, device)?))
}

fn resolve_model_dir(settings: &Settings) -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("APP_MODEL_DIR") { let p = PathBuf::from(&dir); if p.exists() { return Ok(p); } }
    if let Some(p) = settings.model_dir.as_ref().filter(|p| p.exists()) { return Ok(p.clone()); }
    let short_name = settings.model_id.rsplit('/').next().unwrap_or(&settings.model_id);
    for candidate in [Path::new("models").join(short_name), Path::new("../models").join(short_name)] {
        if candidate.exists() { return Ok(candidate); }
    }
    Err(anyhow!("Could not locate model directory for '{}'; set embedding.model_dir or APP_MODEL_DIR", settings.model_id))
}
