// Embedding Engine - local sentence embeddings via all-MiniLM-L6-v2
use anyhow::{Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use hf_hub::{api::sync::Api, Repo, RepoType};
use tokenizers::{PaddingParams, Tokenizer, TruncationParams};
use tracing::info;

use crate::errors::RfpError;
use crate::knowledge::{EmbeddingProvider, EMBEDDING_DIM};

pub const MODEL_ID: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Sequence length the sentence-transformers checkpoint was trained with
const MAX_SEQ_LEN: usize = 256;

/// Embedding engine using a BERT sentence model via Candle
pub struct EmbeddingEngine {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
}

impl EmbeddingEngine {
    /// Create new embedding engine (downloads model on first use)
    pub fn new() -> Result<Self> {
        Self::from_hub(MODEL_ID)
    }

    /// Load a BERT-family sentence model from the HuggingFace Hub
    pub fn from_hub(model_id: &str) -> Result<Self> {
        info!("Loading embedding model {}", model_id);
        let device = Device::Cpu;

        let api = Api::new().context("Failed to create HuggingFace API client")?;
        let repo = api.repo(Repo::new(model_id.to_string(), RepoType::Model));

        let config_path = repo.get("config.json")
            .context("Failed to download model config")?;
        let tokenizer_path = repo.get("tokenizer.json")
            .context("Failed to download tokenizer")?;
        let weights_path = repo.get("model.safetensors")
            .context("Failed to download model weights")?;

        let config_contents = std::fs::read_to_string(config_path)
            .context("Failed to read config file")?;
        let config: Config = serde_json::from_str(&config_contents)
            .context("Failed to parse model config")?;

        let mut tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;
        tokenizer.with_padding(Some(PaddingParams::default()));
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_SEQ_LEN,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("Failed to configure truncation: {}", e))?;

        // SAFETY: the safetensors file is owned by the hub cache and not
        // modified while mapped.
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)
                .context("Failed to load model weights")?
        };

        let model = BertModel::load(vb, &config)
            .context("Failed to create BERT model")?;

        Ok(Self {
            model,
            tokenizer,
            device,
        })
    }

    /// Generate normalized embeddings for multiple texts
    pub fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let encodings = self.tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;

        let token_ids = encodings
            .iter()
            .map(|encoding| Tensor::new(encoding.get_ids(), &self.device))
            .collect::<candle_core::Result<Vec<_>>>()?;
        let masks = encodings
            .iter()
            .map(|encoding| Tensor::new(encoding.get_attention_mask(), &self.device))
            .collect::<candle_core::Result<Vec<_>>>()?;

        let token_ids = Tensor::stack(&token_ids, 0)?;
        let attention_mask = Tensor::stack(&masks, 0)?;
        let token_type_ids = token_ids.zeros_like()?;

        let embeddings = self.model
            .forward(&token_ids, &token_type_ids, Some(&attention_mask))?;

        let pooled = Self::mean_pool(&embeddings, &attention_mask)?;
        let normalized = Self::normalize_l2(&pooled)?;

        Ok(normalized.to_vec2::<f32>()?)
    }

    /// Mean pooling with attention mask
    fn mean_pool(embeddings: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
        let (batch, seq_len, hidden) = embeddings.dims3()?;
        let mask = attention_mask
            .to_dtype(embeddings.dtype())?
            .unsqueeze(2)?
            .broadcast_as((batch, seq_len, hidden))?;

        let summed = (embeddings * &mask)?.sum(1)?;
        let counts = mask.sum(1)?.clamp(1e-9, f64::MAX)?;

        Ok(summed.broadcast_div(&counts)?)
    }

    fn normalize_l2(vectors: &Tensor) -> Result<Tensor> {
        let norms = vectors.sqr()?.sum_keepdim(1)?.sqrt()?.clamp(1e-12, f64::MAX)?;
        Ok(vectors.broadcast_div(&norms)?)
    }
}

impl EmbeddingProvider for EmbeddingEngine {
    fn embed(&self, text: &str) -> crate::errors::Result<Vec<f32>> {
        self.embed_batch(&[text])
            .map_err(|e| RfpError::EmbeddingError(format!("{:#}", e)))?
            .pop()
            .ok_or_else(|| RfpError::EmbeddingError("Model returned no embedding".to_string()))
    }

    fn dimension(&self) -> usize {
        EMBEDDING_DIM
    }
}
