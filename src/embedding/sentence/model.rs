use candle::{DType, Device, Result, Tensor};
use candle_core as candle;
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use std::path::Path;

/// BERT encoder without a task head, as exported by sentence-transformers.
pub(crate) struct SentenceBert {
    bert: BertModel,
    hidden_size: usize,
    max_position_embeddings: usize,
}

impl SentenceBert {
    pub(crate) fn load(config_path: &Path, weights_path: &Path, device: &Device) -> Result<Self> {
        let config_content = std::fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_content)
            .map_err(|e| candle::Error::Msg(format!("Failed to parse config: {}", e)))?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path.to_path_buf()], DType::F32, device)?
        };

        // Checkpoints differ in whether the encoder sits at the root or under a prefix.
        let bert = if vb.contains_tensor("embeddings.word_embeddings.weight") {
            BertModel::load(vb, &config)?
        } else if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("bert"), &config)?
        } else if vb.contains_tensor("roberta.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("roberta"), &config)?
        } else {
            return Err(candle::Error::Msg(
                "no BERT embeddings found in model.safetensors".to_string(),
            ));
        };

        Ok(Self {
            bert,
            hidden_size: config.hidden_size,
            max_position_embeddings: config.max_position_embeddings,
        })
    }

    pub(crate) fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    /// Longest sequence the position embeddings cover.
    pub(crate) fn max_position_embeddings(&self) -> usize {
        self.max_position_embeddings
    }

    /// Returns token hidden states, shape `[batch, seq_len, hidden_size]`.
    pub(crate) fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: &Tensor,
    ) -> Result<Tensor> {
        self.bert
            .forward(input_ids, token_type_ids, Some(attention_mask))
    }
}

/// Averages token states over the positions the attention mask keeps.
///
/// `hidden_states` is `[batch, seq_len, hidden]`, `attention_mask` is `[batch, seq_len]`
/// (any numeric dtype). Returns `[batch, hidden]`.
pub fn mean_pool(hidden_states: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
    let mask = attention_mask
        .to_dtype(hidden_states.dtype())?
        .unsqueeze(2)?;
    let summed = hidden_states.broadcast_mul(&mask)?.sum(1)?;
    let counts = mask.sum(1)?.maximum(1e-9f32)?;
    summed.broadcast_div(&counts)
}

/// Scales each row of a `[batch, dim]` tensor to unit length.
pub fn l2_normalize(embeddings: &Tensor) -> Result<Tensor> {
    let norms = embeddings.sqr()?.sum_keepdim(1)?.sqrt()?.maximum(1e-12f32)?;
    embeddings.broadcast_div(&norms)
}
