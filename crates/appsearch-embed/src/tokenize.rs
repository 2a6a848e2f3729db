use anyhow::{anyhow, ensure, Result};
use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;

pub struct Encoded {
    pub input_ids: Tensor,
    pub token_type_ids: Tensor,
    pub attention_mask: Tensor,
}

/// Encode one text as a `[1, T]` batch, truncated to `max_len` tokens.
/// No padding is needed for a single sequence.
pub fn tokenize_on_device(tokenizer: &Tokenizer, text: &str, max_len: usize, device: &Device) -> Result<Encoded> {
    let enc = tokenizer.encode(text, true).map_err(|e| anyhow!("Tokenization failed: {}", e))?;
    let mut ids = enc.get_ids().to_vec();
    let mut type_ids = enc.get_type_ids().to_vec();
    let mut mask = enc.get_attention_mask().to_vec();
    if ids.len() > max_len { ids.truncate(max_len); type_ids.truncate(max_len); mask.truncate(max_len); }
    ensure!(!ids.is_empty(), "tokenizer produced no tokens");
    Ok(Encoded {
        input_ids: Tensor::new(ids.as_slice(), device)?.unsqueeze(0)?,
        token_type_ids: Tensor::new(type_ids.as_slice(), device)?.unsqueeze(0)?,
        attention_mask: Tensor::new(mask.as_slice(), device)?.unsqueeze(0)?,
    })
}
