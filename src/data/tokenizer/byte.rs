use super::Tokenizer;
use crate::error::{ImdbError, Result};

/// Byte-level tokenizer: every UTF-8 byte `b` maps to id `b + 1`, id 0 is padding.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteTokenizer;

impl ByteTokenizer {
    pub const VOCAB_SIZE: usize = 257;
    const PAD: u32 = 0;
    const OFFSET: u32 = 1;
}

impl Tokenizer for ByteTokenizer {
    fn encode(&self, value: &str) -> Result<Vec<u32>> {
        Ok(value.bytes().map(|b| b as u32 + Self::OFFSET).collect())
    }

    fn decode(&self, tokens: &[u32]) -> Result<String> {
        let bytes = tokens
            .iter()
            .filter(|&&id| id != Self::PAD)
            .map(|&id| {
                u8::try_from(id - Self::OFFSET)
                    .map_err(|_| ImdbError::Tokenizer(format!("byte id out of range: {id}")))
            })
            .collect::<Result<Vec<u8>>>()?;

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn vocab_size(&self) -> usize {
        Self::VOCAB_SIZE
    }

    fn pad_token(&self) -> u32 {
        Self::PAD
    }
}
