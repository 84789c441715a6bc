use crate::error::Result;
use serde::{Deserialize, Serialize};

mod byte;
mod subword;

pub use byte::ByteTokenizer;
pub use subword::{SubwordTokenizer, PAD_TOKEN, UNK_TOKEN};

/// Turns review text into token ids and back.
pub trait Tokenizer: Send + Sync {
    fn encode(&self, value: &str) -> Result<Vec<u32>>;
    fn decode(&self, tokens: &[u32]) -> Result<String>;
    fn vocab_size(&self) -> usize;
    fn pad_token(&self) -> u32;
}

/// How the `text` feature is encoded before a record is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "encoder", rename_all = "snake_case")]
pub enum TextEncoderConfig {
    /// Text is stored as-is.
    PlainText,
    /// One id per UTF-8 byte.
    Bytes,
    /// Learned subword vocabulary of (at most) `vocab_size` entries.
    Subwords { vocab_size: usize },
}

impl TextEncoderConfig {
    /// Whether a vocabulary has to be learned from the training corpus
    /// before any example can be encoded.
    pub fn requires_vocab(&self) -> bool {
        matches!(self, Self::Subwords { .. })
    }

    pub fn target_vocab_size(&self) -> Option<usize> {
        match self {
            Self::PlainText => None,
            Self::Bytes => Some(ByteTokenizer::VOCAB_SIZE),
            Self::Subwords { vocab_size } => Some(*vocab_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_subwords_require_vocab() {
        assert!(!TextEncoderConfig::PlainText.requires_vocab());
        assert!(!TextEncoderConfig::Bytes.requires_vocab());
        assert!(TextEncoderConfig::Subwords { vocab_size: 8192 }.requires_vocab());
    }

    #[test]
    fn target_vocab_size_per_encoder() {
        assert_eq!(TextEncoderConfig::PlainText.target_vocab_size(), None);
        assert_eq!(TextEncoderConfig::Bytes.target_vocab_size(), Some(257));
        assert_eq!(
            TextEncoderConfig::Subwords { vocab_size: 8192 }.target_vocab_size(),
            Some(8192)
        );
    }

    #[test]
    fn encoder_config_serializes_with_tag() {
        let config = TextEncoderConfig::Subwords { vocab_size: 8192 };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"encoder":"subwords","vocab_size":8192}"#);
        let json = serde_json::to_string(&TextEncoderConfig::PlainText).unwrap();
        assert_eq!(json, r#"{"encoder":"plain_text"}"#);
    }
}
