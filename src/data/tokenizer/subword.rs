use super::Tokenizer;
use crate::error::{ImdbError, Result};
use std::path::Path;
use tokenizers::decoders::bpe::BPEDecoder;
use tokenizers::models::bpe::{BpeTrainerBuilder, BPE};
use tokenizers::models::TrainerWrapper;
use tokenizers::pre_tokenizers::whitespace::Whitespace;
use tokenizers::AddedToken;

pub const PAD_TOKEN: &str = "<pad>";
pub const UNK_TOKEN: &str = "<unk>";
const END_OF_WORD: &str = "</w>";

fn tokenizer_error(e: impl std::fmt::Display) -> ImdbError {
    ImdbError::Tokenizer(e.to_string())
}

/// Subword tokenizer backed by a BPE vocabulary learned from review text.
pub struct SubwordTokenizer {
    tokenizer: tokenizers::Tokenizer,
    pad_id: u32,
}

impl SubwordTokenizer {
    /// Learns a vocabulary of at most `target_vocab_size` entries from `corpus`.
    ///
    /// The corpus is consumed once, in order.
    pub fn build_from_corpus<I, S>(corpus: I, target_vocab_size: usize) -> Result<Self>
    where
        I: Iterator<Item = S> + Send,
        S: AsRef<str> + Send,
    {
        let model = BPE::builder()
            .unk_token(UNK_TOKEN.to_string())
            .end_of_word_suffix(END_OF_WORD.to_string())
            .build()
            .map_err(tokenizer_error)?;

        let mut tokenizer = tokenizers::Tokenizer::new(model);
        tokenizer
            .with_pre_tokenizer(Some(Whitespace {}))
            .with_decoder(Some(BPEDecoder::new(END_OF_WORD.to_string())));

        let mut trainer: TrainerWrapper = BpeTrainerBuilder::new()
            .vocab_size(target_vocab_size)
            .min_frequency(0)
            .show_progress(false)
            .end_of_word_suffix(END_OF_WORD.to_string())
            .special_tokens(vec![
                AddedToken::from(PAD_TOKEN, true),
                AddedToken::from(UNK_TOKEN, true),
            ])
            .build()
            .into();

        tokenizer
            .train(&mut trainer, corpus)
            .map_err(tokenizer_error)?;

        Self::from_tokenizer(tokenizer)
    }

    /// Restores a vocabulary written by [`SubwordTokenizer::save`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let tokenizer = tokenizers::Tokenizer::from_file(path.as_ref()).map_err(|e| {
            ImdbError::Tokenizer(format!(
                "failed to load vocabulary from {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Self::from_tokenizer(tokenizer)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.tokenizer
            .save(path.as_ref(), false)
            .map_err(tokenizer_error)
    }

    fn from_tokenizer(tokenizer: tokenizers::Tokenizer) -> Result<Self> {
        let pad_id = tokenizer
            .token_to_id(PAD_TOKEN)
            .ok_or_else(|| ImdbError::Tokenizer(format!("vocabulary has no {PAD_TOKEN} token")))?;
        Ok(Self { tokenizer, pad_id })
    }
}

impl Tokenizer for SubwordTokenizer {
    fn encode(&self, value: &str) -> Result<Vec<u32>> {
        let encoding = self
            .tokenizer
            .encode(value, false)
            .map_err(tokenizer_error)?;
        Ok(encoding.get_ids().to_vec())
    }

    fn decode(&self, tokens: &[u32]) -> Result<String> {
        self.tokenizer
            .decode(tokens, true)
            .map_err(tokenizer_error)
    }

    fn vocab_size(&self) -> usize {
        self.tokenizer.get_vocab_size(false)
    }

    fn pad_token(&self) -> u32 {
        self.pad_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORPUS: [&str; 4] = [
        "a great movie with a great cast",
        "the worst movie I have seen",
        "great acting and a great story",
        "the plot was worst of all",
    ];

    #[test]
    fn builds_vocab_within_target_size() {
        let tokenizer = SubwordTokenizer::build_from_corpus(CORPUS.iter(), 64).unwrap();
        assert!(tokenizer.vocab_size() <= 64);
        assert_eq!(tokenizer.pad_token(), 0);

        let ids = tokenizer.encode("great movie").unwrap();
        assert!(!ids.is_empty());
        assert!(ids.iter().all(|&id| (id as usize) < tokenizer.vocab_size()));
        assert_eq!(tokenizer.decode(&ids).unwrap(), "great movie");
    }

    #[test]
    fn vocabulary_survives_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokenizer.json");

        let tokenizer = SubwordTokenizer::build_from_corpus(CORPUS.iter(), 64).unwrap();
        tokenizer.save(&path).unwrap();

        let restored = SubwordTokenizer::from_file(&path).unwrap();
        assert_eq!(restored.vocab_size(), tokenizer.vocab_size());
        assert_eq!(
            restored.encode("worst plot").unwrap(),
            tokenizer.encode("worst plot").unwrap()
        );
    }

    #[test]
    fn missing_vocab_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SubwordTokenizer::from_file(dir.path().join("nope.json"))
            .err()
            .unwrap();
        assert!(matches!(err, ImdbError::Tokenizer(_)));
    }
}
