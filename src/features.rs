//! Feature schema for IMDB records: a `text` feature and a `label` class label.

use crate::data::tokenizer::{ByteTokenizer, SubwordTokenizer, TextEncoderConfig, Tokenizer};
use crate::data::ImdbItem;
use crate::error::{ImdbError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

const VOCAB_FILE: &str = "tokenizer.json";

/// Sentiment label, in class-label id order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Neg,
    Pos,
}

impl Label {
    pub const ALL: [Label; 2] = [Label::Neg, Label::Pos];

    /// Name of the subdirectory holding reviews with this label.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Label::Neg => "neg",
            Label::Pos => "pos",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for Label {
    type Err = ImdbError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "neg" => Ok(Label::Neg),
            "pos" => Ok(Label::Pos),
            other => Err(ImdbError::UnknownLabel(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassLabel {
    names: Vec<String>,
}

impl ClassLabel {
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn num_classes(&self) -> usize {
        self.names.len()
    }

    pub fn str2int(&self, name: &str) -> Result<usize> {
        self.names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| ImdbError::UnknownLabel(name.to_string()))
    }

    pub fn int2str(&self, id: usize) -> Result<&str> {
        self.names
            .get(id)
            .map(String::as_str)
            .ok_or(ImdbError::InvalidLabelId(id))
    }
}

/// Stored form of the `text` feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EncodedText {
    Text(String),
    Ids(Vec<u32>),
}

/// A fully encoded example, ready to be written out by a dataset writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedRecord {
    pub text: EncodedText,
    pub label: usize,
}

enum TextEncoder {
    Plain,
    Bytes(ByteTokenizer),
    Subwords(SubwordTokenizer),
}

/// The `text` feature. Subword encoders start without a vocabulary and get
/// one from [`TextFeature::maybe_build_from_corpus`] or
/// [`TextFeature::load_metadata`].
pub struct TextFeature {
    config: TextEncoderConfig,
    encoder: Option<TextEncoder>,
    corpus_texts: Option<usize>,
}

impl TextFeature {
    pub fn new(config: TextEncoderConfig) -> Self {
        let encoder = match config {
            TextEncoderConfig::PlainText => Some(TextEncoder::Plain),
            TextEncoderConfig::Bytes => Some(TextEncoder::Bytes(ByteTokenizer)),
            TextEncoderConfig::Subwords { .. } => None,
        };
        Self {
            config,
            encoder,
            corpus_texts: None,
        }
    }

    pub fn config(&self) -> TextEncoderConfig {
        self.config
    }

    /// True while the encoder still waits for a learned vocabulary.
    pub fn needs_vocab(&self) -> bool {
        self.config.requires_vocab() && self.encoder.is_none()
    }

    /// Vocabulary size of the active encoder, `None` for plain text or an
    /// unbuilt subword encoder.
    pub fn vocab_size(&self) -> Option<usize> {
        match self.encoder.as_ref()? {
            TextEncoder::Plain => None,
            TextEncoder::Bytes(t) => Some(t.vocab_size()),
            TextEncoder::Subwords(t) => Some(t.vocab_size()),
        }
    }

    /// Number of texts the vocabulary was learned from, when it was built
    /// in this process by [`TextFeature::maybe_build_from_corpus`].
    pub fn corpus_texts(&self) -> Option<usize> {
        self.corpus_texts
    }

    pub fn tokenizer(&self) -> Option<&dyn Tokenizer> {
        match self.encoder.as_ref()? {
            TextEncoder::Plain => None,
            TextEncoder::Bytes(t) => Some(t as &dyn Tokenizer),
            TextEncoder::Subwords(t) => Some(t as &dyn Tokenizer),
        }
    }

    /// Builds the subword vocabulary from `corpus` if this feature needs one.
    ///
    /// Returns `Ok(true)` when a vocabulary was built. The corpus is not
    /// touched otherwise. The first error in the corpus aborts the build.
    pub fn maybe_build_from_corpus<I>(&mut self, corpus: I) -> Result<bool>
    where
        I: Iterator<Item = Result<String>> + Send,
    {
        let TextEncoderConfig::Subwords { vocab_size } = self.config else {
            return Ok(false);
        };
        if self.encoder.is_some() {
            return Ok(false);
        }

        info!(
            target_vocab_size = self.config.target_vocab_size(),
            "building subword vocabulary"
        );
        let mut failure = None;
        let mut consumed = 0;
        let texts = corpus.map_while(|text| match text {
            Ok(text) => {
                consumed += 1;
                Some(text)
            }
            Err(e) => {
                failure = Some(e);
                None
            }
        });
        let tokenizer = SubwordTokenizer::build_from_corpus(texts, vocab_size);
        if let Some(e) = failure {
            return Err(e);
        }
        let tokenizer = tokenizer?;

        info!(
            vocab_size = tokenizer.vocab_size(),
            corpus_texts = consumed,
            "subword vocabulary built"
        );
        self.encoder = Some(TextEncoder::Subwords(tokenizer));
        self.corpus_texts = Some(consumed);
        Ok(true)
    }

    pub fn encode(&self, text: &str) -> Result<EncodedText> {
        match &self.encoder {
            Some(TextEncoder::Plain) => Ok(EncodedText::Text(text.to_string())),
            Some(TextEncoder::Bytes(t)) => t.encode(text).map(EncodedText::Ids),
            Some(TextEncoder::Subwords(t)) => t.encode(text).map(EncodedText::Ids),
            None => Err(ImdbError::VocabularyNotBuilt {
                config: format!("{:?}", self.config),
            }),
        }
    }

    fn vocab_path(dir: &Path) -> PathBuf {
        dir.join(VOCAB_FILE)
    }

    /// Writes the learned vocabulary into `dir`. Returns whether anything was
    /// written; encoders without a learned vocabulary have nothing to save.
    pub fn save_metadata(&self, dir: &Path) -> Result<bool> {
        let Some(TextEncoder::Subwords(tokenizer)) = &self.encoder else {
            return Ok(false);
        };
        std::fs::create_dir_all(dir).map_err(|e| ImdbError::io(dir, e))?;
        tokenizer.save(Self::vocab_path(dir))?;
        Ok(true)
    }

    /// Restores a vocabulary previously written by [`TextFeature::save_metadata`].
    /// Returns `Ok(false)` if this feature needs no vocabulary or `dir` holds none.
    pub fn load_metadata(&mut self, dir: &Path) -> Result<bool> {
        let path = Self::vocab_path(dir);
        if !self.config.requires_vocab() || !path.is_file() {
            return Ok(false);
        }
        self.encoder = Some(TextEncoder::Subwords(SubwordTokenizer::from_file(path)?));
        Ok(true)
    }
}

impl fmt::Debug for TextFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextFeature")
            .field("config", &self.config)
            .field("vocab_size", &self.vocab_size())
            .finish()
    }
}

#[derive(Serialize)]
struct TextFeatureSchema {
    #[serde(flatten)]
    config: TextEncoderConfig,
    built_vocab_size: Option<usize>,
}

impl Serialize for TextFeature {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        TextFeatureSchema {
            config: self.config,
            built_vocab_size: self.vocab_size(),
        }
        .serialize(serializer)
    }
}

/// `{"text": Text, "label": ClassLabel(["neg", "pos"])}`
#[derive(Debug, Serialize)]
pub struct FeaturesDict {
    pub text: TextFeature,
    pub label: ClassLabel,
}

impl FeaturesDict {
    pub fn new(text_encoder: TextEncoderConfig) -> Self {
        Self {
            text: TextFeature::new(text_encoder),
            label: ClassLabel::new(Label::ALL.iter().map(Label::dir_name)),
        }
    }

    pub fn encode_example(&self, item: &ImdbItem) -> Result<EncodedRecord> {
        Ok(EncodedRecord {
            text: self.text.encode(&item.text)?,
            label: self.label.str2int(item.label.dir_name())?,
        })
    }
}
