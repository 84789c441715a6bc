pub(crate) mod dataset;
pub mod tokenizer;

pub use dataset::{generate_examples, read_review, vocab_text_gen, Examples, ImdbDataset, ImdbItem};
pub use tokenizer::{ByteTokenizer, SubwordTokenizer, TextEncoderConfig, Tokenizer};
