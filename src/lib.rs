//! IMDB movie-review sentiment dataset.
//!
//! Turns an extracted `aclImdb` corpus into `(text, label)` examples and
//! encoded records, optionally learning a subword vocabulary from the
//! training split first.

#[macro_use]
extern crate derive_new;

pub mod builder;
pub mod config;
pub mod data;
pub mod download;
pub mod error;
pub mod features;
pub mod session;

pub use builder::{DatasetInfo, ImdbReviews, Split, SplitGenerator};
pub use config::ImdbReviewsConfig;
pub use data::{generate_examples, vocab_text_gen, ImdbDataset, ImdbItem};
pub use download::{DownloadManager, LocalDownloadManager};
pub use error::{ImdbError, Result};
pub use features::{EncodedRecord, EncodedText, Label};
