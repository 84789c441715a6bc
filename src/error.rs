//! Error types for the IMDB reviews adapter.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImdbError {
    #[error("unknown config `{name}`, expected one of: {}", available.join(", "))]
    UnknownConfig {
        name: String,
        available: Vec<&'static str>,
    },

    #[error("label directory not found: {}", path.display())]
    MissingLabelDir { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown label `{0}`")]
    UnknownLabel(String),

    #[error("invalid label id: {0}")]
    InvalidLabelId(usize),

    #[error("text encoder for config `{config}` needs a vocabulary that has not been built")]
    VocabularyNotBuilt { config: String },

    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    #[error("invalid version tag `{0}`")]
    InvalidVersion(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("no extracted data for {url} at {}", path.display())]
    DownloadNotFound { url: String, path: PathBuf },
}

impl ImdbError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ImdbError>;
