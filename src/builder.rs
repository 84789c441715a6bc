//! The IMDB reviews dataset builder.
//!
//! Ties a configuration to its feature schema, orchestrates the splits and
//! produces encoded records per split.

use crate::config::{ImdbReviewsConfig, Version};
use crate::data::{self, ImdbItem};
use crate::download::DownloadManager;
use crate::error::Result;
use crate::features::{EncodedRecord, FeaturesDict};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const NAME: &str = "imdb_reviews";

pub const DESCRIPTION: &str = "Large Movie Review Dataset.
This is a dataset for binary sentiment classification containing substantially \
more data than previous benchmark datasets. We provide a set of 25,000 highly \
polar movie reviews for training, and 25,000 for testing.";

pub const CITATION: &str = r"@InProceedings{maas-EtAl:2011:ACL-HLT2011,
  author    = {Maas, Andrew L.  and  Daly, Raymond E.  and  Pham, Peter T.  and  Huang, Dan  and  Ng, Andrew Y.  and  Potts, Christopher},
  title     = {Learning Word Vectors for Sentiment Analysis},
  booktitle = {Proceedings of the 49th Annual Meeting of the Association for Computational Linguistics: Human Language Technologies},
  month     = {June},
  year      = {2011},
  address   = {Portland, Oregon, USA},
  publisher = {Association for Computational Linguistics},
  pages     = {142--150},
  url       = {http://www.aclweb.org/anthology/P11-1015}
}
";

pub const DOWNLOAD_URL: &str = "http://ai.stanford.edu/~amaas/data/sentiment/aclImdb_v1.tar.gz";
pub const HOMEPAGE: &str = "http://ai.stanford.edu/~amaas/data/sentiment/";

/// Approximate size of the downloaded archive.
pub const SIZE_IN_BYTES: u64 = 85 * 1024 * 1024;

pub const NUM_SHARDS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Test,
}

impl Split {
    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Test => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a split's examples come from and how many shards it is written to.
#[derive(new, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitGenerator {
    pub name: Split,
    pub num_shards: usize,
    pub directory: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct DatasetInfo {
    pub name: &'static str,
    pub config_name: &'static str,
    pub version: Version,
    pub description: &'static str,
    pub citation: &'static str,
    pub urls: Vec<&'static str>,
    pub size_in_bytes: u64,
    pub supervised_keys: (&'static str, &'static str),
    pub features: FeaturesDict,
}

impl DatasetInfo {
    fn new(config: &ImdbReviewsConfig) -> Self {
        Self {
            name: NAME,
            config_name: config.name,
            version: config.version,
            description: DESCRIPTION,
            citation: CITATION,
            urls: vec![HOMEPAGE],
            size_in_bytes: SIZE_IN_BYTES,
            supervised_keys: ("text", "label"),
            features: FeaturesDict::new(config.text_encoder),
        }
    }
}

pub struct ImdbReviews {
    config: ImdbReviewsConfig,
    info: DatasetInfo,
}

impl ImdbReviews {
    pub fn new(config: ImdbReviewsConfig) -> Self {
        let info = DatasetInfo::new(&config);
        Self { config, info }
    }

    /// Builder for the configuration called `name`.
    pub fn from_config_name(name: &str) -> Result<Self> {
        ImdbReviewsConfig::from_name(name).map(Self::new)
    }

    pub fn config(&self) -> &ImdbReviewsConfig {
        &self.config
    }

    pub fn info(&self) -> &DatasetInfo {
        &self.info
    }

    pub fn info_mut(&mut self) -> &mut DatasetInfo {
        &mut self.info
    }

    /// Fetches the corpus, builds the subword vocabulary from the training
    /// split when the text encoder needs one, and describes both splits.
    pub fn split_generators(
        &mut self,
        dl_manager: &dyn DownloadManager,
    ) -> Result<Vec<SplitGenerator>> {
        let root = dl_manager.download_and_extract(DOWNLOAD_URL)?;
        let train_dir = root.join(Split::Train.as_str());
        let test_dir = root.join(Split::Test.as_str());

        if self.info.features.text.needs_vocab() {
            info!(
                config = self.config.name,
                dir = %train_dir.display(),
                "scanning training corpus for vocabulary"
            );
            self.info
                .features
                .text
                .maybe_build_from_corpus(data::vocab_text_gen(&train_dir)?)?;
        }

        Ok(vec![
            SplitGenerator::new(Split::Train, NUM_SHARDS, train_dir),
            SplitGenerator::new(Split::Test, NUM_SHARDS, test_dir),
        ])
    }

    /// Encoded records of the split stored in `directory`.
    pub fn generate_examples<'a>(
        &'a self,
        directory: &Path,
    ) -> Result<impl Iterator<Item = Result<EncodedRecord>> + 'a> {
        debug!(config = self.config.name, dir = %directory.display(), "generating examples");
        let examples = data::generate_examples(directory)?;
        Ok(examples.map(move |example| {
            example.and_then(|ex: ImdbItem| self.info.features.encode_example(&ex))
        }))
    }
}
