use super::{index_split, read_review, ImdbItem};
use crate::error::Result;
use crate::features::Label;
use burn::data::dataset::Dataset;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Random-access view over a split directory. Files are indexed once and
/// read on every `get`, in the same order as [`super::generate_examples`].
///
/// `Dataset::get` cannot report errors, so an unreadable file shows up as
/// `None` and `Dataset::iter` stops at the first one. Use
/// [`ImdbDataset::try_get`] to tell a read failure from the end of the split.
#[derive(Debug)]
pub struct ImdbDataset {
    files: Vec<(PathBuf, Label)>,
}

impl ImdbDataset {
    pub fn new<P: AsRef<Path>>(directory: P) -> Result<Self> {
        let files = index_split(directory.as_ref())?;
        Ok(Self { files })
    }

    pub fn train<P: AsRef<Path>>(root: P) -> Result<Self> {
        Self::new(root.as_ref().join("train"))
    }

    pub fn test<P: AsRef<Path>>(root: P) -> Result<Self> {
        Self::new(root.as_ref().join("test"))
    }

    pub fn path(&self, index: usize) -> Option<&Path> {
        self.files.get(index).map(|(path, _)| path.as_path())
    }

    /// Reads the review at `index`. `Ok(None)` past the end of the split.
    pub fn try_get(&self, index: usize) -> Result<Option<ImdbItem>> {
        let Some((path, label)) = self.files.get(index) else {
            return Ok(None);
        };
        let text = read_review(path)?;
        Ok(Some(ImdbItem::new(text, *label)))
    }

    /// Number of reviews per label, `[neg, pos]`.
    pub fn label_counts(&self) -> [usize; 2] {
        let pos = self
            .files
            .iter()
            .filter(|(_, label)| *label == Label::Pos)
            .count();
        [self.files.len() - pos, pos]
    }
}

impl Dataset<ImdbItem> for ImdbDataset {
    fn get(&self, index: usize) -> Option<ImdbItem> {
        match self.try_get(index) {
            Ok(item) => item,
            Err(e) => {
                warn!(index, error = %e, "skipping unreadable review");
                None
            }
        }
    }

    fn len(&self) -> usize {
        self.files.len()
    }
}
