//! Download manager seam. Fetching and unpacking archives is left to the
//! implementor; the crate only ships a resolver for already extracted data.

use crate::error::{ImdbError, Result};
use std::path::PathBuf;
use tracing::debug;

pub trait DownloadManager {
    /// Makes the resource at `url` available locally and returns the
    /// directory holding its extracted content.
    fn download_and_extract(&self, url: &str) -> Result<PathBuf>;
}

/// Resolves every URL to a directory the archive was already extracted into.
#[derive(new, Debug, Clone)]
pub struct LocalDownloadManager {
    extracted_dir: PathBuf,
}

impl DownloadManager for LocalDownloadManager {
    fn download_and_extract(&self, url: &str) -> Result<PathBuf> {
        if !self.extracted_dir.is_dir() {
            return Err(ImdbError::DownloadNotFound {
                url: url.to_string(),
                path: self.extracted_dir.clone(),
            });
        }
        debug!(url, dir = %self.extracted_dir.display(), "using extracted archive");
        Ok(self.extracted_dir.clone())
    }
}
