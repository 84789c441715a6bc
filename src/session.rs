use crate::error::{ImdbError, Result};
use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Record of one subword vocabulary build, stored next to the vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabSession {
    timestamp: String,
    config_name: String,
    vocab_size: usize,
    corpus_texts: usize,
    build_duration: Option<String>,
}

impl VocabSession {
    pub fn new(config_name: &str, vocab_size: usize, corpus_texts: usize) -> Self {
        Self {
            timestamp: Local::now().format("%Y%m%d_%H%M%S").to_string(),
            config_name: config_name.to_string(),
            vocab_size,
            corpus_texts,
            build_duration: None,
        }
    }

    fn id(&self) -> String {
        format!("vocab_{}_{}", self.config_name, self.timestamp)
    }

    /// Directory the vocabulary itself is saved into.
    pub fn vocab_path(&self, vocab_dir: &Path) -> PathBuf {
        vocab_dir.join(self.id())
    }

    pub fn config_path(&self, vocab_dir: &Path) -> PathBuf {
        vocab_dir.join(format!("{}.json", self.id()))
    }

    pub fn save(&self, vocab_dir: &Path) -> Result<()> {
        fs::create_dir_all(vocab_dir).map_err(|e| ImdbError::io(vocab_dir, e))?;
        let config_path = self.config_path(vocab_dir);
        let config_str = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, config_str).map_err(|e| ImdbError::io(&config_path, e))?;
        Ok(())
    }

    pub fn get_timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn get_config_name(&self) -> &str {
        &self.config_name
    }

    pub fn get_vocab_size(&self) -> usize {
        self.vocab_size
    }

    pub fn get_corpus_texts(&self) -> usize {
        self.corpus_texts
    }

    pub fn get_duration(&self) -> &Option<String> {
        &self.build_duration
    }

    pub fn set_duration(&mut self, duration: String) {
        self.build_duration = Some(duration);
    }
}

pub fn list_vocab_sessions(vocab_dir: &Path) -> Result<Vec<VocabSession>> {
    let mut sessions = Vec::<VocabSession>::new();

    for entry in fs::read_dir(vocab_dir).map_err(|e| ImdbError::io(vocab_dir, e))? {
        let path = entry.map_err(|e| ImdbError::io(vocab_dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            if let Ok(content) = fs::read_to_string(&path) {
                if let Ok(session) = serde_json::from_str(&content) {
                    sessions.push(session);
                }
            }
        }
    }

    // Newest first
    sessions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    Ok(sessions)
}

/// Newest session built for `config_name`, if any.
pub fn find_vocab_session(vocab_dir: &Path, config_name: &str) -> Result<Option<VocabSession>> {
    if !vocab_dir.is_dir() {
        return Ok(None);
    }
    Ok(list_vocab_sessions(vocab_dir)?
        .into_iter()
        .find(|s| s.config_name == config_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_sessions_are_listed_newest_first() {
        let dir = tempfile::tempdir().unwrap();

        let mut older = VocabSession::new("subwords8k", 8192, 25000);
        older.timestamp = "20240101_000000".to_string();
        older.set_duration("1.00s".to_string());
        older.save(dir.path()).unwrap();

        let mut newer = VocabSession::new("subwords8k", 8000, 100);
        newer.timestamp = "20240102_000000".to_string();
        newer.save(dir.path()).unwrap();

        VocabSession::new("subwords32k", 32768, 25000)
            .save(dir.path())
            .unwrap();

        // Stray files are ignored
        fs::write(dir.path().join("notes.json"), "not a session").unwrap();
        fs::create_dir_all(newer.vocab_path(dir.path())).unwrap();

        let sessions = list_vocab_sessions(dir.path()).unwrap();
        assert_eq!(sessions.len(), 3);

        let found = find_vocab_session(dir.path(), "subwords8k").unwrap().unwrap();
        assert_eq!(found, newer);
        assert_eq!(found.get_vocab_size(), 8000);
        assert!(found.get_duration().is_none());
        assert!(find_vocab_session(dir.path(), "bytes").unwrap().is_none());
    }

    #[test]
    fn missing_vocab_dir_has_no_sessions() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_vocab_session(&dir.path().join("absent"), "subwords8k")
            .unwrap()
            .is_none());
        assert!(list_vocab_sessions(&dir.path().join("absent")).is_err());
    }

    #[test]
    fn paths_are_keyed_by_config_and_timestamp() {
        let mut session = VocabSession::new("subwords8k", 8192, 10);
        session.timestamp = "20240101_000000".to_string();
        let root = Path::new("vocabs");
        assert_eq!(
            session.vocab_path(root),
            Path::new("vocabs/vocab_subwords8k_20240101_000000")
        );
        assert_eq!(
            session.config_path(root),
            Path::new("vocabs/vocab_subwords8k_20240101_000000.json")
        );
    }
}
