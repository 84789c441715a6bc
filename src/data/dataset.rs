use crate::error::{ImdbError, Result};
use crate::features::Label;
use std::fs;
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};
use tracing::debug;

mod imdb;

pub use imdb::ImdbDataset;

/// A raw review with the label of the folder it was found in.
#[derive(new, Clone, Debug, PartialEq, Eq)]
pub struct ImdbItem {
    pub text: String,
    pub label: Label,
}

/// Reads one review file. Leading and trailing whitespace is stripped,
/// nothing else is touched.
pub fn read_review(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map(|text| strip_review(&text).to_string())
        .map_err(|e| ImdbError::io(path, e))
}

/// Unicode whitespace plus the ASCII file/group/record/unit separators
/// (U+001C..U+001F), which `str::trim` keeps.
fn strip_review(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || ('\x1c'..='\x1f').contains(&c))
}

fn list_label_dir(directory: &Path, label: Label) -> Result<Vec<PathBuf>> {
    let dir = directory.join(label.dir_name());
    if !dir.is_dir() {
        return Err(ImdbError::MissingLabelDir { path: dir });
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(&dir).map_err(|e| ImdbError::io(&dir, e))? {
        let path = entry.map_err(|e| ImdbError::io(&dir, e))?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    // read_dir order is filesystem dependent
    files.sort();

    debug!(dir = %dir.display(), files = files.len(), "listed label directory");
    Ok(files)
}

/// Every review file of a split, `pos` files first, then `neg`.
pub(crate) fn index_split(directory: &Path) -> Result<Vec<(PathBuf, Label)>> {
    let pos = list_label_dir(directory, Label::Pos)?;
    let neg = list_label_dir(directory, Label::Neg)?;

    Ok(pos
        .into_iter()
        .map(|path| (path, Label::Pos))
        .chain(neg.into_iter().map(|path| (path, Label::Neg)))
        .collect())
}

/// Lazy sequence of [`ImdbItem`]s over one split directory.
///
/// File names are listed up front, contents are read one file per `next()`.
/// After the first read error the iterator yields nothing more.
#[derive(Debug)]
pub struct Examples {
    files: std::vec::IntoIter<(PathBuf, Label)>,
    failed: bool,
}

impl Iterator for Examples {
    type Item = Result<ImdbItem>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let (path, label) = self.files.next()?;
        match read_review(&path) {
            Ok(text) => Some(Ok(ImdbItem::new(text, label))),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            (0, Some(0))
        } else {
            (0, Some(self.files.len()))
        }
    }
}

impl FusedIterator for Examples {}

/// Generates the examples of the split stored in `directory`, which must
/// contain a `pos` and a `neg` subdirectory.
pub fn generate_examples<P: AsRef<Path>>(directory: P) -> Result<Examples> {
    let files = index_split(directory.as_ref())?;
    Ok(Examples {
        files: files.into_iter(),
        failed: false,
    })
}

/// Review texts of the training split, for vocabulary building.
pub fn vocab_text_gen<P: AsRef<Path>>(
    train_dir: P,
) -> Result<impl Iterator<Item = Result<String>> + Send> {
    Ok(generate_examples(train_dir)?.map(|example| example.map(|ex| ex.text)))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::Path;

    /// Writes a split directory with the given review files.
    pub(crate) fn write_split(root: &Path, pos: &[(&str, &str)], neg: &[(&str, &str)]) {
        for (label, files) in [("pos", pos), ("neg", neg)] {
            let dir = root.join(label);
            fs::create_dir_all(&dir).unwrap();
            for (name, content) in files {
                fs::write(dir.join(name), content).unwrap();
            }
        }
    }

    #[test]
    fn single_positive_review() {
        let dir = tempfile::tempdir().unwrap();
        write_split(dir.path(), &[("0_10.txt", "Great movie!\n")], &[]);

        let examples: Vec<_> = generate_examples(dir.path())
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(
            examples,
            vec![ImdbItem::new("Great movie!".to_string(), Label::Pos)]
        );
    }

    #[test]
    fn positives_come_before_negatives() {
        let dir = tempfile::tempdir().unwrap();
        write_split(
            dir.path(),
            &[("b.txt", "second"), ("a.txt", "first"), ("c.txt", "third")],
            &[("x.txt", "awful"), ("y.txt", "dull")],
        );

        let examples: Vec<ImdbItem> = generate_examples(dir.path())
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(examples.len(), 5);
        assert!(examples[..3].iter().all(|ex| ex.label == Label::Pos));
        assert!(examples[3..].iter().all(|ex| ex.label == Label::Neg));

        let texts: Vec<_> = examples.iter().map(|ex| ex.text.as_str()).collect();
        assert_eq!(texts, ["first", "second", "third", "awful", "dull"]);
    }

    #[test]
    fn only_surrounding_whitespace_is_stripped() {
        let dir = tempfile::tempdir().unwrap();
        write_split(
            dir.path(),
            &[("a.txt", "  \tLoved it.<br /><br />  Really.\n\n")],
            &[],
        );

        let example = generate_examples(dir.path()).unwrap().next().unwrap().unwrap();
        assert_eq!(example.text, "Loved it.<br /><br />  Really.");
        assert_eq!(example.text.trim(), example.text);
    }

    #[test]
    fn separator_controls_are_stripped_with_whitespace() {
        assert_eq!(strip_review("\x1fhi\x1c\n"), "hi");
        assert_eq!(strip_review("\u{00a0}\x1d a\x1eb \x1e"), "a\x1eb");
        assert_eq!(strip_review("\x1bkeep\x7f"), "\x1bkeep\x7f");
    }

    #[test]
    fn generation_is_restartable() {
        let dir = tempfile::tempdir().unwrap();
        write_split(
            dir.path(),
            &[("1.txt", "good"), ("2.txt", "fine")],
            &[("3.txt", "bad")],
        );

        let first: Vec<_> = generate_examples(dir.path())
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap();
        let second: Vec<_> = generate_examples(dir.path())
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn nested_directories_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_split(dir.path(), &[("a.txt", "good")], &[]);
        fs::create_dir_all(dir.path().join("pos").join("nested")).unwrap();

        assert_eq!(generate_examples(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn missing_label_dir_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("pos")).unwrap();

        let err = generate_examples(dir.path()).unwrap_err();
        match err {
            ImdbError::MissingLabelDir { path } => assert!(path.ends_with("neg")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unreadable_file_aborts_generation() {
        let dir = tempfile::tempdir().unwrap();
        write_split(dir.path(), &[("a.txt", "fine")], &[("b.txt", "also fine")]);
        // Invalid UTF-8 cannot be read as text
        fs::write(dir.path().join("pos").join("b.txt"), [0xff, 0xfe, 0xfd]).unwrap();

        let mut examples = generate_examples(dir.path()).unwrap();
        assert!(examples.next().unwrap().is_ok());
        let err = examples.next().unwrap().unwrap_err();
        assert!(matches!(err, ImdbError::Io { .. }));
        assert!(examples.next().is_none());
    }

    #[test]
    fn vocab_feeder_matches_generator_texts() {
        let dir = tempfile::tempdir().unwrap();
        write_split(
            dir.path(),
            &[("1.txt", " good \n"), ("2.txt", "fine")],
            &[("3.txt", "bad\n")],
        );

        let texts: Vec<String> = vocab_text_gen(dir.path())
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        let expected: Vec<String> = generate_examples(dir.path())
            .unwrap()
            .map(|ex| ex.unwrap().text)
            .collect();
        assert_eq!(texts, expected);
        assert_eq!(texts, ["good", "fine", "bad"]);
    }

    #[test]
    fn label_round_trips_through_dir_name() {
        for label in Label::ALL {
            assert_eq!(label.dir_name().parse::<Label>().unwrap(), label);
        }
        assert!("neutral".parse::<Label>().is_err());
    }
}
