//! Word dictionaries for the dictionary-swap strategy. A dictionary file is
//! one word per line: no blank lines, no duplicates, and at least two words
//! (a single word leaves nothing to swap to).

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Most dictionary files a single run may load.
pub const MAX_DICTS: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DictError {
    #[error("failed to read {path}: {reason}")]
    Io { path: PathBuf, reason: String },
    #[error("{path}: no empty lines are allowed in a dictionary")]
    BlankLine { path: PathBuf },
    #[error("{path}: duplicate word {word:?}")]
    Duplicate { path: PathBuf, word: String },
    #[error("{path}: a dictionary needs more than one word")]
    TooFew { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dictionary {
    words: Vec<Vec<u8>>,
}

impl Dictionary {
    /// Loads and checks one dictionary file.
    pub fn from_file(path: &Path) -> Result<Dictionary, DictError> {
        let text = fs::read_to_string(path).map_err(|e| DictError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut words: Vec<Vec<u8>> = Vec::new();
        for line in text.lines() {
            if line.is_empty() {
                return Err(DictError::BlankLine {
                    path: path.to_path_buf(),
                });
            }
            let word = line.as_bytes().to_vec();
            if words.contains(&word) {
                return Err(DictError::Duplicate {
                    path: path.to_path_buf(),
                    word: line.to_string(),
                });
            }
            words.push(word);
        }
        if words.len() < 2 {
            return Err(DictError::TooFew {
                path: path.to_path_buf(),
            });
        }
        Ok(Dictionary { words })
    }

    #[cfg(test)]
    pub(crate) fn from_words(words: &[&str]) -> Dictionary {
        Dictionary {
            words: words.iter().map(|w| w.as_bytes().to_vec()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[Vec<u8>] {
        &self.words
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_dict(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn loads_one_word_per_line() {
        let f = write_dict("GET\nPUT\nHEAD\n");
        let dict = Dictionary::from_file(f.path()).unwrap();
        assert_eq!(dict.len(), 3);
        assert_eq!(dict.words()[1], b"PUT");
    }

    #[test]
    fn rejects_blank_lines() {
        let f = write_dict("GET\n\nPUT\n");
        assert!(matches!(
            Dictionary::from_file(f.path()),
            Err(DictError::BlankLine { .. })
        ));
    }

    #[test]
    fn rejects_duplicates() {
        let f = write_dict("GET\nPUT\nGET\n");
        assert!(matches!(
            Dictionary::from_file(f.path()),
            Err(DictError::Duplicate { .. })
        ));
    }

    #[test]
    fn rejects_single_word_dictionaries() {
        let f = write_dict("GET\n");
        assert!(matches!(
            Dictionary::from_file(f.path()),
            Err(DictError::TooFew { .. })
        ));
    }

    #[test]
    fn rejects_missing_files() {
        assert!(matches!(
            Dictionary::from_file(Path::new("/nonexistent/words.txt")),
            Err(DictError::Io { .. })
        ));
    }
}
