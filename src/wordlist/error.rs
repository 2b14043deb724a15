use thiserror::Error;

use crate::wordlist::trie::TrieError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("missing column {0}")]
    MissingColumn(usize),
    #[error("invalid frequency `{0}`")]
    InvalidFrequency(String),
    #[error("empty word")]
    EmptyWord,
}

#[derive(Error, Debug)]
pub enum WordlistError {
    #[error("`{0}`")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {source}")]
    Format { line: usize, source: FormatError },
    #[error("line {line}: rejected `{word}`: {source}")]
    InvalidWord { line: usize, word: String, source: TrieError },
}
