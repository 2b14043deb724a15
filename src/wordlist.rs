pub mod trie;
pub mod format;
pub mod error;
pub mod wordlist;
