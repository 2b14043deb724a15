pub mod trie;
pub mod error;

mod haschildren;
mod node;

pub use self::error::TrieError;
pub use self::trie::Trie;
