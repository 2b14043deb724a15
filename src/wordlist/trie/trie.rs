use std::fmt::{Debug, Formatter};
use std::mem::{take, ManuallyDrop};

use metrics::{decrement_gauge, increment_counter, increment_gauge};
use tracing::{debug, trace};

use crate::alphabet::get_idx;
use crate::wordlist::trie::error::TrieError;
use crate::wordlist::trie::haschildren::HasChildren;
use crate::wordlist::trie::node::TrieNode;

/// A prefix tree over `a`-`z` counting how many times each word was inserted.
pub struct Trie {
    root: TrieNode,
    /// Live nodes, root included.
    nodes: usize,
}

impl Default for Trie {
    fn default() -> Self {
        Trie::new()
    }
}

impl Trie {
    pub fn new() -> Trie {
        increment_gauge!("trie_nodes", 1.0);
        Trie {
            root: Default::default(),
            nodes: 1,
        }
    }

    pub fn insert(&mut self, word: &str) -> Result<(), TrieError> {
        self.insert_with_freq(word, 1)
    }

    pub fn insert_all<'f, I>(&mut self, items: I) -> Result<(), TrieError>
        where I: IntoIterator<Item=&'f str> {
        items.into_iter().try_for_each(|x| self.insert(x))
    }

    /// Adds `freq` occurrences of `word`. The whole word is checked before
    /// any node is created, so a rejected word leaves the trie untouched. A
    /// count that would overflow is rejected and keeps its old value.
    pub fn insert_with_freq(&mut self, word: &str, freq: usize) -> Result<(), TrieError> {
        let indices = match Self::indices(word) {
            Ok(indices) => indices,
            Err(e) => {
                increment_counter!("trie_rejected_insertions");
                return Err(e);
            }
        };

        let mut current = &mut self.root;
        let mut created = 0;
        for idx in indices {
            let (child, fresh) = current.get_or_create_child(idx);
            if fresh {
                created += 1;
            }
            current = child;
        }
        let marked = current.mark_terminal(freq);

        self.nodes += created;
        if created > 0 {
            increment_gauge!("trie_nodes", created as f64);
        }
        if marked.is_none() {
            increment_counter!("trie_rejected_insertions");
            return Err(TrieError::CountOverflow { word: word.to_string() });
        }
        increment_counter!("trie_insertions");
        trace!(word, freq, created, "inserted");
        Ok(())
    }

    /// Number of times `word` was inserted. Words that were never inserted,
    /// that only exist as a prefix of another word, or that contain
    /// characters outside the alphabet all count 0.
    pub fn lookup(&self, word: &str) -> usize {
        increment_counter!("trie_lookups");
        self.get_node(word)
            .map(|x| x.occurrences())
            .unwrap_or(0)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.get_node(word)
            .map(|x| x.is_terminal)
            .unwrap_or(false)
    }

    pub fn node_count(&self) -> usize {
        self.nodes
    }

    /// Every inserted word with its count, in alphabetical order.
    pub fn entries(&self) -> Vec<(String, usize)> {
        let mut entries = vec![];
        self.root.traverse_prefix(&mut |path, node| {
            if node.is_terminal {
                entries.push((path.to_string(), node.count));
            }
        });
        entries
    }

    /// Releases every node, root last, and returns how many were freed.
    pub fn teardown(self) -> usize {
        debug_assert_eq!(self.count_nodes(), self.nodes);
        let mut this = ManuallyDrop::new(self);
        let released = this.release();
        debug!(released, "tore down trie");
        released
    }

    fn release(&mut self) -> usize {
        let released = take(&mut self.root).release();
        self.nodes = 0;
        decrement_gauge!("trie_nodes", released as f64);
        released
    }

    fn count_nodes(&self) -> usize {
        let mut count = 0;
        self.root.traverse_postfix(&mut |_| count += 1);
        count
    }

    fn indices(word: &str) -> Result<Vec<usize>, TrieError> {
        word.chars()
            .enumerate()
            .map(|(position, character)| get_idx(character)
                .ok_or(TrieError::InvalidCharacter { character, position }))
            .collect()
    }

    fn get_node(&self, word: &str) -> Option<&TrieNode> {
        word.chars()
            .try_fold(&self.root, |node, c| get_idx(c).and_then(|idx| node.get_child(idx)))
    }
}

impl Drop for Trie {
    fn drop(&mut self) {
        let released = self.release();
        trace!(released, "dropped trie");
    }
}

impl Debug for Trie {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trie")
            .field("nodes", &self.nodes)
            .field("words", &self.entries())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use maplit::hashmap;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    use crate::wordlist::trie::error::TrieError;
    use crate::wordlist::trie::trie::Trie;

    fn random_words(rng: &mut StdRng, n: usize) -> Vec<String> {
        (0..n).map(|_| {
            let len = rng.gen_range(1..=8);
            (0..len).map(|_| rng.gen_range(b'a'..=b'e') as char).collect()
        }).collect()
    }

    #[test]
    fn counts_sample_dictionary() {
        let mut trie = Trie::new();
        trie.insert_all(vec!["note", "no", "note"]).unwrap();

        assert_eq!(trie.lookup("note"), 2);
        assert_eq!(trie.lookup("no"), 1);
        assert_eq!(trie.lookup("not"), 0);
        assert_eq!(trie.lookup("notaword"), 0);
    }

    #[test]
    fn empty_trie_finds_nothing() {
        let trie = Trie::new();
        assert_eq!(trie.lookup("ucf"), 0);
        assert_eq!(trie.lookup("corg"), 0);
        assert_eq!(trie.node_count(), 1);
        assert!(trie.entries().is_empty());
    }

    #[test]
    fn nested_words_are_all_terminal() {
        let mut trie = Trie::new();
        trie.insert_all(vec!["a", "ab", "abc"]).unwrap();

        assert_eq!(trie.lookup("a"), 1);
        assert_eq!(trie.lookup("ab"), 1);
        assert_eq!(trie.lookup("abc"), 1);
        assert_eq!(trie.lookup("abcd"), 0);
        assert_eq!(trie.node_count(), 4);
    }

    #[test]
    fn teardown_releases_every_node() {
        let mut trie = Trie::new();
        for _ in 0..3 {
            trie.insert("cat").unwrap();
        }
        assert_eq!(trie.lookup("cat"), 3);
        assert_eq!(trie.node_count(), 4);
        assert_eq!(trie.teardown(), 4);
    }

    #[test]
    fn teardown_of_empty_trie_releases_root() {
        assert_eq!(Trie::new().teardown(), 1);
    }

    #[test]
    fn shared_prefixes_share_nodes() {
        let mut trie = Trie::new();
        trie.insert_all(vec!["note", "no", "nothing", "not"]).unwrap();
        // root + n,o,t,e + h,i,n,g
        assert_eq!(trie.node_count(), 9);
        assert_eq!(trie.count_nodes(), 9);
    }

    #[test]
    fn every_inserted_word_is_found() {
        let mut rng = StdRng::seed_from_u64(7);
        let words = random_words(&mut rng, 500);
        let mut expected: HashMap<&str, usize> = HashMap::new();
        let mut trie = Trie::new();
        for word in &words {
            trie.insert(word).unwrap();
            *expected.entry(word.as_str()).or_insert(0) += 1;
        }

        for (word, count) in expected {
            assert_eq!(trie.lookup(word), count, "{}", word);
            assert!(trie.contains(word));
        }
        assert_eq!(trie.node_count(), trie.count_nodes());
    }

    #[test]
    fn strict_prefixes_are_not_members() {
        let mut trie = Trie::new();
        trie.insert("hello").unwrap();

        for prefix in ["h", "he", "hel", "hell"] {
            assert_eq!(trie.lookup(prefix), 0);
            assert!(!trie.contains(prefix));
        }
        assert_eq!(trie.lookup("hello"), 1);
        assert_eq!(trie.lookup("hellos"), 0);
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut words = vec!["goodbye", "good", "good", "help", "hello", "hello", "hello", "he"];
        let expected = hashmap! {
            "goodbye" => 1,
            "good" => 2,
            "help" => 1,
            "hello" => 3,
            "he" => 1,
        };

        let mut first = Trie::new();
        first.insert_all(words.iter().copied()).unwrap();
        for _ in 0..20 {
            words.shuffle(&mut rng);
            let mut shuffled = Trie::new();
            shuffled.insert_all(words.iter().copied()).unwrap();
            assert_eq!(shuffled.entries(), first.entries());
            assert_eq!(shuffled.node_count(), first.node_count());
            for (word, count) in &expected {
                assert_eq!(shuffled.lookup(word), *count);
            }
        }
    }

    #[test]
    fn lookups_do_not_grow_the_trie() {
        let mut trie = Trie::new();
        trie.insert_all(vec!["note", "no"]).unwrap();
        let before = trie.count_nodes();

        for word in ["notaword", "ucf", "no", "note", "corg", "n", "", "NOTE", "nö"] {
            trie.lookup(word);
            trie.contains(word);
        }

        assert_eq!(trie.count_nodes(), before);
        assert_eq!(trie.node_count(), before);
        assert_eq!(trie.entries(), vec![("no".to_string(), 1), ("note".to_string(), 1)]);
    }

    #[test]
    fn invalid_characters_are_rejected() {
        let mut trie = Trie::new();
        trie.insert("no").unwrap();
        let nodes = trie.node_count();

        assert_eq!(trie.insert("noTe"),
                   Err(TrieError::InvalidCharacter { character: 'T', position: 2 }));
        assert_eq!(trie.insert("no-e"),
                   Err(TrieError::InvalidCharacter { character: '-', position: 2 }));
        assert_eq!(trie.insert("café"),
                   Err(TrieError::InvalidCharacter { character: 'é', position: 3 }));

        assert_eq!(trie.node_count(), nodes);
        assert_eq!(trie.count_nodes(), nodes);
        assert_eq!(trie.lookup("no"), 1);
        assert_eq!(trie.lookup("noTe"), 0);
        assert_eq!(trie.lookup("caf"), 0);
    }

    #[test]
    fn insert_all_stops_at_first_invalid_word() {
        let mut trie = Trie::new();
        let result = trie.insert_all(vec!["one", "Two", "three"]);

        assert!(result.is_err());
        assert_eq!(trie.lookup("one"), 1);
        assert_eq!(trie.lookup("three"), 0);
    }

    #[test]
    fn weighted_insertions_add_up() {
        let mut trie = Trie::new();
        trie.insert_with_freq("note", 5).unwrap();
        trie.insert("note").unwrap();
        trie.insert_with_freq("nope", 0).unwrap();

        assert_eq!(trie.lookup("note"), 6);
        assert_eq!(trie.lookup("nope"), 0);
        assert!(trie.contains("nope"));
    }

    #[test]
    fn empty_word_marks_root() {
        let mut trie = Trie::new();
        assert_eq!(trie.lookup(""), 0);
        trie.insert("").unwrap();
        assert_eq!(trie.lookup(""), 1);
        assert_eq!(trie.node_count(), 1);
        assert_eq!(trie.entries(), vec![(String::new(), 1)]);
    }

    #[test]
    fn dropping_a_deep_trie_does_not_recurse() {
        let mut trie = Trie::new();
        let word = "a".repeat(200_000);
        trie.insert(&word).unwrap();
        assert_eq!(trie.lookup(&word), 1);
        assert_eq!(trie.node_count(), 200_001);
        drop(trie);
    }

    #[test]
    fn teardown_of_a_deep_trie_does_not_recurse() {
        let mut trie = Trie::new();
        trie.insert(&"a".repeat(200_000)).unwrap();
        trie.insert("b").unwrap();
        assert_eq!(trie.teardown(), 200_002);
    }

    #[test]
    fn entries_of_a_deep_trie() {
        let mut trie = Trie::new();
        let word = "z".repeat(200_000);
        trie.insert(&word).unwrap();
        trie.insert("zz").unwrap();

        let entries = trie.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], ("zz".to_string(), 1));
        assert_eq!(entries[1].0.len(), 200_000);
        assert_eq!(trie.count_nodes(), 200_001);
    }

    #[test]
    fn entries_are_alphabetical() {
        let mut trie = Trie::new();
        trie.insert_all(vec!["ba", "b", "ab", "a", "abc", "c"]).unwrap();
        let words: Vec<String> = trie.entries().into_iter().map(|(w, _)| w).collect();
        assert_eq!(words, vec!["a", "ab", "abc", "b", "ba", "c"]);
    }

    #[test]
    fn overflowing_count_is_rejected() {
        let mut trie = Trie::new();
        trie.insert_with_freq("a", usize::MAX).unwrap();
        let nodes = trie.node_count();

        assert_eq!(trie.insert_with_freq("a", 2),
                   Err(TrieError::CountOverflow { word: "a".to_string() }));
        assert_eq!(trie.insert("a"),
                   Err(TrieError::CountOverflow { word: "a".to_string() }));
        assert_eq!(trie.lookup("a"), usize::MAX);
        assert_eq!(trie.node_count(), nodes);

        trie.insert("ab").unwrap();
        assert_eq!(trie.lookup("ab"), 1);
    }

    #[test]
    fn debug_lists_words() {
        let mut trie = Trie::new();
        trie.insert_all(vec!["b", "a", "b"]).unwrap();
        let printed = format!("{:?}", trie);
        assert_eq!(printed, r#"Trie { nodes: 3, words: [("a", 1), ("b", 2)] }"#);
    }
}
