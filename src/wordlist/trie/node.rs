use std::fmt::{Debug, Formatter};

use crate::alphabet::{letter, ALPHABET_SIZE};
use crate::wordlist::trie::haschildren::HasChildren;

#[derive(Default)]
pub(crate) struct TrieNode {
    children: [Option<Box<TrieNode>>; ALPHABET_SIZE],
    pub(crate) is_terminal: bool,
    pub(crate) count: usize,
}

impl TrieNode {
    pub(crate) fn get_child(&self, idx: usize) -> Option<&TrieNode> {
        self.children[idx].as_deref()
    }

    /// Returns the child in slot `idx`, creating it if absent. The flag tells
    /// whether a node was allocated.
    pub(crate) fn get_or_create_child(&mut self, idx: usize) -> (&mut TrieNode, bool) {
        let created = self.children[idx].is_none();
        let child = self.children[idx].get_or_insert_with(Default::default);
        (&mut **child, created)
    }

    /// Ends a word here, adding `freq` to the count. Returns the new count, or
    /// `None` without touching the node if the count would overflow.
    pub(crate) fn mark_terminal(&mut self, freq: usize) -> Option<usize> {
        let count = self.count.checked_add(freq)?;
        self.is_terminal = true;
        self.count = count;
        Some(count)
    }

    pub(crate) fn occurrences(&self) -> usize {
        if self.is_terminal {
            self.count
        } else {
            0
        }
    }

    fn take_first_child(&mut self) -> Option<Box<TrieNode>> {
        self.children.iter_mut().find_map(Option::take)
    }

    /// Frees every node below `self`, then `self`, children before parents.
    /// Returns the number of nodes released, `self` included.
    ///
    /// `path` holds the chain of detached nodes from `self` down to the node
    /// being emptied, so a node is only dropped once it has no children left.
    /// Depth is bounded by the heap, not the call stack.
    pub(crate) fn release(mut self) -> usize {
        let mut released = 0;
        let mut path: Vec<Box<TrieNode>> = Vec::new();
        loop {
            let parent = match path.last_mut() {
                Some(node) => &mut **node,
                None => &mut self,
            };
            match parent.take_first_child() {
                Some(child) => path.push(child),
                None => match path.pop() {
                    Some(leaf) => {
                        drop(leaf);
                        released += 1;
                    }
                    None => break,
                },
            }
        }
        drop(self);
        released + 1
    }
}

impl HasChildren for TrieNode {
    fn children(&self) -> &[Option<Box<Self>>] {
        &self.children
    }
}

impl Debug for TrieNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrieNode")
            .field("is_terminal", &self.is_terminal)
            .field("count", &self.count)
            .field("children", &self.children.iter()
                .enumerate()
                .filter(|(_, x)| x.is_some())
                .map(|(idx, _)| letter(idx))
                .collect::<Vec<_>>(),
            )
            .finish()
    }
}
