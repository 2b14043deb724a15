use crate::alphabet::letter;

pub(crate) trait HasChildren: Sized {
    fn children(&self) -> &[Option<Box<Self>>];

    /// Visits every node before its subtrees, siblings in alphabetical order.
    /// `f` gets the prefix spelled by the node it visits.
    fn traverse_prefix<F>(&self, f: &mut F)
        where F: FnMut(&str, &Self) {
        let mut path = String::new();
        // (length of the parent's path, letter leading here, node)
        let mut stack: Vec<(usize, Option<char>, &Self)> = vec![(0, None, self)];
        while let Some((depth, c, node)) = stack.pop() {
            path.truncate(depth);
            if let Some(c) = c {
                path.push(c);
            }
            f(&path, node);
            for (idx, child) in node.children().iter().enumerate().rev() {
                if let Some(child) = child {
                    stack.push((path.len(), Some(letter(idx)), &**child));
                }
            }
        }
    }

    /// Visits every node after its subtrees.
    fn traverse_postfix<F>(&self, f: &mut F)
        where F: FnMut(&Self) {
        let mut stack: Vec<(&Self, bool)> = vec![(self, false)];
        while let Some((node, expanded)) = stack.pop() {
            if expanded {
                f(node);
            } else {
                stack.push((node, true));
                for child in node.children().iter().flatten().rev() {
                    stack.push((&**child, false));
                }
            }
        }
    }
}
