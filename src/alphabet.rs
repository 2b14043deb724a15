pub const ALPHABET: &[u8] = "abcdefghijklmnopqrstuvwxyz".as_bytes();
pub const ALPHABET_SIZE: usize = ALPHABET.len();

/// Slot of `a` in a node's children, or `None` if `a` is not a lowercase ASCII letter.
pub fn get_idx(a: char) -> Option<usize> {
    if a.is_ascii_lowercase() {
        Some((a as u8 - b'a') as usize)
    } else {
        None
    }
}

pub fn letter(idx: usize) -> char {
    ALPHABET[idx] as char
}
