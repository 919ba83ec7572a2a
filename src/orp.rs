/// Index of the optimal recognition point of a word: the character the
/// eye should fixate on while the word is flashed. Slightly left of
/// centre, by char count so multi-byte words behave.
pub fn orp_index(word: &str) -> usize {
    match word.chars().count() {
        0..=1 => 0,
        2..=5 => 1,
        6..=9 => 2,
        _ => 3,
    }
}
