use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum CharClass {
    Symbol,
    Digit,
    Letter,
}

fn primary_weight(ch: char) -> (CharClass, char) {
    if ch.is_alphabetic() {
        let folded = ch.to_lowercase().next().unwrap_or(ch);
        (CharClass::Letter, folded)
    } else if ch.is_numeric() {
        (CharClass::Digit, ch)
    } else {
        (CharClass::Symbol, ch)
    }
}

fn case_weight(ch: char) -> u8 {
    if ch.is_uppercase() { 1 } else { 0 }
}

// Root-locale-like order: case-insensitive first, symbols < digits < letters,
// then lowercase before uppercase, then code point.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.chars()
        .map(primary_weight)
        .cmp(b.chars().map(primary_weight))
        .then_with(|| a.chars().map(case_weight).cmp(b.chars().map(case_weight)))
        .then_with(|| a.cmp(b))
}
