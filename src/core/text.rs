//! String normalization for slot keys and slot values
//!
//! Voice platforms are loose about casing: slot keys can arrive as `artist`,
//! `Artist` or `ARTIST`, and spoken values arrive lower-cased. These helpers
//! are pure and locale-independent (they only use Unicode case mappings).

/// Normalize a slot key: first character upper-cased, the rest lower-cased
///
/// `"artist"` and `"ARTIST"` both become `"Artist"`.
pub fn capitalize_key(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Treat empty and whitespace-only values as absent
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Convert free text to start case: words split on separators, case changes
/// and letter-to-digit boundaries, each word's first letter upper-cased, joined
/// with single spaces.
///
/// `"road trip"` -> `"Road Trip"`, `"fooBar"` -> `"Foo Bar"`,
/// `"--summer-hits--"` -> `"Summer Hits"`, `"top40"` -> `"Top 40"`.
///
/// Accented letters are kept as spoken (`"café"` -> `"Café"`) and a digit run
/// followed by letters stays one word (`"80s"`), so the result can still match
/// a library playlist named with those characters.
pub fn start_case(input: &str) -> String {
    split_words(input)
        .iter()
        .map(|word| upper_first(word))
        .collect::<Vec<_>>()
        .join(" ")
}

fn upper_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn split_words(input: &str) -> Vec<String> {
    // Apostrophes are dropped so "don't" stays one word
    let chars: Vec<char> = input
        .chars()
        .filter(|c| *c != '\'' && *c != '\u{2019}')
        .collect();

    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if let Some(prev) = current.chars().last() {
            let next = chars.get(i + 1).copied();
            let camel = prev.is_lowercase() && c.is_uppercase();
            let acronym_end = prev.is_uppercase()
                && c.is_uppercase()
                && next.is_some_and(char::is_lowercase);
            let digit_edge = prev.is_alphabetic() && c.is_numeric();

            if camel || acronym_end || digit_edge {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }

    words
}
