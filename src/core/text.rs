//! Small string transforms shared by the sampler and decorators.

/// Strip trailing characters until the string ends in an ASCII letter.
///
/// A string with no ASCII letter at all collapses to `""`.
pub fn trim_trailing_punctuation(phrase: &str) -> &str {
    phrase.trim_end_matches(|c: char| !c.is_ascii_alphabetic())
}

/// Keep only ASCII letters.
pub fn strip_non_letters(word: &str) -> String {
    word.chars().filter(char::is_ascii_alphabetic).collect()
}

/// Uppercase the first character, leave the rest untouched.
pub fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Length as counted by the posting API: UTF-16 code units.
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}
