/// A finished, length-checked tweet.

use std::fmt;

use crate::core::text::utf16_len;

/// Composed text ready for the posting collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tweet {
    pub text: String,
    /// Composition attempts spent to produce this tweet (1-based).
    pub attempts: u32,
}

impl Tweet {
    pub fn new(text: impl Into<String>, attempts: u32) -> Self {
        Self {
            text: text.into(),
            attempts,
        }
    }

    /// Length in UTF-16 code units, never less than the character count.
    pub fn length(&self) -> usize {
        utf16_len(&self.text)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Tweet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
