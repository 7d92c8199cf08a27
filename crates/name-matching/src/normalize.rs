//! Text normalization for name screening
//!
//! - Unicode NFD decomposition with combining marks removed
//! - Lowercase conversion
//! - Everything outside `[a-z0-9]` becomes a space
//! - Whitespace collapsing and trimming

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonicalize a raw name.
///
/// Pure and idempotent: `normalize(&normalize(x)) == normalize(x)`.
///
/// ```
/// use name_matching::normalize;
///
/// assert_eq!(normalize("  José   Núñez-García "), "jose nunez garcia");
/// assert_eq!(normalize("AL-QAIDA (a.k.a. \"The Base\")"), "al qaida a k a the base");
/// ```
pub fn normalize(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len());

    for c in raw.nfd().filter(|c| !is_combining_mark(*c)) {
        for lower in c.to_lowercase() {
            if lower.is_ascii_lowercase() || lower.is_ascii_digit() {
                cleaned.push(lower);
            } else {
                cleaned.push(' ');
            }
        }
    }

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Ordered set of name tokens: insertion order kept, duplicates dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSet {
    tokens: Vec<String>,
}

impl TokenSet {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    fn insert(&mut self, token: &str) {
        if !self.contains(token) {
            self.tokens.push(token.to_string());
        }
    }
}

impl<'a> FromIterator<&'a str> for TokenSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = TokenSet::default();
        for token in iter {
            set.insert(token);
        }
        set
    }
}

/// Split an already-normalized name on whitespace.
pub fn tokenize(normalized: &str) -> TokenSet {
    normalized.split_whitespace().collect()
}
