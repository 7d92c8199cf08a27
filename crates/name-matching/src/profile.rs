//! Precomputed name forms, so reference entries are normalized once per load
//! rather than once per screening call.

use crate::normalize::{normalize, tokenize, TokenSet};
use crate::similarity::{blend, similarity, token_overlap};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameProfile {
    normalized: String,
    tokens: TokenSet,
}

impl NameProfile {
    pub fn new(raw: &str) -> Self {
        let normalized = normalize(raw);
        let tokens = tokenize(&normalized);
        Self { normalized, tokens }
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn tokens(&self) -> &TokenSet {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }

    /// Blended Jaro-Winkler / token-overlap score against another profile.
    pub fn score(&self, other: &NameProfile, token_weight: f64) -> f64 {
        let name_score = similarity(&self.normalized, &other.normalized);
        let token_score = token_overlap(&self.tokens, &other.tokens);
        blend(name_score, token_score, token_weight)
    }
}
