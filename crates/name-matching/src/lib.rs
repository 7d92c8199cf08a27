//! Name Matching
//!
//! Canonicalization, tokenization and blended fuzzy scoring of free-text names.

pub mod normalize;
pub mod profile;
pub mod similarity;

pub use normalize::{normalize, tokenize, TokenSet};
pub use profile::NameProfile;
pub use similarity::{blend, similarity, token_overlap};
