//! Bounded similarity metrics and the blend used for screening scores.

use crate::normalize::TokenSet;

/// Jaro-Winkler similarity of two normalized names (0.0 to 1.0).
///
/// Returns 1.0 for equal non-empty input and 0.0 when either side is empty.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    unit(strsim::jaro_winkler(a, b))
}

/// Jaccard index of two token sets: |A ∩ B| / |A ∪ B|.
pub fn token_overlap(a: &TokenSet, b: &TokenSet) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.iter().filter(|t| b.contains(t)).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

/// `name_score * (1 - weight) + token_score * weight`, clamped to [0, 1].
///
/// Non-decreasing in both scores for any fixed weight.
pub fn blend(name_score: f64, token_score: f64, weight: f64) -> f64 {
    let weight = unit(weight);
    unit(unit(name_score) * (1.0 - weight) + unit(token_score) * weight)
}

/// Clamp into [0, 1]; NaN maps to 0.
fn unit(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}
