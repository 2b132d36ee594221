// src/similarity.rs
//! Token-set overlap used to drop near-duplicate stories.
//!
//! Similarity is `|A ∩ B| / min(|A|, |B|)`: overlap over the *smaller* set, not
//! Jaccard. A short headline whose words all appear in a longer one scores 1.0.

use std::collections::HashSet;

pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.5;

/// Lowercase, whitespace-delimited token set.
pub fn tokens(text: &str) -> HashSet<String> {
    text.split_whitespace().map(|t| t.to_lowercase()).collect()
}

/// Overlap of two token sets normalized by the smaller one. Empty sets score 0.0.
pub fn overlap(a: &HashSet<String>, b: &HashSet<String>) -> f32 {
    let smaller = a.len().min(b.len());
    if smaller == 0 {
        return 0.0;
    }
    let common = a.intersection(b).count();
    common as f32 / smaller as f32
}

pub fn similarity(a: &str, b: &str) -> f32 {
    overlap(&tokens(a), &tokens(b))
}

/// True if `candidate` is more than `threshold` similar to any accepted text.
pub fn is_duplicate<S: AsRef<str>>(candidate: &str, accepted: &[S], threshold: f32) -> bool {
    let cand = tokens(candidate);
    accepted
        .iter()
        .any(|a| overlap(&cand, &tokens(a.as_ref())) > threshold)
}

/// Token sets of the texts accepted so far in one run.
#[derive(Debug, Clone, Default)]
pub struct AcceptedSet {
    sets: Vec<HashSet<String>>,
}

impl AcceptedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Highest similarity of `candidate` against the accepted texts (0.0 when empty).
    pub fn max_similarity(&self, candidate: &str) -> f32 {
        let cand = tokens(candidate);
        self.sets
            .iter()
            .map(|s| overlap(&cand, s))
            .fold(0.0, f32::max)
    }

    pub fn is_duplicate(&self, candidate: &str, threshold: f32) -> bool {
        self.max_similarity(candidate) > threshold
    }

    pub fn insert(&mut self, text: &str) {
        self.sets.push(tokens(text));
    }
}
