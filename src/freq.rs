//! Term-frequency maps for documents and queries.

use std::collections::HashMap;

/// Occurrence counts of the tokens in one document or query.
///
/// Borrows the token strings. Construction is O(n) in the number of tokens, lookups are
/// O(1) amortized.
#[derive(Debug, Clone, Default)]
pub struct TermFrequencies<'a> {
    counts: HashMap<&'a str, u64>,
    len: usize,
}

impl<'a> TermFrequencies<'a> {
    /// Count the tokens of a sequence.
    pub fn from_tokens<S: AsRef<str>>(tokens: &'a [S]) -> Self {
        let mut counts: HashMap<&'a str, u64> = HashMap::with_capacity(tokens.len());
        for token in tokens {
            *counts.entry(token.as_ref()).or_insert(0) += 1;
        }
        Self {
            counts,
            len: tokens.len(),
        }
    }

    /// Occurrences of `term` (0 if absent).
    pub fn get(&self, term: &str) -> u64 {
        self.counts.get(term).copied().unwrap_or(0)
    }

    /// Total number of tokens, repeats included.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True for an empty token sequence.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of distinct terms.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Largest single-term count (0 when empty).
    pub fn max_count(&self) -> u64 {
        self.counts.values().copied().max().unwrap_or(0)
    }

    /// Iterate `(term, count)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, u64)> + '_ {
        self.counts.iter().map(|(t, c)| (*t, *c))
    }
}
