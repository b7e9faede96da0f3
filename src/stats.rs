//! Corpus statistics: the value type shared by the trainer, the codec and the scorer.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Counts for a single term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermStats {
    /// Total occurrences across all documents.
    pub corpus_count: u64,
    /// Number of distinct documents containing the term.
    pub doc_count: u64,
}

impl TermStats {
    /// Create a count pair.
    pub fn new(corpus_count: u64, doc_count: u64) -> Self {
        Self {
            corpus_count,
            doc_count,
        }
    }

    fn add(&mut self, other: TermStats) {
        self.corpus_count = self.corpus_count.saturating_add(other.corpus_count);
        self.doc_count = self.doc_count.saturating_add(other.doc_count);
    }
}

/// Unigram counts and document frequencies over a tokenized corpus.
///
/// Terms missing from the map are unseen (both counts zero).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusStatistics {
    total_docs: u64,
    terms: HashMap<String, TermStats>,
}

impl CorpusStatistics {
    /// Empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw parts. Call [`check_invariants`](Self::check_invariants) if the
    /// parts come from an untrusted source.
    pub fn from_parts(total_docs: u64, terms: HashMap<String, TermStats>) -> Self {
        Self { total_docs, terms }
    }

    /// Number of documents observed.
    pub fn total_docs(&self) -> u64 {
        self.total_docs
    }

    /// Counts for `term`, if it was seen.
    pub fn get(&self, term: &str) -> Option<TermStats> {
        self.terms.get(term).copied()
    }

    /// Document frequency of `term` (0 if unseen).
    pub fn doc_count(&self, term: &str) -> u64 {
        self.terms.get(term).map_or(0, |s| s.doc_count)
    }

    /// Corpus frequency of `term` (0 if unseen).
    pub fn corpus_count(&self, term: &str) -> u64 {
        self.terms.get(term).map_or(0, |s| s.corpus_count)
    }

    /// Number of distinct terms.
    pub fn vocab_size(&self) -> usize {
        self.terms.len()
    }

    /// Sum of `corpus_count` over all terms.
    ///
    /// Recomputed from the term map, so pruning shrinks it. Saturates at `u64::MAX`;
    /// [`check_invariants`](Self::check_invariants) rejects statistics that would.
    pub fn corpus_length(&self) -> u64 {
        self.terms
            .values()
            .fold(0u64, |acc, s| acc.saturating_add(s.corpus_count))
    }

    /// True when no documents have been observed.
    pub fn is_empty(&self) -> bool {
        self.total_docs == 0
    }

    /// Iterate `(term, counts)` in map order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, TermStats)> + '_ {
        self.terms.iter().map(|(t, s)| (t.as_str(), *s))
    }

    /// Verify `1 <= doc_count <= corpus_count`, `doc_count <= total_docs` for every term,
    /// and that the corpus counts sum without overflowing `u64`.
    pub fn check_invariants(&self) -> Result<(), Error> {
        let mut corpus_length: u64 = 0;
        for (term, s) in &self.terms {
            if s.doc_count == 0 {
                return Err(Error::CorruptModel {
                    line: 0,
                    reason: format!("term {term:?} is stored with doc_count 0"),
                });
            }
            if s.doc_count > s.corpus_count {
                return Err(Error::CorruptModel {
                    line: 0,
                    reason: format!(
                        "term {term:?}: doc_count {} exceeds corpus_count {}",
                        s.doc_count, s.corpus_count
                    ),
                });
            }
            if s.doc_count > self.total_docs {
                return Err(Error::CorruptModel {
                    line: 0,
                    reason: format!(
                        "term {term:?}: doc_count {} exceeds total_docs {}",
                        s.doc_count, self.total_docs
                    ),
                });
            }
            corpus_length = corpus_length.checked_add(s.corpus_count).ok_or_else(|| {
                Error::CorruptModel {
                    line: 0,
                    reason: "corpus counts sum past u64::MAX".to_string(),
                }
            })?;
        }
        Ok(())
    }

    pub(crate) fn record_document(&mut self) {
        self.total_docs += 1;
    }

    /// Apply `f` to the counts of `term`, inserting zero counts first if unseen.
    pub(crate) fn update(&mut self, term: &str, f: impl FnOnce(&mut TermStats)) {
        // Only allocate a key for terms not yet present.
        if let Some(s) = self.terms.get_mut(term) {
            f(s);
        } else {
            let mut s = TermStats::default();
            f(&mut s);
            self.terms.insert(term.to_string(), s);
        }
    }

    pub(crate) fn absorb(&mut self, other: &CorpusStatistics) {
        self.total_docs = self.total_docs.saturating_add(other.total_docs);
        for (term, s) in &other.terms {
            self.terms.entry(term.clone()).or_default().add(*s);
        }
    }

    /// Returns the number of removed terms.
    pub(crate) fn retain_terms(&mut self, mut keep: impl FnMut(&TermStats) -> bool) -> usize {
        let before = self.terms.len();
        self.terms.retain(|_, s| keep(s));
        before - self.terms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unseen_terms_count_zero() {
        let stats = CorpusStatistics::new();
        assert_eq!(stats.doc_count("missing"), 0);
        assert_eq!(stats.corpus_count("missing"), 0);
        assert!(stats.get("missing").is_none());
        assert!(stats.is_empty());
    }

    #[test]
    fn corpus_length_sums_corpus_counts() {
        let mut terms = HashMap::new();
        terms.insert("a".to_string(), TermStats::new(3, 2));
        terms.insert("b".to_string(), TermStats::new(4, 1));
        let stats = CorpusStatistics::from_parts(2, terms);
        assert_eq!(stats.corpus_length(), 7);
        assert_eq!(stats.vocab_size(), 2);
        stats.check_invariants().unwrap();
    }

    #[test]
    fn invariants_reject_doc_count_above_corpus_count() {
        let mut terms = HashMap::new();
        terms.insert("a".to_string(), TermStats::new(1, 2));
        let err = CorpusStatistics::from_parts(5, terms)
            .check_invariants()
            .unwrap_err();
        assert!(err.is_corrupt_model());
    }

    #[test]
    fn invariants_reject_stored_zero_doc_count() {
        let mut terms = HashMap::new();
        terms.insert("a".to_string(), TermStats::new(4, 0));
        let err = CorpusStatistics::from_parts(3, terms)
            .check_invariants()
            .unwrap_err();
        assert!(err.is_corrupt_model());
    }

    #[test]
    fn invariants_reject_overflowing_corpus_length() {
        let mut terms = HashMap::new();
        terms.insert("a".to_string(), TermStats::new(u64::MAX, 1));
        terms.insert("b".to_string(), TermStats::new(5, 2));
        let stats = CorpusStatistics::from_parts(2, terms);
        assert_eq!(stats.corpus_length(), u64::MAX);
        assert!(stats.check_invariants().unwrap_err().is_corrupt_model());
    }

    #[test]
    fn invariants_reject_doc_count_above_total_docs() {
        let mut terms = HashMap::new();
        terms.insert("a".to_string(), TermStats::new(9, 3));
        let err = CorpusStatistics::from_parts(2, terms)
            .check_invariants()
            .unwrap_err();
        assert!(err.is_corrupt_model());
    }
}
