//! Corpus statistics trainer.
//!
//! Counts are additive: training on two shards and merging gives the same statistics
//! as training on their concatenation.

use crate::codec;
use crate::stats::CorpusStatistics;
use crate::Error;
use std::collections::HashSet;
use std::path::Path;

/// Accumulates [`CorpusStatistics`] from tokenized documents.
///
/// Not meant for shared mutation: train shards independently and combine them with
/// [`merge`](Trainer::merge).
#[derive(Debug, Clone, Default)]
pub struct Trainer {
    stats: CorpusStatistics,
}

impl Trainer {
    /// Create an empty trainer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume training from existing statistics.
    pub fn from_stats(stats: CorpusStatistics) -> Self {
        Self { stats }
    }

    /// Add every document in `corpus`. Empty documents are skipped.
    pub fn train<D, S>(&mut self, corpus: impl IntoIterator<Item = D>)
    where
        D: AsRef<[S]>,
        S: AsRef<str>,
    {
        let before = self.stats.total_docs();
        for doc in corpus {
            self.train_document(doc.as_ref());
        }
        tracing::debug!(
            documents = self.stats.total_docs() - before,
            vocab = self.stats.vocab_size(),
            "trained corpus"
        );
    }

    /// Add a single document. Returns false (and changes nothing) if it is empty.
    pub fn train_document<S: AsRef<str>>(&mut self, tokens: &[S]) -> bool {
        if tokens.is_empty() {
            return false;
        }
        self.stats.record_document();
        let mut seen: HashSet<&str> = HashSet::with_capacity(tokens.len());
        for token in tokens {
            let token = token.as_ref();
            let first_in_doc = seen.insert(token);
            self.stats.update(token, |s| {
                s.corpus_count += 1;
                if first_in_doc {
                    s.doc_count += 1;
                }
            });
        }
        true
    }

    /// Add the counts of `other` into this trainer.
    pub fn merge(&mut self, other: &Trainer) {
        self.merge_stats(&other.stats);
    }

    /// Add raw statistics (e.g. a loaded model shard) into this trainer.
    pub fn merge_stats(&mut self, other: &CorpusStatistics) {
        self.stats.absorb(other);
        tracing::debug!(
            total_docs = self.stats.total_docs(),
            vocab = self.stats.vocab_size(),
            "merged statistics"
        );
    }

    /// Drop every term with `corpus_count < min_count` or `doc_count < min_doc_count`.
    ///
    /// `total_docs` is untouched. Returns the number of removed terms.
    pub fn prune(&mut self, min_count: u64, min_doc_count: u64) -> usize {
        let removed = self
            .stats
            .retain_terms(|s| s.corpus_count >= min_count && s.doc_count >= min_doc_count);
        tracing::debug!(
            min_count,
            min_doc_count,
            removed,
            remaining = self.stats.vocab_size(),
            "pruned vocabulary"
        );
        removed
    }

    /// Current statistics.
    pub fn stats(&self) -> &CorpusStatistics {
        &self.stats
    }

    /// Finish training and take the statistics.
    pub fn into_stats(self) -> CorpusStatistics {
        self.stats
    }

    /// Number of non-empty documents trained so far.
    pub fn total_docs(&self) -> u64 {
        self.stats.total_docs()
    }

    /// Number of distinct terms.
    pub fn vocab_size(&self) -> usize {
        self.stats.vocab_size()
    }

    /// Load a trainer from a model file written by [`save_to_file`](Trainer::save_to_file).
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        Ok(Self::from_stats(codec::load(path)?))
    }

    /// Persist the statistics in the compressed model format.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        codec::save(&self.stats, path)
    }
}
