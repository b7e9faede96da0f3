//! Query-document relevance scorer.
//!
//! A [`RelevanceScorer`] owns a snapshot of [`CorpusStatistics`] plus the corpus-wide
//! quantities derived from it at construction:
//! - `vocab_size`: distinct terms
//! - `corpus_length`: sum of term corpus counts
//! - `avg_doc_length`: `corpus_length / total_docs`
//!
//! Those are computed from the term map as it is, so scoring pruned statistics shifts the
//! average length and the smoothing denominator accordingly.
//!
//! The scorer is immutable and can be shared across threads without locking.

use crate::bm25::{score_bm25, Bm25Params};
use crate::freq::TermFrequencies;
use crate::query_likelihood::{score_query_likelihood, SmoothingMethod};
use crate::stats::CorpusStatistics;
use crate::tfidf::{document_norm, score_tfidf};
use crate::trainer::Trainer;
use crate::{codec, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Scoring constants for all five schemes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringParams {
    /// BM25 saturation and length normalization.
    pub bm25: Bm25Params,
    /// Jelinek-Mercer corpus weight.
    pub jelinek_mercer_lambda: f64,
    /// Dirichlet prior strength.
    pub dirichlet_mu: f64,
    /// Absolute discounting amount.
    pub absolute_discount_delta: f64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            bm25: Bm25Params::default(),
            jelinek_mercer_lambda: 0.1,
            dirichlet_mu: 2000.0,
            absolute_discount_delta: 0.7,
        }
    }
}

impl ScoringParams {
    fn jelinek_mercer(&self) -> SmoothingMethod {
        SmoothingMethod::JelinekMercer {
            lambda: self.jelinek_mercer_lambda,
        }
    }

    fn dirichlet(&self) -> SmoothingMethod {
        SmoothingMethod::Dirichlet {
            mu: self.dirichlet_mu,
        }
    }

    fn absolute_discount(&self) -> SmoothingMethod {
        SmoothingMethod::AbsoluteDiscount {
            delta: self.absolute_discount_delta,
        }
    }
}

/// A scoring scheme reported in every [`ScoreResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// Cosine-style TF-IDF.
    TfIdf,
    /// Okapi BM25.
    Bm25,
    /// Language model, Jelinek-Mercer smoothing.
    LmJelinekMercer,
    /// Language model, Dirichlet smoothing.
    LmDirichlet,
    /// Language model, absolute discounting.
    LmAbsoluteDiscount,
}

impl Scheme {
    /// Every scheme, in reporting order.
    pub const ALL: [Scheme; 5] = [
        Scheme::TfIdf,
        Scheme::Bm25,
        Scheme::LmJelinekMercer,
        Scheme::LmDirichlet,
        Scheme::LmAbsoluteDiscount,
    ];

    /// Result key for this scheme.
    pub fn name(self) -> &'static str {
        match self {
            Scheme::TfIdf => "tfidf",
            Scheme::Bm25 => "bm25",
            Scheme::LmJelinekMercer => "lm_jm",
            Scheme::LmDirichlet => "lm_dirichlet",
            Scheme::LmAbsoluteDiscount => "lm_ad",
        }
    }

    /// Look up a scheme by its result key.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }
}

/// Scores of one (document, query) pair under every scheme.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// TF-IDF cosine score.
    pub tfidf: f64,
    /// BM25 score.
    pub bm25: f64,
    /// Jelinek-Mercer log-likelihood.
    pub lm_jm: f64,
    /// Dirichlet log-likelihood.
    pub lm_dirichlet: f64,
    /// Absolute-discounting log-likelihood.
    pub lm_ad: f64,
}

impl ScoreResult {
    /// Score for `scheme`.
    pub fn score(&self, scheme: Scheme) -> f64 {
        match scheme {
            Scheme::TfIdf => self.tfidf,
            Scheme::Bm25 => self.bm25,
            Scheme::LmJelinekMercer => self.lm_jm,
            Scheme::LmDirichlet => self.lm_dirichlet,
            Scheme::LmAbsoluteDiscount => self.lm_ad,
        }
    }

    /// Score by result key (`"tfidf"`, `"bm25"`, `"lm_jm"`, `"lm_dirichlet"`, `"lm_ad"`).
    pub fn get(&self, name: &str) -> Option<f64> {
        Scheme::from_name(name).map(|s| self.score(s))
    }

    /// Iterate `(key, score)` pairs in reporting order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        Scheme::ALL.into_iter().map(|s| (s.name(), self.score(s)))
    }
}

/// Per-document state shared by every query scored against it.
struct PreparedDocument<'a> {
    tf: TermFrequencies<'a>,
    norm: f64,
}

/// Scores documents against queries from frozen corpus statistics.
#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    stats: CorpusStatistics,
    vocab_size: u64,
    corpus_length: u64,
    avg_doc_length: f64,
    params: ScoringParams,
}

impl RelevanceScorer {
    /// Build a scorer with the default constants.
    pub fn new(stats: CorpusStatistics) -> Self {
        Self::with_params(stats, ScoringParams::default())
    }

    /// Build a scorer with custom constants.
    pub fn with_params(stats: CorpusStatistics, params: ScoringParams) -> Self {
        let vocab_size = stats.vocab_size() as u64;
        let corpus_length = stats.corpus_length();
        let avg_doc_length = corpus_length as f64 / stats.total_docs() as f64;
        if stats.is_empty() {
            tracing::warn!("relevance scorer built over a corpus with no documents");
        }
        Self {
            stats,
            vocab_size,
            corpus_length,
            avg_doc_length,
            params,
        }
    }

    /// Snapshot a trainer's current statistics. Later training is not visible here.
    pub fn from_trainer(trainer: &Trainer) -> Self {
        Self::new(trainer.stats().clone())
    }

    /// Load statistics from a model file and build a scorer with the default constants.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        Ok(Self::new(codec::load(path)?))
    }

    /// The statistics this scorer was built from.
    pub fn stats(&self) -> &CorpusStatistics {
        &self.stats
    }

    /// Scoring constants.
    pub fn params(&self) -> &ScoringParams {
        &self.params
    }

    /// Number of documents in the training corpus.
    pub fn total_docs(&self) -> u64 {
        self.stats.total_docs()
    }

    /// Distinct terms in the statistics.
    pub fn vocab_size(&self) -> u64 {
        self.vocab_size
    }

    /// Total token occurrences in the statistics.
    pub fn corpus_length(&self) -> u64 {
        self.corpus_length
    }

    /// Mean document length, `corpus_length / total_docs`.
    pub fn avg_doc_length(&self) -> f64 {
        self.avg_doc_length
    }

    /// `ln(total_docs / df)`, with `df = 1` for unseen terms.
    ///
    /// Unseen terms therefore share the maximum IDF with terms seen in exactly one document.
    pub fn get_idf(&self, term: &str) -> f64 {
        let df = match self.stats.doc_count(term) {
            0 => 1.0,
            df => df as f64,
        };
        (self.stats.total_docs() as f64 / df).ln()
    }

    /// Laplace-smoothed corpus unigram probability,
    /// `(corpus_count + 1) / (vocab_size + corpus_length + 1)`.
    pub fn corpus_probability(&self, term: &str) -> f64 {
        (self.stats.corpus_count(term) as f64 + 1.0)
            / (self.vocab_size as f64 + self.corpus_length as f64 + 1.0)
    }

    /// Score `document` against `query` under every scheme.
    pub fn score<D, Q>(&self, document: &[D], query: &[Q]) -> Result<ScoreResult, Error>
    where
        D: AsRef<str>,
        Q: AsRef<str>,
    {
        if document.is_empty() {
            return Err(Error::EmptyDocument);
        }
        if query.is_empty() {
            return Err(Error::EmptyQuery);
        }
        self.ensure_corpus()?;

        let doc = self.prepare(document);
        Ok(self.score_prepared(&doc, query))
    }

    /// Score `document` against each query, in order.
    ///
    /// Equivalent to calling [`score`](Self::score) per query, but the document's term
    /// frequencies and vector length are computed once. An empty `queries` slice yields an
    /// empty result; an empty query anywhere in the batch fails the whole call.
    pub fn score_batch<D, Q, T>(
        &self,
        document: &[D],
        queries: &[Q],
    ) -> Result<Vec<ScoreResult>, Error>
    where
        D: AsRef<str>,
        Q: AsRef<[T]>,
        T: AsRef<str>,
    {
        if document.is_empty() {
            return Err(Error::EmptyDocument);
        }
        if queries.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(index) = queries.iter().position(|q| q.as_ref().is_empty()) {
            return Err(Error::EmptyQueryInBatch { index });
        }
        self.ensure_corpus()?;

        let doc = self.prepare(document);
        Ok(queries
            .iter()
            .map(|q| self.score_prepared(&doc, q.as_ref()))
            .collect())
    }

    fn ensure_corpus(&self) -> Result<(), Error> {
        if self.stats.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        Ok(())
    }

    fn prepare<'a, S: AsRef<str>>(&self, document: &'a [S]) -> PreparedDocument<'a> {
        let tf = TermFrequencies::from_tokens(document);
        let norm = document_norm(self, &tf);
        PreparedDocument { tf, norm }
    }

    fn score_prepared<Q: AsRef<str>>(&self, doc: &PreparedDocument<'_>, query: &[Q]) -> ScoreResult {
        let query_tf = TermFrequencies::from_tokens(query);
        ScoreResult {
            tfidf: score_tfidf(self, &doc.tf, doc.norm, &query_tf),
            bm25: score_bm25(self, &doc.tf, query),
            lm_jm: score_query_likelihood(self, &doc.tf, query, self.params.jelinek_mercer()),
            lm_dirichlet: score_query_likelihood(self, &doc.tf, query, self.params.dirichlet()),
            lm_ad: score_query_likelihood(self, &doc.tf, query, self.params.absolute_discount()),
        }
    }
}
