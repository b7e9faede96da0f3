//! Query likelihood language models.
//!
//! Scores a query as \(\sum_{q} \ln P(q|D)\), the log-likelihood of the query tokens under a
//! smoothed document unigram model (Ponte & Croft, 1998). Results are large negative numbers,
//! not probabilities.
//!
//! The background model is a Laplace-smoothed corpus unigram,
//! `(corpus_count + 1) / (vocab_size + corpus_length + 1)`, so unseen terms still get mass.
//!
//! References:
//! - Zhai & Lafferty (2004). "A study of smoothing methods for language models applied to
//!   information retrieval."

use crate::freq::TermFrequencies;
use crate::scorer::RelevanceScorer;

/// Smoothing method for query likelihood.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SmoothingMethod {
    /// Jelinek-Mercer: fixed interpolation with the corpus model.
    JelinekMercer {
        /// Weight on the corpus model.
        lambda: f64,
    },
    /// Dirichlet prior: corpus mass shrinks as the document grows.
    Dirichlet {
        /// Prior strength.
        mu: f64,
    },
    /// Absolute discounting: subtract `delta` from every seen count and redistribute.
    AbsoluteDiscount {
        /// Discount per seen term.
        delta: f64,
    },
}

impl SmoothingMethod {
    /// Jelinek-Mercer with lambda 0.1.
    pub fn jelinek_mercer() -> Self {
        Self::JelinekMercer { lambda: 0.1 }
    }

    /// Dirichlet with mu 2000.
    pub fn dirichlet() -> Self {
        Self::Dirichlet { mu: 2000.0 }
    }

    /// Absolute discounting with delta 0.7.
    pub fn absolute_discount() -> Self {
        Self::AbsoluteDiscount { delta: 0.7 }
    }

    /// Smoothed \(P(t|D)\).
    ///
    /// - `term_count`: occurrences of the term in the document
    /// - `doc_len`: document length in tokens
    /// - `doc_distinct`: number of distinct terms in the document
    /// - `p_corpus`: background probability of the term
    pub fn smoothed_probability(
        self,
        term_count: f64,
        doc_len: f64,
        doc_distinct: f64,
        p_corpus: f64,
    ) -> f64 {
        match self {
            Self::JelinekMercer { lambda } => {
                if term_count == 0.0 {
                    lambda * p_corpus
                } else {
                    (1.0 - lambda) * term_count / doc_len + lambda * p_corpus
                }
            }
            Self::Dirichlet { mu } => {
                if term_count == 0.0 {
                    mu / (doc_len + mu) * p_corpus
                } else {
                    (term_count + mu * p_corpus) / (doc_len + mu)
                }
            }
            Self::AbsoluteDiscount { delta } => {
                let backoff = delta * doc_distinct / doc_len * p_corpus;
                if term_count == 0.0 {
                    backoff
                } else {
                    (term_count - delta).max(0.0) / doc_len + backoff
                }
            }
        }
    }
}

/// Log-likelihood of the query token sequence under the smoothed document model.
pub fn score_query_likelihood<S: AsRef<str>>(
    scorer: &RelevanceScorer,
    doc: &TermFrequencies<'_>,
    query_tokens: &[S],
    method: SmoothingMethod,
) -> f64 {
    let doc_len = doc.len() as f64;
    let doc_distinct = doc.distinct() as f64;

    query_tokens
        .iter()
        .map(|term| {
            let term = term.as_ref();
            let p = method.smoothed_probability(
                doc.get(term) as f64,
                doc_len,
                doc_distinct,
                scorer.corpus_probability(term),
            );
            p.ln()
        })
        .sum()
}
