//! Okapi BM25 over corpus statistics.
//!
//! IDF is the plain `ln(N / df)` shared with TF-IDF (unseen terms take `df = 1`), and the
//! average document length is derived from the statistics (`corpus_length / total_docs`).
//! The sum runs over query token *occurrences*, so a term repeated in the query
//! contributes once per repeat.
//!
//! References:
//! - Robertson & Walker (1994). "Some simple effective approximations to the 2-Poisson model..."
//! - Robertson & Zaragoza (2009). "The Probabilistic Relevance Framework: BM25 and Beyond."

use crate::freq::TermFrequencies;
use crate::scorer::RelevanceScorer;

/// BM25 parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
    /// Term-frequency saturation parameter.
    pub k1: f64,
    /// Length normalization parameter.
    pub b: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 1.6, b: 0.75 }
    }
}

/// BM25 term-frequency component: `(k1 + 1) · tf / (k1 · ((1 - b) + b · Ld / Lavg) + tf)`.
pub fn bm25_tf(tf: f64, doc_len: f64, avg_doc_len: f64, params: Bm25Params) -> f64 {
    if tf <= 0.0 {
        return 0.0;
    }
    let Bm25Params { k1, b } = params;
    (k1 + 1.0) * tf / (k1 * ((1.0 - b) + b * (doc_len / avg_doc_len)) + tf)
}

/// BM25 score of `doc` for the query token sequence.
pub fn score_bm25<S: AsRef<str>>(
    scorer: &RelevanceScorer,
    doc: &TermFrequencies<'_>,
    query_tokens: &[S],
) -> f64 {
    let params = scorer.params().bm25;
    let doc_len = doc.len() as f64;
    let avg_doc_len = scorer.avg_doc_length();

    let mut score = 0.0;
    for term in query_tokens {
        let term = term.as_ref();
        let tf = doc.get(term) as f64;
        if tf == 0.0 {
            continue;
        }
        score += scorer.get_idf(term) * bm25_tf(tf, doc_len, avg_doc_len, params);
    }
    score
}
