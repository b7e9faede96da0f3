//! TF-IDF scoring: Salton & Buckley's "tfc · nfx" weighting.
//!
//! The query side uses augmented term frequency (`0.5 + 0.5 · tf / max_tf`) times IDF and
//! is left unnormalized. The document side uses raw term frequency times IDF, normalized by
//! the Euclidean length of the *whole* document vector, not just the query-term slice.
//!
//! References:
//! - Salton & Buckley (1988). "Term-weighting approaches in automatic text retrieval",
//!   Information Processing & Management 24(5), table 2.

use crate::freq::TermFrequencies;
use crate::scorer::RelevanceScorer;

/// Euclidean length of the document's idf-weighted term-frequency vector.
///
/// Depends only on the document, so batch scoring computes it once.
pub fn document_norm(scorer: &RelevanceScorer, doc: &TermFrequencies<'_>) -> f64 {
    doc.iter()
        .map(|(term, tf)| {
            let w = tf as f64 * scorer.get_idf(term);
            w * w
        })
        .sum::<f64>()
        .sqrt()
}

/// Cosine-style TF-IDF score of `doc` against `query`.
///
/// `doc_norm` must come from [`document_norm`] for the same document. A zero-length
/// document vector (every document term has zero IDF) scores 0.
pub fn score_tfidf(
    scorer: &RelevanceScorer,
    doc: &TermFrequencies<'_>,
    doc_norm: f64,
    query: &TermFrequencies<'_>,
) -> f64 {
    if doc_norm == 0.0 {
        return 0.0;
    }
    let max_query_tf = query.max_count() as f64;
    let mut score = 0.0;
    for (term, qtf) in query.iter() {
        let dtf = doc.get(term);
        if dtf == 0 {
            continue;
        }
        let idf = scorer.get_idf(term);
        let query_weight = (0.5 + 0.5 * qtf as f64 / max_query_tf) * idf;
        let doc_weight = dtf as f64 * idf;
        score += query_weight * doc_weight;
    }
    score / doc_norm
}
