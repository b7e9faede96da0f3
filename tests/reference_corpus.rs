//! End-to-end checks on a small hand-counted corpus.

use lexrel::{CorpusStatistics, RelevanceScorer, TermStats, Trainer};
use std::collections::HashMap;

const CORPUS: [&str; 2] = [
    "he went down to the store",
    "he needed a shovel from the store to shovel the snow",
];
const CORPUS_UPDATE: [&str; 1] = ["the snow was five feet deep"];

const DOCUMENT: [&str; 6] = ["the", "store", "sells", "snow", "snow", "shovel"];

fn tokenize(lines: &[&str]) -> Vec<Vec<String>> {
    lines
        .iter()
        .map(|l| l.split_whitespace().map(str::to_string).collect())
        .collect()
}

fn expected_unigrams() -> HashMap<&'static str, TermStats> {
    [
        ("a", (1, 1)),
        ("deep", (1, 1)),
        ("down", (1, 1)),
        ("feet", (1, 1)),
        ("five", (1, 1)),
        ("from", (1, 1)),
        ("he", (2, 2)),
        ("needed", (1, 1)),
        ("shovel", (2, 1)),
        ("snow", (2, 2)),
        ("store", (2, 2)),
        ("the", (4, 3)),
        ("to", (2, 2)),
        ("was", (1, 1)),
        ("went", (1, 1)),
    ]
    .into_iter()
    .map(|(t, (c, d))| (t, TermStats::new(c, d)))
    .collect()
}

fn as_map(stats: &CorpusStatistics) -> HashMap<&str, TermStats> {
    stats.iter().collect()
}

fn trained() -> Trainer {
    let mut t = Trainer::new();
    t.train(tokenize(&CORPUS));
    t.train(tokenize(&CORPUS_UPDATE));
    t
}

fn scorer() -> RelevanceScorer {
    RelevanceScorer::from_trainer(&trained())
}

fn assert_close(got: f64, expected: f64) {
    let tol = 1e-7 * expected.abs().max(1e-12);
    assert!(
        (got - expected).abs() <= tol,
        "got {got}, expected {expected}"
    );
}

#[test]
fn train_counts_every_term() {
    let t = trained();
    assert_eq!(t.total_docs(), 3);
    assert_eq!(as_map(t.stats()), expected_unigrams());
}

#[test]
fn merge_matches_single_pass() {
    let mut a = Trainer::new();
    a.train(tokenize(&CORPUS));
    let mut b = Trainer::new();
    b.train(tokenize(&CORPUS_UPDATE));
    a.merge(&b);
    assert_eq!(a.total_docs(), 3);
    assert_eq!(as_map(a.stats()), expected_unigrams());
}

#[test]
fn save_and_load_round_trip() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("model.zst");
    trained().save_to_file(&path).unwrap();

    let loaded = Trainer::load_from_file(&path).unwrap();
    assert_eq!(loaded.total_docs(), 3);
    assert_eq!(as_map(loaded.stats()), expected_unigrams());

    let s = RelevanceScorer::load_from_file(&path).unwrap();
    assert_eq!(s.stats(), trained().stats());
}

#[test]
fn prune_in_two_steps() {
    let mut t = trained();
    t.prune(2, 0);
    let kept: HashMap<&str, TermStats> = [
        ("he", (2, 2)),
        ("shovel", (2, 1)),
        ("snow", (2, 2)),
        ("store", (2, 2)),
        ("the", (4, 3)),
        ("to", (2, 2)),
    ]
    .into_iter()
    .map(|(w, (c, d))| (w, TermStats::new(c, d)))
    .collect();
    assert_eq!(as_map(t.stats()), kept);

    t.prune(2, 3);
    let only_the: HashMap<&str, TermStats> = [("the", TermStats::new(4, 3))].into_iter().collect();
    assert_eq!(as_map(t.stats()), only_the);
    assert_eq!(t.total_docs(), 3);
}

#[test]
fn idf_values() {
    let s = scorer();
    assert_eq!(s.get_idf("the"), 0.0);
    assert_close(s.get_idf("deep"), (3.0f64).ln());
    assert_close(s.get_idf("snow"), (3.0f64 / 2.0).ln());
    assert_eq!(s.get_idf("not_in_corpus"), s.get_idf("deep"));
}

#[test]
fn empty_inputs_raise_invalid_input() {
    let s = scorer();
    let empty: [&str; 0] = [];
    let query = ["buy", "snow"];
    assert!(s.score(&empty, &query).unwrap_err().is_invalid_input());
    assert!(s.score(&DOCUMENT, &empty).unwrap_err().is_invalid_input());
    assert!(s.score(&empty, &empty).unwrap_err().is_invalid_input());

    let no_queries: Vec<Vec<&str>> = Vec::new();
    assert!(s.score_batch(&DOCUMENT, &no_queries).unwrap().is_empty());
}

// Query ["buy", "snow", "snow", "shovel"]: tf(buy) = 1, tf(snow) = 2, tf(shovel) = 1.
const QUERY: [&str; 4] = ["buy", "snow", "snow", "shovel"];

#[test]
fn tfidf_closed_form() {
    let s = scorer();
    let idf = |t: &str| s.get_idf(t);
    let max_query_tf = 2.0;

    // "buy" is not in the document, so only snow and shovel contribute.
    let raw = (0.5 + 0.5 * 2.0 / max_query_tf) * idf("snow") * (2.0 * idf("snow"))
        + (0.5 + 0.5 * 1.0 / max_query_tf) * idf("shovel") * (1.0 * idf("shovel"));
    let doc_len = [
        1.0 * idf("the"),
        1.0 * idf("store"),
        1.0 * idf("sells"),
        2.0 * idf("snow"),
        1.0 * idf("shovel"),
    ]
    .iter()
    .map(|w| w * w)
    .sum::<f64>()
    .sqrt();

    let got = s.score(&DOCUMENT, &QUERY).unwrap();
    assert_close(got.tfidf, raw / doc_len);
    assert_eq!(got.get("tfidf"), Some(got.tfidf));
}

fn bm25_term(s: &RelevanceScorer, term: &str, tf: f64) -> f64 {
    let (k1, b) = (1.6, 0.75);
    let avg = 23.0 / 3.0;
    s.get_idf(term) * (k1 + 1.0) * tf / (k1 * ((1.0 - b) + b * (6.0 / avg)) + tf)
}

#[test]
fn bm25_closed_form() {
    let s = scorer();
    assert_close(s.avg_doc_length(), 23.0 / 3.0);

    // Summed per query occurrence: snow appears twice in the query.
    let expected = 0.0 + 2.0 * bm25_term(&s, "snow", 2.0) + bm25_term(&s, "shovel", 1.0);
    let got = s.score(&DOCUMENT, &QUERY).unwrap();
    assert_close(got.bm25, expected);
}

#[test]
fn bm25_repeated_query_term_counts_twice() {
    let s = scorer();
    let query = ["buy", "snow", "shovel", "shovel"];
    let expected = bm25_term(&s, "snow", 2.0) + 2.0 * bm25_term(&s, "shovel", 1.0);
    assert_close(s.score(&DOCUMENT, &query).unwrap().bm25, expected);
}

// vocab_size = 15, corpus_length = 23, so the Laplace denominator is 39.
fn p_corpus(count: f64) -> f64 {
    (count + 1.0) / 39.0
}

#[test]
fn jelinek_mercer_closed_form() {
    let s = scorer();
    let l = 0.1;
    let buy = l * p_corpus(0.0);
    let snow = (1.0 - l) * 2.0 / 6.0 + l * p_corpus(2.0);
    let shovel = (1.0 - l) * 1.0 / 6.0 + l * p_corpus(2.0);
    let expected = buy.ln() + 2.0 * snow.ln() + shovel.ln();
    assert_close(s.score(&DOCUMENT, &QUERY).unwrap().lm_jm, expected);
}

#[test]
fn dirichlet_closed_form() {
    let s = scorer();
    let mu = 2000.0;
    let buy = mu / (6.0 + mu) * p_corpus(0.0);
    let snow = (2.0 + mu * p_corpus(2.0)) / (6.0 + mu);
    let shovel = (1.0 + mu * p_corpus(2.0)) / (6.0 + mu);
    let expected = buy.ln() + 2.0 * snow.ln() + shovel.ln();
    assert_close(s.score(&DOCUMENT, &QUERY).unwrap().lm_dirichlet, expected);
}

#[test]
fn absolute_discount_closed_form() {
    let s = scorer();
    let d = 0.7;
    // Five distinct terms in a six-token document.
    let backoff = |p: f64| d * 5.0 / 6.0 * p;
    let buy = backoff(p_corpus(0.0));
    let snow = (2.0 - d) / 6.0 + backoff(p_corpus(2.0));
    let shovel = (1.0 - d) / 6.0 + backoff(p_corpus(2.0));
    let expected = buy.ln() + 2.0 * snow.ln() + shovel.ln();
    let got = s.score(&DOCUMENT, &QUERY).unwrap();
    assert_close(got.lm_ad, expected);
    assert!(got.lm_ad < 0.0);
}

#[test]
fn pruning_before_scoring_shifts_corpus_quantities() {
    let mut t = trained();
    t.prune(2, 0);
    let s = RelevanceScorer::from_trainer(&t);
    // 14 remaining occurrences over 3 documents.
    assert_eq!(s.corpus_length(), 14);
    assert_close(s.avg_doc_length(), 14.0 / 3.0);
    assert_eq!(s.vocab_size(), 6);
}
