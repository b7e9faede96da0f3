//! `lexrel`: query-document relevance from corpus statistics.
//!
//! Two halves:
//! - [`trainer::Trainer`] accumulates per-term corpus counts and document frequencies
//!   from pre-tokenized documents, and persists them through [`codec`].
//! - [`scorer::RelevanceScorer`] owns a frozen snapshot of those statistics and scores a
//!   (document, query) pair under TF-IDF, BM25 and three query-likelihood language models.
//!
//! Scope:
//! - In-memory statistics (no postings lists)
//! - Caller-provided token streams (tokenization is the caller's job)
//! - All five schemes computed together per call
//!
//! Non-goals:
//! - Relevance feedback
//! - Index structures / candidate generation
//! - Approximate or streaming statistics
//!
//! References:
//! - Salton & Buckley (1988): term-weighting approaches in automatic text retrieval
//! - Robertson & Zaragoza (2009): BM25 and beyond
//! - Zhai & Lafferty (2004): smoothing methods for language models in IR

pub mod bm25;
pub mod codec;
pub mod freq;
pub mod query_likelihood;
pub mod scorer;
pub mod stats;
pub mod tfidf;
pub mod trainer;

pub use error::Error;
pub use scorer::{RelevanceScorer, Scheme, ScoreResult, ScoringParams};
pub use stats::{CorpusStatistics, TermStats};
pub use trainer::Trainer;

mod error {
    /// Errors for training, model I/O and scoring.
    ///
    /// Two classes: invalid input ([`Error::is_invalid_input`]: empty documents or queries,
    /// scoring against statistics with no documents, a bad model header, an unwritable term)
    /// and corrupt models ([`Error::is_corrupt_model`]). `Io` is neither.
    #[derive(thiserror::Error, Debug)]
    pub enum Error {
        /// Document token list was empty.
        #[error("empty document")]
        EmptyDocument,
        /// Query token list was empty.
        #[error("empty query")]
        EmptyQuery,
        /// A query inside a batch was empty.
        #[error("empty query at batch position {index}")]
        EmptyQueryInBatch {
            /// Position of the offending query.
            index: usize,
        },
        /// Statistics contain no documents, so IDF and average length are undefined.
        #[error("corpus statistics contain no documents")]
        EmptyCorpus,
        /// First model line is missing or not a non-negative integer.
        #[error("invalid model header: {line:?}")]
        InvalidHeader {
            /// The offending header text.
            line: String,
        },
        /// A model body line could not be decoded.
        #[error("corrupt model at line {line}: {reason}")]
        CorruptModel {
            /// 1-based line number in the decompressed stream.
            line: usize,
            /// What was wrong with it.
            reason: String,
        },
        /// Term cannot be represented in the tab-separated model format.
        #[error("term {term:?} contains a tab or line break")]
        UnencodableTerm {
            /// The offending term.
            term: String,
        },
        /// Underlying file or compression stream failure.
        #[error(transparent)]
        Io(#[from] std::io::Error),
    }

    impl Error {
        /// Caller handed in something the scoring contract rejects, or a bad model header.
        pub fn is_invalid_input(&self) -> bool {
            matches!(
                self,
                Self::EmptyDocument
                    | Self::EmptyQuery
                    | Self::EmptyQueryInBatch { .. }
                    | Self::EmptyCorpus
                    | Self::InvalidHeader { .. }
                    | Self::UnencodableTerm { .. }
            )
        }

        /// Model body could not be decoded.
        pub fn is_corrupt_model(&self) -> bool {
            matches!(self, Self::CorruptModel { .. })
        }
    }
}
