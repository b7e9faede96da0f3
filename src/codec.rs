//! Model file codec.
//!
//! Plain-text layout, compressed end-to-end with zstd:
//!
//! ```text
//! <total_docs>
//! <term>\t<corpus_count>\t<doc_count>
//! ...
//! ```
//!
//! Terms are written in sorted order so identical statistics give identical files.
//! Readers accept any order.

use crate::stats::{CorpusStatistics, TermStats};
use crate::Error;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// zstd level used for model files.
pub const DEFAULT_LEVEL: i32 = 3;

/// Encode `stats` into `writer` as a compressed model stream.
pub fn write_model<W: Write>(stats: &CorpusStatistics, writer: W) -> Result<(), Error> {
    let mut terms: Vec<(&str, TermStats)> = stats.iter().collect();
    terms.sort_unstable_by(|a, b| a.0.cmp(b.0));
    if let Some((term, _)) = terms
        .iter()
        .find(|(t, _)| t.contains(['\t', '\n', '\r']))
    {
        return Err(Error::UnencodableTerm {
            term: term.to_string(),
        });
    }

    let mut enc = zstd::stream::Encoder::new(writer, DEFAULT_LEVEL)?;
    {
        let mut out = BufWriter::new(&mut enc);
        writeln!(out, "{}", stats.total_docs())?;
        for (term, s) in &terms {
            writeln!(out, "{term}\t{}\t{}", s.corpus_count, s.doc_count)?;
        }
        out.flush()?;
    }
    enc.finish()?;
    Ok(())
}

/// Decode a compressed model stream.
pub fn read_model<R: Read>(reader: R) -> Result<CorpusStatistics, Error> {
    let mut dec = zstd::stream::Decoder::new(reader)?;
    let mut bytes = Vec::new();
    dec.read_to_end(&mut bytes)?;
    let text = String::from_utf8(bytes).map_err(|e| Error::CorruptModel {
        line: 0,
        reason: format!("not UTF-8: {e}"),
    })?;
    parse_model(&text)
}

/// Write a model file at `path`.
pub fn save(stats: &CorpusStatistics, path: impl AsRef<Path>) -> Result<(), Error> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_model(stats, file)?;
    tracing::debug!(
        path = %path.display(),
        total_docs = stats.total_docs(),
        vocab = stats.vocab_size(),
        "wrote model"
    );
    Ok(())
}

/// Read a model file from `path`.
pub fn load(path: impl AsRef<Path>) -> Result<CorpusStatistics, Error> {
    let path = path.as_ref();
    let stats = read_model(BufReader::new(File::open(path)?))?;
    tracing::debug!(
        path = %path.display(),
        total_docs = stats.total_docs(),
        vocab = stats.vocab_size(),
        "loaded model"
    );
    Ok(stats)
}

fn parse_model(text: &str) -> Result<CorpusStatistics, Error> {
    let mut lines = text.lines();
    let header = lines.next().unwrap_or("");
    let total_docs: u64 = header
        .trim()
        .parse()
        .map_err(|_| Error::InvalidHeader {
            line: header.to_string(),
        })?;

    let mut terms: HashMap<String, TermStats> = HashMap::new();
    for (i, line) in lines.enumerate() {
        let line_no = i + 2;
        let corrupt = |reason: String| Error::CorruptModel {
            line: line_no,
            reason,
        };

        let fields: Vec<&str> = line.split('\t').collect();
        let [term, corpus_count, doc_count] = fields[..] else {
            return Err(corrupt(format!("expected 3 fields, found {}", fields.len())));
        };
        let parse_count = |field: &str| {
            field
                .trim()
                .parse::<u64>()
                .map_err(|_| corrupt(format!("count {field:?} is not a non-negative integer")))
        };
        let s = TermStats::new(parse_count(corpus_count)?, parse_count(doc_count)?);
        if terms.insert(term.to_string(), s).is_some() {
            return Err(corrupt(format!("duplicate term {term:?}")));
        }
    }

    let stats = CorpusStatistics::from_parts(total_docs, terms);
    stats.check_invariants()?;
    Ok(stats)
}
