//! `lexrel` CLI: train, inspect and query corpus-statistics models.
//!
//! Corpus files hold one document per line; tokens are whitespace-separated.

use clap::{Parser, Subcommand};
use lexrel::{RelevanceScorer, Trainer};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Query-document relevance from corpus statistics", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Count terms in one or more corpus files and write a model.
    Train {
        /// Corpus files (one document per line).
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output model file.
        #[arg(short, long)]
        output: PathBuf,

        /// Drop terms occurring fewer than this many times.
        #[arg(long, default_value_t = 0)]
        min_count: u64,

        /// Drop terms found in fewer than this many documents.
        #[arg(long, default_value_t = 0)]
        min_doc_count: u64,
    },

    /// Add the counts of several models together.
    Merge {
        /// Models to merge.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output model file.
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Remove rare terms from a model.
    Prune {
        /// Model to prune.
        #[arg(short, long)]
        model: PathBuf,

        /// Output model file (may equal the input).
        #[arg(short, long)]
        output: PathBuf,

        /// Drop terms occurring fewer than this many times.
        #[arg(long, default_value_t = 0)]
        min_count: u64,

        /// Drop terms found in fewer than this many documents.
        #[arg(long, default_value_t = 0)]
        min_doc_count: u64,
    },

    /// Print summary statistics of a model.
    Inspect {
        /// Model file.
        #[arg(short, long)]
        model: PathBuf,

        /// Also list the most frequent terms.
        #[arg(long, default_value_t = 0)]
        top: usize,
    },

    /// Print the IDF of each term.
    Idf {
        /// Model file.
        #[arg(short, long)]
        model: PathBuf,

        /// Terms to look up.
        #[arg(required = true)]
        terms: Vec<String>,
    },

    /// Score a document against one or more queries.
    Score {
        /// Model file.
        #[arg(short, long)]
        model: PathBuf,

        /// Document text (whitespace-tokenized).
        #[arg(short, long)]
        document: String,

        /// Query text (whitespace-tokenized); repeat for a batch.
        #[arg(short, long = "query", required = true)]
        queries: Vec<String>,

        /// Emit one JSON object per query instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(|s| s.to_string()).collect()
}

fn train_file(trainer: &mut Trainer, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let reader = BufReader::new(std::fs::File::open(path)?);
    for line in reader.lines() {
        trainer.train_document(&tokenize(&line?));
    }
    tracing::info!(path = %path.display(), total_docs = trainer.total_docs(), "trained");
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lexrel=info")),
        )
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        Commands::Train {
            inputs,
            output,
            min_count,
            min_doc_count,
        } => {
            let mut trainer = Trainer::new();
            for input in &inputs {
                train_file(&mut trainer, input)?;
            }
            let removed = trainer.prune(min_count, min_doc_count);
            trainer.save_to_file(&output)?;
            println!(
                "Trained {} documents ({} terms, {} pruned) to {:?}",
                trainer.total_docs(),
                trainer.vocab_size(),
                removed,
                output
            );
        }
        Commands::Merge { inputs, output } => {
            let mut trainer = Trainer::new();
            for input in &inputs {
                trainer.merge(&Trainer::load_from_file(input)?);
            }
            trainer.save_to_file(&output)?;
            println!(
                "Merged {} models ({} documents, {} terms) to {:?}",
                inputs.len(),
                trainer.total_docs(),
                trainer.vocab_size(),
                output
            );
        }
        Commands::Prune {
            model,
            output,
            min_count,
            min_doc_count,
        } => {
            let mut trainer = Trainer::load_from_file(&model)?;
            let removed = trainer.prune(min_count, min_doc_count);
            trainer.save_to_file(&output)?;
            println!(
                "Pruned {} terms, {} remain, to {:?}",
                removed,
                trainer.vocab_size(),
                output
            );
        }
        Commands::Inspect { model, top } => {
            let scorer = RelevanceScorer::load_from_file(&model)?;
            println!("documents:      {}", scorer.total_docs());
            println!("vocabulary:     {}", scorer.vocab_size());
            println!("corpus length:  {}", scorer.corpus_length());
            println!("avg doc length: {:.4}", scorer.avg_doc_length());

            if top > 0 {
                let mut terms: Vec<_> = scorer.stats().iter().collect();
                // Deterministic: corpus count desc, then term asc.
                terms.sort_unstable_by(|a, b| {
                    b.1.corpus_count
                        .cmp(&a.1.corpus_count)
                        .then_with(|| a.0.cmp(b.0))
                });
                for (term, s) in terms.into_iter().take(top) {
                    println!("  {term}\t{}\t{}", s.corpus_count, s.doc_count);
                }
            }
        }
        Commands::Idf { model, terms } => {
            let scorer = RelevanceScorer::load_from_file(&model)?;
            for term in &terms {
                println!("{term}\t{:.6}", scorer.get_idf(term));
            }
        }
        Commands::Score {
            model,
            document,
            queries,
            json,
        } => {
            let scorer = RelevanceScorer::load_from_file(&model)?;
            let doc = tokenize(&document);
            let queries: Vec<Vec<String>> = queries.iter().map(|q| tokenize(q)).collect();
            let results = scorer.score_batch(&doc, &queries)?;

            for (query, result) in queries.iter().zip(&results) {
                if json {
                    println!("{}", serde_json::to_string(result)?);
                } else {
                    println!("Scores for {:?}:", query);
                    for (name, score) in result.iter() {
                        println!("  {name}: {score:.6}");
                    }
                }
            }
        }
    }

    Ok(())
}
