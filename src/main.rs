use anyhow::{bail, Context, Result};
use burn::data::dataset::Dataset;
use imdb_reviews::session::{self, VocabSession};
use imdb_reviews::{
    EncodedText, ImdbDataset, ImdbReviews, ImdbReviewsConfig, LocalDownloadManager, Split,
    SplitGenerator,
};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod cli;

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Info { config } => {
            let builder = ImdbReviews::from_config_name(&config)?;
            println!("{}", serde_json::to_string_pretty(builder.info())?);
        }

        Commands::Splits {
            config,
            data_dir,
            vocab_dir,
        } => {
            let (_, splits) = prepare(&config, &data_dir, vocab_dir.as_deref())?;
            println!("{:<8} {:<8} {}", "Split", "Shards", "Directory");
            println!("{}", "-".repeat(60));
            for split in splits {
                println!(
                    "{:<8} {:<8} {}",
                    split.name,
                    split.num_shards,
                    split.directory.display()
                );
            }
        }

        Commands::Stats {
            config,
            data_dir,
            vocab_dir,
        } => {
            let (builder, splits) = prepare(&config, &data_dir, vocab_dir.as_deref())?;
            let mut summaries = Vec::with_capacity(splits.len());
            for split in &splits {
                summaries.push((split.name, split_stats(&builder, split)?));
            }

            println!("\nConfig: {}", builder.config().name);
            println!(
                "{:<8} {:<10} {:<10} {:<10} {:<12}",
                "Split", "Reviews", "neg", "pos", "Avg length"
            );
            println!("{}", "-".repeat(54));
            for (name, stats) in summaries {
                println!(
                    "{:<8} {:<10} {:<10} {:<10} {:<12.1}",
                    name,
                    stats.reviews(),
                    stats.label_counts[0],
                    stats.label_counts[1],
                    stats.average_length(),
                );
            }
            println!(
                "\nNote: length is in {}",
                if builder.info().features.text.tokenizer().is_some() {
                    "token ids"
                } else {
                    "whitespace separated words"
                }
            );
        }

        Commands::Sample {
            data_dir,
            split,
            index,
        } => {
            let dataset = match split.as_str() {
                "train" => ImdbDataset::train(&data_dir)?,
                "test" => ImdbDataset::test(&data_dir)?,
                other => bail!("unknown split `{other}`, expected train or test"),
            };
            let Some(item) = dataset.try_get(index)? else {
                bail!(
                    "no review at index {index} ({} reviews in {split})",
                    dataset.len()
                );
            };
            if let Some(path) = dataset.path(index) {
                println!("File:  {}", path.display());
            }
            println!("Label: {}", item.label);
            println!("\n{}", item.text);
        }

        Commands::BuildVocab {
            config,
            data_dir,
            vocab_dir,
        } => {
            let session = build_vocab(&config, &data_dir, Path::new(&vocab_dir))?;
            println!("\nVocabulary built!");
            println!("{}", "-".repeat(60));
            println!("  Config:       {}", session.get_config_name());
            println!("  Vocab size:   {}", session.get_vocab_size());
            println!("  Corpus texts: {}", session.get_corpus_texts());
            println!(
                "  Saved to:     {}",
                session.vocab_path(Path::new(&vocab_dir)).display()
            );
            println!("{}", "-".repeat(60));
        }

        Commands::ListVocabs { vocab_dir } => {
            match session::list_vocab_sessions(Path::new(&vocab_dir)) {
                Ok(sessions) => {
                    println!("\nBuilt vocabularies:");
                    if sessions.is_empty() {
                        println!("No vocabularies found.");
                    } else {
                        println!(
                            "{:<20} {:<14} {:<12} {:<14} {:<10}",
                            "Timestamp", "Config", "Vocab size", "Corpus texts", "Duration"
                        );
                        println!("{}", "-".repeat(74));
                        for session in sessions {
                            println!(
                                "{:<20} {:<14} {:<12} {:<14} {:<10}",
                                session.get_timestamp(),
                                session.get_config_name(),
                                session.get_vocab_size(),
                                session.get_corpus_texts(),
                                session.get_duration().as_deref().unwrap_or(""),
                            );
                        }
                    }
                }
                Err(e) => {
                    println!("Error reading vocabularies from directory: {}", e);
                    return Err(e.into());
                }
            }
        }
    }
    Ok(())
}

/// Creates the builder, restores a saved vocabulary when one exists, and
/// resolves the splits of the corpus extracted at `data_dir`.
fn prepare(
    config_name: &str,
    data_dir: &str,
    vocab_dir: Option<&str>,
) -> Result<(ImdbReviews, Vec<SplitGenerator>)> {
    let mut builder = ImdbReviews::from_config_name(config_name)?;

    if let Some(vocab_dir) = vocab_dir {
        let vocab_dir = Path::new(vocab_dir);
        if let Some(session) = session::find_vocab_session(vocab_dir, config_name)? {
            let path = session.vocab_path(vocab_dir);
            if builder.info_mut().features.text.load_metadata(&path)? {
                info!(path = %path.display(), "restored vocabulary");
            }
        }
    }

    let manager = LocalDownloadManager::new(PathBuf::from(data_dir));
    let splits = builder
        .split_generators(&manager)
        .with_context(|| format!("failed to prepare splits from {data_dir}"))?;
    Ok((builder, splits))
}

fn build_vocab(config_name: &str, data_dir: &str, vocab_dir: &Path) -> Result<VocabSession> {
    let config = ImdbReviewsConfig::from_name(config_name)?;
    if !config.text_encoder.requires_vocab() {
        bail!("config `{config_name}` does not use a learned vocabulary");
    }

    let start_time = std::time::Instant::now();
    let (builder, _) = prepare(config_name, data_dir, None)?;

    let text = &builder.info().features.text;
    let vocab_size = text.vocab_size().context("vocabulary was not built")?;
    let corpus_texts = text.corpus_texts().context("vocabulary was not built")?;

    let mut session = VocabSession::new(config_name, vocab_size, corpus_texts);
    session.set_duration(format!("{:.2?}", start_time.elapsed()));
    text.save_metadata(&session.vocab_path(vocab_dir))?;
    session.save(vocab_dir)?;

    Ok(session)
}

struct SplitStats {
    label_counts: [usize; 2],
    total_length: usize,
}

impl SplitStats {
    fn reviews(&self) -> usize {
        self.label_counts.iter().sum()
    }

    fn average_length(&self) -> f64 {
        match self.reviews() {
            0 => 0.0,
            n => self.total_length as f64 / n as f64,
        }
    }
}

fn split_stats(builder: &ImdbReviews, split: &SplitGenerator) -> Result<SplitStats> {
    let total = ImdbDataset::new(&split.directory)?.len();
    let mut progress = ProgressIndicator::new(split.name, total);
    let mut stats = SplitStats {
        label_counts: [0; 2],
        total_length: 0,
    };

    for record in builder.generate_examples(&split.directory)? {
        let record = record.with_context(|| format!("failed to generate {} split", split.name))?;
        if let Some(count) = stats.label_counts.get_mut(record.label) {
            *count += 1;
        }
        stats.total_length += match &record.text {
            EncodedText::Ids(ids) => ids.len(),
            EncodedText::Text(text) => text.split_whitespace().count(),
        };
        progress.update(stats.reviews())?;
    }
    progress.finish()?;

    Ok(stats)
}

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};
use std::time::Instant;

const UPDATE_FREQUENCY: usize = 500;

pub struct ProgressIndicator {
    start_time: Instant,
    split: Split,
    total_items: usize,
    last_update: usize,
}

impl ProgressIndicator {
    pub fn new(split: Split, total_items: usize) -> Self {
        Self {
            start_time: Instant::now(),
            split,
            total_items,
            last_update: 0,
        }
    }

    pub fn update(&mut self, processed: usize) -> io::Result<()> {
        if processed - self.last_update < UPDATE_FREQUENCY
            && processed > 0
            && processed < self.total_items
        {
            return Ok(());
        }
        self.last_update = processed;

        execute!(
            io::stdout(),
            cursor::MoveToColumn(0),
            Clear(ClearType::CurrentLine)
        )?;

        let secs = self.start_time.elapsed().as_secs();
        let progress = match self.total_items {
            0 => 100,
            total => processed * 100 / total,
        };

        print!(
            "Encoding {} | Items: {}/{} | ({} secs) | {}%",
            self.split, processed, self.total_items, secs, progress,
        );

        io::stdout().flush()?;
        Ok(())
    }

    pub fn finish(&mut self) -> io::Result<()> {
        println!();
        Ok(())
    }
}
