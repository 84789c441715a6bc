pub use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print dataset metadata as JSON
    Info {
        /// Builder config (plain_text, bytes, subwords8k, subwords32k)
        #[arg(short, long, default_value = "plain_text")]
        config: String,
    },

    /// Resolve the train and test splits of an extracted corpus
    Splits {
        /// Builder config (plain_text, bytes, subwords8k, subwords32k)
        #[arg(short, long, default_value = "plain_text")]
        config: String,

        /// Extracted corpus directory (containing train/ and test/)
        #[arg(short, long)]
        data_dir: String,

        /// Directory with previously built vocabularies
        #[arg(long)]
        vocab_dir: Option<String>,
    },

    /// Stream every split through the encoder and count labels
    Stats {
        /// Builder config (plain_text, bytes, subwords8k, subwords32k)
        #[arg(short, long, default_value = "plain_text")]
        config: String,

        /// Extracted corpus directory (containing train/ and test/)
        #[arg(short, long)]
        data_dir: String,

        /// Directory with previously built vocabularies
        #[arg(long)]
        vocab_dir: Option<String>,
    },

    /// Show a single review
    Sample {
        /// Extracted corpus directory (containing train/ and test/)
        #[arg(short, long)]
        data_dir: String,

        /// Split to read from
        #[arg(short, long, default_value = "train")]
        split: String,

        /// Index of the review within the split
        #[arg(short, long, default_value_t = 0)]
        index: usize,
    },

    /// Learn and save the subword vocabulary of a config
    BuildVocab {
        /// Subword builder config (subwords8k, subwords32k)
        #[arg(short, long, default_value = "subwords8k")]
        config: String,

        /// Extracted corpus directory (containing train/ and test/)
        #[arg(short, long)]
        data_dir: String,

        /// Directory to store vocabularies
        #[arg(long, default_value = "vocabs")]
        vocab_dir: String,
    },

    /// List all built vocabularies
    ListVocabs {
        /// Directory containing vocabularies
        #[arg(long, default_value = "vocabs")]
        vocab_dir: String,
    },
}
