use clap::Parser;
use std::path::PathBuf;

use yttext::output::Locale;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(
    name = "yttext",
    about = "Extract clean caption text from YouTube videos",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// YouTube video URL (reads URLs from stdin if omitted)
    pub url: Option<String>,

    /// Output format: text (default), json
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Preferred caption language, repeatable, highest priority first
    #[arg(short, long = "lang")]
    pub langs: Vec<String>,

    /// Language for machine translation when the chosen track cannot be fetched
    #[arg(long)]
    pub translate_to: Option<String>,

    /// Language of error messages
    #[arg(long, value_enum)]
    pub locale: Option<Locale>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Show video metadata and the chosen caption track
    #[arg(short, long)]
    pub verbose: bool,
}
