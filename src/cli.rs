use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Look up, translate and show a single song
    Search {
        /// Artist name
        #[arg(short, long)]
        artist: String,

        /// Song title
        #[arg(short, long)]
        title: String,

        /// Target language code or name (en, es, pt, ja)
        #[arg(short, long)]
        lang: Option<String>,

        /// Translation backend override (chat, ollama)
        #[arg(long)]
        backend: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search songs one after another from prompts
    Interactive {
        /// Translation backend override (chat, ollama)
        #[arg(long)]
        backend: Option<String>,
    },

    /// List supported target languages
    Languages,

    /// Check credentials and backend availability
    Check,

    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration with secrets masked
    Show,

    /// Write a configuration file with default values
    Init {
        /// Destination (default: lyricswitch.toml)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
