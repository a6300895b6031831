//! LyricSwitch - song lyrics lookup and translation
//!
//! Entry point for the `lyricswitch` command: looks up lyrics, translates
//! them with a hosted language model and finds the music video.

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::{fmt, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use tracing_appender::{non_blocking, rolling};

use lyricswitch::cli::{Args, Commands, ConfigAction};
use lyricswitch::config::{Config, DEFAULT_CONFIG_FILE, TranslationBackend};
use lyricswitch::error::LyricSwitchError;
use lyricswitch::language::Language;
use lyricswitch::workflow::{OutputFormat, Workflow};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(args.verbose)?;
    info!("Starting LyricSwitch");

    // Load configuration
    let mut config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if Path::new(DEFAULT_CONFIG_FILE).exists() {
                info!("Found {} in current directory, loading...", DEFAULT_CONFIG_FILE);
                Config::from_file(DEFAULT_CONFIG_FILE)?
            } else {
                Config::default()
            }
        }
    };
    config.apply_env();

    match args.command {
        Commands::Search { artist, title, lang, backend, json } => {
            apply_backend_override(&mut config, backend.as_deref())?;
            let language = lang.as_deref().map(str::parse::<Language>).transpose()?;
            let format = if json { OutputFormat::Json } else { OutputFormat::Text };

            let workflow = Workflow::new(config)?;
            let rendered = workflow.search_once(&artist, &title, language, format).await?;
            print!("{}", rendered);
            if json {
                println!();
            }
        }
        Commands::Interactive { backend } => {
            apply_backend_override(&mut config, backend.as_deref())?;

            let workflow = Workflow::new(config)?;
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            workflow.run_interactive(stdin, tokio::io::stdout()).await?;
        }
        Commands::Languages => {
            println!("{:<6} {:<12}", "Code", "Language");
            println!("{}", "-".repeat(18));
            for language in Language::ALL {
                let marker = if language == config.search.default_language { " (default)" } else { "" };
                println!("{:<6} {:<12}{}", language.code(), language.name(), marker);
            }
        }
        Commands::Check => {
            let workflow = Workflow::new(config)?;
            let findings = workflow.check().await;
            if findings.is_empty() {
                println!("Everything looks good.");
            } else {
                for finding in findings {
                    println!("- {}", finding);
                }
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let content = toml::to_string_pretty(&config.masked())
                    .map_err(|e| LyricSwitchError::Config(format!("Failed to serialize config: {}", e)))?;
                print!("{}", content);
            }
            ConfigAction::Init { path, force } => {
                let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
                if path.exists() && !force {
                    return Err(LyricSwitchError::Config(format!(
                        "{} already exists, use --force to overwrite",
                        path.display()
                    ))
                    .into());
                }
                Config::default().save_to_file(&path)?;
                println!("Wrote default configuration to {}", path.display());
            }
        },
    }

    Ok(())
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = std::env::current_dir()?.join(".lyricswitch").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Daily rotation
    let file_appender = rolling::daily(&log_dir, "lyricswitch.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // Console output goes to stderr so rendered results stay clean on stdout
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(verbose)
        .with_line_number(verbose);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    let console_filter = if verbose { Level::DEBUG } else { Level::WARN };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer.with_filter(LevelFilter::from_level(console_filter)))
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized - level: {}, file: {}",
          log_level, log_dir.join("lyricswitch.log").display());

    Ok(())
}

fn apply_backend_override(config: &mut Config, backend: Option<&str>) -> Result<()> {
    if let Some(name) = backend {
        config.translate.backend = name.parse::<TranslationBackend>()?;
    }
    Ok(())
}
