// Declare modules
pub mod cli;
pub mod collector;
pub mod config;
pub mod error;
pub mod formatter;
pub mod models;
pub mod profile;
pub mod scanner;
pub mod tree;
pub mod writer;

use anyhow::{Context, Result};
use chrono::Local;
use std::collections::HashMap;

use self::cli::Cli;
use self::collector::ContentCollector;
use self::config::resolve_config;
use self::formatter::OutputGenerator;
use self::models::{GeneratedDocument, ScanConfig};
use self::profile::{load_user_profiles, user_profiles_path};
use self::scanner::Scanner;

/// Resolves configuration, builds the document and writes it out.
pub fn run(cli: Cli) -> Result<()> {
    // 1. Language profiles (built-in + ~/.config overrides)
    let user_profiles = match user_profiles_path() {
        Some(path) if !cli.no_profile => load_user_profiles(&path)?,
        _ => HashMap::new(),
    };

    // 2. Resolve Configuration
    let config = resolve_config(&cli, &user_profiles)?;
    log::info!(
        "Scanning {} for '{}' files",
        config.root().display(),
        config.filter()
    );

    // 3. Scan, read and assemble
    let document = generate(&config)?;
    let markdown = OutputGenerator::render(&document);

    // 4. Emit
    if cli.stdout {
        print!("{}", markdown);
        return Ok(());
    }

    let path = writer::output_path(&config, Local::now());
    writer::write_document(&path, &markdown)
        .with_context(|| format!("Failed to save {}", path.display()))?;
    log::info!("Wrote {} files into {}", document.file_count(), path.display());
    println!("Markdown file '{}' created successfully.", path.display());

    Ok(())
}

/// The core pipeline: match, read, then assemble. Nothing is written.
pub fn generate(config: &ScanConfig) -> error::Result<GeneratedDocument> {
    let files = Scanner::new(config).scan()?;
    if files.is_empty() {
        log::warn!("⚠️ No files matched in {}", config.root().display());
    }

    let collection = ContentCollector::new(config.unreadable_policy()).collect(files)?;
    if !collection.skipped.is_empty() {
        log::warn!(
            "{} unreadable file(s) left out of the document",
            collection.skipped.len()
        );
    }

    Ok(OutputGenerator::assemble(config, collection.sections))
}
