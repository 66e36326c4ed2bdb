// src/main.rs
// =============================================================================
// This is the entry point of the shorten-repo-url CLI.
//
// What happens here:
// 1. Set up logging (stderr, filtered by RUST_LOG)
// 2. Parse command-line arguments using clap
// 3. Build a Shortener: reserved names (bundled, file or download) plus any
//    extra mirror origins
// 4. Shorten the URLs and print them as a table or JSON
// 5. Exit with proper code (0 = success, 1 = malformed URLs, 2 = error)
// =============================================================================

mod cli;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, ShortenArgs};
use shorten_repo_url::markdown::{extract_markdown_links, MarkdownLink};
use shorten_repo_url::reserved::{fetch_reserved_names, load_reserved_file};
use shorten_repo_url::{ReservedNames, Shortener, ShortenerConfig};

/// One line of output: the input URL with its label or the reason it failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct LabelRow {
    url: String,
    /// Link text from a Markdown document, when it says more than the URL
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl LabelRow {
    fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Shorten { hrefs, options } => {
            let shortener = build_shortener(&options).await?;
            let rows = shorten_all(&shortener, &hrefs, &options.current);
            report(&rows, options.json)
        }
        Commands::Markdown { file, options } => {
            let shortener = build_shortener(&options).await?;
            handle_markdown(&shortener, &file, &options)
        }
    }
}

async fn build_shortener(options: &ShortenArgs) -> Result<Shortener> {
    let reserved = if let Some(path) = &options.reserved_file {
        load_reserved_file(path)
            .with_context(|| format!("could not load reserved names from {}", path.display()))?
    } else if options.fetch_reserved {
        match fetch_reserved_names(&options.reserved_url).await {
            Ok(names) => names,
            Err(e) => {
                warn!(error = %e, "using bundled reserved names instead");
                ReservedNames::bundled().clone()
            }
        }
    } else {
        ReservedNames::bundled().clone()
    };

    let mut config = ShortenerConfig::with_reserved(reserved);
    config.raw_origins.extend(options.raw_origins.iter().cloned());
    config.redirect_origins.extend(options.redirect_origins.iter().cloned());

    Ok(Shortener::new(config))
}

fn handle_markdown(shortener: &Shortener, file: &Path, options: &ShortenArgs) -> Result<i32> {
    let markdown = std::fs::read_to_string(file)
        .with_context(|| format!("could not read {}", file.display()))?;

    let links = extract_markdown_links(&markdown);
    info!(file = %file.display(), count = links.len(), "extracted links");

    if links.is_empty() {
        println!("No links found in {}", file.display());
        return Ok(0);
    }

    let rows = shorten_links(shortener, &links, &options.current);
    report(&rows, options.json)
}

fn shorten_all(shortener: &Shortener, hrefs: &[String], current: &str) -> Vec<LabelRow> {
    hrefs
        .iter()
        .map(|href| shorten_row(shortener, href, current))
        .collect()
}

// Autolinks carry no text of their own, so only real link text is shown
fn shorten_links(shortener: &Shortener, links: &[MarkdownLink], current: &str) -> Vec<LabelRow> {
    links
        .iter()
        .map(|link| LabelRow {
            text: (!link.text_is_url()).then(|| link.text.clone()),
            ..shorten_row(shortener, &link.url, current)
        })
        .collect()
}

fn shorten_row(shortener: &Shortener, href: &str, current: &str) -> LabelRow {
    match shortener.shorten(href, Some(current)) {
        Ok(label) => LabelRow {
            url: href.to_string(),
            text: None,
            label,
            error: None,
        },
        Err(e) => LabelRow {
            url: href.to_string(),
            text: None,
            label: None,
            error: Some(e.to_string()),
        },
    }
}

// Prints the rows and turns them into the exit code
fn report(rows: &[LabelRow], json: bool) -> Result<i32> {
    if json {
        println!("{}", serde_json::to_string_pretty(rows)?);
    } else {
        print_table(rows);
    }

    if rows.iter().all(LabelRow::is_ok) {
        Ok(0)
    } else {
        Ok(1)
    }
}

fn print_table(rows: &[LabelRow]) {
    // Markdown rows get an extra TEXT column
    let with_text = rows.iter().any(|row| row.text.is_some());

    if with_text {
        println!("{:<30} {:<60} {}", "TEXT", "URL", "LABEL");
        println!("{}", "=".repeat(131));
    } else {
        println!("{:<60} {}", "URL", "LABEL");
        println!("{}", "=".repeat(100));
    }

    for row in rows {
        let label = match (&row.label, &row.error) {
            (_, Some(error)) => format!("ERROR: {error}"),
            (Some(label), None) => label.clone(),
            (None, None) => String::new(),
        };
        let url = truncate_url(&row.url, 57);
        if with_text {
            let text = truncate_url(row.text.as_deref().unwrap_or_default(), 27);
            println!("{:<30} {:<60} {}", text, url, label);
        } else {
            println!("{:<60} {}", url, label);
        }
    }
}

// Keeps the table aligned; cuts on a char boundary
fn truncate_url(url: &str, max_chars: usize) -> String {
    if url.chars().count() > max_chars {
        let cut: String = url.chars().take(max_chars).collect();
        format!("{cut}...")
    } else {
        url.to_string()
    }
}
