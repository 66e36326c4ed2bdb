// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands share the same options:
// - shorten:  shorten the URLs given as arguments
// - markdown: shorten every link found in a Markdown file
//
// The shared options (page URL, output format, reserved-name source, extra
// mirror origins) live in ShortenArgs and are flattened into both.
// =============================================================================

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use shorten_repo_url::reserved::DEFAULT_RESERVED_URL;
use shorten_repo_url::DEFAULT_CURRENT_URL;

#[derive(Parser, Debug)]
#[command(
    name = "shorten-repo-url",
    version,
    about = "Shorten GitHub URLs into compact labels",
    long_about = "shorten-repo-url turns full GitHub URLs into short labels such as \
                  `a/b#42 (files)` or `@octocat`, dropping the parts the page \
                  showing the label already implies."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Shorten one or more URLs
    ///
    /// Example: shorten-repo-url shorten https://github.com/a/b/pull/42/files
    Shorten {
        /// URLs to shorten
        #[arg(required = true)]
        hrefs: Vec<String>,

        #[command(flatten)]
        options: ShortenArgs,
    },

    /// Shorten every http(s) link in a Markdown file
    ///
    /// Example: shorten-repo-url markdown CHANGELOG.md --current https://github.com/a/b
    Markdown {
        /// Path to the Markdown file
        file: PathBuf,

        #[command(flatten)]
        options: ShortenArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ShortenArgs {
    /// URL of the page the labels will be shown on
    #[arg(long, default_value = DEFAULT_CURRENT_URL)]
    pub current: String,

    /// Output results in JSON format instead of a table
    #[arg(long)]
    pub json: bool,

    /// Load reserved names from a local JSON array instead of the bundled list
    #[arg(long, value_name = "PATH", conflicts_with = "fetch_reserved")]
    pub reserved_file: Option<PathBuf>,

    /// Download the reserved-name list before shortening
    #[arg(long)]
    pub fetch_reserved: bool,

    /// Where --fetch-reserved downloads the list from
    #[arg(long, value_name = "URL", default_value = DEFAULT_RESERVED_URL)]
    pub reserved_url: String,

    /// Extra origin serving raw file contents (repeatable)
    #[arg(long = "raw-origin", value_name = "ORIGIN")]
    pub raw_origins: Vec<String>,

    /// Extra origin redirecting to GitHub (repeatable)
    #[arg(long = "redirect-origin", value_name = "ORIGIN")]
    pub redirect_origins: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_shorten_defaults() {
        let cli = Cli::try_parse_from(["shorten-repo-url", "shorten", "https://github.com/a"]).unwrap();
        let Commands::Shorten { hrefs, options } = cli.command else {
            panic!("expected shorten subcommand");
        };
        assert_eq!(hrefs, vec!["https://github.com/a"]);
        assert_eq!(options.current, DEFAULT_CURRENT_URL);
        assert!(!options.json);
        assert!(!options.fetch_reserved);
        assert_eq!(options.reserved_url, DEFAULT_RESERVED_URL);
    }

    #[test]
    fn test_repeatable_origins() {
        let cli = Cli::try_parse_from([
            "shorten-repo-url",
            "markdown",
            "README.md",
            "--redirect-origin",
            "https://gh.example",
            "--redirect-origin",
            "https://gh2.example",
        ])
        .unwrap();
        let Commands::Markdown { file, options } = cli.command else {
            panic!("expected markdown subcommand");
        };
        assert_eq!(file, PathBuf::from("README.md"));
        assert_eq!(options.redirect_origins.len(), 2);
    }

    #[test]
    fn test_reserved_file_conflicts_with_fetch() {
        let result = Cli::try_parse_from([
            "shorten-repo-url",
            "shorten",
            "https://github.com/a",
            "--reserved-file",
            "names.json",
            "--fetch-reserved",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_shorten_requires_a_url() {
        assert!(Cli::try_parse_from(["shorten-repo-url", "shorten"]).is_err());
    }
}
