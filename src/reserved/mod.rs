// src/reserved/mod.rs
// =============================================================================
// Names GitHub keeps for itself.
//
// `https://github.com/settings` or `https://github.com/orgs/...` look like
// user profiles but are site routes. The shortener asks this list whether the
// first path segment is such a name and, if so, shows the URL unchanged.
//
// Sources of the list:
// - bundled: assets/reserved-names.json, compiled into the binary
// - a local JSON file (load_reserved_file)
// - a remote JSON file fetched once at startup (fetch_reserved_names)
//
// All three use the same format: a JSON array of strings.
// =============================================================================

mod fetch;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use thiserror::Error;
use tracing::info;

pub use fetch::{fetch_reserved_names, DEFAULT_RESERVED_URL};

const BUNDLED_JSON: &str = include_str!("../../assets/reserved-names.json");

static BUNDLED: LazyLock<ReservedNames> = LazyLock::new(|| {
    ReservedNames::from_json(BUNDLED_JSON).expect("bundled reserved-name list is valid JSON")
});

/// Errors while loading a reserved-name list
#[derive(Debug, Error)]
pub enum ReservedError {
    #[error("reserved-name list is not a JSON array of strings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read reserved-name list {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch reserved-name list: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("failed to fetch {url}: HTTP {status}")]
    Status { url: String, status: u16 },
}

/// A read-only set of reserved names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservedNames {
    names: HashSet<String>,
}

impl ReservedNames {
    /// The list compiled into the crate, parsed on first use
    pub fn bundled() -> &'static ReservedNames {
        &BUNDLED
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ReservedNames {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ReservedError> {
        let names: Vec<String> = serde_json::from_str(json)?;
        Ok(ReservedNames::from_names(names))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Reads a reserved-name list from a JSON file on disk
pub fn load_reserved_file(path: &Path) -> Result<ReservedNames, ReservedError> {
    let json = std::fs::read_to_string(path).map_err(|source| ReservedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let names = ReservedNames::from_json(&json)?;
    info!(path = %path.display(), count = names.len(), "loaded reserved names from file");
    Ok(names)
}
