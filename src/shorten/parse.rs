// src/shorten/parse.rs
// =============================================================================
// Parser stage: turns the two input strings into plain data.
//
// - ParsedUrl: the URL being shortened, split into origin, path segments,
//   query pairs and fragment
// - Context: the page the label will be shown on, reduced to the two things
//   we compare against (origin and "owner/repo")
//
// We use the `url` crate for the actual parsing so that anything a browser
// would reject is rejected here too.
// =============================================================================

use url::{form_urlencoded, Url};

use super::error::ShortenError;

/// The URL being shortened, decomposed once and never modified afterwards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    /// The input exactly as the caller passed it
    pub href: String,
    /// `scheme://host[:port]`, or `null` for opaque origins
    pub origin: String,
    /// Percent-encoded path, always starting with `/` for web URLs
    pub pathname: String,
    /// `pathname` without its leading slash, split on `/`
    pub segments: Vec<String>,
    /// `?query` or an empty string
    pub search: String,
    /// Decoded query pairs, in the order they appear
    pub query: Vec<(String, String)>,
    /// `#fragment` or an empty string
    pub hash: String,
}

impl ParsedUrl {
    pub fn parse(input: &str) -> Result<Self, ShortenError> {
        let url = Url::parse(input).map_err(|e| ShortenError::malformed(input, e))?;

        let pathname = url.path().to_string();
        let segments = split_path(&pathname).map(str::to_string).collect();

        // A lone `?` or `#` counts as absent, like in a browser
        let search = match url.query() {
            Some(q) if !q.is_empty() => format!("?{q}"),
            _ => String::new(),
        };
        let hash = match url.fragment() {
            Some(f) if !f.is_empty() => format!("#{f}"),
            _ => String::new(),
        };

        let query = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        Ok(ParsedUrl {
            href: input.to_string(),
            origin: url.origin().ascii_serialization(),
            pathname,
            segments,
            search,
            query,
            hash,
        })
    }

    /// Positional path segment, `None` when the path is shorter
    pub fn segment(&self, index: usize) -> Option<&str> {
        self.segments.get(index).map(String::as_str)
    }

    /// First value of a query parameter
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The query string with every `key` pair removed, re-encoded as a form
    pub fn search_without(&self, key: &str) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        let mut kept = 0;
        for (k, v) in self.query.iter().filter(|(k, _)| k != key) {
            serializer.append_pair(k, v);
            kept += 1;
        }

        if kept == 0 {
            String::new()
        } else {
            format!("?{}", serializer.finish())
        }
    }
}

/// The page a label is displayed on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub origin: String,
    /// First two path pieces joined by `/`, e.g. `denoland/deno`
    pub repo_identity: String,
}

impl Context {
    pub fn parse(input: &str) -> Result<Self, ShortenError> {
        let url = Url::parse(input).map_err(|e| ShortenError::malformed(input, e))?;
        let repo_identity = split_path(url.path()).take(2).collect::<Vec<_>>().join("/");

        Ok(Context {
            origin: url.origin().ascii_serialization(),
            repo_identity,
        })
    }
}

fn split_path(pathname: &str) -> std::str::Split<'_, char> {
    pathname.strip_prefix('/').unwrap_or(pathname).split('/')
}
