// src/shorten/error.rs
// =============================================================================
// Errors returned by the shortener.
//
// The only failure is bad input: either the target or the page URL is not an
// absolute URL. Everything else (no route matching, optional captures being
// absent) is a normal outcome and never reaches this type.
// =============================================================================

use thiserror::Error;

/// Errors produced while shortening a URL
#[derive(Debug, Error)]
pub enum ShortenError {
    /// The input could not be parsed as an absolute URL
    #[error("malformed URL '{input}': {source}")]
    MalformedUrl {
        /// The string that failed to parse
        input: String,
        #[source]
        source: url::ParseError,
    },
}

impl ShortenError {
    pub(crate) fn malformed(input: &str, source: url::ParseError) -> Self {
        ShortenError::MalformedUrl {
            input: input.to_string(),
            source,
        }
    }
}
