// src/lib.rs
// =============================================================================
// Library root for shorten-repo-url.
//
// The crate turns a full GitHub URL into a short label such as
// `a/b#42 (files)` or `@octocat`, dropping whatever the page the label is
// shown on already tells the reader (same site, same repository).
//
// Modules:
// - shorten: parsing, route matching and rendering (the core)
// - reserved: the list of names GitHub does not allow as user names
// - markdown: pulls links out of Markdown documents for batch shortening
// =============================================================================

pub mod markdown;
pub mod reserved;
pub mod shorten;

pub use reserved::{ReservedError, ReservedNames};
pub use shorten::{shorten, ShortenError, Shortener, ShortenerConfig, DEFAULT_CURRENT_URL};
