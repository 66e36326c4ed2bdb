// src/markdown.rs
// =============================================================================
// This module pulls links out of Markdown text, so a whole README or
// changelog can be turned into a list of short labels at once.
//
// Each link keeps the text it was written with. A reader of the label table
// can then compare `[the fix](https://github.com/a/b/pull/42/files)` with the
// label the shortener would show instead: `a/b#42 (files)`.
//
// We use the `pulldown-cmark` crate which:
// - Parses Markdown into events (heading, paragraph, link, etc.)
// - Follows the CommonMark specification
// - Handles autolinks (<https://...>) the same way as [text](url)
// =============================================================================

use pulldown_cmark::{Event, Parser, Tag};
use serde::Serialize;

/// A link found in a Markdown document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkdownLink {
    /// Visible text, with inline markup (emphasis, code spans) flattened
    pub text: String,
    /// Destination URL as written
    pub url: String,
}

impl MarkdownLink {
    /// True for autolinks and `[https://x](https://x)`: the text is the URL
    /// itself, which is exactly where a short label helps most
    pub fn text_is_url(&self) -> bool {
        self.text.trim() == self.url
    }
}

// Extracts every http(s) link with its text, in document order
//
// Example input:
//   "Fixed in [the **fix**](https://github.com/a/b/pull/42/files)"
//
// Example output:
//   MarkdownLink { text: "the fix", url: "https://github.com/a/b/pull/42/files" }
pub fn extract_markdown_links(markdown: &str) -> Vec<MarkdownLink> {
    let mut links = Vec::new();
    // Some while inside an http(s) link: the destination and the text so far
    let mut current: Option<MarkdownLink> = None;

    for event in Parser::new(markdown) {
        match event {
            // In pulldown-cmark 0.9, Link is Tag::Link(link_type, dest_url, title)
            Event::Start(Tag::Link(_link_type, dest_url, _title)) => {
                current = is_http_link(&dest_url).then(|| MarkdownLink {
                    text: String::new(),
                    url: dest_url.to_string(),
                });
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(link) = current.as_mut() {
                    link.text.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some(link) = current.as_mut() {
                    link.text.push(' ');
                }
            }
            Event::End(Tag::Link(..)) => {
                if let Some(link) = current.take() {
                    links.push(link);
                }
            }
            _ => {}
        }
    }

    links
}

// Skips mailto:, relative links, anchors and the like
fn is_http_link(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
