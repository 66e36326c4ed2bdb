// src/shorten/format.rs
// =============================================================================
// Formatter helpers.
//
// Small string builders shared by every route renderer. They know nothing
// about URL shapes; the routes decide what goes where.
// =============================================================================

use std::sync::LazyLock;

use regex::Regex;

/// `.patch` / `.diff` at the end of a path or revision
pub static PATCH_DIFF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(patch|diff)$").expect("valid suffix pattern"));

static FULL_SHA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-f]{40}$").expect("valid sha pattern"));

/// Joins the non-empty parts with `delimiter`
///
/// `join_values(&["", "main"], "@")` is `"main"`, which is how the repo
/// prefix disappears when it matches the current page.
pub fn join_values(parts: &[&str], delimiter: &str) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(delimiter)
}

/// Wraps a value in inline-code markup
pub fn code(value: &str) -> String {
    format!("<code>{value}</code>")
}

pub fn is_full_sha(value: &str) -> bool {
    FULL_SHA.is_match(value)
}

/// Display form of a revision
///
/// A trailing `.patch`/`.diff` is dropped, then a full commit hash is cut to
/// seven characters and shown as code. Branch and tag names stay as they are.
pub fn style_revision(revision: &str) -> String {
    if revision.is_empty() {
        return String::new();
    }

    let revision = PATCH_DIFF.replace(revision, "");
    if is_full_sha(&revision) {
        code(&revision[..7])
    } else {
        revision.into_owned()
    }
}

/// Suffix telling the reader the link points at a comment or a review
pub fn comment_indicator(hash: &str) -> &'static str {
    const COMMENT: [&str; 3] = ["#issue-", "#issuecomment-", "#commitcomment-"];
    const REVIEW: [&str; 2] = ["#pullrequestreview-", "#discussion_r"];

    if COMMENT.iter().any(|prefix| hash.starts_with(prefix)) {
        " (comment)"
    } else if REVIEW.iter().any(|prefix| hash.starts_with(prefix)) {
        " (review)"
    } else {
        ""
    }
}

/// Collapses whitespace runs to single spaces and trims the ends
pub fn normalize_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
