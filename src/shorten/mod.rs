// src/shorten/mod.rs
// =============================================================================
// The URL shortener.
//
// Submodules:
// - parse: splits the target URL and the page URL into plain data
// - routes: the ordered table of GitHub URL shapes and their renderers
// - format: string helpers shared by the renderers
// - error: the MalformedUrl error
//
// Data flows one way: parse -> routes -> format. Nothing is kept between
// calls, so a Shortener can be shared freely across threads.
// =============================================================================

mod error;
mod format;
mod parse;
mod routes;

use std::sync::LazyLock;

use tracing::debug;

use crate::reserved::ReservedNames;

pub use error::ShortenError;
pub use parse::{Context, ParsedUrl};
pub use routes::{classify, Route, RouteMatch, Target, ROUTES};

/// Page URL assumed when the caller does not say where the label is shown
pub const DEFAULT_CURRENT_URL: &str = "https://github.com";

/// Mirrors serving file contents as `owner/repo/revision/path`
pub const RAW_ORIGINS: [&str; 3] = [
    "https://raw.githubusercontent.com",
    "https://cdn.rawgit.com",
    "https://rawgit.com",
];

/// Services that redirect to GitHub and deserve the same treatment
pub const REDIRECT_ORIGINS: [&str; 2] = [
    "https://togithub.com",                  // Renovate
    "https://github-redirect.dependabot.com", // Dependabot
];

/// Everything the shortener needs besides the two URLs
#[derive(Debug, Clone)]
pub struct ShortenerConfig {
    pub reserved: ReservedNames,
    pub raw_origins: Vec<String>,
    pub redirect_origins: Vec<String>,
}

impl Default for ShortenerConfig {
    fn default() -> Self {
        ShortenerConfig {
            reserved: ReservedNames::bundled().clone(),
            raw_origins: RAW_ORIGINS.iter().map(|o| o.to_string()).collect(),
            redirect_origins: REDIRECT_ORIGINS.iter().map(|o| o.to_string()).collect(),
        }
    }
}

impl ShortenerConfig {
    /// Same defaults, different reserved-name list
    pub fn with_reserved(reserved: ReservedNames) -> Self {
        ShortenerConfig {
            reserved,
            ..ShortenerConfig::default()
        }
    }
}

/// Turns GitHub URLs into short labels
#[derive(Debug, Clone, Default)]
pub struct Shortener {
    config: ShortenerConfig,
}

impl Shortener {
    pub fn new(config: ShortenerConfig) -> Self {
        Shortener { config }
    }

    /// Shortens `href` for display on `current_url`
    ///
    /// Returns `Ok(None)` for an empty `href`. `current_url` defaults to
    /// [`DEFAULT_CURRENT_URL`].
    ///
    /// # Errors
    ///
    /// [`ShortenError::MalformedUrl`] when either URL is not absolute.
    pub fn shorten(
        &self,
        href: &str,
        current_url: Option<&str>,
    ) -> Result<Option<String>, ShortenError> {
        if href.is_empty() {
            return Ok(None);
        }

        let context = Context::parse(current_url.unwrap_or(DEFAULT_CURRENT_URL))?;
        let url = ParsedUrl::parse(href)?;
        let target = Target::new(&url, &context, &self.config);

        let (route, matched) = classify(&target);
        debug!(route, href, "classified URL");

        Ok(Some(matched.render(&target)))
    }
}

static DEFAULT_SHORTENER: LazyLock<Shortener> = LazyLock::new(Shortener::default);

/// Shortens `href` with the default configuration
///
/// The bundled reserved-name list is loaded the first time this is called.
pub fn shorten(href: &str, current_url: Option<&str>) -> Result<Option<String>, ShortenError> {
    DEFAULT_SHORTENER.shorten(href, current_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHA: &str = "cb1d5a2e8f3e4c5b6a7980112233445566778899";
    const SHA_END: &str = "ffeeddccbbaa00998877665544332211ffeeddcc";

    fn short(href: &str, current: &str) -> String {
        shorten(href, Some(current)).unwrap().unwrap()
    }

    #[test]
    fn test_empty_href_is_none() {
        assert_eq!(shorten("", None).unwrap(), None);
        // The page URL is not even looked at
        assert_eq!(shorten("", Some("not a url")).unwrap(), None);
    }

    #[test]
    fn test_malformed_urls_are_errors() {
        assert!(matches!(
            shorten("not a url", None),
            Err(ShortenError::MalformedUrl { .. })
        ));
        assert!(matches!(
            shorten("https://github.com/a/b", Some("/relative")),
            Err(ShortenError::MalformedUrl { .. })
        ));
    }

    #[test]
    fn test_same_repo_file_drops_repo_and_view() {
        assert_eq!(
            short(
                "https://github.com/denoland/deno/blob/main/README.md",
                "https://github.com/denoland/deno"
            ),
            "main/README.md"
        );
    }

    #[test]
    fn test_same_repo_sha_is_shortened_to_code() {
        let href = format!("https://github.com/a/b/tree/{SHA}/src");
        assert_eq!(short(&href, "https://github.com/a/b"), "<code>cb1d5a2</code>/src");
    }

    #[test]
    fn test_other_repo_file_keeps_repo_and_view() {
        assert_eq!(
            short("https://github.com/a/b/blame/v2/src/lib.rs#L10", "https://github.com/x/y"),
            "a/b@v2/src/lib.rs#L10 (blame)"
        );
        assert_eq!(
            short("https://github.com/a/b/commits/main", "https://github.com/x/y"),
            "a/b@main (commits)"
        );
    }

    #[test]
    fn test_raw_mirror_file() {
        assert_eq!(
            short("https://raw.githubusercontent.com/a/b/main/docs/x.md", "https://github.com/a/b"),
            "main/docs/x.md (raw)"
        );
        assert_eq!(
            short("https://cdn.rawgit.com/a/b/main/x.js", "https://github.com/x/y"),
            "a/b@main/x.js (raw)"
        );
    }

    #[test]
    fn test_pull_request_page() {
        assert_eq!(
            short("https://github.com/a/b/pull/42/files", "https://github.com/x/y"),
            "a/b#42 (files)"
        );
        assert_eq!(
            short("https://github.com/a/b/pull/42/commits", "https://github.com/a/b"),
            "#42 (commits)"
        );
    }

    #[test]
    fn test_pull_request_diff_range() {
        let href = format!("https://github.com/a/b/pull/42/files/{SHA}..{SHA_END}");
        assert_eq!(
            short(&href, "https://github.com/a/b"),
            "<code>cb1d5a2e..ffeeddcc</code> (#42)"
        );
    }

    #[test]
    fn test_bare_pull_request_uses_generic_path() {
        assert_eq!(
            short("https://github.com/a/b/pull/42", "https://github.com/x/y"),
            "a/b/pull/42"
        );
    }

    #[test]
    fn test_commit_patch() {
        let href = format!("https://github.com/a/b/commit/{SHA}.patch");
        assert_eq!(short(&href, "https://github.com/x/y"), "a/b@<code>cb1d5a2</code>.patch");
        assert_eq!(
            short("https://github.com/a/b/pull/42.diff", "https://github.com/a/b"),
            "42.diff"
        );
    }

    #[test]
    fn test_release_shapes() {
        assert_eq!(
            short("https://github.com/a/b/releases/tag/v1.0.0", "https://github.com/x/y"),
            "a/b@<code>v1.0.0</code> (release)"
        );
        assert_eq!(
            short("https://github.com/a/b/archive/v1.0.0.zip", "https://github.com/a/b"),
            "<code>v1.0.0</code>.zip"
        );
        assert_eq!(
            short(
                "https://github.com/a/b/releases/download/v1.0.0/tool-linux.tar.gz",
                "https://github.com/x/y"
            ),
            "a/b@<code>v1.0.0</code> tool-linux.tar.gz (download)"
        );
    }

    #[test]
    fn test_label() {
        assert_eq!(
            short("https://github.com/a/b/labels/help%20wanted", "https://github.com/x/y"),
            "a/b/help wanted (label)"
        );
        assert_eq!(
            short("https://github.com/a/b/labels/bug", "https://github.com/a/b"),
            "bug (label)"
        );
    }

    #[test]
    fn test_label_with_broken_escape_is_decoded_lossily() {
        assert_eq!(
            short("https://github.com/a/b/labels/%E0%A4%A", "https://github.com/x/y"),
            "a/b/\u{FFFD}%A (label)"
        );
    }

    #[test]
    fn test_network_pages_always_show_repo() {
        assert_eq!(
            short("https://github.com/a/b/network/dependents", "https://github.com/a/b"),
            "a/b (dependents)"
        );
        assert_eq!(
            short("https://github.com/a/b/network/dependencies/", "https://github.com/x/y"),
            "a/b (dependencies)"
        );
    }

    #[test]
    fn test_compare() {
        assert_eq!(
            short("https://github.com/a/b/compare/v1...v2", "https://github.com/x/y"),
            "a/b@v1...v2 (compare)"
        );
    }

    #[test]
    fn test_redirectors_collapse_like_github() {
        assert_eq!(
            short("https://github-redirect.dependabot.com/a/b/issues/7#issuecomment-99", DEFAULT_CURRENT_URL),
            "a/b#7 (comment)"
        );
        assert_eq!(
            short("https://togithub.com/a/b/pull/8#discussion_r1", "https://github.com/a/b"),
            "#8 (review)"
        );
        let href = format!("https://togithub.com/a/b/commit/{SHA}");
        assert_eq!(short(&href, "https://github.com/x/y"), "a/b@<code>cb1d5a2</code>");
    }

    #[test]
    fn test_profile() {
        assert_eq!(short("https://github.com/octocat", DEFAULT_CURRENT_URL), "@octocat");
        assert_eq!(
            short("https://github.com/octocat?tab=repositories", DEFAULT_CURRENT_URL),
            "@octocat?tab=repositories"
        );
    }

    #[test]
    fn test_verbatim_urls() {
        assert_eq!(short("https://github.com/", DEFAULT_CURRENT_URL), "github.com");
        assert_eq!(
            short("https://github.com/settings/profile", DEFAULT_CURRENT_URL),
            "github.com/settings/profile"
        );
        assert_eq!(
            short("https://www.example.com/docs/", DEFAULT_CURRENT_URL),
            "example.com/docs"
        );
    }

    #[test]
    fn test_search_query_is_moved_to_suffix() {
        assert_eq!(
            short(
                "https://github.com/a/b/issues?q=is%3Aissue+is%3Aopen++label%3Abug",
                "https://github.com/a/b"
            ),
            "a/b/issues (is:open label:bug)"
        );
        assert_eq!(
            short("https://github.com/a/b/pulls?q=is%3Apr+author%3Ame&page=2", DEFAULT_CURRENT_URL),
            "a/b/pulls?page=2 (author:me)"
        );
    }

    #[test]
    fn test_generic_path_keeps_query_and_hash() {
        assert_eq!(
            short("https://github.com/a/b/wiki/Home?x=1#intro", DEFAULT_CURRENT_URL),
            "a/b/wiki/Home?x=1#intro"
        );
    }

    #[test]
    fn test_custom_reserved_list_is_honoured() {
        let reserved = ReservedNames::from_names(["octocat"]);
        let shortener = Shortener::new(ShortenerConfig::with_reserved(reserved));
        assert_eq!(
            shortener.shorten("https://github.com/octocat", None).unwrap(),
            Some("github.com/octocat".to_string())
        );
        // `settings` is no longer special
        assert_eq!(
            shortener.shorten("https://github.com/settings", None).unwrap(),
            Some("@settings".to_string())
        );
    }

    #[test]
    fn test_shortening_is_deterministic() {
        let href = "https://github.com/a/b/pull/42/files#diff-1";
        assert_eq!(shorten(href, None).unwrap(), shorten(href, None).unwrap());
    }

    #[test]
    fn test_shortener_is_shareable_across_threads() {
        let shortener = std::sync::Arc::new(Shortener::default());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let shortener = shortener.clone();
                std::thread::spawn(move || {
                    let href = format!("https://github.com/a/b/pull/{i}/files");
                    shortener.shorten(&href, Some("https://github.com/a/b")).unwrap()
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), Some(format!("#{i} (files)")));
        }
    }
}
