// src/shorten/routes.rs
// =============================================================================
// Route matchers: decide which GitHub URL shape we are looking at.
//
// How it works:
// 1. Target::new() lines the parsed URL up against the page context
//    (owner, repo, type, revision, ... and whether the repo prefix can go)
// 2. ROUTES is an ordered table; every entry is a named extractor that either
//    returns a RouteMatch with the captured fields or None
// 3. The first extractor that returns Some wins - several patterns overlap
//    (a pull request diff range also looks like a path), so order matters
// 4. RouteMatch::render() turns the captures into the final label
//
// Rust concepts:
// - fn pointers in a static table: no boxing, no allocation, easy to list
// - Enums with named fields: each shape keeps its own captures
// - LazyLock: regexes are compiled once, the first time they are used
// =============================================================================

use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;

use super::format::{
    code, comment_indicator, join_values, normalize_whitespace, style_revision, PATCH_DIFF,
};
use super::parse::{Context, ParsedUrl};
use super::ShortenerConfig;

// Each pattern runs against the repo-relative path, e.g. `pull/342/files`
macro_rules! route_regex {
    ($name:ident, $pattern:expr) => {
        static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($pattern).expect("route pattern is valid"));
    };
}

route_regex!(RELEASE, r"^releases/tag/([^/]+)");
route_regex!(RELEASE_ARCHIVE, r"^archive/(.+)(\.zip|\.tar\.gz)");
route_regex!(RELEASE_DOWNLOAD, r"^releases/download/([^/]+)/(.+)");
route_regex!(LABEL, r"^labels/([^/]+)");
route_regex!(DEPENDENTS, r"^network/dependents/?$");
route_regex!(DEPENDENCIES, r"^network/dependencies/?$");
route_regex!(
    PULL,
    r"^pull/([0-9]+)(?:/([^/]+))?(?:/([0-9a-f]{40})\.\.([0-9a-f]{40}))?$"
);
route_regex!(COMPARE, r"^compare/([^/]+)");
route_regex!(ISSUE, r"^issues/([0-9]+)$");
route_regex!(COMMIT, r"^commit/([0-9a-f]{40})$");

/// Views that take a revision and an optional file path
const FILE_VIEWS: [&str; 5] = ["raw", "tree", "blob", "blame", "commits"];

/// The parsed URL seen through the page context
///
/// Everything a route needs is computed here once, so extractors stay short.
#[derive(Debug)]
pub struct Target<'a> {
    pub url: &'a ParsedUrl,
    pub is_local: bool,
    pub is_raw: bool,
    pub is_redirection: bool,
    pub is_reserved: bool,
    pub owner: &'a str,
    pub repo: Option<&'a str>,
    /// `blob`, `tree`, ...; always `raw` on raw-content mirrors
    pub kind: Option<&'a str>,
    /// Revision exactly as it appears in the path
    pub revision: &'a str,
    pub file_path: String,
    /// Everything after `owner/repo`, e.g. `releases/tag/v1`
    pub repo_path: String,
    /// `owner/repo`, or empty when the page already shows that repository
    pub repo_ref: String,
}

impl<'a> Target<'a> {
    pub fn new(url: &'a ParsedUrl, context: &Context, config: &ShortenerConfig) -> Self {
        let is_local = url.origin == context.origin;
        let is_raw = config.raw_origins.iter().any(|o| *o == url.origin);
        let is_redirection = config.redirect_origins.iter().any(|o| *o == url.origin);

        let owner = url.segment(0).unwrap_or_default();
        let repo = url.segment(1);

        // Raw mirrors have no type segment: owner/repo/revision/path
        let (kind, revision, file_start) = if is_raw {
            (Some("raw"), url.segment(2), 3)
        } else {
            (url.segment(2), url.segment(3), 4)
        };

        let file_path = url.segments.get(file_start..).unwrap_or_default().join("/");
        let repo_path = url.segments.get(2..).unwrap_or_default().join("/");

        let is_this_repo = (is_local || is_raw || is_redirection)
            && repo.is_some_and(|repo| context.repo_identity == format!("{owner}/{repo}"));
        let repo_ref = if is_this_repo {
            String::new()
        } else {
            format!("{owner}/{}", repo.unwrap_or_default())
        };

        Target {
            url,
            is_local,
            is_raw,
            is_redirection,
            is_reserved: config.reserved.contains(owner),
            owner,
            repo,
            kind,
            revision: revision.unwrap_or_default(),
            file_path,
            repo_path,
            repo_ref,
        }
    }
}

/// One recognized URL shape with the pieces captured from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteMatch {
    /// First segment is a reserved name such as `settings` or `orgs`
    Reserved,
    /// Nothing after the host
    Root,
    /// Not this site, not a raw mirror, not a redirection mirror
    CrossOrigin,
    ProfileOnly {
        user: String,
    },
    FileOrDir {
        kind: String,
        revision: String,
        file_path: String,
    },
    DiffOrPatch {
        revision: String,
        extension: String,
    },
    Release {
        tag: String,
    },
    ReleaseArchive {
        tag: String,
        extension: String,
    },
    ReleaseDownload {
        tag: String,
        filename: String,
    },
    Label {
        label: String,
    },
    Dependents,
    Dependencies,
    PullRequest {
        number: String,
        page: String,
        range: Option<(String, String)>,
    },
    Compare {
        revision: String,
    },
    IssueRedirect {
        number: String,
    },
    PullRedirect {
        number: String,
    },
    CommitRedirect {
        sha: String,
    },
    SearchQuery {
        query: String,
    },
    GenericPath,
}

/// A named entry in the route table
pub struct Route {
    pub name: &'static str,
    pub extract: fn(&Target<'_>) -> Option<RouteMatch>,
}

/// Every route, in evaluation order
pub static ROUTES: &[Route] = &[
    Route { name: "verbatim", extract: verbatim },
    Route { name: "profile", extract: profile },
    Route { name: "file-or-dir", extract: file_or_dir },
    Route { name: "diff-or-patch", extract: diff_or_patch },
    Route { name: "release", extract: release },
    Route { name: "release-archive", extract: release_archive },
    Route { name: "release-download", extract: release_download },
    Route { name: "label", extract: label },
    Route { name: "network", extract: network },
    Route { name: "pull-request", extract: pull_request },
    Route { name: "compare", extract: compare },
    Route { name: "redirection", extract: redirection },
    Route { name: "search-query", extract: search_query },
    Route { name: "generic", extract: generic },
];

/// Runs the table and returns the winning route's name with its match
pub fn classify(target: &Target<'_>) -> (&'static str, RouteMatch) {
    ROUTES
        .iter()
        .find_map(|route| (route.extract)(target).map(|m| (route.name, m)))
        .unwrap_or(("generic", RouteMatch::GenericPath))
}

fn verbatim(t: &Target<'_>) -> Option<RouteMatch> {
    if t.is_reserved {
        Some(RouteMatch::Reserved)
    } else if t.url.pathname == "/" {
        Some(RouteMatch::Root)
    } else if !t.is_local && !t.is_raw && !t.is_redirection {
        Some(RouteMatch::CrossOrigin)
    } else {
        None
    }
}

fn profile(t: &Target<'_>) -> Option<RouteMatch> {
    let no_repo = t.repo.map_or(true, str::is_empty);
    (!t.owner.is_empty() && no_repo).then(|| RouteMatch::ProfileOnly {
        user: t.owner.to_string(),
    })
}

fn file_or_dir(t: &Target<'_>) -> Option<RouteMatch> {
    let kind = t.kind.filter(|kind| FILE_VIEWS.contains(kind))?;
    if t.revision.is_empty() {
        return None;
    }
    Some(RouteMatch::FileOrDir {
        kind: kind.to_string(),
        revision: t.revision.to_string(),
        file_path: t.file_path.clone(),
    })
}

fn diff_or_patch(t: &Target<'_>) -> Option<RouteMatch> {
    let caps = PATCH_DIFF.captures(&t.repo_path)?;
    Some(RouteMatch::DiffOrPatch {
        revision: t.revision.to_string(),
        extension: caps[1].to_string(),
    })
}

fn release(t: &Target<'_>) -> Option<RouteMatch> {
    let caps = RELEASE.captures(&t.repo_path)?;
    Some(RouteMatch::Release {
        tag: caps[1].to_string(),
    })
}

fn release_archive(t: &Target<'_>) -> Option<RouteMatch> {
    let caps = RELEASE_ARCHIVE.captures(&t.repo_path)?;
    Some(RouteMatch::ReleaseArchive {
        tag: caps[1].to_string(),
        extension: caps[2].to_string(),
    })
}

fn release_download(t: &Target<'_>) -> Option<RouteMatch> {
    let caps = RELEASE_DOWNLOAD.captures(&t.repo_path)?;
    Some(RouteMatch::ReleaseDownload {
        tag: caps[1].to_string(),
        filename: caps[2].to_string(),
    })
}

fn label(t: &Target<'_>) -> Option<RouteMatch> {
    let caps = LABEL.captures(&t.repo_path)?;
    // Broken escapes are kept as written rather than failing the whole label
    let label = percent_decode_str(&caps[1]).decode_utf8_lossy().into_owned();
    Some(RouteMatch::Label { label })
}

fn network(t: &Target<'_>) -> Option<RouteMatch> {
    if DEPENDENTS.is_match(&t.repo_path) {
        Some(RouteMatch::Dependents)
    } else if DEPENDENCIES.is_match(&t.repo_path) {
        Some(RouteMatch::Dependencies)
    } else {
        None
    }
}

fn pull_request(t: &Target<'_>) -> Option<RouteMatch> {
    let caps = PULL.captures(&t.repo_path)?;
    // A bare `pull/<n>` is left to the redirection and fallback routes
    let page = caps.get(2)?;
    let range = caps
        .get(3)
        .zip(caps.get(4))
        .map(|(start, end)| (start.as_str().to_string(), end.as_str().to_string()));

    Some(RouteMatch::PullRequest {
        number: caps[1].to_string(),
        page: page.as_str().to_string(),
        range,
    })
}

fn compare(t: &Target<'_>) -> Option<RouteMatch> {
    let caps = COMPARE.captures(&t.repo_path)?;
    Some(RouteMatch::Compare {
        revision: caps[1].to_string(),
    })
}

// URLs that GitHub itself would shorten, seen through a redirector
fn redirection(t: &Target<'_>) -> Option<RouteMatch> {
    if !t.is_redirection {
        return None;
    }

    if let Some(caps) = ISSUE.captures(&t.repo_path) {
        return Some(RouteMatch::IssueRedirect {
            number: caps[1].to_string(),
        });
    }
    if let Some(caps) = PULL.captures(&t.repo_path) {
        return Some(RouteMatch::PullRedirect {
            number: caps[1].to_string(),
        });
    }
    COMMIT.captures(&t.repo_path).map(|caps| RouteMatch::CommitRedirect {
        sha: caps[1].to_string(),
    })
}

fn search_query(t: &Target<'_>) -> Option<RouteMatch> {
    let raw = t.url.param("q").filter(|q| !q.is_empty())?;

    let query = if t.url.pathname.ends_with("/issues") {
        raw.replacen("is:issue", "", 1)
    } else if t.url.pathname.ends_with("/pulls") {
        raw.replacen("is:pr", "", 1)
    } else {
        raw.to_string()
    };

    Some(RouteMatch::SearchQuery {
        query: normalize_whitespace(&query),
    })
}

fn generic(_: &Target<'_>) -> Option<RouteMatch> {
    Some(RouteMatch::GenericPath)
}

impl RouteMatch {
    /// Builds the display label for this shape
    pub fn render(&self, t: &Target<'_>) -> String {
        let search = t.url.search.as_str();
        let hash = t.url.hash.as_str();
        let repo_ref = t.repo_ref.as_str();

        match self {
            RouteMatch::Reserved | RouteMatch::Root | RouteMatch::CrossOrigin => {
                verbatim_label(&t.url.href)
            }
            RouteMatch::ProfileOnly { user } => format!("@{user}{search}{hash}"),
            RouteMatch::FileOrDir {
                kind,
                revision,
                file_path,
            } => {
                let at_revision = at(repo_ref, &style_revision(revision));
                let path = join_values(&[at_revision.as_str(), file_path.as_str()], "/");
                // blob and tree are the default views
                if kind == "blob" || kind == "tree" {
                    format!("{path}{search}{hash}")
                } else {
                    format!("{path}{search}{hash} ({kind})")
                }
            }
            RouteMatch::DiffOrPatch {
                revision,
                extension,
            } => {
                let partial = at(repo_ref, &style_revision(revision));
                format!("{partial}.{extension}{search}{hash}")
            }
            RouteMatch::Release { tag } => {
                format!("{}{search}{hash} (release)", at(repo_ref, &code(tag)))
            }
            RouteMatch::ReleaseArchive { tag, extension } => {
                format!("{}{extension}{search}{hash}", at(repo_ref, &code(tag)))
            }
            RouteMatch::ReleaseDownload { tag, filename } => {
                let partial = at(repo_ref, &code(tag));
                format!("{partial} {filename}{search}{hash} (download)")
            }
            RouteMatch::Label { label } => {
                let partial = join_values(&[repo_ref, label.as_str()], "/");
                format!("{partial}{search}{hash} (label)")
            }
            RouteMatch::Dependents => {
                format!("{}/{} (dependents)", t.owner, t.repo.unwrap_or_default())
            }
            RouteMatch::Dependencies => {
                format!("{}/{} (dependencies)", t.owner, t.repo.unwrap_or_default())
            }
            RouteMatch::PullRequest {
                number,
                page,
                range,
            } => match range {
                Some((start, end)) if page == "files" => {
                    let range = format!("{}..{}", &start[..8], &end[..8]);
                    format!("{} (#{number})", code(&range))
                }
                _ => format!("{repo_ref}#{number} ({page})"),
            },
            RouteMatch::Compare { revision } => {
                let partial = at(repo_ref, &style_revision(revision));
                format!("{partial}{search}{hash} (compare)")
            }
            RouteMatch::IssueRedirect { number } | RouteMatch::PullRedirect { number } => {
                format!("{repo_ref}#{number}{}", comment_indicator(hash))
            }
            RouteMatch::CommitRedirect { sha } => {
                let partial = at(repo_ref, &code(&sha[..7]));
                format!("{partial}{}", comment_indicator(hash))
            }
            RouteMatch::SearchQuery { query } => {
                let path = trimmed_path(&t.url.pathname);
                let rest = t.url.search_without("q");
                format!("{path}{rest}{hash} ({query})")
            }
            RouteMatch::GenericPath => {
                format!("{}{search}{hash}", trimmed_path(&t.url.pathname))
            }
        }
    }
}

// `owner/repo@revision`, or just `revision` when the repo is implied
fn at(repo_ref: &str, revision: &str) -> String {
    join_values(&[repo_ref, revision], "@")
}

// `https://www.example.com/` -> `example.com`
fn verbatim_label(href: &str) -> String {
    let label = href.strip_prefix("https://").unwrap_or(href);
    let label = label.strip_prefix("www.").unwrap_or(label);
    label.strip_suffix('/').unwrap_or(label).to_string()
}

fn trimmed_path(pathname: &str) -> &str {
    let path = pathname.strip_prefix('/').unwrap_or(pathname);
    path.strip_suffix('/').unwrap_or(path)
}
