//! Regex patterns for endpoint mining (§4.4). Compiled once, shared by
//! reference across every candidate text, following the `LazyLock<Regex>`
//! idiom used throughout this workspace for fixed, program-lifetime regexes.

use regex::Regex;
use std::sync::LazyLock;

/// Candidate-route patterns applied to root HTML and every kept JS body.
/// Capture group 1 is the candidate path.
pub static ENDPOINT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r#"<Route[^>]+path=["']([/a-zA-Z0-9_\-:]+)["']"#).unwrap(),
        Regex::new(r#"path:\s*["']([/a-zA-Z0-9_\-:]+)["']"#).unwrap(),
        Regex::new(r#"\{\s*path:\s*["']([/a-zA-Z0-9_\-:]+)["']"#).unwrap(),
        Regex::new(r#"(?:fetch|axios|http)\s*\(\s*["']([/a-zA-Z0-9_\-/]+)["']"#).unwrap(),
        Regex::new(r#"(?:get|post|put|delete|patch)\s*\(\s*["']([/a-zA-Z0-9_\-/]+)["']"#).unwrap(),
        Regex::new(r#"(?i)["'](/graphql[/a-zA-Z0-9_\-]*)["']"#).unwrap(),
        Regex::new(r#"["'](/api/[a-zA-Z0-9_\-/]+)["']"#).unwrap(),
        Regex::new(r#"to:\s*["']([/a-zA-Z0-9_\-]+)["']"#).unwrap(),
        Regex::new(r#"href:\s*["']([/a-zA-Z0-9_\-]+)["']"#).unwrap(),
        Regex::new(r#"["']([/][a-zA-Z][a-zA-Z0-9_\-/]{2,})["']"#).unwrap(),
    ]
});

/// Patterns that locate same-origin JavaScript file references.
pub static JS_FILE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r#"<script[^>]+src=["']([^"']+)["']"#).unwrap(),
        Regex::new(r#"["'](https?://[^"']+\.js)["']"#).unwrap(),
        Regex::new(r#"["']([/][^"']+\.js)["']"#).unwrap(),
    ]
});

/// Matches a colon-prefixed route parameter, e.g. `:id`.
pub static PARAM_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r":[a-zA-Z]+").unwrap());

/// Path substrings that mark a candidate as analytics/build noise, never a
/// real endpoint.
pub const BLACKLIST_SUBSTRINGS: &[&str] = &[
    "node_modules",
    "webpack",
    "__webpack",
    "hot-update",
    "/gs/",
    "/gtag/",
    "/g/collect",
    "/pagead/",
    "/ddm/",
    "/mc/collect",
    "//s.w.org",
    "//assets.squarespace.com",
    "/_/service_worker",
    "/debug/",
    "conversion",
    "/ccm/",
    "/measurement/",
];

/// MIME-type-like path prefixes rejected outright.
pub const MIME_PREFIXES: &[&str] = &["/application/", "/multipart/", "/text/", "/image/", "/video/", "/audio/"];

/// Single-path-segment candidates are only kept if they're in this
/// whitelist — the generic absolute-path pattern is otherwise too
/// permissive on one-word paths.
pub const KNOWN_SECTIONS: &[&str] = &[
    "home", "account", "admin", "auth", "login", "register", "profile", "settings", "dashboard",
    "wiki", "banlist", "shop", "forum", "news", "about", "contact", "help", "api", "users",
    "stats", "map", "launcher", "rules", "vote", "donate", "staff", "team", "status", "ping",
];
