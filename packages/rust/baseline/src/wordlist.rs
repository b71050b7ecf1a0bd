//! Wordlist loading (§4.2).

use std::path::Path;

use reconmap_shared::{Result, ScanError};
use tracing::{debug, trace};

/// Written one per line when the wordlist file doesn't exist yet. Carried
/// verbatim from the reference implementation's `createDefaultWordlist`.
pub const DEFAULT_WORDLIST: &[&str] = &[
    "/api/",
    "/api/v1/",
    "/api/v2/",
    "/api/auth/",
    "/api/users/",
    "/graphql/",
    "/admin/",
    "/login/",
    "/register/",
    "/wp-admin/",
    "/wp-content/",
    "/.env",
    "/.git/",
    "/assets/",
    "/static/",
    "/manifest.json",
    "/robots.txt",
];

/// Load newline-separated paths from `path`, skipping blank lines, `#`
/// comments, and lines containing the literal substring `%EXT%`.
///
/// If the file does not exist, it is created with [`DEFAULT_WORDLIST`] and
/// that list is returned. A load or create failure is fatal (§7).
pub fn load_or_create_wordlist(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        debug!(?path, "wordlist not found, creating default");
        return create_default_wordlist(path);
    }

    let content = std::fs::read_to_string(path).map_err(|e| ScanError::io(path, e))?;

    let words: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.contains("%EXT%"))
        .map(str::to_string)
        .collect();

    trace!(count = words.len(), "loaded wordlist");
    Ok(words)
}

fn create_default_wordlist(path: &Path) -> Result<Vec<String>> {
    let body = DEFAULT_WORDLIST.join("\n") + "\n";
    std::fs::write(path, &body).map_err(|e| ScanError::io(path, e))?;
    Ok(DEFAULT_WORDLIST.iter().map(|s| s.to_string()).collect())
}
