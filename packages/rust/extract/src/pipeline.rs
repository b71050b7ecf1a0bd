//! The 14-step candidate normalization pipeline (§4.4). Each step either
//! passes the candidate through or drops it silently — rejections are not
//! errors, just non-matches.

use reconmap_baseline::has_file_extension;
use reconmap_normalize::{canonicalize, in_scope, to_absolute, NormalizeOptions};
use url::Url;

use crate::patterns::{BLACKLIST_SUBSTRINGS, KNOWN_SECTIONS, MIME_PREFIXES, PARAM_PATTERN};

/// Run the full pipeline on one raw candidate string; `None` means reject.
pub fn normalize_candidate(raw: &str, base_url: &str) -> Option<String> {
    // 1. Strip query and fragment at first `?` or `#`.
    let stripped = raw.split('?').next().unwrap_or(raw).split('#').next().unwrap_or(raw);

    // 2. If it doesn't start with `/` or `http`, prepend `/`.
    let prefixed = if stripped.starts_with('/') || stripped.starts_with("http") {
        stripped.to_string()
    } else {
        format!("/{stripped}")
    };

    // 3. to_absolute against base_url; reject on failure.
    let absolute = to_absolute(&prefixed, base_url)?;

    // 4. in_scope against base_url with scope "/"; reject if false.
    if !in_scope(&absolute, base_url, "/") {
        return None;
    }

    // 5. Canonicalize with default options.
    let canonical = canonicalize(&absolute, &NormalizeOptions::default());

    // 6. Parse path: reject if length < 2 or > 100.
    let parsed = Url::parse(&canonical).ok()?;
    let path = parsed.path();
    if path.len() < 2 || path.len() > 100 {
        return None;
    }

    // 7. Reject if path has a static-file extension.
    if has_file_extension(path) {
        return None;
    }

    // 8. Reject if path contains `//` or `\`.
    if path.contains("//") || path.contains('\\') {
        return None;
    }

    // 9. Reject if path begins with a MIME-type-like prefix.
    if MIME_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
        return None;
    }

    // 10. Reject if path contains any blacklist substring.
    if BLACKLIST_SUBSTRINGS.iter().any(|needle| path.contains(needle)) {
        return None;
    }

    // 11. Split on `/`; reject if >=2 segments and more than half are <= 2 chars.
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    if segments.len() >= 2 {
        let short = segments.iter().filter(|s| s.len() <= 2).count();
        if short > segments.len() / 2 {
            return None;
        }
    }

    // 12. Single-segment paths must be in the known-sections whitelist.
    if segments.len() == 1 {
        let word = segments[0].to_lowercase();
        if !KNOWN_SECTIONS.contains(&word.as_str()) {
            return None;
        }
    }

    // 13. Replace colon-prefixed params with the literal `test`.
    let final_path = PARAM_PATTERN.replace_all(path, "test").into_owned();

    // 14. Re-emit the URL.
    let mut result = parsed;
    result.set_path(&final_path);
    Some(result.to_string())
}
