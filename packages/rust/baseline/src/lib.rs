//! Wordlist loading, baseline fingerprinting, and response classification.
//!
//! Before any probing happens, reconmap needs three things: a list of
//! candidate paths (§4.2), a set of reference hashes that tell a real
//! endpoint apart from a SPA's catch-all shell or a generic error page
//! (§4.3), and the decision rule itself (§4.5). All three live here because
//! the fuzzer and the BFS crawler both consume [`BaselineInfo`] read-only.

mod classify;
mod fingerprint;
mod wordlist;

pub use classify::{classify, has_file_extension, is_static_file};
pub use fingerprint::{fingerprint, md5_hex, random_user_agent, BROWSER_USER_AGENTS, FIXED_USER_AGENT};
pub use wordlist::{load_or_create_wordlist, DEFAULT_WORDLIST};

use std::time::Duration;

use reconmap_shared::Result;
use reqwest::Client;

/// Build the shared HTTP client used by baseline fingerprinting, the
/// fuzzer, and the BFS crawler: redirects disabled (the scanner observes
/// 3xx responses directly per spec §6), connection pool tuned per §5.
pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(100)
        .pool_idle_timeout(Duration::from_secs(90))
        .connect_timeout(Duration::from_secs(5))
        .build()
        .map_err(reconmap_shared::ScanError::Network)
}
