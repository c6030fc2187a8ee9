//! URL handling module for Sitegraph
//!
//! This module provides in-scope link classification, URL fingerprints used
//! as dedup keys, optional normalization, and storage folder labels.

mod fingerprint;
mod normalize;
mod sanitize;

use url::Url;

// Re-export main functions
pub use fingerprint::{Fingerprint, Fingerprinter};
pub use normalize::normalize_url;
pub use sanitize::folder_label;

/// Returns the network authority (`userinfo@host:port`) of an address
///
/// Returns None when the address does not parse as an absolute URL or has no
/// host. Relative and protocol-relative addresses never parse.
pub fn authority_of(address: &str) -> Option<String> {
    let url = Url::parse(address).ok()?;
    url.host_str()?;
    Some(url.authority().to_string())
}

/// Decides whether `candidate` belongs to the same site as `seed`
///
/// The two network authorities must be exactly equal. Any parse failure of
/// either address yields `false`, so malformed addresses are never in scope.
///
/// # Examples
///
/// ```
/// use sitegraph::url::is_internal;
///
/// assert!(is_internal("https://ex.com/", "https://ex.com/a"));
/// assert!(!is_internal("https://ex.com/", "https://other.com/"));
/// assert!(!is_internal("https://ex.com/", "//ex.com/a"));
/// ```
pub fn is_internal(seed: &str, candidate: &str) -> bool {
    match (authority_of(seed), authority_of(candidate)) {
        (Some(seed_authority), Some(candidate_authority)) => seed_authority == candidate_authority,
        _ => false,
    }
}

/// Link classifier bound to one seed URL
///
/// Equivalent to calling [`is_internal`] with the seed each time, without
/// re-parsing the seed for every candidate.
#[derive(Debug, Clone)]
pub struct LinkClassifier {
    seed: String,
    seed_authority: Option<String>,
}

impl LinkClassifier {
    /// Creates a classifier for the given seed URL
    pub fn new(seed: &str) -> Self {
        Self {
            seed: seed.to_string(),
            seed_authority: authority_of(seed),
        }
    }

    /// The seed URL this classifier compares against
    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Returns true if `candidate` is in scope for crawling
    pub fn is_internal(&self, candidate: &str) -> bool {
        match (&self.seed_authority, authority_of(candidate)) {
            (Some(seed_authority), Some(candidate_authority)) => {
                *seed_authority == candidate_authority
            }
            _ => false,
        }
    }
}
