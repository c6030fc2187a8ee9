use crate::url::normalize::normalize_url;
use sha2::{Digest, Sha256};
use std::fmt;

/// SHA-256 fingerprint of a URL string, hex encoded
///
/// Fingerprints are the dedup key of the visited set: two URLs are the same
/// page exactly when their fingerprints are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Hashes the exact bytes of `url`
    ///
    /// # Examples
    ///
    /// ```
    /// use sitegraph::url::Fingerprint;
    ///
    /// let a = Fingerprint::of("https://ex.com/a");
    /// assert_eq!(a, Fingerprint::of("https://ex.com/a"));
    /// assert_ne!(a, Fingerprint::of("https://ex.com/a/"));
    /// assert_eq!(a.as_str().len(), 64);
    /// ```
    pub fn of(url: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Full hex digest
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First `len` hex characters, used in folder names
    pub fn short(&self, len: usize) -> &str {
        &self.0[..len.min(self.0.len())]
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Computes fingerprints, optionally normalizing URLs first
#[derive(Debug, Clone, Copy, Default)]
pub struct Fingerprinter {
    normalize: bool,
}

impl Fingerprinter {
    /// Fingerprints exact strings
    pub fn exact() -> Self {
        Self { normalize: false }
    }

    /// Fingerprints normalized URLs; unparseable strings are hashed as-is
    pub fn normalizing() -> Self {
        Self { normalize: true }
    }

    pub fn new(normalize: bool) -> Self {
        Self { normalize }
    }

    pub fn fingerprint(&self, url: &str) -> Fingerprint {
        if !self.normalize {
            return Fingerprint::of(url);
        }

        match normalize_url(url) {
            Ok(normalized) => Fingerprint::of(normalized.as_str()),
            Err(e) => {
                tracing::trace!("Fingerprinting {} unnormalized: {}", url, e);
                Fingerprint::of(url)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        // sha256("abc")
        assert_eq!(
            Fingerprint::of("abc").as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_short_prefix() {
        let fp = Fingerprint::of("abc");
        assert_eq!(fp.short(12), "ba7816bf8f01");
        assert_eq!(fp.short(100).len(), 64);
    }

    #[test]
    fn test_exact_mode_keeps_variants_distinct() {
        let fingerprinter = Fingerprinter::exact();
        let base = fingerprinter.fingerprint("https://ex.com/a");

        assert_ne!(base, fingerprinter.fingerprint("https://ex.com/a/"));
        assert_ne!(base, fingerprinter.fingerprint("https://ex.com/a#top"));
        assert_ne!(
            fingerprinter.fingerprint("https://ex.com/a?x=1&y=2"),
            fingerprinter.fingerprint("https://ex.com/a?y=2&x=1")
        );
    }

    #[test]
    fn test_normalizing_mode_merges_variants() {
        let fingerprinter = Fingerprinter::normalizing();
        let base = fingerprinter.fingerprint("https://ex.com/a");

        assert_eq!(base, fingerprinter.fingerprint("https://ex.com/a/"));
        assert_eq!(base, fingerprinter.fingerprint("https://ex.com/a#top"));
        assert_eq!(base, fingerprinter.fingerprint("https://EX.com/a"));
        assert_eq!(
            fingerprinter.fingerprint("https://ex.com/a?x=1&y=2"),
            fingerprinter.fingerprint("https://ex.com/a?y=2&x=1")
        );
    }

    #[test]
    fn test_normalizing_mode_falls_back_for_garbage() {
        let fingerprinter = Fingerprinter::normalizing();
        assert_eq!(
            fingerprinter.fingerprint("not a url"),
            Fingerprint::of("not a url")
        );
    }
}
