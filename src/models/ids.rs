//! Deterministic input fingerprints using SHA256 hashing.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Identifies the set of matches a run aggregated over.
///
/// Derived from the sorted match ids, so the same input set yields the same
/// fingerprint regardless of load order.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputFingerprint(String);

impl InputFingerprint {
    /// Generate a fingerprint from match ids.
    /// Uses SHA256 and takes the first 16 characters for brevity.
    pub fn generate<'a, I>(match_ids: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut ids: Vec<&str> = match_ids.into_iter().collect();
        ids.sort_unstable();

        let mut hasher = Sha256::new();
        for (i, id) in ids.iter().enumerate() {
            if i > 0 {
                hasher.update(b"|");
            }
            hasher.update(id.as_bytes());
        }
        let hash = hex::encode(hasher.finalize());
        Self(hash[..16].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InputFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for InputFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InputFingerprint({})", self.0)
    }
}
