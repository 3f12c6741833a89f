//! Authentication digests.
//!
//! Every request sent by the connector carries an
//! `Authorization: Klarna <digest>` header. The digest is computed from the
//! request body followed by the shared secret; for requests without a body the
//! input is the shared secret alone.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use sha2::{Digest as _, Sha256};

/// Computes an authentication digest.
///
/// Implementations must be deterministic for a given input and safe to share
/// between tasks.
pub trait Digest: Send + Sync {
    /// Returns the digest of `input`.
    fn create(&self, input: &str) -> String;
}

impl<D: Digest + ?Sized> Digest for &D {
    fn create(&self, input: &str) -> String {
        (**self).create(input)
    }
}

impl<D: Digest + ?Sized> Digest for std::sync::Arc<D> {
    fn create(&self, input: &str) -> String {
        (**self).create(input)
    }
}

impl<D: Digest + ?Sized> Digest for Box<D> {
    fn create(&self, input: &str) -> String {
        (**self).create(input)
    }
}

/// The production digest: base64 of the SHA-256 hash of the input.
///
/// # Example
///
/// ```
/// use checkout_connector::{Digest, Sha256Digest};
///
/// let digest = Sha256Digest.create("mySecret");
/// assert_eq!(digest.len(), 44);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sha256Digest;

impl Digest for Sha256Digest {
    fn create(&self, input: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(input.as_bytes());
        STANDARD.encode(hasher.finalize())
    }
}
