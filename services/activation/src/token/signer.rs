//! Token signing primitives.

use ring::hmac;

/// Produces and checks authentication tags over token payload bytes.
pub trait TokenSigner: Send + Sync {
    /// Compute the tag for `data`.
    fn sign(&self, data: &[u8]) -> Vec<u8>;

    /// Check `tag` against `data` in constant time.
    fn verify(&self, data: &[u8], tag: &[u8]) -> bool;
}

/// HMAC-SHA256 keyed with the shared signing secret.
pub struct HmacSha256Signer {
    key: hmac::Key,
}

impl HmacSha256Signer {
    /// Create a signer from raw secret bytes.
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        Self {
            key: hmac::Key::new(hmac::HMAC_SHA256, secret),
        }
    }
}

impl TokenSigner for HmacSha256Signer {
    fn sign(&self, data: &[u8]) -> Vec<u8> {
        hmac::sign(&self.key, data).as_ref().to_vec()
    }

    fn verify(&self, data: &[u8], tag: &[u8]) -> bool {
        hmac::verify(&self.key, data, tag).is_ok()
    }
}
