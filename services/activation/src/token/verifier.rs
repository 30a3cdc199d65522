//! Consumer-side token verification.
//!
//! Order of checks: structure, encodings, tag, claims, expiry. Claims are only
//! parsed after the tag matches.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};

use crate::error::ActivationError;
use crate::token::claims::TokenClaims;
use crate::token::issuer::TOKEN_SEPARATOR;
use crate::token::signer::TokenSigner;

/// Checks tokens minted by [`crate::token::TokenIssuer`] with the same secret.
pub struct TokenVerifier {
    signer: Arc<dyn TokenSigner>,
}

impl TokenVerifier {
    /// Create a verifier sharing the issuer's signer.
    pub fn new(signer: Arc<dyn TokenSigner>) -> Self {
        Self { signer }
    }

    /// Verify against the current time.
    ///
    /// # Errors
    ///
    /// [`ActivationError::TokenMalformed`], [`ActivationError::TokenForged`]
    /// or [`ActivationError::TokenExpired`].
    pub fn verify(&self, token: &str) -> Result<TokenClaims, ActivationError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify against an explicit `now`.
    ///
    /// # Errors
    ///
    /// See [`TokenVerifier::verify`].
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, ActivationError> {
        let (payload, tag) = split_token(token)?;

        if !self.signer.verify(&payload, &tag) {
            return Err(ActivationError::TokenForged);
        }

        let claims: TokenClaims = serde_json::from_slice(&payload)
            .map_err(|e| ActivationError::malformed(format!("claims: {e}")))?;

        if claims.is_expired_at(now) {
            return Err(ActivationError::TokenExpired);
        }
        Ok(claims)
    }
}

/// Decode claims without checking the tag or expiry. For inspection only.
///
/// # Errors
///
/// [`ActivationError::TokenMalformed`] if the token cannot be decoded.
pub fn decode_unverified(token: &str) -> Result<TokenClaims, ActivationError> {
    let (payload, _) = split_token(token)?;
    serde_json::from_slice(&payload).map_err(|e| ActivationError::malformed(format!("claims: {e}")))
}

fn split_token(token: &str) -> Result<(Vec<u8>, Vec<u8>), ActivationError> {
    let (encoded_payload, encoded_tag) = token
        .split_once(TOKEN_SEPARATOR)
        .ok_or_else(|| ActivationError::malformed("missing separator"))?;

    let payload = BASE64
        .decode(encoded_payload)
        .map_err(|e| ActivationError::malformed(format!("payload encoding: {e}")))?;
    let tag = hex::decode(encoded_tag)
        .map_err(|e| ActivationError::malformed(format!("tag encoding: {e}")))?;

    Ok((payload, tag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenIssuer;
    use crate::token::signer::HmacSha256Signer;
    use chrono::Duration;

    fn pair(secret: &[u8]) -> (TokenIssuer, TokenVerifier) {
        let signer: Arc<dyn TokenSigner> = Arc::new(HmacSha256Signer::new(secret));
        (TokenIssuer::new(signer.clone()), TokenVerifier::new(signer))
    }

    fn claims(expires_in: Duration) -> TokenClaims {
        TokenClaims::new("ACT-1", "dev-a", "example.com", "ua", Utc::now() + expires_in)
    }

    #[test]
    fn test_valid_token_verifies() {
        let (issuer, verifier) = pair(b"secret");
        let issued = issuer.issue(claims(Duration::hours(1))).unwrap();

        let verified = verifier.verify(&issued.token).unwrap();
        assert_eq!(verified, issued.claims);
    }

    #[test]
    fn test_missing_separator_is_malformed() {
        let (_, verifier) = pair(b"secret");
        assert!(matches!(
            verifier.verify("eyJjb2RlIjoiQUNULTEifQ"),
            Err(ActivationError::TokenMalformed(_))
        ));
    }

    #[test]
    fn test_bad_encodings_are_malformed() {
        let (issuer, verifier) = pair(b"secret");
        let issued = issuer.issue(claims(Duration::hours(1))).unwrap();
        let (payload, tag) = issued.token.split_once('.').unwrap();

        let bad_payload = format!("!!{payload}.{tag}");
        assert!(matches!(
            verifier.verify(&bad_payload),
            Err(ActivationError::TokenMalformed(_))
        ));

        let bad_tag = format!("{payload}.{}zz", &tag[2..]);
        assert!(matches!(
            verifier.verify(&bad_tag),
            Err(ActivationError::TokenMalformed(_))
        ));
    }

    #[test]
    fn test_wrong_secret_is_forged() {
        let (issuer, _) = pair(b"secret");
        let (_, other) = pair(b"other-secret");
        let issued = issuer.issue(claims(Duration::hours(1))).unwrap();

        assert!(matches!(other.verify(&issued.token), Err(ActivationError::TokenForged)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let (issuer, verifier) = pair(b"secret");
        let issued = issuer.issue(claims(Duration::seconds(-1))).unwrap();

        assert!(matches!(verifier.verify(&issued.token), Err(ActivationError::TokenExpired)));
    }

    #[test]
    fn test_verify_at_uses_supplied_clock() {
        let (issuer, verifier) = pair(b"secret");
        let issued = issuer.issue(claims(Duration::hours(1))).unwrap();

        assert!(verifier.verify_at(&issued.token, Utc::now()).is_ok());
        assert!(matches!(
            verifier.verify_at(&issued.token, Utc::now() + Duration::hours(2)),
            Err(ActivationError::TokenExpired)
        ));
    }

    #[test]
    fn test_decode_unverified_ignores_tag() {
        let (issuer, _) = pair(b"secret");
        let issued = issuer.issue(claims(Duration::hours(1))).unwrap();
        let (payload, _) = issued.token.split_once('.').unwrap();

        let decoded = decode_unverified(&format!("{payload}.00")).unwrap();
        assert_eq!(decoded.dev, "dev-a");
    }
}
