//! Token issuance.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::ActivationError;
use crate::token::claims::TokenClaims;
use crate::token::signer::TokenSigner;

/// Separator between encoded payload and hex tag.
pub const TOKEN_SEPARATOR: char = '.';

/// A freshly signed token with the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Wire form handed to the client
    pub token: String,
    /// Claims embedded in `token`
    pub claims: TokenClaims,
}

/// Stamps `base64(payload) + "." + hex(tag)` tokens.
pub struct TokenIssuer {
    signer: Arc<dyn TokenSigner>,
}

impl TokenIssuer {
    /// Create an issuer around `signer`.
    pub fn new(signer: Arc<dyn TokenSigner>) -> Self {
        TokenIssuer { signer }
    }

    /// Serialize and sign `claims`.
    ///
    /// # Errors
    ///
    /// [`ActivationError::Internal`] if the claims cannot be serialized.
    pub fn issue(&self, claims: TokenClaims) -> Result<IssuedToken, ActivationError> {
        let payload = serde_json::to_vec(&claims)
            .map_err(|e| ActivationError::internal(format!("claims serialization: {}", e)))?;
        let tag = self.signer.sign(&payload);

        let mut token = BASE64.encode(&payload);
        token.push(TOKEN_SEPARATOR);
        token.push_str(&hex::encode(tag));

        Ok(IssuedToken { token, claims })
    }
}
