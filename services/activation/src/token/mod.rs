//! Signed access tokens: `base64(claims JSON) + "." + hex(HMAC-SHA256)`.

pub mod claims;
pub mod issuer;
pub mod signer;
pub mod verifier;

pub use claims::TokenClaims;
pub use issuer::{IssuedToken, TokenIssuer, TOKEN_SEPARATOR};
pub use signer::{HmacSha256Signer, TokenSigner};
pub use verifier::{TokenVerifier, decode_unverified};
