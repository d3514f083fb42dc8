//! Identity-token decoding.
//!
//! Sign-in hands us an opaque JWT from the identity provider. The core only
//! consumes the claims payload; signature verification belongs to the
//! provider's own SDK on the client side. A token that does not decode
//! aborts the sign-in silently — no partial session is ever created.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use tracing::debug;

/// The claim subset merged into the user profile at sign-in.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityClaims {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// Stable subject id from the provider.
    pub sub: String,
    pub picture: Option<String>,
}

/// Decodes the claims payload of a JWT credential. `None` on any shape or
/// encoding problem: the caller stays on the authentication view.
pub fn decode_identity_claims(credential: &str) -> Option<IdentityClaims> {
    let mut segments = credential.split('.');
    let _header = segments.next()?;
    let payload = segments.next()?;
    if segments.next().is_none() {
        debug!("Credential is not a three-segment JWT");
        return None;
    }

    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn token_with_payload(payload: &serde_json::Value) -> String {
        let encoded = URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("eyJhbGciOiJSUzI1NiJ9.{encoded}.c2ln")
    }

    #[test]
    fn test_valid_token_yields_claims() {
        let token = token_with_payload(&json!({
            "sub": "108177",
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "picture": "https://example.com/ada.png"
        }));
        let claims = decode_identity_claims(&token).unwrap();
        assert_eq!(claims.sub, "108177");
        assert_eq!(claims.name, "Ada Lovelace");
        assert_eq!(claims.picture.as_deref(), Some("https://example.com/ada.png"));
    }

    #[test]
    fn test_missing_optional_claims_default() {
        let token = token_with_payload(&json!({"sub": "42"}));
        let claims = decode_identity_claims(&token).unwrap();
        assert!(claims.name.is_empty());
        assert!(claims.picture.is_none());
    }

    #[test]
    fn test_garbage_credential_decodes_to_none() {
        assert!(decode_identity_claims("not-a-jwt").is_none());
        assert!(decode_identity_claims("a.b").is_none());
        assert!(decode_identity_claims("a.!!!.c").is_none());
    }

    #[test]
    fn test_payload_without_subject_is_rejected() {
        let token = token_with_payload(&json!({"name": "No Subject"}));
        assert!(decode_identity_claims(&token).is_none());
    }
}
