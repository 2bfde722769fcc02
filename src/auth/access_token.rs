//! Cloudflare Access JWT (`CF_Authorization` cookie) handling
//!
//! By default the payload segment is base64url-decoded and trusted without
//! checking the signature. This is a trust boundary: it is only sound when
//! the edge proxy strips client-supplied `CF_Authorization` cookies. Setting
//! `CF_ACCESS_VERIFY_SIGNATURE=true` switches to RS256 verification.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use thiserror::Error;

use super::models::{Identity, IdentityClaims};
use crate::common::config::AccessConfig;

#[derive(Debug, Error)]
pub enum AccessTokenError {
    #[error("access token must have three dot-separated segments")]
    Shape,

    #[error("payload is not valid base64url: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("payload is not a JSON object")]
    NotAnObject,

    #[error("payload claims are invalid: {0}")]
    Claims(#[from] serde_json::Error),

    #[error("signature verification requested but no public key configured")]
    MissingKey,

    #[error("signature verification failed: {0}")]
    Signature(#[from] jsonwebtoken::errors::Error),
}

/// Decodes the payload segment without looking at the signature.
pub fn decode_unverified(token: &str) -> Result<IdentityClaims, AccessTokenError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 || segments[1].is_empty() {
        return Err(AccessTokenError::Shape);
    }

    let bytes = URL_SAFE_NO_PAD.decode(segments[1].trim_end_matches('='))?;
    let value: serde_json::Value = serde_json::from_slice(&bytes)?;
    if !value.is_object() {
        return Err(AccessTokenError::NotAnObject);
    }

    Ok(serde_json::from_value(value)?)
}

/// Verifies an RS256 signature (and `exp`, plus `aud` when configured).
pub fn decode_verified(
    token: &str,
    config: &AccessConfig,
) -> Result<IdentityClaims, AccessTokenError> {
    let pem = config
        .public_key_pem
        .as_deref()
        .ok_or(AccessTokenError::MissingKey)?;
    let key = DecodingKey::from_rsa_pem(pem.as_bytes())?;

    let mut validation = Validation::new(Algorithm::RS256);
    if let Some(aud) = &config.audience {
        validation.set_audience(&[aud]);
    }

    Ok(decode::<IdentityClaims>(token, &key, &validation)?.claims)
}

/// Builds an identity from the cookie, always marking the email verified.
pub fn access_identity(token: &str, config: &AccessConfig) -> Result<Identity, AccessTokenError> {
    let claims = if config.verify_signature {
        decode_verified(token, config)?
    } else {
        decode_unverified(token)?
    };
    Ok(claims.into_identity(true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE;

    fn token_with_payload(payload: &str) -> String {
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn test_decode_unverified_reads_claims() {
        let token = token_with_payload(r#"{"email":"a@b.com","given_name":"A"}"#);
        let identity = access_identity(&token, &AccessConfig::default()).unwrap();
        assert_eq!(identity.email, "a@b.com");
        assert_eq!(identity.name, "A");
        assert_eq!(identity.picture, None);
        assert!(identity.email_verified);
    }

    #[test]
    fn test_email_verified_forced_even_when_claim_false() {
        let token = token_with_payload(r#"{"email":"a@b.com","email_verified":false}"#);
        let identity = access_identity(&token, &AccessConfig::default()).unwrap();
        assert!(identity.email_verified);
        assert_eq!(identity.name, "a@b.com");
    }

    #[test]
    fn test_padded_payload_is_tolerated() {
        let payload = URL_SAFE.encode(r#"{"email":"pad@b.co"}"#);
        assert!(payload.ends_with('='));
        let token = format!("h.{}.s", payload);
        let claims = decode_unverified(&token).unwrap();
        assert_eq!(claims.email.as_deref(), Some("pad@b.co"));
    }

    #[test]
    fn test_wrong_segment_count_is_rejected() {
        assert!(matches!(decode_unverified("only.two"), Err(AccessTokenError::Shape)));
        assert!(matches!(decode_unverified("a.b.c.d"), Err(AccessTokenError::Shape)));
        assert!(matches!(decode_unverified("a..c"), Err(AccessTokenError::Shape)));
    }

    #[test]
    fn test_garbage_payload_is_rejected() {
        assert!(matches!(
            decode_unverified("a.!!!.c"),
            Err(AccessTokenError::Encoding(_))
        ));
        let not_json = format!("a.{}.c", URL_SAFE_NO_PAD.encode("hello"));
        assert!(matches!(
            decode_unverified(&not_json),
            Err(AccessTokenError::Claims(_))
        ));
        let array = token_with_payload("[1,2]");
        assert!(matches!(
            decode_unverified(&array),
            Err(AccessTokenError::NotAnObject)
        ));
    }

    #[test]
    fn test_hardened_mode_requires_key() {
        let token = token_with_payload(r#"{"email":"a@b.com"}"#);
        let config = AccessConfig {
            verify_signature: true,
            public_key_pem: None,
            audience: None,
        };
        assert!(matches!(
            access_identity(&token, &config),
            Err(AccessTokenError::MissingKey)
        ));
    }

    #[test]
    fn test_hardened_mode_rejects_bad_key() {
        let token = token_with_payload(r#"{"email":"a@b.com"}"#);
        let config = AccessConfig {
            verify_signature: true,
            public_key_pem: Some("not a pem".to_string()),
            audience: Some("aud".to_string()),
        };
        assert!(matches!(
            access_identity(&token, &config),
            Err(AccessTokenError::Signature(_))
        ));
    }
}
