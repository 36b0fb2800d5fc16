//! Unverified JWT payload decoding and expiry checks
//!
//! The client never verifies signatures (that is the backend's job); it
//! only needs the `exp` claim to decide whether a token is worth sending.

use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;

/// Refresh this many seconds before the actual expiration
pub const EXPIRY_LEEWAY_SECS: i64 = 60;

/// Claims the client cares about; everything else is ignored
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub sub: Option<serde_json::Value>,
}

/// Decode a JWT payload without verification
///
/// Returns `None` for anything that is not a three-segment token with a
/// base64url-encoded JSON payload.
pub fn decode_claims(token: &str) -> Option<Claims> {
    let mut parts = token.split('.');
    let (_header, payload, _sig) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let bytes = general_purpose::URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Check whether a token is expired (or close enough to expiring)
///
/// A token counts as expired when its `exp` claim is within
/// [`EXPIRY_LEEWAY_SECS`] of `now`, or when it cannot be decoded at all.
/// Malformed tokens are never worth sending.
pub fn is_expired_at(token: &str, now_secs: i64) -> bool {
    let Some(claims) = decode_claims(token) else {
        return true;
    };
    let Some(exp) = claims.exp else {
        return true;
    };

    now_secs >= exp - EXPIRY_LEEWAY_SECS
}

/// [`is_expired_at`] against the current wall clock
pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, chrono::Utc::now().timestamp())
}

/// Get the expiration instant of a token, if it has one
pub fn expiration(token: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    decode_claims(token)
        .and_then(|c| c.exp)
        .and_then(|exp| chrono::DateTime::from_timestamp(exp, 0))
}

#[cfg(test)]
pub(crate) fn make_token(exp: i64) -> String {
    use base64::{engine::general_purpose, Engine as _};
    let header = general_purpose::URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = general_purpose::URL_SAFE_NO_PAD
        .encode(serde_json::json!({ "sub": 1, "exp": exp }).to_string());
    format!("{}.{}.sig", header, payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_token_is_not_expired() {
        let token = make_token(1_000_000);
        // Well over a minute of validity left
        assert!(!is_expired_at(&token, 1_000_000 - 600));
    }

    #[test]
    fn test_token_inside_leeway_window_is_expired() {
        let token = make_token(1_000_000);
        assert!(is_expired_at(&token, 1_000_000 - 59));
        assert!(is_expired_at(&token, 1_000_000 - 60));
        // Exactly 61 seconds out is still fine
        assert!(!is_expired_at(&token, 1_000_000 - 61));
    }

    #[test]
    fn test_past_exp_is_expired() {
        let token = make_token(1_000);
        assert!(is_expired_at(&token, 2_000));
    }

    #[test]
    fn test_wrong_segment_count_is_expired() {
        assert!(is_expired_at("only.two", 0));
        assert!(is_expired_at("a.b.c.d", 0));
        assert!(is_expired_at("", 0));
    }

    #[test]
    fn test_invalid_encoding_is_expired() {
        assert!(is_expired_at("head.!!!not-base64!!!.sig", 0));

        use base64::{engine::general_purpose, Engine as _};
        let not_json = general_purpose::URL_SAFE_NO_PAD.encode("plain text");
        assert!(is_expired_at(&format!("head.{}.sig", not_json), 0));
    }

    #[test]
    fn test_missing_exp_is_expired() {
        use base64::{engine::general_purpose, Engine as _};
        let payload = general_purpose::URL_SAFE_NO_PAD.encode(r#"{"sub":"u1"}"#);
        assert!(is_expired_at(&format!("head.{}.sig", payload), 0));
    }

    #[test]
    fn test_decode_claims_reads_exp() {
        let claims = decode_claims(&make_token(123_456)).unwrap();
        assert_eq!(claims.exp, Some(123_456));
    }

    #[test]
    fn test_expiration_instant() {
        let exp = expiration(&make_token(1_700_000_000)).unwrap();
        assert_eq!(exp.timestamp(), 1_700_000_000);
    }
}
