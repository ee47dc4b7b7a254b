//! auth::claims
//!
//! Reads the expiry claim embedded in a JWT-style token.
//!
//! The stored credential pair carries no timestamps; the refresh token's
//! remaining lifetime is derived lazily from its own `exp` claim. The
//! signature is not checked here. The server is the authority on whether
//! a token is valid; the client only needs to know when it stops being
//! worth presenting.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use super::errors::AuthError;

#[derive(Debug, Deserialize)]
struct ExpiryClaim {
    exp: Option<serde_json::Value>,
}

/// Decode the `exp` claim of `token` into a UTC timestamp.
///
/// # Errors
///
/// [`AuthError::InvalidToken`] when the token is not three dot-separated
/// segments, the payload is not base64url JSON, or `exp` is missing or not
/// a number.
pub fn decode_expiry(token: &str) -> Result<DateTime<Utc>, AuthError> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(AuthError::InvalidToken("expected three segments".into()));
    };

    // Some issuers pad; the URL-safe engine here does not accept padding.
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| AuthError::InvalidToken(format!("payload is not base64url: {}", e)))?;

    let claim: ExpiryClaim = serde_json::from_slice(&bytes)
        .map_err(|e| AuthError::InvalidToken(format!("payload is not JSON: {}", e)))?;

    let exp = claim
        .exp
        .as_ref()
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
        .ok_or_else(|| AuthError::InvalidToken("missing numeric exp claim".into()))?;

    Utc.timestamp_opt(exp, 0)
        .single()
        .ok_or_else(|| AuthError::InvalidToken("exp claim out of range".into()))
}

/// Seconds until `token` expires, measured from `now`. Zero or negative
/// means the token has already expired.
pub fn seconds_remaining(token: &str, now: DateTime<Utc>) -> Result<i64, AuthError> {
    Ok((decode_expiry(token)? - now).num_seconds())
}

/// Build an unsigned token carrying only an `exp` claim.
#[cfg(test)]
pub(crate) fn unsigned_token_with_expiry(exp: DateTime<Utc>) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{}}}"#, exp.timestamp()));
    format!("{}.{}.", header, payload)
}
