//! Bearer token parsing and expiry checks.
//!
//! Tokens are three dot-separated segments. The middle segment is a
//! base64url JSON payload that may carry an `exp` claim in seconds since
//! the epoch. Nothing else in the payload is interpreted.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64URL;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

/// Why a raw string could not be used as a token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("expected 3 dot-separated segments, found {0}")]
    SegmentCount(usize),
    #[error("payload is not valid base64")]
    Encoding,
    #[error("payload is not a JSON claims object")]
    Payload,
}

#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(default)]
    exp: Option<f64>,
}

/// A structurally valid bearer token.
#[derive(Clone, PartialEq)]
pub struct Token {
    raw: String,
    exp: Option<i64>,
}

impl Token {
    /// Parse a token, stripping one pair of surrounding double quotes and
    /// surrounding whitespace first.
    pub fn parse(raw: &str) -> Result<Self, TokenError> {
        let raw = unquote(raw.trim());

        let segments: Vec<&str> = raw.split('.').collect();
        if segments.len() != 3 {
            return Err(TokenError::SegmentCount(segments.len()));
        }

        let payload = decode_segment(segments[1])?;
        let object: serde_json::Map<String, serde_json::Value> =
            serde_json::from_slice(&payload).map_err(|_| TokenError::Payload)?;
        let claims: Claims = serde_json::from_value(serde_json::Value::Object(object))
            .map_err(|_| TokenError::Payload)?;

        // An `exp` of 0 reads as "no expiry", the same as a missing claim.
        let exp = claims
            .exp
            .filter(|exp| *exp != 0.0)
            .map(|exp| exp.floor() as i64);

        Ok(Self {
            raw: raw.to_string(),
            exp,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Expiry from the `exp` claim, if present.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Whether the token is past its `exp` at `now`. Tokens without `exp`
    /// never expire.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.exp {
            Some(exp) => exp < now.timestamp(),
            None => false,
        }
    }

    /// Value for the `Authorization` header.
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.raw)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("raw", &crate::events::token_preview(&self.raw))
            .field("exp", &self.exp)
            .finish()
    }
}

/// Strip one pair of surrounding double quotes.
pub fn unquote(raw: &str) -> &str {
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        &raw[1..raw.len() - 1]
    } else {
        raw
    }
}

/// Decode a base64 segment, accepting both the URL-safe and the standard
/// alphabet, with or without padding.
fn decode_segment(segment: &str) -> Result<Vec<u8>, TokenError> {
    let normalized: String = segment
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    B64URL.decode(normalized).map_err(|_| TokenError::Encoding)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
