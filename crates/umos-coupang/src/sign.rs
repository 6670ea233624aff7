// SPDX-FileCopyrightText: 2026 Umos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HMAC-SHA256 request signing.
//!
//! The gateway authenticates each request with a signature over
//! `timestamp + method + path[?query]`, where the timestamp is a compact
//! UTC form (`yymmdd'T'HHMMSS'Z'`). Servers reject stale signatures, so a
//! timestamp is generated fresh per request and never cached.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use umos_core::UmosError;

type HmacSha256 = Hmac<Sha256>;

/// Current UTC timestamp in the gateway's compact signed form.
pub(crate) fn signed_timestamp() -> String {
    Utc::now().format("%y%m%dT%H%M%SZ").to_string()
}

/// Base64 HMAC-SHA256 over the canonical request string.
pub(crate) fn sign(
    secret: &str,
    timestamp: &str,
    method: &str,
    path: &str,
    query: &str,
) -> Result<String, UmosError> {
    let canonical = if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    };
    let message = format!("{timestamp}{method}{canonical}");

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| UmosError::Internal("HMAC key initialization failed".to_string()))?;
    mac.update(message.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// Assembles the `Authorization` header value for one request.
pub(crate) fn authorization_header(
    access_key: &str,
    secret: &str,
    timestamp: &str,
    method: &str,
    path: &str,
    query: &str,
) -> Result<String, UmosError> {
    let signature = sign(secret, timestamp, method, path, query)?;
    Ok(format!(
        "HMAC-SHA256 accessKey={access_key}, timestamp={timestamp}, signature={signature}"
    ))
}
