//! Request metadata helpers.

use std::net::{IpAddr, SocketAddr};

use http::header::{HeaderName, USER_AGENT};
use http::HeaderMap;

use crate::domain::foundation::{CommandMetadata, UserId};
use crate::domain::project::SignerContext;

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");
const X_REAL_IP: HeaderName = HeaderName::from_static("x-real-ip");

/// Builds command metadata for an owner request.
pub fn command_metadata(user_id: UserId, headers: &HeaderMap) -> CommandMetadata {
    let metadata = CommandMetadata::new(user_id).with_source("http");
    match header(headers, REQUEST_ID_HEADER) {
        Some(id) => metadata.with_correlation_id(id),
        None => metadata,
    }
}

/// Captures where a signature came from.
///
/// With `trust_proxy_headers` the client address is the first
/// `X-Forwarded-For` hop, then `X-Real-IP`. Values that do not parse as an
/// IP address are ignored. The socket peer is the fallback, and the only
/// source when proxy headers are not trusted.
pub fn signer_context(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_proxy_headers: bool,
) -> SignerContext {
    let forwarded = trust_proxy_headers
        .then(|| forwarded_ip(headers))
        .flatten();
    let ip_address = forwarded
        .or_else(|| peer.map(|addr| addr.ip()))
        .map(|ip| ip.to_string());

    SignerContext {
        ip_address,
        user_agent: header(headers, USER_AGENT).map(str::to_string),
    }
}

fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    header(headers, X_FORWARDED_FOR)
        .and_then(|value| value.split(',').next())
        .and_then(|ip| ip.trim().parse().ok())
        .or_else(|| header(headers, X_REAL_IP).and_then(|ip| ip.parse().ok()))
}

fn header<K: http::header::AsHeaderName>(headers: &HeaderMap, name: K) -> Option<&str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
