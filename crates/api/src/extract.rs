//! Request metadata extraction: device fingerprint and network origin.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;

/// Per-request client identity signals used by the rotation rules.
///
/// The fingerprint is the User-Agent string; crude, but it is what a token
/// thief is least likely to know. The origin prefers proxy-provided headers
/// over the socket peer so deployments behind a load balancer see the real
/// client address.
#[derive(Debug, Clone)]
pub struct ClientMeta {
    pub device_fingerprint: String,
    pub origin_address: String,
}

impl<S> FromRequestParts<S> for ClientMeta
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let device_fingerprint = parts
            .headers
            .get(axum::http::header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        Ok(ClientMeta {
            device_fingerprint,
            origin_address: client_ip(parts),
        })
    }
}

/// Best-effort client address: first X-Forwarded-For entry, then X-Real-Ip,
/// then the socket peer.
fn client_ip(parts: &Parts) -> String {
    if let Some(forwarded) = parts
        .headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    if let Some(real_ip) = parts.headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        return real_ip.trim().to_string();
    }

    parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts_with_headers(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn forwarded_for_wins() {
        let parts = parts_with_headers(&[
            ("x-forwarded-for", "203.0.113.9, 10.0.0.1"),
            ("x-real-ip", "198.51.100.2"),
        ]);
        assert_eq!(client_ip(&parts), "203.0.113.9");
    }

    #[test]
    fn real_ip_is_the_fallback() {
        let parts = parts_with_headers(&[("x-real-ip", "198.51.100.2")]);
        assert_eq!(client_ip(&parts), "198.51.100.2");
    }

    #[test]
    fn no_signal_yields_unknown() {
        let parts = parts_with_headers(&[]);
        assert_eq!(client_ip(&parts), "unknown");
    }
}
