//! Visitor address of a request

use crate::AppState;
use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use std::convert::Infallible;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// The socket peer, or the first `X-Forwarded-For` hop when the peer is one
/// of `server.trusted_proxies`. Without connect info the peer is `0.0.0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientIp(pub IpAddr);

#[async_trait]
impl FromRequestParts<AppState> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

        Ok(ClientIp(resolve_client_ip(
            peer,
            &parts.headers,
            &state.config.server.trusted_proxies,
        )))
    }
}

pub fn resolve_client_ip(peer: IpAddr, headers: &HeaderMap, trusted_proxies: &[IpAddr]) -> IpAddr {
    if !trusted_proxies.contains(&peer) {
        return peer;
    }

    forwarded_ip(headers).unwrap_or(peer)
}

fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")?
        .to_str()
        .ok()?
        .split(',')
        .next()?
        .trim()
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_forwarded_ip() {
        let mut headers = HeaderMap::new();
        assert!(forwarded_ip(&headers).is_none());

        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
        assert_eq!(forwarded_ip(&headers), Some(ip("203.0.113.7")));

        headers.insert("x-forwarded-for", HeaderValue::from_static("garbage"));
        assert!(forwarded_ip(&headers).is_none());
    }

    #[test]
    fn test_untrusted_peer_ignores_forwarded_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("10.9.9.1"));

        assert_eq!(resolve_client_ip(ip("198.51.100.9"), &headers, &[]), ip("198.51.100.9"));
        assert_eq!(
            resolve_client_ip(ip("198.51.100.9"), &headers, &[ip("127.0.0.1")]),
            ip("198.51.100.9")
        );
    }

    #[test]
    fn test_trusted_proxy_forwards_visitor() {
        let proxies = [ip("127.0.0.1")];
        let mut headers = HeaderMap::new();
        assert_eq!(resolve_client_ip(ip("127.0.0.1"), &headers, &proxies), ip("127.0.0.1"));

        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 127.0.0.1"));
        assert_eq!(resolve_client_ip(ip("127.0.0.1"), &headers, &proxies), ip("203.0.113.7"));
    }
}
