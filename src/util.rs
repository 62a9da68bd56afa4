//! Feed URL validation.
//!
//! Configured source URLs point a server-side HTTP client at arbitrary
//! hosts, so the usual SSRF policy applies: http/https only, and nothing
//! that resolves into loopback or private address space.

use std::net::IpAddr;

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum UrlValidationError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    #[error("private IP address not allowed: {0}")]
    PrivateIp(String),
    #[error("localhost not allowed")]
    Localhost,
}

/// Validates a URL string for use as a feed source.
///
/// Rejects non-HTTP(S) schemes, localhost, and private/link-local address
/// ranges (RFC 1918, fe80::/10, fc00::/7). Hostname-based targets are
/// accepted as-is; this checks literal IPs only.
pub fn validate_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str)?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    if let Some(host) = url.host_str() {
        if host == "localhost" {
            return Err(UrlValidationError::Localhost);
        }

        // IPv6 literals come bracketed in the host string
        let host_for_parse = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);

        if let Ok(ip) = host_for_parse.parse::<IpAddr>() {
            if ip.is_loopback() {
                return Err(UrlValidationError::Localhost);
            }
            if is_private_ip(&ip) {
                return Err(UrlValidationError::PrivateIp(ip.to_string()));
            }
        }
    }

    Ok(url)
}

fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_private() || v4.is_loopback() || v4.is_link_local() || v4.is_unspecified()
        }
        IpAddr::V6(v6) => {
            if v6.is_loopback() || v6.is_unspecified() {
                return true;
            }
            let segments = v6.segments();
            let unique_local = (segments[0] & 0xfe00) == 0xfc00;
            let link_local = (segments[0] & 0xffc0) == 0xfe80;
            unique_local || link_local
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_urls_accepted() {
        assert!(validate_url("https://example.com/feed.xml").is_ok());
        assert!(validate_url("http://news.example.org").is_ok());
        assert!(validate_url("https://example.com:8443/feed").is_ok());
    }

    #[test]
    fn test_non_http_schemes_rejected() {
        assert!(validate_url("file:///etc/passwd").is_err());
        assert!(validate_url("ftp://example.com/feed").is_err());
    }

    #[test]
    fn test_localhost_and_loopback_rejected() {
        assert!(validate_url("http://localhost/feed").is_err());
        assert!(validate_url("http://127.0.0.1/feed").is_err());
        assert!(validate_url("http://[::1]/feed").is_err());
    }

    #[test]
    fn test_private_ranges_rejected() {
        assert!(validate_url("http://192.168.1.1/feed").is_err());
        assert!(validate_url("http://10.0.0.1:3000/feed").is_err());
        assert!(validate_url("http://172.16.0.1/feed").is_err());
        assert!(validate_url("http://169.254.1.1/feed").is_err());
        assert!(validate_url("http://[fe80::1]/feed").is_err());
        assert!(validate_url("http://0.0.0.0/feed").is_err());
    }

    #[test]
    fn test_unparseable_url_rejected() {
        assert!(matches!(
            validate_url("not a url"),
            Err(UrlValidationError::InvalidUrl(_))
        ));
    }
}
