//! URL validation utilities for provider endpoint overrides
//!
//! This module validates configured provider base URLs (the LLM router and
//! the STT/TTS endpoint overrides) before any request is sent. It ensures
//! URLs:
//! - Use HTTPS protocol (HTTP only when private endpoints are allowed)
//! - Do not resolve to private/internal IP addresses unless explicitly allowed
//! - Are properly formatted
//!
//! Deployments that point the gateway at a local inference server pass
//! `allow_private = true`; hardened deployments keep the strict checks.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, ToSocketAddrs};
use thiserror::Error;
use tracing::warn;
use url::Url;

/// Errors that can occur during URL validation
#[derive(Debug, Error)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(#[from] url::ParseError),

    #[error("URL scheme must be HTTP(S), got: {0}")]
    UnsupportedScheme(String),

    #[error("URL scheme must be HTTPS, got: {0}")]
    HttpsRequired(String),

    #[error("URL must have a host")]
    MissingHost,

    #[error("URL resolves to private/internal IP address: {0}")]
    PrivateIpDetected(IpAddr),

    #[error("Failed to resolve hostname: {0}")]
    DnsResolutionFailed(String),

    #[error("URL host is a raw public IP address which is not allowed")]
    RawIpNotAllowed,
}

/// Checks if an IPv4 address is private/internal
///
/// Private addresses include:
/// - Loopback (127.0.0.0/8)
/// - Private (10.0.0.0/8, 172.16.0.0/12, 192.168.0.0/16)
/// - Link-local (169.254.0.0/16)
/// - Broadcast (255.255.255.255)
/// - Documentation (192.0.2.0/24, 198.51.100.0/24, 203.0.113.0/24)
/// - Unspecified (0.0.0.0)
/// - Shared (100.64.0.0/10 - CGNAT)
pub fn is_private_ipv4(ip: &Ipv4Addr) -> bool {
    if ip.is_loopback() {
        return true;
    }
    if ip.is_private() {
        return true;
    }
    if ip.is_link_local() {
        return true;
    }
    if ip.is_broadcast() {
        return true;
    }
    if ip.is_unspecified() {
        return true;
    }
    if ip.is_documentation() {
        return true;
    }
    // Shared address space (CGNAT) 100.64.0.0/10
    let octets = ip.octets();
    if octets[0] == 100 && (octets[1] & 0xC0) == 64 {
        return true;
    }
    // Reserved for benchmarking 198.18.0.0/15
    if octets[0] == 198 && (octets[1] == 18 || octets[1] == 19) {
        return true;
    }
    false
}

/// Checks if an IPv6 address is private/internal
///
/// Private addresses include:
/// - Loopback (::1)
/// - Unspecified (::)
/// - Link-local (fe80::/10)
/// - Unique local (fc00::/7)
/// - Documentation (2001:db8::/32)
/// - IPv4-mapped private addresses
pub fn is_private_ipv6(ip: &Ipv6Addr) -> bool {
    if ip.is_loopback() {
        return true;
    }
    if ip.is_unspecified() {
        return true;
    }
    let segments = ip.segments();

    // Link-local (fe80::/10)
    if segments[0] & 0xFFC0 == 0xFE80 {
        return true;
    }

    // Unique local address (fc00::/7)
    if segments[0] & 0xFE00 == 0xFC00 {
        return true;
    }

    // Documentation (2001:db8::/32)
    if segments[0] == 0x2001 && segments[1] == 0x0DB8 {
        return true;
    }

    // IPv4-mapped IPv6 addresses (::ffff:0:0/96)
    if let Some(ipv4) = ip.to_ipv4_mapped() {
        return is_private_ipv4(&ipv4);
    }

    false
}

/// Checks if an IP address is private/internal
pub fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(ipv4) => is_private_ipv4(ipv4),
        IpAddr::V6(ipv6) => is_private_ipv6(ipv6),
    }
}

/// Validates a provider base URL
///
/// This function performs the following checks:
/// 1. URL must be valid and parseable
/// 2. URL scheme must be HTTP or HTTPS (HTTPS only when `allow_private` is false)
/// 3. URL must have a hostname
/// 4. Raw public IP hosts are rejected; raw private IPs only pass with `allow_private`
/// 5. When `allow_private` is false, the hostname must not resolve to private IPs
///
/// # Arguments
/// * `url` - The URL string to validate
/// * `allow_private` - Whether loopback/private endpoints (local inference servers) are allowed
///
/// # Example
/// ```rust,ignore
/// use s2s_gateway::utils::url_validation::validate_provider_url;
///
/// // Valid public endpoint
/// assert!(validate_provider_url("https://router.huggingface.co/v1", false).is_ok());
///
/// // Local inference server, allowed only when private endpoints are enabled
/// assert!(validate_provider_url("http://127.0.0.1:8000/v1", true).is_ok());
/// assert!(validate_provider_url("http://127.0.0.1:8000/v1", false).is_err());
/// ```
pub fn validate_provider_url(url: &str, allow_private: bool) -> Result<(), UrlValidationError> {
    let parsed = Url::parse(url)?;

    let scheme = parsed.scheme();
    if scheme != "https" && scheme != "http" {
        return Err(UrlValidationError::UnsupportedScheme(scheme.to_string()));
    }
    if scheme == "http" && !allow_private {
        return Err(UrlValidationError::HttpsRequired(scheme.to_string()));
    }

    let host = parsed.host_str().ok_or(UrlValidationError::MissingHost)?;

    // host() correctly identifies IPv4 and IPv6 addresses
    // (host_str() returns bracketed IPv6 like "[::1]" which fails parse)
    match parsed.host() {
        Some(url::Host::Ipv4(ip)) => {
            if is_private_ipv4(&ip) && allow_private {
                return Ok(());
            }
            warn!(host = %host, "Provider URL contains raw IP address");
            return Err(UrlValidationError::RawIpNotAllowed);
        }
        Some(url::Host::Ipv6(ip)) => {
            if is_private_ipv6(&ip) && allow_private {
                return Ok(());
            }
            warn!(host = %host, "Provider URL contains raw IP address");
            return Err(UrlValidationError::RawIpNotAllowed);
        }
        Some(url::Host::Domain(_)) => {}
        None => return Err(UrlValidationError::MissingHost),
    }

    // Private endpoints are trusted as configured; skip DNS checks so local
    // hostnames (e.g. docker service names) work without public resolution.
    if allow_private {
        return Ok(());
    }

    let port = parsed.port().unwrap_or(443);
    let socket_addrs: Vec<_> = format!("{}:{}", host, port)
        .to_socket_addrs()
        .map_err(|e| UrlValidationError::DnsResolutionFailed(format!("{}: {}", host, e)))?
        .collect();

    if socket_addrs.is_empty() {
        return Err(UrlValidationError::DnsResolutionFailed(format!(
            "No addresses found for {}",
            host
        )));
    }

    for addr in socket_addrs {
        if is_private_ip(&addr.ip()) {
            warn!(
                host = %host,
                resolved_ip = %addr.ip(),
                "Provider URL resolves to private IP address"
            );
            return Err(UrlValidationError::PrivateIpDetected(addr.ip()));
        }
    }

    Ok(())
}
