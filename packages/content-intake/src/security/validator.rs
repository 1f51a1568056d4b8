//! URL validation for SSRF protection.

use std::fmt;
use std::net::IpAddr;

use tracing::{debug, warn};
use url::{Host, Url};

use super::classify::AddressClass;
use crate::error::{SecurityError, SecurityResult};
use crate::net::SystemResolver;
use crate::traits::resolver::Resolver;

/// Schemes that may be fetched.
const ALLOWED_SCHEMES: [&str; 2] = ["http", "https"];

/// A URL that passed validation, together with the addresses that were approved.
///
/// Only [`UrlValidator`] can construct this, and the HTTP transport only accepts
/// this type, so issuing a request without validating first does not compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUrl {
    url: Url,
    addrs: Vec<IpAddr>,
}

impl ValidatedUrl {
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Every address the host resolved to, all of them public.
    pub fn addrs(&self) -> &[IpAddr] {
        &self.addrs
    }

    /// The DNS name, or `None` when the URL names an IP literal.
    pub fn domain(&self) -> Option<&str> {
        self.url.domain()
    }

    #[cfg(test)]
    pub(crate) fn unchecked(url: Url) -> Self {
        Self {
            url,
            addrs: Vec::new(),
        }
    }
}

impl fmt::Display for ValidatedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

/// URL validator for SSRF protection.
///
/// Validates URLs before fetching to prevent:
/// - Access to internal services (localhost, 127.0.0.1, ::1)
/// - Access to private IP ranges (10.x, 172.16.x, 192.168.x, fc00::/7)
/// - Access to cloud metadata services (169.254.x, fe80::/10)
/// - Non-HTTP(S) schemes (file://, ftp://)
///
/// A hostname is accepted only if *every* address it resolves to is public.
/// Validation is a pure check: nothing is cached between calls.
#[derive(Debug, Clone, Default)]
pub struct UrlValidator<R = SystemResolver> {
    resolver: R,
}

impl UrlValidator<SystemResolver> {
    /// Create a validator backed by the system resolver.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: Resolver> UrlValidator<R> {
    /// Create a validator with a custom resolver.
    pub fn with_resolver(resolver: R) -> Self {
        Self { resolver }
    }

    /// Validate a raw URL string.
    pub async fn validate(&self, raw: &str) -> SecurityResult<ValidatedUrl> {
        let url = parse(raw)?;
        self.validate_url(url).await
    }

    /// Validate an already-parsed URL (e.g. a resolved redirect target).
    pub async fn validate_url(&self, url: Url) -> SecurityResult<ValidatedUrl> {
        if !ALLOWED_SCHEMES.contains(&url.scheme()) {
            warn!(url = %url, scheme = url.scheme(), "Rejected URL scheme");
            return Err(SecurityError::InvalidScheme(url.scheme().to_string()));
        }

        let addrs = match url.host() {
            None => return Err(SecurityError::NoHostname),
            Some(Host::Domain(domain)) if domain.is_empty() => {
                return Err(SecurityError::NoHostname)
            }
            Some(Host::Domain(domain)) => {
                let port = url.port_or_known_default().unwrap_or(80);
                self.resolve(domain, port).await?
            }
            Some(Host::Ipv4(v4)) => vec![IpAddr::V4(v4)],
            Some(Host::Ipv6(v6)) => vec![IpAddr::V6(v6)],
        };

        let host = url.host_str().unwrap_or_default();
        for addr in &addrs {
            let class = AddressClass::of(*addr);
            if !class.is_public() {
                warn!(url = %url, addr = %addr, class = %class, "URL resolves to restricted address");
                return Err(SecurityError::RestrictedAddress {
                    host: host.to_string(),
                    addr: *addr,
                    class,
                });
            }
        }

        debug!(url = %url, addrs = ?addrs, "URL validated");
        Ok(ValidatedUrl { url, addrs })
    }

    async fn resolve(&self, host: &str, port: u16) -> SecurityResult<Vec<IpAddr>> {
        let addrs = self.resolver.resolve(host, port).await.map_err(|e| {
            warn!(host = %host, error = %e, "DNS resolution failed");
            SecurityError::ResolutionFailure {
                host: host.to_string(),
                reason: e.to_string(),
            }
        })?;

        if addrs.is_empty() {
            return Err(SecurityError::ResolutionFailure {
                host: host.to_string(),
                reason: "no addresses returned".to_string(),
            });
        }
        Ok(addrs)
    }
}

/// Parse a raw URL, reporting a foreign scheme even when the rest is unparseable.
fn parse(raw: &str) -> SecurityResult<Url> {
    match Url::parse(raw.trim()) {
        Ok(url) => Ok(url),
        Err(e) => {
            if let Some((scheme, _)) = raw.trim().split_once("://") {
                let scheme = scheme.to_ascii_lowercase();
                if !ALLOWED_SCHEMES.contains(&scheme.as_str()) {
                    return Err(SecurityError::InvalidScheme(scheme));
                }
            }
            match e {
                url::ParseError::EmptyHost => Err(SecurityError::NoHostname),
                other => Err(SecurityError::MalformedUrl(other)),
            }
        }
    }
}
