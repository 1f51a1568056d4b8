//! reqwest-backed transport with redirect following disabled.

use async_trait::async_trait;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{FetchError, FetchResult};
use crate::security::ValidatedUrl;
use crate::traits::transport::{HttpResponse, HttpTransport};

/// Per-attempt budget covering connect and read. Each redirect hop gets a fresh one.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Largest response body read from a website (10 MiB).
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// HTTP transport over `reqwest`.
///
/// When address pinning is on (the default), each request connects only to
/// the addresses the validator approved for that hop, so a DNS answer that
/// changes between validation and connect cannot redirect the socket.
pub struct ReqwestTransport {
    client: reqwest::Client,
    user_agent: String,
    pin_addresses: bool,
    max_body_bytes: usize,
}

impl ReqwestTransport {
    /// Create a transport with the given user agent.
    pub fn new(user_agent: impl Into<String>) -> FetchResult<Self> {
        let user_agent = user_agent.into();
        let client = Self::builder(&user_agent)
            .build()
            .map_err(|e| FetchError::Network(Box::new(e)))?;

        Ok(Self {
            client,
            user_agent,
            pin_addresses: true,
            max_body_bytes: MAX_BODY_BYTES,
        })
    }

    /// Enable or disable connecting only to validated addresses.
    pub fn with_address_pinning(mut self, pin: bool) -> Self {
        self.pin_addresses = pin;
        self
    }

    /// Override the response body limit.
    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    fn builder(user_agent: &str) -> reqwest::ClientBuilder {
        reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            // a proxy would connect to whatever the name resolves to at its end
            .no_proxy()
            .connect_timeout(REQUEST_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .user_agent(user_agent)
    }

    /// Client for one request: pinned to the approved addresses for DNS hosts.
    fn client_for(&self, target: &ValidatedUrl) -> FetchResult<reqwest::Client> {
        let domain = match target.domain() {
            Some(domain) if self.pin_addresses => domain,
            _ => return Ok(self.client.clone()),
        };

        let port = target.url().port_or_known_default().unwrap_or(80);
        let addrs: Vec<SocketAddr> = target
            .addrs()
            .iter()
            .map(|ip| SocketAddr::new(*ip, port))
            .collect();

        Self::builder(&self.user_agent)
            .resolve_to_addrs(domain, &addrs)
            .build()
            .map_err(|e| FetchError::Network(Box::new(e)))
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &ValidatedUrl) -> FetchResult<HttpResponse> {
        let client = self.client_for(url)?;
        debug!(url = %url, pinned = self.pin_addresses, "HTTP GET");

        let mut response = client.get(url.url().clone()).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "HTTP request failed");
            FetchError::Network(Box::new(e))
        })?;

        let status = response.status().as_u16();
        if HttpResponse::is_redirect_status(status) {
            let location = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            return Ok(HttpResponse {
                status,
                location,
                body: String::new(),
            });
        }

        if status != 200 {
            return Ok(HttpResponse::status(status));
        }

        let limit = self.max_body_bytes;
        if response.content_length().is_some_and(|len| len > limit as u64) {
            warn!(url = %url, limit, "Declared body exceeds limit");
            return Err(FetchError::BodyTooLarge { limit });
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchError::Network(Box::new(e)))?
        {
            if body.len() + chunk.len() > limit {
                warn!(url = %url, limit, "Body exceeded limit while reading");
                return Err(FetchError::BodyTooLarge { limit });
            }
            body.extend_from_slice(&chunk);
        }

        Ok(HttpResponse::ok(String::from_utf8_lossy(&body).into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use url::Url;

    /// Serve one canned HTTP response on a loopback port.
    async fn serve_once(response: Vec<u8>) -> ValidatedUrl {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            socket.write_all(&response).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        ValidatedUrl::unchecked(Url::parse(&format!("http://{addr}/")).unwrap())
    }

    fn response(headers: &str, body: &[u8]) -> Vec<u8> {
        let mut raw = format!("HTTP/1.1 200 OK\r\n{headers}Connection: close\r\n\r\n").into_bytes();
        raw.extend_from_slice(body);
        raw
    }

    #[tokio::test]
    async fn test_reads_body_within_limit() {
        let body = b"<p>small</p>";
        let url = serve_once(response(&format!("Content-Length: {}\r\n", body.len()), body)).await;
        let transport = ReqwestTransport::new("test").unwrap().with_max_body_bytes(64);

        let response = transport.get(&url).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, "<p>small</p>");
    }

    #[tokio::test]
    async fn test_rejects_declared_oversized_body() {
        let body = vec![b'a'; 2048];
        let url = serve_once(response("Content-Length: 2048\r\n", &body)).await;
        let transport = ReqwestTransport::new("test").unwrap().with_max_body_bytes(1024);

        let err = transport.get(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::BodyTooLarge { limit: 1024 }));
    }

    #[tokio::test]
    async fn test_rejects_undeclared_oversized_body() {
        let body = vec![b'a'; 4096];
        let url = serve_once(response("", &body)).await;
        let transport = ReqwestTransport::new("test").unwrap().with_max_body_bytes(1024);

        let err = transport.get(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::BodyTooLarge { limit: 1024 }));
    }
}
