//! HTTP transport abstraction.
//!
//! The transport never follows redirects on its own; the fetcher drives the
//! redirect chain so every hop passes through validation first.

use async_trait::async_trait;

use crate::error::FetchResult;
use crate::security::ValidatedUrl;

/// A single HTTP response, with the redirect target left for the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,

    /// Raw `Location` header, unresolved
    pub location: Option<String>,

    /// Response body (empty for redirects)
    pub body: String,
}

impl HttpResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            location: None,
            body: body.into(),
        }
    }

    pub fn redirect(status: u16, location: impl Into<String>) -> Self {
        Self {
            status,
            location: Some(location.into()),
            body: String::new(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            location: None,
            body: String::new(),
        }
    }

    /// Redirect statuses the fetcher follows.
    pub fn is_redirect_status(status: u16) -> bool {
        matches!(status, 301 | 302 | 303 | 307 | 308)
    }

    /// The `Location` to follow, if this is a followable redirect.
    pub fn redirect_target(&self) -> Option<&str> {
        if Self::is_redirect_status(self.status) {
            self.location.as_deref()
        } else {
            None
        }
    }
}

/// HTTP client issuing GET requests with redirect following disabled.
///
/// Only accepts [`ValidatedUrl`], so a request cannot be issued for a URL
/// that skipped validation.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &ValidatedUrl) -> FetchResult<HttpResponse>;
}
