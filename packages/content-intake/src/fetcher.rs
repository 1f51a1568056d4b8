//! Redirect-bounded website fetcher.
//!
//! Drives the redirect chain itself: every `Location` is resolved against the
//! current URL and validated before it is requested, and the chain is capped
//! at [`MAX_REDIRECTS`] hops regardless of what the server does.

use tracing::{debug, info, warn};

use crate::error::{FetchError, FetchResult};
use crate::html::HtmlTextExtractor;
use crate::net::SystemResolver;
use crate::security::{UrlValidator, ValidatedUrl};
use crate::traits::{extractor::TextExtractor, resolver::Resolver, transport::HttpTransport};

/// Maximum number of redirects followed in one fetch.
pub const MAX_REDIRECTS: usize = 5;

/// Fetches a website and returns its visible text.
pub struct Fetcher<T, R = SystemResolver, E = HtmlTextExtractor> {
    validator: UrlValidator<R>,
    transport: T,
    extractor: E,
}

impl<T: HttpTransport> Fetcher<T> {
    /// Create a fetcher using the system resolver and the HTML extractor.
    pub fn new(transport: T) -> Self {
        Self {
            validator: UrlValidator::new(),
            transport,
            extractor: HtmlTextExtractor,
        }
    }
}

impl<T, R, E> Fetcher<T, R, E>
where
    T: HttpTransport,
    R: Resolver,
    E: TextExtractor,
{
    /// Create a fetcher from explicit collaborators.
    pub fn with_parts(validator: UrlValidator<R>, transport: T, extractor: E) -> Self {
        Self {
            validator,
            transport,
            extractor,
        }
    }

    /// Fetch `url`, follow validated redirects, and extract the page text.
    pub async fn fetch_text(&self, url: &str) -> FetchResult<String> {
        let mut current = self
            .validator
            .validate(url)
            .await
            .map_err(|e| FetchError::security(0, url, e))?;
        let mut hops = 0;

        loop {
            let response = self.transport.get(&current).await?;

            if let Some(location) = response.redirect_target() {
                if hops >= MAX_REDIRECTS {
                    warn!(url = %current, max = MAX_REDIRECTS, "Redirect limit reached");
                    return Err(FetchError::TooManyRedirects { max: MAX_REDIRECTS });
                }
                hops += 1;
                current = self.follow(&current, location, hops).await?;
                continue;
            }

            if response.status != 200 {
                warn!(url = %current, status = response.status, "Unexpected HTTP status");
                return Err(FetchError::HttpStatus(response.status));
            }

            let text = self.extractor.extract(&response.body);
            info!(
                url = %url,
                final_url = %current,
                redirects = hops,
                text_length = text.len(),
                "Website text extracted"
            );
            return Ok(text);
        }
    }

    /// Resolve a `Location` against the current URL and validate the result.
    async fn follow(
        &self,
        current: &ValidatedUrl,
        location: &str,
        hop: usize,
    ) -> FetchResult<ValidatedUrl> {
        let next = current.url().join(location).map_err(|e| {
            FetchError::security(hop, location, crate::error::SecurityError::MalformedUrl(e))
        })?;
        debug!(from = %current, to = %next, hop, "Following redirect");

        let target = next.to_string();
        self.validator
            .validate_url(next)
            .await
            .map_err(|e| FetchError::security(hop, target, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SecurityError;
    use crate::testing::{MockResolver, MockTransport};
    use crate::traits::transport::HttpResponse;

    fn fetcher(
        resolver: MockResolver,
        transport: MockTransport,
    ) -> Fetcher<MockTransport, MockResolver, HtmlTextExtractor> {
        Fetcher::with_parts(
            UrlValidator::with_resolver(resolver),
            transport,
            HtmlTextExtractor,
        )
    }

    fn public_resolver() -> MockResolver {
        MockResolver::new()
            .with_host("example.com", &["93.184.216.34"])
            .with_host("a.com", &["8.8.8.8"])
            .with_host("b.com", &["1.1.1.1"])
            .with_host("internal.corp", &["10.0.0.12"])
    }

    #[tokio::test]
    async fn test_fetches_and_extracts_text() {
        let transport = MockTransport::new().with_response(
            "http://example.com/",
            HttpResponse::ok("<html><body><p>Test Content</p></body></html>"),
        );
        let text = fetcher(public_resolver(), transport.clone())
            .fetch_text("http://example.com")
            .await
            .unwrap();

        assert_eq!(text, "Test Content");
        assert_eq!(transport.requests(), vec!["http://example.com/"]);
    }

    #[tokio::test]
    async fn test_rejected_url_never_reaches_network() {
        let transport = MockTransport::new();
        let f = fetcher(public_resolver(), transport.clone());

        let err = f.fetch_text("file:///etc/passwd").await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::Security {
                hop: 0,
                source: SecurityError::InvalidScheme(_),
                ..
            }
        ));

        let err = f.fetch_text("http://internal.corp/").await.unwrap_err();
        assert!(err.is_security());
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_follows_relative_redirect() {
        let transport = MockTransport::new()
            .with_response("https://a.com/x/", HttpResponse::redirect(302, "y"))
            .with_response("https://a.com/x/y", HttpResponse::ok("<p>landed</p>"));
        let resolver = public_resolver();
        let text = fetcher(resolver, transport.clone())
            .fetch_text("https://a.com/x/")
            .await
            .unwrap();

        assert_eq!(text, "landed");
        assert_eq!(
            transport.requests(),
            vec!["https://a.com/x/", "https://a.com/x/y"]
        );
    }

    #[tokio::test]
    async fn test_follows_absolute_cross_host_redirect() {
        let transport = MockTransport::new()
            .with_response("https://a.com/", HttpResponse::redirect(301, "https://b.com/final"))
            .with_response("https://b.com/final", HttpResponse::ok("<p>b</p>"));
        let resolver = public_resolver();
        let text = fetcher(resolver.clone(), transport)
            .fetch_text("https://a.com/")
            .await
            .unwrap();

        assert_eq!(text, "b");
        let hosts: Vec<String> = resolver.calls().into_iter().map(|(h, _)| h).collect();
        assert_eq!(hosts, vec!["a.com", "b.com"]);
    }

    #[tokio::test]
    async fn test_redirect_to_restricted_address_is_not_requested() {
        let transport = MockTransport::new().with_response(
            "http://example.com/",
            HttpResponse::redirect(302, "http://192.168.1.1/admin"),
        );
        let err = fetcher(public_resolver(), transport.clone())
            .fetch_text("http://example.com")
            .await
            .unwrap_err();

        match err {
            FetchError::Security { hop, url, source } => {
                assert_eq!(hop, 1);
                assert_eq!(url, "http://192.168.1.1/admin");
                assert!(matches!(source, SecurityError::RestrictedAddress { .. }));
            }
            other => panic!("expected security error, got {other:?}"),
        }
        assert_eq!(transport.requests(), vec!["http://example.com/"]);
    }

    #[tokio::test]
    async fn test_redirect_to_foreign_scheme_is_rejected() {
        let transport = MockTransport::new().with_response(
            "http://example.com/",
            HttpResponse::redirect(307, "file:///etc/passwd"),
        );
        let err = fetcher(public_resolver(), transport.clone())
            .fetch_text("http://example.com/")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FetchError::Security {
                hop: 1,
                source: SecurityError::InvalidScheme(_),
                ..
            }
        ));
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_five_redirects_succeed() {
        let mut transport = MockTransport::new();
        for i in 0..5 {
            transport = transport.with_response(
                format!("https://a.com/{i}"),
                HttpResponse::redirect(302, format!("/{}", i + 1)),
            );
        }
        transport = transport.with_response("https://a.com/5", HttpResponse::ok("<p>done</p>"));

        let text = fetcher(public_resolver(), transport.clone())
            .fetch_text("https://a.com/0")
            .await
            .unwrap();

        assert_eq!(text, "done");
        assert_eq!(transport.request_count(), 6);
    }

    #[tokio::test]
    async fn test_redirect_loop_hits_ceiling() {
        let transport = MockTransport::new()
            .with_response("http://example.com/1", HttpResponse::redirect(302, "/2"))
            .with_response("http://example.com/2", HttpResponse::redirect(302, "/1"));

        let err = fetcher(public_resolver(), transport.clone())
            .fetch_text("http://example.com/1")
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::TooManyRedirects { max: 5 }));
        // initial request plus five followed hops, nothing past the fifth
        assert_eq!(transport.request_count(), 6);
    }

    #[tokio::test]
    async fn test_non_200_is_http_status_error() {
        let transport = MockTransport::new()
            .with_response("https://a.com/missing", HttpResponse::status(404));
        let err = fetcher(public_resolver(), transport)
            .fetch_text("https://a.com/missing")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::HttpStatus(404)));
    }

    #[tokio::test]
    async fn test_redirect_without_location_is_http_status_error() {
        let transport =
            MockTransport::new().with_response("https://a.com/", HttpResponse::status(302));
        let err = fetcher(public_resolver(), transport)
            .fetch_text("https://a.com/")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::HttpStatus(302)));
    }

    #[tokio::test]
    async fn test_network_failure_is_wrapped() {
        // unscripted URLs fail like a refused connection
        let transport = MockTransport::new();
        let err = fetcher(public_resolver(), transport)
            .fetch_text("https://a.com/")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
    }
}
