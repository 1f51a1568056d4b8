//! Testing utilities including mock implementations.
//!
//! These let applications exercise the retrieval core without real DNS,
//! HTTP or transcript calls. Every mock records the calls it receives.

use async_trait::async_trait;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, RwLock};

use crate::error::{FetchError, FetchResult, TranscriptError, TranscriptResult};
use crate::security::ValidatedUrl;
use crate::traits::{
    resolver::Resolver,
    transcript::{TranscriptClient, TranscriptSegment},
    transport::{HttpResponse, HttpTransport},
};

/// A mock resolver with a fixed host table.
///
/// Unknown hosts fail resolution.
#[derive(Clone, Default)]
pub struct MockResolver {
    hosts: Arc<RwLock<HashMap<String, Vec<IpAddr>>>>,
    calls: Arc<RwLock<Vec<(String, u16)>>>,
}

impl MockResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a host to the given addresses (panics on unparseable addresses).
    pub fn with_host(self, host: impl Into<String>, addrs: &[&str]) -> Self {
        let addrs = addrs
            .iter()
            .map(|a| a.parse().expect("mock address must parse"))
            .collect();
        self.hosts.write().unwrap().insert(host.into(), addrs);
        self
    }

    /// Get all `(host, port)` lookups made.
    pub fn calls(&self) -> Vec<(String, u16)> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl Resolver for MockResolver {
    async fn resolve(&self, host: &str, port: u16) -> std::io::Result<Vec<IpAddr>> {
        self.calls.write().unwrap().push((host.to_string(), port));
        self.hosts.read().unwrap().get(host).cloned().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, format!("no such host: {host}"))
        })
    }
}

/// A mock transport with scripted responses keyed by URL.
///
/// Unscripted URLs fail as if the connection was refused.
#[derive(Clone, Default)]
pub struct MockTransport {
    responses: Arc<RwLock<HashMap<String, HttpResponse>>>,
    requests: Arc<RwLock<Vec<String>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the response for a URL (normalized the way `url::Url` prints it).
    pub fn with_response(self, url: impl Into<String>, response: HttpResponse) -> Self {
        let url = url.into();
        let key = url::Url::parse(&url)
            .map(|u| u.to_string())
            .unwrap_or(url);
        self.responses.write().unwrap().insert(key, response);
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.read().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.read().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn get(&self, url: &ValidatedUrl) -> FetchResult<HttpResponse> {
        self.requests.write().unwrap().push(url.as_str().to_string());
        self.responses
            .read()
            .unwrap()
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| {
                FetchError::Network(Box::new(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    format!("connection refused: {url}"),
                )))
            })
    }
}

/// A mock transcript client with canned segments per video id.
///
/// Unknown ids fail with [`TranscriptError::NotFound`].
#[derive(Clone, Default)]
pub struct MockTranscriptClient {
    transcripts: Arc<RwLock<HashMap<String, Vec<TranscriptSegment>>>>,
    calls: Arc<RwLock<Vec<(String, Vec<String>)>>>,
}

impl MockTranscriptClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transcript(
        self,
        video_id: impl Into<String>,
        segments: Vec<TranscriptSegment>,
    ) -> Self {
        self.transcripts
            .write()
            .unwrap()
            .insert(video_id.into(), segments);
        self
    }

    /// Get all `(video_id, languages)` requests made.
    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl TranscriptClient for MockTranscriptClient {
    async fn fetch_transcript(
        &self,
        video_id: &str,
        languages: &[&str],
    ) -> TranscriptResult<Vec<TranscriptSegment>> {
        self.calls.write().unwrap().push((
            video_id.to_string(),
            languages.iter().map(|l| l.to_string()).collect(),
        ));
        self.transcripts
            .read()
            .unwrap()
            .get(video_id)
            .cloned()
            .ok_or_else(|| TranscriptError::NotFound {
                video_id: video_id.to_string(),
            })
    }
}
