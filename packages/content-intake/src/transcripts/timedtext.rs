//! Transcript client for the public timed-text caption endpoint.

use async_trait::async_trait;
use regex::Regex;
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};
use url::Url;

use crate::error::{TranscriptError, TranscriptResult};
use crate::net::REQUEST_TIMEOUT;
use crate::traits::transcript::{TranscriptClient, TranscriptSegment};

/// Default caption endpoint.
pub const DEFAULT_TIMEDTEXT_URL: &str = "https://www.youtube.com/api/timedtext";

/// Fetches caption tracks as timed-text XML and parses their `<text>` elements.
pub struct TimedTextClient {
    client: reqwest::Client,
    base_url: Url,
}

impl TimedTextClient {
    /// Create a client for the default endpoint.
    pub fn new(user_agent: &str) -> TranscriptResult<Self> {
        Self::with_base_url(user_agent, DEFAULT_TIMEDTEXT_URL)
    }

    /// Create a client for a custom endpoint (mirrors, tests).
    pub fn with_base_url(user_agent: &str, base_url: &str) -> TranscriptResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| TranscriptError::Malformed(format!("invalid base URL: {e}")))?;
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(user_agent)
            .build()
            .map_err(|e| TranscriptError::Network(Arc::new(e)))?;

        Ok(Self { client, base_url })
    }

    fn track_url(&self, video_id: &str, language: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("v", video_id)
            .append_pair("lang", language);
        url
    }

    /// Fetch one language track; `None` means the track does not exist.
    async fn fetch_track(
        &self,
        video_id: &str,
        language: &str,
    ) -> TranscriptResult<Option<Vec<TranscriptSegment>>> {
        let url = self.track_url(video_id, language);
        debug!(video_id, language, "Requesting caption track");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TranscriptError::Network(Arc::new(e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            warn!(video_id, language, status = %response.status(), "Caption request failed");
            return Err(TranscriptError::Malformed(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| TranscriptError::Network(Arc::new(e)))?;
        parse_track(&body)
    }
}

#[async_trait]
impl TranscriptClient for TimedTextClient {
    async fn fetch_transcript(
        &self,
        video_id: &str,
        languages: &[&str],
    ) -> TranscriptResult<Vec<TranscriptSegment>> {
        for language in languages {
            if let Some(segments) = self.fetch_track(video_id, language).await? {
                debug!(video_id, language, segments = segments.len(), "Caption track found");
                return Ok(segments);
            }
        }

        Err(TranscriptError::NotFound {
            video_id: video_id.to_string(),
        })
    }
}

fn text_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?s)<text\b([^>]*)/>|<text\b([^>]*)>(.*?)</text>"#).expect("valid regex")
    })
}

fn attr_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"(\w+)="([^"]*)""#).expect("valid regex"))
}

/// Parse a timed-text document. An empty body means no track.
fn parse_track(body: &str) -> TranscriptResult<Option<Vec<TranscriptSegment>>> {
    let body = body.trim();
    if body.is_empty() {
        return Ok(None);
    }
    if !body.contains("<transcript") {
        return Err(TranscriptError::Malformed(
            "missing <transcript> root".to_string(),
        ));
    }

    let segments = text_pattern()
        .captures_iter(body)
        .filter_map(|cap| {
            let attrs = cap.get(1).or_else(|| cap.get(2))?.as_str();
            let text = cap.get(3).map(|m| m.as_str()).unwrap_or_default();
            let text = decode_entities(&decode_entities(text));
            let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
            if text.is_empty() {
                return None;
            }

            let mut start = 0.0;
            let mut duration = 0.0;
            for attr in attr_pattern().captures_iter(attrs) {
                let value = attr[2].parse::<f64>().unwrap_or(0.0);
                match &attr[1] {
                    "start" => start = value,
                    "dur" => duration = value,
                    _ => {}
                }
            }
            Some(TranscriptSegment::new(text, start, duration))
        })
        .collect();

    Ok(Some(segments))
}

/// Decode the XML/HTML entities caption tracks use.
fn decode_entities(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
