//! Video transcript retrieval.
//!
//! - [`video_id`] - pulls the id out of `watch?v=` and `youtu.be/` links
//! - [`TranscriptService`] - joins segments into text, memoized per video id
//! - [`TimedTextClient`] - caption client for the timed-text endpoint

mod cache;
mod timedtext;

pub use cache::{TranscriptCache, DEFAULT_CAPACITY};
pub use timedtext::{TimedTextClient, DEFAULT_TIMEDTEXT_URL};

use tracing::{debug, info};

use crate::error::{TranscriptError, TranscriptResult};
use crate::traits::transcript::TranscriptClient;

/// Caption languages, in order of preference.
pub const PREFERRED_LANGUAGES: [&str; 2] = ["de", "en"];

/// Extract the video id from a `…watch?v=ID` or `…youtu.be/ID` link.
///
/// The markers match case-insensitively; the id keeps its original case.
pub fn video_id(link: &str) -> Option<&str> {
    const WATCH: &str = "watch?v=";
    const SHORT: &str = "youtu.be/";
    const WATCH_END: &[char] = &['&', '#'];
    const SHORT_END: &[char] = &['?', '&', '#', '/'];

    // ASCII lowercasing keeps byte offsets aligned with `link`.
    let lower = link.to_ascii_lowercase();
    let id = if let Some(at) = lower.find(WATCH) {
        link[at + WATCH.len()..].split(WATCH_END).next()
    } else if let Some(at) = lower.find(SHORT) {
        link[at + SHORT.len()..].split(SHORT_END).next()
    } else {
        None
    }?
    .trim();

    (!id.is_empty()).then_some(id)
}

/// Transcript lookups with a bounded per-process memo.
pub struct TranscriptService<C> {
    client: C,
    cache: TranscriptCache,
}

impl<C: TranscriptClient> TranscriptService<C> {
    /// Create a service with the default memo capacity.
    pub fn new(client: C) -> Self {
        Self::with_cache_capacity(client, DEFAULT_CAPACITY)
    }

    pub fn with_cache_capacity(client: C, capacity: usize) -> Self {
        Self {
            client,
            cache: TranscriptCache::new(capacity),
        }
    }

    pub fn cache(&self) -> &TranscriptCache {
        &self.cache
    }

    /// Fetch the transcript for a video link as space-separated text.
    ///
    /// An empty transcript is returned as an empty string, not an error.
    pub async fn transcript_text(&self, link: &str) -> TranscriptResult<String> {
        let id = video_id(link).ok_or_else(|| TranscriptError::InvalidLink(link.to_string()))?;

        let text = self
            .cache
            .get_or_fetch(id, async {
                let segments = self
                    .client
                    .fetch_transcript(id, &PREFERRED_LANGUAGES)
                    .await?;
                info!(video_id = id, segments = segments.len(), "Transcript fetched");
                Ok(segments
                    .iter()
                    .map(|segment| segment.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" "))
            })
            .await?;

        debug!(video_id = id, chars = text.len(), "Transcript ready");
        Ok(text)
    }
}
