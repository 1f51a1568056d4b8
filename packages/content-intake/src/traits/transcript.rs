//! Transcript retrieval abstraction.

use async_trait::async_trait;

use crate::error::TranscriptResult;

/// One caption line of a video transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptSegment {
    pub text: String,

    /// Offset from the start of the video, in seconds
    pub start: f64,

    /// Display duration, in seconds
    pub duration: f64,
}

impl TranscriptSegment {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }
}

/// Fetches transcript segments for a video id.
#[async_trait]
pub trait TranscriptClient: Send + Sync {
    /// Fetch the first available transcript, trying `languages` in order.
    ///
    /// An existing but empty track yields `Ok(vec![])`.
    async fn fetch_transcript(
        &self,
        video_id: &str,
        languages: &[&str],
    ) -> TranscriptResult<Vec<TranscriptSegment>>;
}
