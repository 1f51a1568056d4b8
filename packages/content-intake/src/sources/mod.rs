//! Source dispatch: route a locator to the transcript client, the website
//! fetcher, or the local file reader.

mod file;

pub use file::{decode_with, read_text_file, TextEncoding, DECODERS};

use std::fmt;

use tracing::{debug, warn};

use crate::error::SourceResult;
use crate::fetcher::Fetcher;
use crate::html::HtmlTextExtractor;
use crate::net::SystemResolver;
use crate::traits::{
    extractor::TextExtractor, resolver::Resolver, transcript::TranscriptClient,
    transport::HttpTransport,
};
use crate::transcripts::TranscriptService;

/// Where a locator's content comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    VideoTranscript,
    Website,
    LocalFile,
}

impl SourceKind {
    /// Classify by substring inspection, in fixed order: video marker, then
    /// HTTP marker, then local path. Not a URL parse.
    pub fn classify(locator: &str) -> Self {
        let lower = locator.to_lowercase();
        if lower.contains("youtu") {
            Self::VideoTranscript
        } else if lower.contains("http") {
            Self::Website
        } else {
            Self::LocalFile
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::VideoTranscript => "video-transcript",
            Self::Website => "website",
            Self::LocalFile => "local-file",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Routes locators to the right source and never fails outward.
pub struct Dispatcher<T, C, R = SystemResolver, E = HtmlTextExtractor> {
    fetcher: Fetcher<T, R, E>,
    transcripts: TranscriptService<C>,
}

impl<T, C, R, E> Dispatcher<T, C, R, E>
where
    T: HttpTransport,
    C: TranscriptClient,
    R: Resolver,
    E: TextExtractor,
{
    pub fn new(fetcher: Fetcher<T, R, E>, transcripts: TranscriptService<C>) -> Self {
        Self {
            fetcher,
            transcripts,
        }
    }

    pub fn transcripts(&self) -> &TranscriptService<C> {
        &self.transcripts
    }

    /// Extract text, with failures kept as typed errors.
    pub async fn try_extract(&self, locator: &str) -> SourceResult<String> {
        let kind = SourceKind::classify(locator);
        debug!(locator = %locator, kind = %kind, "Dispatching locator");

        match kind {
            SourceKind::VideoTranscript => Ok(self.transcripts.transcript_text(locator).await?),
            SourceKind::Website => Ok(self.fetcher.fetch_text(locator).await?),
            SourceKind::LocalFile => read_text_file(locator).await,
        }
    }

    /// Extract text; every failure becomes a caller-facing error message.
    pub async fn extract(&self, locator: &str) -> String {
        match self.try_extract(locator).await {
            Ok(text) => text,
            Err(e) => {
                warn!(locator = %locator, error = %e, "Extraction failed");
                e.user_message()
            }
        }
    }
}
