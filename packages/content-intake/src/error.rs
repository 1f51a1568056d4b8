//! Typed errors for the content intake library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can match on
//! the failure class. The dispatcher turns every error into a caller-facing
//! message via [`SourceError::user_message`].

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::security::AddressClass;

/// Security-related errors, raised before any network I/O toward the target.
#[derive(Debug, Error)]
pub enum SecurityError {
    /// URL scheme not allowed (e.g., file://, ftp://)
    #[error("Invalid scheme: {0}")]
    InvalidScheme(String),

    /// URL has no host
    #[error("Invalid URL: No hostname found")]
    NoHostname,

    /// URL could not be parsed at all
    #[error("Invalid URL: {0}")]
    MalformedUrl(#[from] url::ParseError),

    /// DNS resolution failed
    #[error("Could not resolve hostname: {host} ({reason})")]
    ResolutionFailure { host: String, reason: String },

    /// Host resolved to an address that is not publicly routable
    #[error("URL resolves to a restricted IP address: {addr} ({class}, host {host})")]
    RestrictedAddress {
        host: String,
        addr: IpAddr,
        class: AddressClass,
    },
}

/// Errors that can occur while fetching a website.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Validation rejected the URL at the given hop (0 = the requested URL)
    #[error("security check failed at hop {hop} ({url}): {source}")]
    Security {
        hop: usize,
        url: String,
        #[source]
        source: SecurityError,
    },

    /// Redirect chain exceeded the hop ceiling
    #[error("too many redirects (max {max})")]
    TooManyRedirects { max: usize },

    /// Final response was neither a redirect nor 200
    #[error("unexpected HTTP status {0}")]
    HttpStatus(u16),

    /// Response body exceeded the transport's size limit
    #[error("response body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    /// Connection refused, timeout, body read failure...
    #[error("{0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl FetchError {
    pub(crate) fn security(hop: usize, url: impl Into<String>, source: SecurityError) -> Self {
        Self::Security {
            hop,
            url: url.into(),
            source,
        }
    }

    /// Whether this failure was raised by URL validation.
    pub fn is_security(&self) -> bool {
        matches!(self, Self::Security { .. })
    }
}

/// Errors from transcript retrieval.
#[derive(Debug, Clone, Error)]
pub enum TranscriptError {
    /// Link matches neither known video URL shape
    #[error("could not extract a video id from {0}")]
    InvalidLink(String),

    /// No caption track exists in any preferred language
    #[error("no transcript found for video {video_id}")]
    NotFound { video_id: String },

    /// Transport failure talking to the transcript service
    #[error("transcript request failed: {0}")]
    Network(#[source] Arc<dyn std::error::Error + Send + Sync>),

    /// Service answered with something that is not a caption track
    #[error("malformed transcript response: {0}")]
    Malformed(String),
}

/// Errors surfaced by the source dispatcher.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Transcript(#[from] TranscriptError),

    /// Local file does not exist
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// None of the candidate decoders accepted the file contents
    #[error("could not decode {}", .0.display())]
    Decode(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SourceError {
    /// Render the error with the prefix UI layers use to tell failure classes apart.
    pub fn user_message(&self) -> String {
        match self {
            Self::Fetch(FetchError::Security { hop: 0, source, .. }) => {
                format!("Security Error: {source}")
            }
            Self::Fetch(FetchError::Security { hop, url, source }) => {
                format!("Security Error on redirect {hop} ({url}): {source}")
            }
            Self::Fetch(FetchError::Network(e)) => format!("Error fetching URL: {e}"),
            Self::Fetch(e @ FetchError::BodyTooLarge { .. }) => format!("Error fetching URL: {e}"),
            Self::Fetch(FetchError::TooManyRedirects { .. }) => {
                "Error: Too many redirects".to_string()
            }
            Self::Fetch(FetchError::HttpStatus(code)) => {
                format!("Error: Failed to retrieve content (Status code: {code})")
            }
            Self::FileNotFound(_) => "Fehler: Datei konnte nicht gefunden werden".to_string(),
            other => format!("Ein Fehler ist aufgetreten: {other}"),
        }
    }
}

/// Result type alias for security operations.
pub type SecurityResult<T> = std::result::Result<T, SecurityError>;

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for transcript operations.
pub type TranscriptResult<T> = std::result::Result<T, TranscriptError>;

/// Result type alias for dispatcher operations.
pub type SourceResult<T> = std::result::Result<T, SourceError>;
