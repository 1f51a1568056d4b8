//! SSRF-safe content intake.
//!
//! Turns a locator (website URL, video link, or local file path) into plain
//! text. Website fetches are guarded against Server-Side Request Forgery:
//! every hostname is resolved and *all* of its addresses must be public, and
//! every redirect hop is re-validated before it is requested.
//!
//! # Usage
//!
//! ```rust,ignore
//! use content_intake::IntakeConfig;
//!
//! let dispatcher = IntakeConfig::from_env()?.build_dispatcher()?;
//!
//! // Never fails: errors come back as "Security Error: ...", "Error: ..." etc.
//! let text = dispatcher.extract("https://example.com/article").await;
//! ```
//!
//! # Modules
//!
//! - [`security`] - Address classification and URL validation
//! - [`fetcher`] - Redirect-bounded website fetcher
//! - [`transcripts`] - Video transcript retrieval with a bounded memo
//! - [`sources`] - Locator classification and dispatch
//! - [`traits`] - Collaborator abstractions (DNS, HTTP, HTML, transcripts)
//! - [`testing`] - Mock implementations for testing

pub mod config;
pub mod error;
pub mod fetcher;
pub mod html;
pub mod net;
pub mod security;
pub mod sources;
pub mod testing;
pub mod traits;
pub mod transcripts;

pub use config::IntakeConfig;
pub use error::{FetchError, SecurityError, SourceError, TranscriptError};
pub use fetcher::{Fetcher, MAX_REDIRECTS};
pub use html::HtmlTextExtractor;
pub use net::{ReqwestTransport, SystemResolver, MAX_BODY_BYTES, REQUEST_TIMEOUT};
pub use security::{AddressClass, UrlValidator, ValidatedUrl};
pub use sources::{read_text_file, Dispatcher, SourceKind};
pub use traits::{
    extractor::TextExtractor,
    resolver::Resolver,
    transcript::{TranscriptClient, TranscriptSegment},
    transport::{HttpResponse, HttpTransport},
};
pub use transcripts::{video_id, TimedTextClient, TranscriptService};
