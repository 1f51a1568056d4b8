//! Collaborator abstractions for the retrieval core.
//!
//! Each trait isolates one external effect (DNS, HTTP, HTML parsing,
//! transcript lookup) so the core can be exercised with the mocks in
//! [`crate::testing`].

pub mod extractor;
pub mod resolver;
pub mod transcript;
pub mod transport;
