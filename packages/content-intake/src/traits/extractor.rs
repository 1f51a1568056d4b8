//! HTML-to-text extraction abstraction.

/// Parses an HTML document and returns its visible text.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, html: &str) -> String;
}
