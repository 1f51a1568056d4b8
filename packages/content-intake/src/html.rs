//! Visible-text extraction from HTML documents.

use scraper::{ElementRef, Html, Node};

use crate::traits::extractor::TextExtractor;

/// Elements whose contents never render as text.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Elements that start a new line of text.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav",
    "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// Extracts visible text with `scraper`, one non-empty line per text block.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlTextExtractor;

impl HtmlTextExtractor {
    fn collect(element: ElementRef<'_>, out: &mut String) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => out.push_str(text),
                Node::Element(el) if SKIPPED_ELEMENTS.contains(&el.name()) => {}
                Node::Element(el) => {
                    let block = BLOCK_ELEMENTS.contains(&el.name());
                    if block {
                        out.push('\n');
                    }
                    if let Some(child_ref) = ElementRef::wrap(child) {
                        Self::collect(child_ref, out);
                    }
                    if block {
                        out.push('\n');
                    }
                }
                _ => {}
            }
        }
    }
}

impl TextExtractor for HtmlTextExtractor {
    fn extract(&self, html: &str) -> String {
        let document = Html::parse_document(html);
        let mut raw = String::new();
        Self::collect(document.root_element(), &mut raw);

        raw.lines()
            .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_body_text() {
        let html = "<html><body><p>Test Content</p></body></html>";
        assert_eq!(HtmlTextExtractor.extract(html), "Test Content");
    }

    #[test]
    fn test_skips_scripts_styles_and_title() {
        let html = r#"
            <html>
              <head><title>Page Title</title><style>body { color: red; }</style></head>
              <body>
                <script>var secret = 1;</script>
                <h1>Heading</h1>
                <noscript>Enable JavaScript</noscript>
                <p>Some <b>bold</b> text.</p>
              </body>
            </html>
        "#;
        let text = HtmlTextExtractor.extract(html);

        assert_eq!(text, "Heading\nSome bold text.");
    }

    #[test]
    fn test_block_elements_break_lines() {
        let html = "<div>one</div><div>two</div><ul><li>a</li><li>b</li></ul>";
        assert_eq!(HtmlTextExtractor.extract(html), "one\ntwo\na\nb");
    }

    #[test]
    fn test_decodes_entities() {
        let html = "<p>Fish &amp; Chips &lt;3</p>";
        assert_eq!(HtmlTextExtractor.extract(html), "Fish & Chips <3");
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(HtmlTextExtractor.extract(""), "");
    }
}
