//! Readable-text extraction from a wiki page
//!
//! Walks `h2`, `p` and `ul` elements of the main content container in
//! document order:
//! - headings become `## ` lines surrounded by blank lines
//! - paragraphs (and anchors, when selected) are followed by a blank line
//! - list items are bulleted with `• `, one group per list

use scraper::{ElementRef, Html, Selector};

/// Main content container of a MediaWiki page
pub const CONTENT_CONTAINER: &str = "#mw-content-text";

/// Elements walked inside the container
pub const CONTENT_ELEMENTS: &str = "h2, p, ul";

/// Returned when the page has no content container
pub const MISSING_CONTAINER_TEXT: &str = "Could not find content on the page";

/// Placeholder used when the page could not be read at all
pub fn extraction_failed_text(character_name: &str) -> String {
    format!(
        "Character name: {}\nData extraction failed due to page loading issues.",
        character_name
    )
}

/// Extract the text blob from a page's HTML
pub fn extract_content(html: &str) -> String {
    let document = Html::parse_document(html);

    let (Ok(container_selector), Ok(element_selector), Ok(item_selector)) = (
        Selector::parse(CONTENT_CONTAINER),
        Selector::parse(CONTENT_ELEMENTS),
        Selector::parse("li"),
    ) else {
        // Constant selectors always parse
        return MISSING_CONTAINER_TEXT.to_string();
    };

    let Some(container) = document.select(&container_selector).next() else {
        return MISSING_CONTAINER_TEXT.to_string();
    };

    let mut extracted = String::new();
    for element in container.select(&element_selector) {
        match element.value().name() {
            "h2" => {
                extracted.push_str("\n## ");
                extracted.push_str(&text_of(element));
                extracted.push_str("\n\n");
            }
            "p" | "a" => {
                extracted.push_str(&text_of(element));
                extracted.push_str("\n\n");
            }
            "ul" => {
                for item in element.select(&item_selector) {
                    extracted.push_str("• ");
                    extracted.push_str(&text_of(item));
                    extracted.push('\n');
                }
                extracted.push('\n');
            }
            _ => {}
        }
    }

    extracted
}

/// Concatenated descendant text, like DOM `textContent`
fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}
