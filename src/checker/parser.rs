//! HTML parser for extracting page signals
//!
//! This module pulls three structural signals out of a fetched page:
//! - The first `<h1>` heading
//! - The first `<title>`
//! - The `content` of the first `<meta name="description">`
//!
//! Extraction never fails. Missing or malformed markup yields `None`.

use scraper::{ElementRef, Html, Selector};

/// Longest value stored for any extracted field
pub const MAX_FIELD_LENGTH: usize = 255;

/// Marker appended to clipped values
const ELLIPSIS: &str = "...";

/// Signals extracted from an HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSummary {
    pub h1: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Extracts the H1, title and meta description from an HTML document
///
/// For each signal the first match in document order wins. Text is taken
/// from all descendant text nodes (tags written inside `<title>` are
/// stripped too), entities are decoded by the HTML parser, and surrounding
/// whitespace is trimmed. Every value then goes through [`clip`].
///
/// # Arguments
///
/// * `html` - The page body, possibly malformed
///
/// # Returns
///
/// A `PageSummary` with `None` for every signal that is absent or empty
///
/// # Example
///
/// ```
/// use page_analyzer::checker::extract;
///
/// let summary = extract("<h1>A</h1><title>B</title>");
/// assert_eq!(summary.h1.as_deref(), Some("A"));
/// assert_eq!(summary.title.as_deref(), Some("B"));
/// assert_eq!(summary.description, None);
/// ```
pub fn extract(html: &str) -> PageSummary {
    let document = Html::parse_document(html);

    PageSummary {
        h1: first_text(&document, "h1").and_then(clip),
        title: first_text(&document, "title")
            .map(|raw| strip_markup(&raw))
            .and_then(clip),
        description: extract_description(&document).and_then(clip),
    }
}

/// Normalizes an extracted value for storage
///
/// Empty (after trimming) becomes `None`; anything longer than 255
/// characters is cut to 252 characters followed by `...`.
pub fn clip(text: String) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if text.chars().count() <= MAX_FIELD_LENGTH {
        return Some(text.to_string());
    }

    let keep = MAX_FIELD_LENGTH - ELLIPSIS.len();
    let mut clipped: String = text.chars().take(keep).collect();
    clipped.push_str(ELLIPSIS);
    Some(clipped)
}

/// Text content of the first element matching `selector`
fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document.select(&selector).next().map(element_text)
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

/// Drops tags from text the HTML parser kept verbatim
///
/// `<title>` content is raw text to the parser, so `<title>A <b>B</b></title>`
/// arrives here as `A <b>B</b>`.
fn strip_markup(raw: &str) -> String {
    if !raw.contains('<') {
        return raw.to_string();
    }
    Html::parse_fragment(raw)
        .root_element()
        .text()
        .collect::<String>()
}

/// `content` of the first `<meta name="description">`, name matched case-insensitively
fn extract_description(document: &Html) -> Option<String> {
    let selector = Selector::parse("meta[name][content]").ok()?;

    document
        .select(&selector)
        .find(|element| {
            element
                .value()
                .attr("name")
                .map(|name| name.trim().eq_ignore_ascii_case("description"))
                .unwrap_or(false)
        })
        .and_then(|element| element.value().attr("content"))
        .map(str::to_string)
}
