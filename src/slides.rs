//! Slide extraction: carousel markdown → ordered [`SlideRecord`]s.
//!
//! ## Document shape
//!
//! ```text
//! # Anything before the section is ignored
//!
//! ## CAROUSEL SLIDES
//!
//! ### Slide 1 — Hook
//! **Stop guessing**
//! **start measuring**
//! Most teams *never* audit their controls.
//! ---
//! ### Slide 2
//! ...
//! ```
//!
//! Everything after `## CAROUSEL SLIDES` is the slide region. Each
//! `### Slide N` line opens a block; the block runs until the next sub-heading
//! or the end of the document. Whole-line `**bold**` lines become the title
//! (at most two fragments), every other content line is body text.
//!
//! The heuristics are intentionally shallow. Nested markdown is not
//! understood, only flattened.

use crate::error::CarouselError;
use crate::pipeline::input;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Heading that opens the slide region.
pub const SECTION_HEADER: &str = "## CAROUSEL SLIDES";

/// Body lines kept per slide; the rest of the block is dropped.
pub const MAX_BODY_LINES: usize = 6;

/// Whole-line bold fragments that can form a title.
pub const MAX_TITLE_FRAGMENTS: usize = 2;

/// Horizontal rule between slides; carries no content.
const SEPARATOR: &str = "---";

static RE_SECTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)## CAROUSEL SLIDES\s*\n(.*)").unwrap());

static RE_SLIDE_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^###\s+Slide\s+\d+[^\n]*\n?").unwrap());

static RE_TITLE_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\*\*(.+?)\*\*$").unwrap());

static RE_INLINE_BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());

static RE_INLINE_ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.+?)\*").unwrap());

/// One slide of the carousel as extracted from the markdown.
///
/// Immutable once built. `number` is 1-based and matches the record's
/// position in the vector returned by [`extract_slides`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlideRecord {
    number: usize,
    title: String,
    body: Vec<String>,
}

impl SlideRecord {
    /// Build a record directly.
    ///
    /// An empty title falls back to `"Slide {number}"` and the body is capped
    /// at [`MAX_BODY_LINES`], so records built here obey the same invariants
    /// as extracted ones.
    pub fn new(number: usize, title: impl Into<String>, mut body: Vec<String>) -> Self {
        let title = title.into();
        let title = if title.trim().is_empty() {
            placeholder_title(number)
        } else {
            title
        };
        body.truncate(MAX_BODY_LINES);
        Self {
            number,
            title,
            body,
        }
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &[String] {
        &self.body
    }
}

/// Read a markdown file and extract its slides.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<SlideRecord>, CarouselError> {
    let text = input::read_document(path.as_ref())?;
    extract_slides(&text)
}

/// Extract the ordered slide records from a carousel document.
///
/// # Errors
/// [`CarouselError::MissingSlideSection`] when the document has no
/// `## CAROUSEL SLIDES` heading. A section with no slide blocks is not an
/// error; it yields an empty vector.
pub fn extract_slides(text: &str) -> Result<Vec<SlideRecord>, CarouselError> {
    let region = RE_SECTION
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or(CarouselError::MissingSlideSection)?;

    // The first segment is whatever sits between the section header and the
    // first sub-heading; it is not a slide.
    let blocks = RE_SLIDE_HEADING
        .split(region)
        .skip(1)
        .map(str::trim)
        .filter(|b| !b.is_empty());

    let mut slides = Vec::new();
    for block in blocks {
        let number = slides.len() + 1;
        if let Some(slide) = parse_block(number, block) {
            slides.push(slide);
        }
    }

    debug!("Extracted {} slides", slides.len());
    Ok(slides)
}

/// Classify the lines of one block. `None` when the block holds nothing but
/// separators and blank lines; any other line, even one that cleans down to
/// nothing, keeps the slide.
fn parse_block(number: usize, block: &str) -> Option<SlideRecord> {
    let mut title_parts: Vec<&str> = Vec::with_capacity(MAX_TITLE_FRAGMENTS);
    let mut body: Vec<String> = Vec::new();
    let mut has_content = false;

    for line in block.lines() {
        let stripped = line.trim();
        if stripped.is_empty() || stripped == SEPARATOR {
            continue;
        }
        has_content = true;

        if title_parts.len() < MAX_TITLE_FRAGMENTS {
            if let Some(caps) = RE_TITLE_LINE.captures(stripped) {
                if let Some(inner) = caps.get(1) {
                    title_parts.push(inner.as_str());
                    continue;
                }
            }
        }

        let cleaned = clean_body_line(stripped);
        if !cleaned.is_empty() {
            body.push(cleaned);
        }
    }

    if !has_content {
        return None;
    }

    let title = if title_parts.is_empty() {
        placeholder_title(number)
    } else {
        title_parts.join(" ")
    };
    body.truncate(MAX_BODY_LINES);

    Some(SlideRecord {
        number,
        title,
        body,
    })
}

/// Strip outer `*` runs, then unwrap inline `**bold**` and `*italic*`.
fn clean_body_line(line: &str) -> String {
    let outer = line.trim_start_matches('*').trim_end_matches('*').trim();
    let unbolded = RE_INLINE_BOLD.replace_all(outer, "$1");
    RE_INLINE_ITALIC.replace_all(&unbolded, "$1").into_owned()
}

fn placeholder_title(number: usize) -> String {
    format!("Slide {number}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(slides: &str) -> String {
        format!("# Carousel brief\n\nSome intro.\n\n{SECTION_HEADER}\n\n{slides}")
    }

    #[test]
    fn two_slide_example() {
        let text = "## CAROUSEL SLIDES\n### Slide 1\n**Hello World**\nSome body text\n---\n### Slide 2\n**Second**\n**Sub**\nMore text";
        let slides = extract_slides(text).unwrap();

        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0], SlideRecord::new(1, "Hello World", vec!["Some body text".into()]));
        assert_eq!(slides[1], SlideRecord::new(2, "Second Sub", vec!["More text".into()]));
    }

    #[test]
    fn missing_section_is_an_error() {
        let err = extract_slides("### Slide 1\n**Title**\n").unwrap_err();
        assert!(matches!(err, CarouselError::MissingSlideSection));
    }

    #[test]
    fn header_at_end_of_file_without_newline_is_missing() {
        let err = extract_slides("intro\n## CAROUSEL SLIDES").unwrap_err();
        assert!(matches!(err, CarouselError::MissingSlideSection));
    }

    #[test]
    fn section_without_blocks_yields_nothing() {
        let slides = extract_slides(&doc("Nothing here yet.\n")).unwrap();
        assert!(slides.is_empty());
    }

    #[test]
    fn text_before_first_heading_is_ignored() {
        let slides = extract_slides(&doc("Draft notes\n### Slide 1\n**Only**\n")).unwrap();
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].title(), "Only");
    }

    #[test]
    fn untitled_slide_gets_placeholder() {
        let slides = extract_slides(&doc("### Slide 1\n**A**\n### Slide 2\njust words\n")).unwrap();
        assert_eq!(slides[1].title(), "Slide 2");
        assert_eq!(slides[1].body(), ["just words"]);
    }

    #[test]
    fn third_bold_line_is_body() {
        let slides =
            extract_slides(&doc("### Slide 1\n**One**\n**Two**\n**Three**\ntail\n")).unwrap();
        assert_eq!(slides[0].title(), "One Two");
        assert_eq!(slides[0].body(), ["Three", "tail"]);
    }

    #[test]
    fn body_is_capped() {
        let lines: String = (1..=10).map(|i| format!("line {i}\n")).collect();
        let slides = extract_slides(&doc(&format!("### Slide 1\n{lines}"))).unwrap();
        assert_eq!(slides[0].body().len(), MAX_BODY_LINES);
        assert_eq!(slides[0].body()[5], "line 6");
    }

    #[test]
    fn empty_blocks_do_not_consume_numbers() {
        let text = doc("### Slide 1\n**A**\n### Slide 2\n---\n\n### Slide 3\n**C**\n");
        let slides = extract_slides(&text).unwrap();
        let numbers: Vec<usize> = slides.iter().map(SlideRecord::number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(slides[1].title(), "C");
    }

    #[test]
    fn rule_only_block_is_a_placeholder_slide() {
        let text = doc("### Slide 1\n**A**\n### Slide 2\n***\n### Slide 3\n**C**\n");
        let slides = extract_slides(&text).unwrap();
        let titles: Vec<&str> = slides.iter().map(SlideRecord::title).collect();
        assert_eq!(titles, vec!["A", "Slide 2", "C"]);
        assert!(slides[1].body().is_empty());
        assert_eq!(slides[2].number(), 3);
    }

    #[test]
    fn stray_asterisks_keep_the_slide() {
        for stray in ["**", "*"] {
            let text = doc(&format!("### Slide 1\n{stray}\n"));
            let slides = extract_slides(&text).unwrap();
            assert_eq!(slides.len(), 1, "block {stray:?}");
            assert_eq!(slides[0].title(), "Slide 1");
            assert!(slides[0].body().is_empty());
        }
    }

    #[test]
    fn emphasis_is_stripped_from_body() {
        let slides = extract_slides(&doc(
            "### Slide 1\n**T**\n* bullet point\nKeep **this** and *that* plain\n***\n",
        ))
        .unwrap();
        assert_eq!(
            slides[0].body(),
            ["bullet point", "Keep this and that plain"]
        );
    }

    #[test]
    fn heading_text_after_number_is_ignored() {
        let slides =
            extract_slides(&doc("### Slide 1 — The Hook\n**Hook**\n### Slide 2: Close\nbye\n"))
                .unwrap();
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0].title(), "Hook");
        assert_eq!(slides[1].body(), ["bye"]);
    }

    #[test]
    fn crlf_documents_parse() {
        let text = "## CAROUSEL SLIDES\r\n### Slide 1\r\n**Hi**\r\nbody\r\n";
        let slides = extract_slides(text).unwrap();
        assert_eq!(slides[0].title(), "Hi");
        assert_eq!(slides[0].body(), ["body"]);
    }

    #[test]
    fn new_applies_invariants() {
        let body = (0..9).map(|i| i.to_string()).collect();
        let slide = SlideRecord::new(4, "  ", body);
        assert_eq!(slide.title(), "Slide 4");
        assert_eq!(slide.body().len(), MAX_BODY_LINES);
    }
}
