//! Image-generation prompts for carousel slides.
//!
//! Every fixed piece of wording lives in a named constant so the template can
//! be read (and diffed) in one place. [`build_prompt`] is a pure function of
//! the slide and the slide count: the same input always yields the same
//! bytes, which keeps dry runs reproducible and makes prompt regressions easy
//! to catch in unit tests.

use crate::slides::SlideRecord;
use serde::Serialize;

/// Visual style shared by every slide.
pub const STYLE_PREAMBLE: &str = "Professional LinkedIn carousel slide, dark navy background (#0a0a0f), \
gold accents (#d4a843), modern minimalist design. ";

/// Watermark, rendering directives and the negative prompt.
pub const TRAILING_CLAUSE: &str = "Bottom watermark: 'attestio.ai'. \
Clean corporate style, high contrast, easy to read on mobile, \
sharp readable text, structured layout. \
--no blurry text, messy layout, cluttered design";

/// Body characters embedded before truncation kicks in.
pub const MAX_BODY_CHARS: usize = 300;

/// Appended to a truncated body.
pub const ELLIPSIS: &str = "...";

/// Body lines rendered into the subtext clause.
pub const MAX_SUBTEXT_LINES: usize = 4;

/// Joins subtext lines.
pub const SUBTEXT_SEPARATOR: &str = " | ";

/// A synthesized prompt, ready to send to the image service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    pub slide_number: usize,
    pub title: String,
    pub prompt_text: String,
}

/// Build the prompt for one slide.
///
/// Layout, in order: style preamble, `Slide n of total.`, the quoted title,
/// an optional `Subtext:` clause, then the trailing clause.
///
/// The body is joined with newlines and cut to [`MAX_BODY_CHARS`] characters
/// (plus [`ELLIPSIS`]) *before* the subtext lines are picked, so the last
/// subtext line can end mid-word.
pub fn build_prompt(slide: &SlideRecord, total_slides: usize) -> String {
    let mut prompt = String::with_capacity(512);
    prompt.push_str(STYLE_PREAMBLE);
    prompt.push_str(&format!("Slide {} of {}. ", slide.number(), total_slides));
    prompt.push_str(&format!("Text reads: '{}'. ", slide.title()));

    if let Some(subtext) = subtext(slide.body()) {
        prompt.push_str(&format!("Subtext: '{subtext}'. "));
    }

    prompt.push_str(TRAILING_CLAUSE);
    prompt
}

/// Build one request per slide, in slide order.
pub fn build_requests(slides: &[SlideRecord]) -> Vec<GenerationRequest> {
    let total = slides.len();
    slides
        .iter()
        .map(|slide| GenerationRequest {
            slide_number: slide.number(),
            title: slide.title().to_string(),
            prompt_text: build_prompt(slide, total),
        })
        .collect()
}

/// Condense the body into the pipe-separated subtext, or `None` when there
/// is nothing to show.
fn subtext(body: &[String]) -> Option<String> {
    let joined = body.join("\n");
    if joined.is_empty() {
        return None;
    }
    let text = truncate_chars(&joined, MAX_BODY_CHARS);

    let lines: Vec<&str> = text
        .split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(MAX_SUBTEXT_LINES)
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join(SUBTEXT_SEPARATOR))
    }
}

/// Keep the first `max` characters, appending [`ELLIPSIS`] if anything was cut.
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], ELLIPSIS),
        None => text.to_string(),
    }
}
