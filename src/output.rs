//! Result types returned by [`crate::generate`].

use crate::prompts::GenerationRequest;
use crate::slides::SlideRecord;
use serde::Serialize;
use std::path::PathBuf;

/// Everything a run will send, computed without touching the network.
///
/// Returned by [`crate::generate::plan`] and printed by `--dry-run`.
#[derive(Debug, Clone, Serialize)]
pub struct CarouselPlan {
    /// The markdown file the slides came from.
    pub source: PathBuf,
    /// Extracted slides, numbered 1..N.
    pub slides: Vec<SlideRecord>,
    /// One prompt per slide, same order.
    pub requests: Vec<GenerationRequest>,
}

impl CarouselPlan {
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

/// One slide that was generated and saved.
#[derive(Debug, Clone, Serialize)]
pub struct SlideResult {
    pub number: usize,
    pub title: String,
    /// Where `slide-NN.png` was written.
    pub path: PathBuf,
    /// Size of the image as downloaded.
    pub bytes: usize,
    /// Wall time for generate + download + save.
    pub duration_ms: u64,
}

/// Timing and size totals for a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationStats {
    pub total_slides: usize,
    pub bytes_written: u64,
    pub generation_duration_ms: u64,
    pub assembly_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// The outcome of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct CarouselOutput {
    pub slides: Vec<SlideResult>,
    /// `carousel.pdf`, or `None` when the document had no slides.
    pub pdf_path: Option<PathBuf>,
    pub stats: GenerationStats,
}
