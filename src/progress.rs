//! Progress-callback trait for per-slide generation events.
//!
//! Inject an [`Arc<dyn GenerationProgressCallback>`] via
//! [`crate::config::CarouselConfigBuilder::progress_callback`] to be told
//! as each slide is requested, saved, or fails.
//!
//! # Example
//!
//! ```rust
//! use carousel_gen::{CarouselConfig, GenerationProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     saved: AtomicUsize,
//! }
//!
//! impl GenerationProgressCallback for CountingCallback {
//!     fn on_slide_complete(&self, slide_num: usize, total_slides: usize, bytes: usize) {
//!         let done = self.saved.fetch_add(1, Ordering::SeqCst) + 1;
//!         eprintln!("{done}: slide {slide_num}/{total_slides} ({bytes} bytes)");
//!     }
//! }
//!
//! let cb = Arc::new(CountingCallback { saved: AtomicUsize::new(0) });
//! let config = CarouselConfig::builder()
//!     .progress_callback(cb as Arc<dyn GenerationProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the generation pipeline as it works through the slides.
///
/// Slides are processed one at a time, so calls never overlap, but the trait
/// is `Send + Sync` so a callback can live inside a shared config. All
/// methods default to no-ops.
pub trait GenerationProgressCallback: Send + Sync {
    /// Called once, before the first request.
    fn on_run_start(&self, total_slides: usize) {
        let _ = total_slides;
    }

    /// Called just before the generate request for a slide is sent.
    ///
    /// # Arguments
    /// * `slide_num`    - 1-indexed slide number
    /// * `total_slides` - slides in this run
    /// * `title`        - the slide's title
    fn on_slide_start(&self, slide_num: usize, total_slides: usize, title: &str) {
        let _ = (slide_num, total_slides, title);
    }

    /// Called after a slide image has been written to disk.
    fn on_slide_complete(&self, slide_num: usize, total_slides: usize, bytes: usize) {
        let _ = (slide_num, total_slides, bytes);
    }

    /// Called when a slide fails. The run stops right after.
    fn on_slide_error(&self, slide_num: usize, total_slides: usize, error: &str) {
        let _ = (slide_num, total_slides, error);
    }

    /// Called once after the PDF has been assembled.
    fn on_run_complete(&self, total_slides: usize) {
        let _ = total_slides;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl GenerationProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::CarouselConfig`].
pub type ProgressCallback = Arc<dyn GenerationProgressCallback>;
