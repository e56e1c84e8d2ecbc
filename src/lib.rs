//! # carousel-gen
//!
//! Turn a carousel brief written in markdown into generated slide images and
//! one PDF ready for upload.
//!
//! ## Pipeline Overview
//!
//! ```text
//! carousel.md
//!  │
//!  ├─ 1. Extract   "## CAROUSEL SLIDES" → ### Slide N blocks → SlideRecord
//!  ├─ 2. Prompt    one deterministic image prompt per slide
//!  ├─ 3. Generate  Ideogram v3, one request at a time, 2 s apart
//!  ├─ 4. Save      output/slide-NN.png
//!  └─ 5. Assemble  output/carousel.pdf, one full-bleed page per slide
//! ```
//!
//! Steps 1–2 are pure and need no credential; they are all `--dry-run` does.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use carousel_gen::{generate, plan, CarouselConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Preview the prompts
//!     for req in plan("carousel.md")?.requests {
//!         println!("{}: {}", req.slide_number, req.prompt_text);
//!     }
//!
//!     // Generate for real (reads IDEOGRAM_API_KEY)
//!     let config = CarouselConfig::builder().output_dir("output").build()?;
//!     let output = generate("carousel.md", &config).await?;
//!     eprintln!("{} slides → {:?}", output.stats.total_slides, output.pdf_path);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `carousel` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod generate;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod slides;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{CarouselConfig, CarouselConfigBuilder, RenderingSpeed, API_KEY_ENV};
pub use error::CarouselError;
pub use generate::{generate, generate_plan, generate_sync, plan};
pub use output::{CarouselOutput, CarouselPlan, GenerationStats, SlideResult};
pub use progress::{GenerationProgressCallback, NoopProgressCallback, ProgressCallback};
pub use prompts::{build_prompt, build_requests, GenerationRequest};
pub use slides::{extract_slides, parse_file, SlideRecord};
