//! Run orchestration: markdown in, slide images and a PDF out.
//!
//! [`plan`] is the offline half (read, extract, synthesize) and is all a dry
//! run needs. [`generate`] adds the online half: it checks the credential
//! before any network activity, then requests slides strictly in order, one
//! at a time, with a fixed pause between them, and finally assembles the PDF.
//!
//! Any failure stops the run. Slides saved before the failure stay on disk.

use crate::config::CarouselConfig;
use crate::error::CarouselError;
use crate::output::{CarouselOutput, CarouselPlan, GenerationStats, SlideResult};
use crate::pipeline::assemble::{self, PDF_FILE_NAME};
use crate::pipeline::ideogram::IdeogramClient;
use crate::prompts::{self, GenerationRequest};
use crate::slides;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

/// Read `input`, extract its slides and build every prompt.
///
/// Needs no credential and performs no network or file writes.
///
/// # Errors
/// - [`CarouselError::InputNotFound`] and friends when the file can't be read
/// - [`CarouselError::MissingSlideSection`] when the markdown lacks the section
pub fn plan(input: impl AsRef<Path>) -> Result<CarouselPlan, CarouselError> {
    let source = input.as_ref();
    let slides = slides::parse_file(source)?;
    debug!("Parsed {} slides from {}", slides.len(), source.display());

    let requests = prompts::build_requests(&slides);
    Ok(CarouselPlan {
        source: source.to_path_buf(),
        slides,
        requests,
    })
}

/// Plan and generate in one call.
///
/// # Example
/// ```rust,no_run
/// use carousel_gen::{generate, CarouselConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     // Key read from IDEOGRAM_API_KEY
///     let config = CarouselConfig::default();
///     let output = generate("carousel.md", &config).await?;
///     println!("{:?}", output.pdf_path);
///     Ok(())
/// }
/// ```
pub async fn generate(
    input: impl AsRef<Path>,
    config: &CarouselConfig,
) -> Result<CarouselOutput, CarouselError> {
    let plan = plan(input)?;
    generate_plan(&plan, config).await
}

/// Generate every slide of an existing plan and assemble the PDF.
///
/// # Errors
/// - [`CarouselError::CredentialMissing`] before any request is made
/// - [`CarouselError::GenerationServiceError`] (and other service errors) for
///   the first slide that fails; no later slide is attempted
/// - [`CarouselError::OutputWriteFailed`] / [`CarouselError::PdfAssemblyFailed`]
pub async fn generate_plan(
    plan: &CarouselPlan,
    config: &CarouselConfig,
) -> Result<CarouselOutput, CarouselError> {
    let total_start = Instant::now();

    // ── Step 1: Credential ───────────────────────────────────────────────
    let api_key = config.resolve_api_key()?;
    let client = IdeogramClient::new(config, api_key)?;

    // ── Step 2: Output directory ─────────────────────────────────────────
    let output_dir = &config.output_dir;
    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|e| CarouselError::OutputWriteFailed {
            path: output_dir.clone(),
            source: e,
        })?;

    let total = plan.requests.len();
    if total == 0 {
        warn!(
            "No slides found under the section in {}; nothing to generate",
            plan.source.display()
        );
        return Ok(CarouselOutput {
            slides: Vec::new(),
            pdf_path: None,
            stats: GenerationStats {
                total_duration_ms: total_start.elapsed().as_millis() as u64,
                ..GenerationStats::default()
            },
        });
    }

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_start(total);
    }

    // ── Step 3: Generate slides, strictly in order ───────────────────────
    let generation_start = Instant::now();
    let mut results: Vec<SlideResult> = Vec::with_capacity(total);
    let mut images: Vec<Vec<u8>> = Vec::with_capacity(total);
    let delay = Duration::from_millis(config.request_delay_ms);

    for (idx, request) in plan.requests.iter().enumerate() {
        let number = request.slide_number;
        info!("Generating slide {}/{}: {}", number, total, request.title);
        if let Some(ref cb) = config.progress_callback {
            cb.on_slide_start(number, total, &request.title);
        }

        let slide_start = Instant::now();
        let (path, bytes) = match generate_slide(&client, output_dir, request).await {
            Ok(saved) => saved,
            Err(e) => {
                if let Some(ref cb) = config.progress_callback {
                    cb.on_slide_error(number, total, &e.to_string());
                }
                return Err(e);
            }
        };
        info!("Saved: {}", path.display());

        if let Some(ref cb) = config.progress_callback {
            cb.on_slide_complete(number, total, bytes.len());
        }

        results.push(SlideResult {
            number,
            title: request.title.clone(),
            path,
            bytes: bytes.len(),
            duration_ms: slide_start.elapsed().as_millis() as u64,
        });
        images.push(bytes);

        if idx + 1 < total && !delay.is_zero() {
            debug!("Waiting {}ms before the next slide", delay.as_millis());
            sleep(delay).await;
        }
    }
    let generation_duration_ms = generation_start.elapsed().as_millis() as u64;

    // ── Step 4: Assemble PDF ─────────────────────────────────────────────
    let assembly_start = Instant::now();
    let pdf_path = output_dir.join(PDF_FILE_NAME);
    let bytes_written = images.iter().map(|b| b.len() as u64).sum();
    assemble::write_pdf(images, &pdf_path).await?;
    let assembly_duration_ms = assembly_start.elapsed().as_millis() as u64;
    info!("PDF created: {}", pdf_path.display());

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_complete(total);
    }

    Ok(CarouselOutput {
        slides: results,
        pdf_path: Some(pdf_path),
        stats: GenerationStats {
            total_slides: total,
            bytes_written,
            generation_duration_ms,
            assembly_duration_ms,
            total_duration_ms: total_start.elapsed().as_millis() as u64,
        },
    })
}

/// Synchronous wrapper around [`generate`].
///
/// Creates a temporary tokio runtime internally.
pub fn generate_sync(
    input: impl AsRef<Path>,
    config: &CarouselConfig,
) -> Result<CarouselOutput, CarouselError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| CarouselError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(generate(input, config))
}

/// Generate, download and save one slide.
async fn generate_slide(
    client: &IdeogramClient,
    output_dir: &Path,
    request: &GenerationRequest,
) -> Result<(PathBuf, Vec<u8>), CarouselError> {
    let bytes = client.generate(&request.prompt_text).await?;
    let path = assemble::save_slide(output_dir, request.slide_number, &bytes).await?;
    Ok((path, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DOC: &str = "## CAROUSEL SLIDES\n### Slide 1\n**Hello World**\nSome body text\n---\n### Slide 2\n**Second**\n**Sub**\nMore text";

    #[test]
    fn plan_builds_one_request_per_slide() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(DOC.as_bytes()).unwrap();

        let plan = plan(f.path()).unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.requests[0].slide_number, 1);
        assert!(plan.requests[1].prompt_text.contains("Slide 2 of 2."));
        assert!(plan.requests[1].prompt_text.contains("Text reads: 'Second Sub'."));
    }

    #[test]
    fn plan_reports_missing_file() {
        let err = plan("no/such/carousel.md").unwrap_err();
        assert!(matches!(err, CarouselError::InputNotFound { .. }));
    }
}
