//! Error types for the carousel-gen library.
//!
//! Every failure in a carousel run is fatal: there is no retry and no
//! partial-result suppression. A single enum, [`CarouselError`], covers the
//! whole pipeline and is returned from the top-level `plan`/`generate`
//! functions.
//!
//! When a failure happens mid-run, slide images that were already saved stay
//! on disk; the error is the only thing the caller receives.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the carousel-gen library.
#[derive(Debug, Error)]
pub enum CarouselError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Source markdown was not found at the given path.
    #[error("Markdown file not found: '{path}'\nCheck the path exists and is readable.")]
    InputNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists but is not valid UTF-8 text.
    #[error("File '{path}' is not valid UTF-8 text")]
    InvalidEncoding { path: PathBuf },

    /// The path exists but could not be read as a file (a directory, an I/O
    /// fault, ...).
    #[error("Failed to read '{path}': {source}")]
    InputReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Parse errors ──────────────────────────────────────────────────────
    /// The document has no `## CAROUSEL SLIDES` section.
    #[error("missing slide section: could not find '## CAROUSEL SLIDES' in the markdown")]
    MissingSlideSection,

    // ── Generation service errors ─────────────────────────────────────────
    /// The API credential is not set and this is not a dry run.
    #[error("{var} environment variable not set.\nExport it or pass --dry-run to preview prompts.")]
    CredentialMissing { var: String },

    /// The image service answered with a non-success status.
    #[error("Image service error {status}: {excerpt}")]
    GenerationServiceError { status: u16, excerpt: String },

    /// The image service answered 2xx but the body had no usable image URL.
    #[error("Malformed image service response: {detail}")]
    MalformedResponse { detail: String },

    /// Fetching the generated image from its URL failed.
    #[error("Failed to download generated image '{url}': {reason}")]
    ImageDownloadFailed { url: String, reason: String },

    /// The request never produced an HTTP response (DNS, TLS, connection reset).
    #[error("Request to image service failed: {reason}")]
    RequestFailed { reason: String },

    /// The request exceeded its timeout.
    #[error("Image service request timed out after {secs}s")]
    Timeout { secs: u64 },

    // ── Output errors ─────────────────────────────────────────────────────
    /// A downloaded slide could not be decoded as an image.
    #[error("Slide {slide}: image could not be decoded: {detail}")]
    ImageDecodeFailed { slide: usize, detail: String },

    /// lopdf refused to build or serialise the document.
    #[error("PDF assembly failed: {0}")]
    PdfAssemblyFailed(String),

    /// Could not create or write a file in the output directory.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CarouselError {
    /// Map a reqwest transport error onto the taxonomy.
    pub(crate) fn from_transport(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            CarouselError::Timeout { secs: timeout_secs }
        } else {
            CarouselError::RequestFailed {
                reason: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_section_display() {
        let msg = CarouselError::MissingSlideSection.to_string();
        assert!(msg.contains("missing slide section"), "got: {msg}");
        assert!(msg.contains("## CAROUSEL SLIDES"));
    }

    #[test]
    fn service_error_display() {
        let e = CarouselError::GenerationServiceError {
            status: 401,
            excerpt: "invalid api key".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("401"));
        assert!(msg.contains("invalid api key"));
    }

    #[test]
    fn credential_missing_names_variable() {
        let e = CarouselError::CredentialMissing {
            var: "IDEOGRAM_API_KEY".into(),
        };
        assert!(e.to_string().starts_with("IDEOGRAM_API_KEY"));
    }

    #[test]
    fn input_read_failed_carries_io_error() {
        use std::error::Error as _;
        let e = CarouselError::InputReadFailed {
            path: PathBuf::from("slides/"),
            source: std::io::Error::other("is a directory"),
        };
        let msg = e.to_string();
        assert!(msg.contains("slides/"));
        assert!(msg.contains("is a directory"));
        assert!(!msg.contains("not found"));
        assert!(e.source().is_some());
    }

    #[test]
    fn input_not_found_display() {
        let e = CarouselError::InputNotFound {
            path: PathBuf::from("nope.md"),
        };
        assert!(e.to_string().contains("nope.md"));
    }
}
