//! Configuration types for carousel generation.
//!
//! Every knob of a run lives in [`CarouselConfig`], built via its
//! [`CarouselConfigBuilder`]. The extractor and prompt synthesizer take no
//! configuration at all; everything here concerns the image service, the
//! pacing between requests and where output lands.

use crate::error::CarouselError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Environment variable holding the image service credential.
pub const API_KEY_ENV: &str = "IDEOGRAM_API_KEY";

/// Default image service endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.ideogram.ai";

/// Configuration for a carousel run.
///
/// Built via [`CarouselConfig::builder()`] or using
/// [`CarouselConfig::default()`].
///
/// # Example
/// ```rust
/// use carousel_gen::CarouselConfig;
///
/// let config = CarouselConfig::builder()
///     .output_dir("build/carousel")
///     .request_delay_ms(500)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct CarouselConfig {
    /// Directory receiving `slide-NN.png` and `carousel.pdf`. Default: `./output`.
    pub output_dir: PathBuf,

    /// Image service credential. When `None`, [`API_KEY_ENV`] is read at the
    /// start of a non-dry run.
    pub api_key: Option<String>,

    /// Base URL of the image service. Default: [`DEFAULT_API_BASE`].
    ///
    /// Point this at a local mock server in tests.
    pub api_base: String,

    /// Model identifier sent with every request. Default: `V_3`.
    pub model: String,

    /// Aspect ratio sent with every request. Default: `1:1`.
    pub aspect_ratio: String,

    /// Rendering speed mode. Default: [`RenderingSpeed::Default`].
    pub rendering_speed: RenderingSpeed,

    /// Pause between consecutive slide requests, in milliseconds. Default: 2000.
    ///
    /// A politeness delay, not a backoff: it is applied after every slide
    /// except the last, whether or not the service is under load.
    pub request_delay_ms: u64,

    /// Timeout for the generate call in seconds. Default: 120.
    pub generate_timeout_secs: u64,

    /// Timeout for fetching the generated image in seconds. Default: 60.
    pub download_timeout_secs: u64,

    /// Optional per-slide progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./output"),
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            model: "V_3".to_string(),
            aspect_ratio: "1:1".to_string(),
            rendering_speed: RenderingSpeed::default(),
            request_delay_ms: 2000,
            generate_timeout_secs: 120,
            download_timeout_secs: 60,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for CarouselConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CarouselConfig")
            .field("output_dir", &self.output_dir)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("aspect_ratio", &self.aspect_ratio)
            .field("rendering_speed", &self.rendering_speed)
            .field("request_delay_ms", &self.request_delay_ms)
            .field("generate_timeout_secs", &self.generate_timeout_secs)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn GenerationProgressCallback>"),
            )
            .finish()
    }
}

impl CarouselConfig {
    /// Create a new builder for `CarouselConfig`.
    pub fn builder() -> CarouselConfigBuilder {
        CarouselConfigBuilder {
            config: Self::default(),
        }
    }

    /// The explicit key, or the environment variable.
    ///
    /// # Errors
    /// [`CarouselError::CredentialMissing`] when neither is set (or both are empty).
    pub fn resolve_api_key(&self) -> Result<String, CarouselError> {
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.is_empty()) {
            return Ok(key.to_string());
        }
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.is_empty() => Ok(key),
            _ => Err(CarouselError::CredentialMissing {
                var: API_KEY_ENV.to_string(),
            }),
        }
    }
}

/// Builder for [`CarouselConfig`].
#[derive(Debug)]
pub struct CarouselConfigBuilder {
    config: CarouselConfig,
}

impl CarouselConfigBuilder {
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn api_base(mut self, url: impl Into<String>) -> Self {
        self.config.api_base = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn aspect_ratio(mut self, ratio: impl Into<String>) -> Self {
        self.config.aspect_ratio = ratio.into();
        self
    }

    pub fn rendering_speed(mut self, speed: RenderingSpeed) -> Self {
        self.config.rendering_speed = speed;
        self
    }

    pub fn request_delay_ms(mut self, ms: u64) -> Self {
        self.config.request_delay_ms = ms;
        self
    }

    pub fn generate_timeout_secs(mut self, secs: u64) -> Self {
        self.config.generate_timeout_secs = secs;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    /// Attach a progress callback invoked once per slide.
    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<CarouselConfig, CarouselError> {
        let c = &self.config;
        if !(c.api_base.starts_with("http://") || c.api_base.starts_with("https://")) {
            return Err(CarouselError::InvalidConfig(format!(
                "API base must be an HTTP/HTTPS URL, got '{}'",
                c.api_base
            )));
        }
        if c.model.trim().is_empty() {
            return Err(CarouselError::InvalidConfig("Model must not be empty".into()));
        }
        if c.generate_timeout_secs == 0 || c.download_timeout_secs == 0 {
            return Err(CarouselError::InvalidConfig(
                "Timeouts must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Rendering speed mode of the image service.
///
/// Serialised in the service's upper-case wire form (`TURBO`, `DEFAULT`,
/// `QUALITY`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RenderingSpeed {
    /// Fastest, lowest fidelity.
    Turbo,
    /// Balanced (default).
    #[default]
    Default,
    /// Slowest, best text rendering.
    Quality,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = CarouselConfig::default();
        assert_eq!(c.output_dir, PathBuf::from("./output"));
        assert_eq!(c.model, "V_3");
        assert_eq!(c.aspect_ratio, "1:1");
        assert_eq!(c.rendering_speed, RenderingSpeed::Default);
        assert_eq!(c.request_delay_ms, 2000);
        assert_eq!(c.generate_timeout_secs, 120);
        assert_eq!(c.download_timeout_secs, 60);
    }

    #[test]
    fn builder_trims_trailing_slash() {
        let c = CarouselConfig::builder()
            .api_base("http://localhost:8080/")
            .build()
            .unwrap();
        assert_eq!(c.api_base, "http://localhost:8080");
    }

    #[test]
    fn builder_rejects_bad_base() {
        let err = CarouselConfig::builder().api_base("ftp://x").build().unwrap_err();
        assert!(matches!(err, CarouselError::InvalidConfig(_)));
    }

    #[test]
    fn builder_rejects_zero_timeout() {
        let err = CarouselConfig::builder()
            .generate_timeout_secs(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, CarouselError::InvalidConfig(_)));
    }

    #[test]
    fn explicit_key_wins() {
        let c = CarouselConfig::builder().api_key("k-123").build().unwrap();
        assert_eq!(c.resolve_api_key().unwrap(), "k-123");
    }

    #[test]
    fn debug_redacts_key() {
        let c = CarouselConfig::builder().api_key("secret").build().unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("secret"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn rendering_speed_wire_form() {
        assert_eq!(
            serde_json::to_string(&RenderingSpeed::Quality).unwrap(),
            "\"QUALITY\""
        );
        assert_eq!(
            serde_json::to_string(&RenderingSpeed::default()).unwrap(),
            "\"DEFAULT\""
        );
    }
}
