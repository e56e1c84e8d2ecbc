//! Image service client: prompt in, PNG bytes out.
//!
//! Two HTTP calls per slide:
//!
//! 1. `POST {api_base}/v3/generate` with the prompt and the fixed render
//!    parameters; the response lists URLs of the generated images.
//! 2. `GET` the first URL to obtain the raw image bytes.
//!
//! There is no retry. Any non-success status from step 1 becomes
//! [`CarouselError::GenerationServiceError`] carrying a short excerpt of the
//! response body, which is usually enough to spot a bad key or a rejected
//! prompt.

use crate::config::{CarouselConfig, RenderingSpeed};
use crate::error::CarouselError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Characters of an error body kept in [`CarouselError::GenerationServiceError`].
pub const ERROR_EXCERPT_CHARS: usize = 200;

/// Header carrying the credential.
const API_KEY_HEADER: &str = "Api-Key";

#[derive(Debug, Serialize)]
struct GenerateBody<'a> {
    prompt: &'a str,
    aspect_ratio: &'a str,
    model: &'a str,
    rendering_speed: RenderingSpeed,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    data: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    url: Option<String>,
}

/// Thin client over the image generation endpoint.
pub struct IdeogramClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
    aspect_ratio: String,
    rendering_speed: RenderingSpeed,
    generate_timeout_secs: u64,
    download_timeout_secs: u64,
}

impl IdeogramClient {
    /// Build a client from the run configuration and an already-resolved key.
    pub fn new(config: &CarouselConfig, api_key: String) -> Result<Self, CarouselError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("carousel-gen/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CarouselError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_key,
            endpoint: format!("{}/v3/generate", config.api_base.trim_end_matches('/')),
            model: config.model.clone(),
            aspect_ratio: config.aspect_ratio.clone(),
            rendering_speed: config.rendering_speed,
            generate_timeout_secs: config.generate_timeout_secs,
            download_timeout_secs: config.download_timeout_secs,
        })
    }

    /// Generate one image and return its bytes.
    pub async fn generate(&self, prompt: &str) -> Result<Vec<u8>, CarouselError> {
        let url = self.request_image_url(prompt).await?;
        self.fetch_image(&url).await
    }

    /// Step 1: ask the service for an image, return the URL it hands back.
    async fn request_image_url(&self, prompt: &str) -> Result<String, CarouselError> {
        let body = GenerateBody {
            prompt,
            aspect_ratio: &self.aspect_ratio,
            model: &self.model,
            rendering_speed: self.rendering_speed,
        };

        debug!("POST {} ({} char prompt)", self.endpoint, prompt.chars().count());

        let response = self
            .http
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .timeout(Duration::from_secs(self.generate_timeout_secs))
            .json(&body)
            .send()
            .await
            .map_err(|e| CarouselError::from_transport(e, self.generate_timeout_secs))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CarouselError::from_transport(e, self.generate_timeout_secs))?;

        if !status.is_success() {
            return Err(CarouselError::GenerationServiceError {
                status: status.as_u16(),
                excerpt: excerpt(&text, ERROR_EXCERPT_CHARS),
            });
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&text).map_err(|e| CarouselError::MalformedResponse {
                detail: format!("{e}; body: {}", excerpt(&text, ERROR_EXCERPT_CHARS)),
            })?;

        parsed
            .data
            .into_iter()
            .next()
            .and_then(|img| img.url)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| CarouselError::MalformedResponse {
                detail: "response contained no image URL".to_string(),
            })
    }

    /// Step 2: download the generated image.
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, CarouselError> {
        debug!("GET {}", url);

        let download_failed = |reason: String| CarouselError::ImageDownloadFailed {
            url: url.to_string(),
            reason,
        };

        let response = self
            .http
            .get(url)
            .timeout(Duration::from_secs(self.download_timeout_secs))
            .send()
            .await
            .map_err(|e| download_failed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(download_failed(format!("HTTP {}", response.status())));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| download_failed(e.to_string()))?;

        debug!("Downloaded {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }
}

/// First `max` characters of `text`.
fn excerpt(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_shape() {
        let body = GenerateBody {
            prompt: "p",
            aspect_ratio: "1:1",
            model: "V_3",
            rendering_speed: RenderingSpeed::Default,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "prompt": "p",
                "aspect_ratio": "1:1",
                "model": "V_3",
                "rendering_speed": "DEFAULT",
            })
        );
    }

    #[test]
    fn response_parses_first_url() {
        let r: GenerateResponse = serde_json::from_str(
            r#"{"created":"2025-01-01","data":[{"url":"https://img/1.png","seed":1},{"url":"https://img/2.png"}]}"#,
        )
        .unwrap();
        assert_eq!(r.data[0].url.as_deref(), Some("https://img/1.png"));
    }

    #[test]
    fn excerpt_is_char_bounded() {
        let long = "é".repeat(500);
        assert_eq!(excerpt(&long, ERROR_EXCERPT_CHARS).chars().count(), 200);
        assert_eq!(excerpt("short", ERROR_EXCERPT_CHARS), "short");
    }

    #[test]
    fn endpoint_joins_base() {
        let config = CarouselConfig::builder()
            .api_base("http://127.0.0.1:9/")
            .build()
            .unwrap();
        let client = IdeogramClient::new(&config, "k".into()).unwrap();
        assert_eq!(client.endpoint, "http://127.0.0.1:9/v3/generate");
    }
}
