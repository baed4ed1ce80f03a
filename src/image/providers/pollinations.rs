//! Pollinations image generation provider.
//!
//! The endpoint is a plain HTTP GET against a templated URL; there is no
//! job queue to poll and no progress feedback channel. The same URL and
//! seed tend to reproduce an image but the service does not guarantee it.

use crate::error::{AntiGenError, Result};
use crate::image::provider::ImageProvider;
use crate::image::types::{GeneratedImage, GenerationMetadata, GenerationRequest};
use async_trait::async_trait;
use rand::Rng;
use std::time::Instant;
use url::Url;

const DEFAULT_BASE_URL: &str = "https://image.pollinations.ai";

/// Upper bound (exclusive) for auto-chosen seeds.
const SEED_RANGE: u64 = 1_000_000;

/// Builder for [`PollinationsProvider`].
#[derive(Debug, Clone)]
pub struct PollinationsProviderBuilder {
    base_url: String,
}

impl Default for PollinationsProviderBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl PollinationsProviderBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the endpoint base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Builds the provider, validating the base URL.
    pub fn build(self) -> Result<PollinationsProvider> {
        let base_url = Url::parse(&self.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(AntiGenError::Validation(format!(
                "base URL cannot carry a path: {}",
                self.base_url
            )));
        }
        Ok(PollinationsProvider {
            client: reqwest::Client::new(),
            base_url,
        })
    }
}

/// Pollinations image generation provider.
pub struct PollinationsProvider {
    client: reqwest::Client,
    base_url: Url,
}

impl PollinationsProvider {
    /// Creates a new `PollinationsProviderBuilder`.
    pub fn builder() -> PollinationsProviderBuilder {
        PollinationsProviderBuilder::new()
    }

    /// Builds the templated request URL for a prompt and options.
    ///
    /// The prompt travels as a percent-encoded path segment; `nologo=true`
    /// disables the remote logo overlay; `model` is always present, even
    /// for the default; `enhance=true` only when requested.
    fn request_url(&self, request: &GenerationRequest, seed: u64) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| AntiGenError::Validation("base URL cannot carry a path".into()))?
            .pop_if_empty()
            .push("prompt")
            .push(request.prompt_trimmed());

        let (width, height) = request.aspect_ratio.dimensions();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("seed", &seed.to_string())
                .append_pair("width", &width.to_string())
                .append_pair("height", &height.to_string())
                .append_pair("nologo", "true")
                .append_pair("model", &request.model);
            if request.enhance {
                query.append_pair("enhance", "true");
            }
        }
        Ok(url)
    }

    async fn download(&self, url: Url) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AntiGenError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl ImageProvider for PollinationsProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedImage> {
        let start = Instant::now();

        let seed = choose_seed(request);
        let url = self.request_url(request, seed)?;
        tracing::debug!(%url, "requesting image");

        let data = self.download(url).await?;
        tracing::debug!(bytes = data.len(), "payload received");

        GeneratedImage::from_bytes(
            data,
            GenerationMetadata {
                model: Some(request.model.clone()),
                seed: Some(seed),
                duration_ms: Some(start.elapsed().as_millis() as u64),
            },
        )
    }

    fn name(&self) -> &str {
        "Pollinations"
    }

    async fn health_check(&self) -> Result<()> {
        let response = self.client.get(self.base_url.clone()).send().await?;
        let status = response.status();
        if status.is_server_error() {
            return Err(AntiGenError::Api {
                status: status.as_u16(),
                message: "endpoint unavailable".into(),
            });
        }
        Ok(())
    }
}

/// Seed sent to the endpoint: the caller's, or a random one per attempt.
fn choose_seed(request: &GenerationRequest) -> u64 {
    request
        .seed
        .unwrap_or_else(|| rand::thread_rng().gen_range(0..SEED_RANGE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::types::AspectRatio;
    use std::collections::HashMap;

    fn provider() -> PollinationsProvider {
        PollinationsProvider::builder().build().unwrap()
    }

    fn query_map(url: &Url) -> HashMap<String, Vec<String>> {
        let mut map: HashMap<String, Vec<String>> = HashMap::new();
        for (key, value) in url.query_pairs() {
            map.entry(key.into_owned()).or_default().push(value.into_owned());
        }
        map
    }

    #[test]
    fn test_prompt_is_encoded_path_segment() {
        let request = GenerationRequest::new("a red fox");
        let url = provider().request_url(&request, 42).unwrap();
        assert_eq!(url.path(), "/prompt/a%20red%20fox");
    }

    #[test]
    fn test_red_fox_landscape_scenario() {
        let request = GenerationRequest::new("a red fox")
            .with_aspect_ratio(AspectRatio::Landscape)
            .with_model("flux");
        let url = provider().request_url(&request, 42).unwrap();

        assert!(url.as_str().contains("width=1280&height=720"));
        let query = query_map(&url);
        assert_eq!(query["model"], vec!["flux"]);
        assert_eq!(query["nologo"], vec!["true"]);
        assert!(!query.contains_key("enhance"));
    }

    #[test]
    fn test_dimensions_for_every_ratio() {
        for (ratio, width, height) in [
            (AspectRatio::Square, "1024", "1024"),
            (AspectRatio::Landscape, "1280", "720"),
            (AspectRatio::Portrait, "720", "1280"),
            (AspectRatio::Standard, "1024", "768"),
        ] {
            let request = GenerationRequest::new("x").with_aspect_ratio(ratio);
            let url = provider().request_url(&request, 7).unwrap();
            let query = query_map(&url);
            assert_eq!(query["width"], vec![width], "ratio {ratio}");
            assert_eq!(query["height"], vec![height], "ratio {ratio}");
        }
    }

    #[test]
    fn test_model_appears_exactly_once() {
        for model in ["flux", "turbo"] {
            let request = GenerationRequest::new("x").with_model(model);
            let url = provider().request_url(&request, 7).unwrap();
            let query = query_map(&url);
            assert_eq!(query["model"], vec![model]);
        }
    }

    #[test]
    fn test_enhance_only_when_requested() {
        let request = GenerationRequest::new("x").with_enhance(true);
        let url = provider().request_url(&request, 7).unwrap();
        assert_eq!(query_map(&url)["enhance"], vec!["true"]);

        let request = GenerationRequest::new("x");
        let url = provider().request_url(&request, 7).unwrap();
        assert!(!query_map(&url).contains_key("enhance"));
    }

    #[test]
    fn test_seed_selection() {
        let pinned = GenerationRequest::new("x").with_seed(1234);
        assert_eq!(choose_seed(&pinned), 1234);

        let auto = GenerationRequest::new("x");
        for _ in 0..32 {
            assert!(choose_seed(&auto) < SEED_RANGE);
        }
    }

    #[test]
    fn test_base_url_override() {
        let provider = PollinationsProvider::builder()
            .base_url("http://127.0.0.1:9999")
            .build()
            .unwrap();
        let url = provider
            .request_url(&GenerationRequest::new("x"), 7)
            .unwrap();
        assert!(url.as_str().starts_with("http://127.0.0.1:9999/prompt/x"));
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(PollinationsProvider::builder()
            .base_url("not a url")
            .build()
            .is_err());
    }
}
