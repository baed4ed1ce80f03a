//! Image provider trait.

use crate::error::Result;
use crate::image::types::{GeneratedImage, GenerationRequest};
use async_trait::async_trait;

/// Trait for image generation providers.
///
/// The session orchestrates lifecycle and timeout around this seam; a
/// provider only turns a request into an image payload. Failures are
/// terminal for the attempt; retrying is left to the user.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Generates an image from the given request.
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedImage>;

    /// Returns the name of this provider for display.
    fn name(&self) -> &str;

    /// Checks if the provider is reachable.
    async fn health_check(&self) -> Result<()>;
}
