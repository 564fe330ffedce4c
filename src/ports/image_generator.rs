//! Image generator port for the remote image generation API.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::MandalaError;

/// A request to generate one mandala image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The trimmed, non-empty inspiration word.
    pub word: String,
    /// The full prompt built from the word.
    pub prompt: String,
}

/// The service's pointer to a generated image. A second fetch is
/// required to obtain the bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageLocator {
    /// URL of the generated image.
    pub url: String,
}

/// Boxed future type returned by [`ImageGenerator::generate`].
pub type GenerateFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ImageLocator, MandalaError>> + Send + 'a>>;

/// Requests image generation from an external API and returns a locator.
pub trait ImageGenerator: Send + Sync {
    /// Generate one image for the given request.
    fn generate(&self, request: &GenerationRequest) -> GenerateFuture<'_>;
}
