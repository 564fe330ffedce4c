//! Live adapter for the `OpenAI` image generation API.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::error::{from_reqwest, MandalaError};
use crate::ports::image_generator::{
    GenerateFuture, GenerationRequest, ImageGenerator, ImageLocator,
};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/images/generations";

/// Generation parameters are fixed: one square standard-quality render.
const MODEL: &str = "dall-e-3";
const SIZE: &str = "1024x1024";
const QUALITY: &str = "standard";

/// Renders can take a while; the deadline bounds the whole request.
const GENERATE_TIMEOUT: Duration = Duration::from_secs(120);

/// Live `OpenAI` image generator that calls the `OpenAI` Images API.
pub struct OpenAiGenerator {
    client: Client,
    api_key: String,
}

impl OpenAiGenerator {
    /// Create a new `OpenAI` generator with the given API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(api_key: String) -> Result<Self, MandalaError> {
        let client = Client::builder()
            .timeout(GENERATE_TIMEOUT)
            .build()
            .map_err(MandalaError::Network)?;
        Ok(Self { client, api_key })
    }
}

impl ImageGenerator for OpenAiGenerator {
    fn generate(&self, request: &GenerationRequest) -> GenerateFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let body = serde_json::json!({
                "model": MODEL,
                "prompt": request.prompt,
                "n": 1,
                "size": SIZE,
                "quality": QUALITY,
                "response_format": "url",
            });

            let response = self
                .client
                .post(OPENAI_API_URL)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .json(&body)
                .send()
                .await
                .map_err(|e| from_reqwest(e, "image generation request"))?;

            let status = response.status();
            let response_text = response
                .text()
                .await
                .map_err(|e| from_reqwest(e, "image generation response"))?;

            if !status.is_success() {
                return Err(MandalaError::Api { status: status.as_u16(), message: response_text });
            }

            let parsed: OpenAiResponse = serde_json::from_str(&response_text).map_err(|e| {
                MandalaError::Api { status: 200, message: format!("Failed to parse response: {e}") }
            })?;

            let Some(item) = parsed.data.into_iter().next() else {
                return Err(MandalaError::Api {
                    status: 200,
                    message: format!(
                        "No image in response. Body: {}",
                        truncate_for_error(&response_text)
                    ),
                });
            };

            Ok(ImageLocator { url: item.url })
        })
    }
}

/// Truncate an unexpected API body for error reporting. The cut is moved
/// back to a UTF-8 character boundary so slicing cannot panic.
fn truncate_for_error(body: &str) -> String {
    const MAX: usize = 500;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

// --- OpenAI API response types ---

#[derive(Deserialize)]
struct OpenAiResponse {
    data: Vec<OpenAiImageData>,
}

#[derive(Deserialize)]
struct OpenAiImageData {
    url: String,
}
