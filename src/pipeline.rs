//! The generation pipeline: validate, prompt, generate, fetch, decode.

use image::DynamicImage;

use crate::codec;
use crate::context::ServiceContext;
use crate::error::MandalaError;
use crate::ports::image_generator::GenerationRequest;
use crate::prompt::build_prompt;

/// A decoded mandala tied to the word that inspired it.
#[derive(Debug)]
pub struct Mandala {
    /// The decoded image, immutable once produced.
    pub image: DynamicImage,
    /// The trimmed inspiration word.
    pub source_word: String,
}

/// Run the full pipeline for one inspiration word.
///
/// The word is trimmed and must be non-empty; validation happens before
/// any network call. Each network hop is retried at most once, and only
/// on transient failures.
///
/// # Errors
///
/// Returns a [`MandalaError`] for invalid input, request/fetch failures,
/// or undecodable image bytes.
pub async fn generate_mandala(
    ctx: &ServiceContext,
    word: &str,
) -> Result<Mandala, MandalaError> {
    let word = word.trim();
    if word.is_empty() {
        return Err(MandalaError::Validation("inspiration word must not be empty".into()));
    }

    let request = GenerationRequest { word: word.to_string(), prompt: build_prompt(word) };

    let locator = match ctx.generator.generate(&request).await {
        Ok(locator) => locator,
        Err(e) if e.is_transient() => ctx.generator.generate(&request).await?,
        Err(e) => return Err(e),
    };

    let fetched = match ctx.fetcher.fetch(&locator.url).await {
        Ok(fetched) => fetched,
        Err(e) if e.is_transient() => ctx.fetcher.fetch(&locator.url).await?,
        Err(e) => return Err(e),
    };

    let image = codec::decode(&fetched.data)?;

    Ok(Mandala { image, source_word: word.to_string() })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::ports::image_fetcher::{FetchFuture, FetchedImage, ImageFetcher};
    use crate::ports::image_generator::{GenerateFuture, ImageGenerator, ImageLocator};

    /// Generator stub that serves canned results and counts calls.
    struct StubGenerator {
        calls: Arc<AtomicUsize>,
        results: Vec<Result<ImageLocator, MandalaError>>,
    }

    impl ImageGenerator for StubGenerator {
        fn generate(&self, _request: &GenerationRequest) -> GenerateFuture<'_> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            let result = match self.results.get(n) {
                Some(Ok(locator)) => Ok(locator.clone()),
                Some(Err(e)) => Err(clone_error(e)),
                None => panic!("unexpected generate call #{}", n + 1),
            };
            Box::pin(async move { result })
        }
    }

    struct StubFetcher {
        calls: Arc<AtomicUsize>,
        results: Vec<Result<FetchedImage, MandalaError>>,
    }

    impl ImageFetcher for StubFetcher {
        fn fetch(&self, _url: &str) -> FetchFuture<'_> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            let result = match self.results.get(n) {
                Some(Ok(fetched)) => Ok(fetched.clone()),
                Some(Err(e)) => Err(clone_error(e)),
                None => panic!("unexpected fetch call #{}", n + 1),
            };
            Box::pin(async move { result })
        }
    }

    /// `MandalaError` holds non-Clone sources; the stubs only need the
    /// variants built from plain strings.
    fn clone_error(e: &MandalaError) -> MandalaError {
        match e {
            MandalaError::Api { status, message } => {
                MandalaError::Api { status: *status, message: message.clone() }
            }
            MandalaError::Timeout(s) => MandalaError::Timeout(s.clone()),
            MandalaError::Validation(s) => MandalaError::Validation(s.clone()),
            other => panic!("stub cannot clone {other:?}"),
        }
    }

    fn locator() -> ImageLocator {
        ImageLocator { url: "https://example.com/mandala.png".into() }
    }

    fn png_image() -> FetchedImage {
        let img = DynamicImage::new_luma8(8, 8);
        FetchedImage { data: codec::encode_png(&img).unwrap() }
    }

    struct Harness {
        ctx: ServiceContext,
        generate_calls: Arc<AtomicUsize>,
        fetch_calls: Arc<AtomicUsize>,
    }

    fn harness(
        gen_results: Vec<Result<ImageLocator, MandalaError>>,
        fetch_results: Vec<Result<FetchedImage, MandalaError>>,
    ) -> Harness {
        let generate_calls = Arc::new(AtomicUsize::new(0));
        let fetch_calls = Arc::new(AtomicUsize::new(0));
        let ctx = ServiceContext {
            generator: Box::new(StubGenerator {
                calls: Arc::clone(&generate_calls),
                results: gen_results,
            }),
            fetcher: Box::new(StubFetcher {
                calls: Arc::clone(&fetch_calls),
                results: fetch_results,
            }),
        };
        Harness { ctx, generate_calls, fetch_calls }
    }

    #[tokio::test]
    async fn happy_path_produces_decoded_image() {
        let h = harness(vec![Ok(locator())], vec![Ok(png_image())]);
        let mandala = generate_mandala(&h.ctx, "peace").await.unwrap();
        assert_eq!(mandala.source_word, "peace");
        assert_eq!((mandala.image.width(), mandala.image.height()), (8, 8));
        assert_eq!(h.generate_calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.fetch_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_word_rejected_without_network_calls() {
        let h = harness(vec![], vec![]);
        let err = generate_mandala(&h.ctx, "   ").await.unwrap_err();
        assert!(matches!(err, MandalaError::Validation(_)));
        assert_eq!(h.generate_calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.fetch_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn word_is_trimmed_before_use() {
        let h = harness(vec![Ok(locator())], vec![Ok(png_image())]);
        let mandala = generate_mandala(&h.ctx, "  lotus  ").await.unwrap();
        assert_eq!(mandala.source_word, "lotus");
    }

    #[tokio::test]
    async fn transient_generate_failure_retried_once() {
        let h = harness(
            vec![Err(MandalaError::Timeout("generation".into())), Ok(locator())],
            vec![Ok(png_image())],
        );
        let mandala = generate_mandala(&h.ctx, "calm").await.unwrap();
        assert_eq!(mandala.source_word, "calm");
        assert_eq!(h.generate_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn two_transient_failures_give_up() {
        let h = harness(
            vec![
                Err(MandalaError::Timeout("generation".into())),
                Err(MandalaError::Timeout("generation".into())),
            ],
            vec![],
        );
        let err = generate_mandala(&h.ctx, "calm").await.unwrap_err();
        assert!(matches!(err, MandalaError::Timeout(_)));
        assert_eq!(h.generate_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn credential_error_never_retried() {
        let h = harness(
            vec![Err(MandalaError::Api { status: 401, message: "Incorrect API key".into() })],
            vec![],
        );
        let err = generate_mandala(&h.ctx, "calm").await.unwrap_err();
        assert!(matches!(err, MandalaError::Api { status: 401, .. }));
        assert_eq!(h.generate_calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.fetch_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn transient_fetch_failure_retried_once() {
        let h = harness(
            vec![Ok(locator())],
            vec![
                Err(MandalaError::Api { status: 503, message: "unavailable".into() }),
                Ok(png_image()),
            ],
        );
        let mandala = generate_mandala(&h.ctx, "river").await.unwrap();
        assert_eq!(mandala.source_word, "river");
        assert_eq!(h.fetch_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn non_image_bytes_surface_decode_error() {
        let h = harness(
            vec![Ok(locator())],
            vec![Ok(FetchedImage { data: b"<html>404</html>".to_vec() })],
        );
        let err = generate_mandala(&h.ctx, "calm").await.unwrap_err();
        assert!(matches!(err, MandalaError::Decode(_)));
        // Decode failures are not transient; the fetch is not repeated.
        assert_eq!(h.fetch_calls.load(Ordering::SeqCst), 1);
    }
}
