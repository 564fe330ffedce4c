//! Replaying adapter for the `ImageFetcher` port.

use std::sync::{Arc, Mutex};

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::error::MandalaError;
use crate::ports::image_fetcher::{FetchFuture, FetchedImage, ImageFetcher};

/// Serves recorded fetch results from a cassette.
pub struct ReplayingImageFetcher {
    replayer: Option<Arc<Mutex<CassetteReplayer>>>,
}

impl ReplayingImageFetcher {
    /// Create a replaying fetcher backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer: Some(replayer) }
    }
}

impl ImageFetcher for ReplayingImageFetcher {
    fn fetch(&self, _url: &str) -> FetchFuture<'_> {
        let output = next_output(self.replayer.as_ref(), "image_fetcher", "fetch");
        Box::pin(async move {
            replay_result::<FetchedImage>(output).map_err(|e| MandalaError::Replay(e.to_string()))
        })
    }
}
