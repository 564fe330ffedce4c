//! Service context that bundles all port trait objects.

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::adapters::live::fetcher::HttpImageFetcher;
use crate::adapters::live::openai::OpenAiGenerator;
use crate::adapters::recording::image_fetcher::RecordingImageFetcher;
use crate::adapters::recording::image_generator::RecordingImageGenerator;
use crate::adapters::replaying::image_fetcher::ReplayingImageFetcher;
use crate::adapters::replaying::image_generator::ReplayingImageGenerator;
use crate::cassette::config::load_cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::config::Config;
use crate::error::MandalaError;
use crate::ports::{ImageFetcher, ImageGenerator};

/// Bundles all port trait objects into a single session-scoped context.
///
/// Credentials and collaborators flow through here rather than through
/// ambient globals.
pub struct ServiceContext {
    /// Image generator port.
    pub generator: Box<dyn ImageGenerator>,
    /// Image fetcher port.
    pub fetcher: Box<dyn ImageFetcher>,
}

/// Handle to a recording session that must be finished after use.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Finish the recording and write cassette files to disk.
    ///
    /// The recording adapters in the context still hold the recorder, so
    /// this drains through the lock rather than unwrapping the `Arc`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be written.
    pub fn finish(self) -> Result<std::path::PathBuf, String> {
        let recorder =
            self.recorder.lock().map_err(|e| format!("Recorder lock poisoned: {e}"))?;
        recorder.write().map_err(|e| format!("Failed to write cassette: {e}"))
    }
}

impl ServiceContext {
    /// Create a live context.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not configured or an HTTP
    /// client cannot be built.
    pub fn live(config: &Config) -> Result<Self, MandalaError> {
        let key = config
            .openai_key()
            .ok_or(MandalaError::MissingApiKey { env_var: "OPENAI_API_KEY".into() })?;
        Ok(Self {
            generator: Box::new(OpenAiGenerator::new(key)?),
            fetcher: Box::new(HttpImageFetcher::new()?),
        })
    }

    /// Create a recording context that wraps live adapters with recorders.
    ///
    /// # Errors
    ///
    /// Returns an error if the recording session cannot be initialized.
    pub fn recording(config: &Config) -> Result<(Self, RecordingSession), MandalaError> {
        let live_ctx = Self::live(config)?;

        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let output_dir = std::path::PathBuf::from(".mandalagen/cassettes").join(&timestamp);

        let commit = get_commit_hash();
        let path = output_dir.join("pipeline.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            format!("{timestamp}-pipeline"),
            &commit,
        )));

        let ctx = Self {
            generator: Box::new(RecordingImageGenerator::new(
                live_ctx.generator,
                Arc::clone(&recorder),
            )),
            fetcher: Box::new(RecordingImageFetcher::new(
                live_ctx.fetcher,
                Arc::clone(&recorder),
            )),
        };
        let session = RecordingSession { recorder };

        Ok((ctx, session))
    }

    /// Create a replaying context from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be loaded.
    pub fn replaying(path: &Path) -> Result<Self, MandalaError> {
        let replayer = load_cassette(path)
            .map_err(|e| MandalaError::Config(format!("Failed to load cassette: {e}")))?;
        let replayer = Arc::new(Mutex::new(replayer));
        Ok(Self {
            generator: Box::new(ReplayingImageGenerator::new(Arc::clone(&replayer))),
            fetcher: Box::new(ReplayingImageFetcher::new(replayer)),
        })
    }
}

/// Get the current git commit hash, or "unknown" if unavailable.
fn get_commit_hash() -> String {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string())
}
