//! On-disk cassette schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded session of port interactions, stored as YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cassette {
    /// Human-readable recording name.
    pub name: String,
    /// When the recording was made.
    pub recorded_at: DateTime<Utc>,
    /// Git commit the recording was made at, or "unknown".
    pub commit: String,
    /// The interactions, in recording order.
    pub interactions: Vec<Interaction>,
}

/// One recorded call through a port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    /// Position in the overall recording.
    pub seq: u64,
    /// Port name (e.g. `image_generator`).
    pub port: String,
    /// Method name on the port.
    pub method: String,
    /// Serialized method input.
    pub input: serde_json::Value,
    /// Serialized result, `{"Ok": ...}` or `{"Err": "message"}`.
    pub output: serde_json::Value,
}
