use serde::{Deserialize, Serialize};
use std::path::Path;

/// Opaque reference to a playable audio resource.
///
/// The locator is immutable once created. Artifacts are produced by the
/// recording session (finished capture) or the conversion client (decoded
/// response persisted to the cache); nothing in this crate deletes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioArtifact {
    /// Opaque identifier for the audio resource (a filesystem path for both
    /// recorded and cached artifacts).
    pub locator: String,

    /// Size of the backing resource in bytes, when known.
    pub size_hint: Option<u64>,
}

impl AudioArtifact {
    pub fn new(locator: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
            size_hint: None,
        }
    }

    pub fn with_size(locator: impl Into<String>, size: u64) -> Self {
        Self {
            locator: locator.into(),
            size_hint: Some(size),
        }
    }

    /// Build an artifact for an existing file, picking up its size if the
    /// file is readable.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let size_hint = std::fs::metadata(path).ok().map(|m| m.len());
        Self {
            locator: path.to_string_lossy().into_owned(),
            size_hint,
        }
    }
}
