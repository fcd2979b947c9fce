use anyhow::{Context, Result};
use base64::Engine;
use std::path::{Path, PathBuf};
use tracing::info;

/// Locally addressable store for converted audio artifacts.
///
/// Artifacts written here live for the duration of the process; nothing in
/// this crate deletes them (cache teardown is left to the platform).
pub struct ArtifactCache {
    root: PathBuf,
}

impl ArtifactCache {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).context("failed to create cache directory")?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Decode a base64 payload and persist it under `name`, returning the
    /// locator of the written file.
    pub async fn write(&self, name: &str, base64_payload: &str) -> Result<String> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(base64_payload)
            .context("payload is not valid base64")?;

        let path = self.root.join(name);
        tokio::fs::write(&path, &bytes)
            .await
            .with_context(|| format!("failed to write cache file: {:?}", path))?;

        info!("Cached artifact: {:?} ({} bytes)", path, bytes.len());

        Ok(path.to_string_lossy().into_owned())
    }
}
