use anyhow::Result;

/// Shared player resource boundary.
///
/// A single instance is reused across all artifacts; its loaded source is
/// only ever replaced, never seeked, so resuming a paused locator restarts
/// it from the beginning. Nothing outside `PlaybackController` touches this.
#[async_trait::async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Load a new source, replacing whatever was loaded before
    async fn replace(&mut self, locator: &str) -> Result<()>;

    /// Start playing the loaded source
    async fn play(&mut self) -> Result<()>;

    /// Pause playback
    async fn pause(&mut self) -> Result<()>;
}
