use tracing::{info, warn};

use super::player::AudioPlayer;
use crate::error::RelayError;

/// Enforces a single currently-playing artifact across the whole history.
///
/// Toggle semantics are stop-and-clear, not pause-and-resume: toggling the
/// active locator pauses it and clears the active slot, and a later toggle
/// on the same locator starts over from the beginning.
pub struct PlaybackController {
    player: Box<dyn AudioPlayer>,
    active: Option<String>,
}

impl PlaybackController {
    pub fn new(player: Box<dyn AudioPlayer>) -> Self {
        Self {
            player,
            active: None,
        }
    }

    /// The locator currently loaded into the shared player, if any.
    pub fn active_locator(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Toggle playback of `locator`.
    ///
    /// On any load/start failure the active slot is cleared before the error
    /// propagates — the controller is never left pointing at a locator that
    /// is not actually playing.
    pub async fn toggle(&mut self, locator: &str) -> Result<(), RelayError> {
        if self.active.as_deref() == Some(locator) {
            info!("Pausing playback: {}", locator);
            self.active = None;
            self.player
                .pause()
                .await
                .map_err(RelayError::PlaybackFailure)?;
            return Ok(());
        }

        // Mutual exclusion: stop whatever else is active first
        if let Some(previous) = self.active.take() {
            info!("Switching playback: {} -> {}", previous, locator);
            self.player
                .pause()
                .await
                .map_err(RelayError::PlaybackFailure)?;
        }

        if let Err(e) = self.start(locator).await {
            warn!("Playback failed for {}: {}", locator, e);
            self.active = None;
            return Err(RelayError::PlaybackFailure(e));
        }

        self.active = Some(locator.to_string());
        Ok(())
    }

    async fn start(&mut self, locator: &str) -> anyhow::Result<()> {
        self.player.replace(locator).await?;
        self.player.play().await?;
        Ok(())
    }

    /// Stop any active playback before resources are released.
    pub async fn shutdown(&mut self) {
        if let Some(locator) = self.active.take() {
            info!("Stopping active playback on shutdown: {}", locator);
            if let Err(e) = self.player.pause().await {
                warn!("Failed to stop playback during shutdown: {}", e);
            }
        }
    }
}
