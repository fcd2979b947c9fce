use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::convert::Converter;
use crate::error::RelayError;
use crate::history::{MessageEntry, MessageHistory};
use crate::permission::{PermissionGate, PermissionState};
use crate::playback::PlaybackController;
use crate::recording::{RecorderStatus, RecordingSession};

/// Orchestrates one conversation: record clips, submit them for conversion,
/// and play back any artifact in the history.
///
/// Components enforce their own preconditions; the session only serializes
/// access to each of them. A monotonic operation token guards against stale
/// asynchronous completions: every user action bumps the token, and a
/// conversion that finishes after a newer action has started is discarded
/// rather than appended.
pub struct RelaySession {
    gate: PermissionGate,
    recorder: Mutex<RecordingSession>,
    converter: Arc<dyn Converter>,
    playback: Mutex<PlaybackController>,
    history: RwLock<MessageHistory>,
    op_token: AtomicU64,
}

impl RelaySession {
    pub fn new(
        gate: PermissionGate,
        recorder: RecordingSession,
        converter: Arc<dyn Converter>,
        playback: PlaybackController,
    ) -> Self {
        Self {
            gate,
            recorder: Mutex::new(recorder),
            converter,
            playback: Mutex::new(playback),
            history: RwLock::new(MessageHistory::new()),
            op_token: AtomicU64::new(0),
        }
    }

    pub fn permission_state(&self) -> PermissionState {
        self.gate.state()
    }

    pub async fn recorder_status(&self) -> RecorderStatus {
        self.recorder.lock().await.status()
    }

    /// Snapshot of the conversation in insertion order.
    pub async fn history(&self) -> Vec<MessageEntry> {
        self.history.read().await.entries().to_vec()
    }

    /// Begin recording a new clip.
    pub async fn start_recording(&self) -> Result<(), RelayError> {
        self.begin_op();
        self.recorder.lock().await.start(&self.gate).await
    }

    /// Finish the active recording and append it to the history as a Sent
    /// entry. The append happens only after the artifact is fully finalized,
    /// so readers never observe a partial entry.
    pub async fn stop_recording(&self) -> Result<MessageEntry, RelayError> {
        self.begin_op();

        let artifact = self.recorder.lock().await.stop().await?;
        let entry = MessageEntry::sent(artifact);

        let mut history = self.history.write().await;
        history.append(entry.clone());
        info!("Recorded clip appended ({} entries)", history.len());

        Ok(entry)
    }

    /// Submit the most recent recording for conversion.
    ///
    /// Returns `Ok(None)` when the result was discarded because a newer user
    /// action started while the conversion was in flight. On any failure the
    /// history is left unchanged — a failed conversion never appends a
    /// partial Received entry.
    pub async fn submit_latest(&self) -> Result<Option<MessageEntry>, RelayError> {
        let token = self.begin_op();

        let artifact = {
            let history = self.history.read().await;
            history
                .last_sent()
                .map(|entry| entry.artifact.clone())
                .ok_or(RelayError::NothingToSend)?
        };

        let converted = self.converter.convert(&artifact).await?;

        if self.op_token.load(Ordering::SeqCst) != token {
            warn!(
                "Discarding stale conversion result for {}",
                artifact.locator
            );
            return Ok(None);
        }

        let entry = MessageEntry::received(converted);
        let mut history = self.history.write().await;
        history.append(entry.clone());
        info!("Converted clip appended ({} entries)", history.len());

        Ok(Some(entry))
    }

    /// Toggle playback of any artifact in the history.
    pub async fn toggle_playback(&self, locator: &str) -> Result<(), RelayError> {
        self.begin_op();
        self.playback.lock().await.toggle(locator).await
    }

    pub async fn active_locator(&self) -> Option<String> {
        self.playback
            .lock()
            .await
            .active_locator()
            .map(str::to_string)
    }

    /// Stop any active playback before the session is torn down.
    pub async fn shutdown(&self) {
        self.playback.lock().await.shutdown().await;
    }

    fn begin_op(&self) -> u64 {
        self.op_token.fetch_add(1, Ordering::SeqCst) + 1
    }
}
