use tracing::{info, warn};

use crate::audio::{AudioArtifact, CaptureConfig, CaptureDevice};
use crate::error::RelayError;
use crate::permission::PermissionGate;

/// Recording lifecycle state. `Recording` implies the microphone is
/// exclusively held by this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderStatus {
    Idle,
    Recording,
}

/// Single-instance state machine for one record → stop → artifact cycle.
///
/// `Idle → start() → Recording → stop() → Idle`. At most one session exists
/// system-wide; a second `start()` while recording is rejected without
/// restarting the capture.
pub struct RecordingSession {
    device: Box<dyn CaptureDevice>,
    config: CaptureConfig,
    status: RecorderStatus,
    prepared: bool,
}

impl RecordingSession {
    pub fn new(device: Box<dyn CaptureDevice>, config: CaptureConfig) -> Self {
        Self {
            device,
            config,
            status: RecorderStatus::Idle,
            prepared: false,
        }
    }

    pub fn status(&self) -> RecorderStatus {
        self.status
    }

    /// Start a recording.
    ///
    /// Preconditions: the gate has granted permission and the session is
    /// idle. A start while already recording is a no-op rejection — the
    /// in-flight capture is left untouched.
    pub async fn start(&mut self, gate: &PermissionGate) -> Result<(), RelayError> {
        gate.authorize()?;

        if self.status == RecorderStatus::Recording {
            warn!("Recording already in progress, ignoring start");
            return Err(RelayError::RecordingAlreadyActive);
        }

        if !self.prepared {
            self.device
                .prepare(&self.config)
                .await
                .map_err(RelayError::CaptureFailed)?;
            self.prepared = true;
        }

        self.device
            .start()
            .await
            .map_err(RelayError::CaptureFailed)?;

        self.status = RecorderStatus::Recording;
        info!("Recording started ({})", self.device.name());

        Ok(())
    }

    /// Finalize the capture and produce the recorded artifact.
    ///
    /// Invariant: callers only invoke this while recording; a stop with no
    /// prior start is a contract violation and never produces an artifact.
    /// The session returns to idle on every path, including failures.
    pub async fn stop(&mut self) -> Result<AudioArtifact, RelayError> {
        if self.status == RecorderStatus::Idle {
            warn!("Stop requested with no active recording");
            return Err(RelayError::RecordingInactive);
        }

        self.status = RecorderStatus::Idle;

        let locator = self
            .device
            .stop()
            .await
            .map_err(RelayError::CaptureFailed)?;

        match locator {
            Some(locator) => {
                info!("Recording finished: {}", locator);
                Ok(AudioArtifact::from_path(&locator))
            }
            None => {
                warn!("Capture finished without producing audio");
                Err(RelayError::RecordingProducedNoArtifact)
            }
        }
    }
}
