use anyhow::Result;
use std::sync::atomic::{AtomicU8, Ordering};
use tracing::{info, warn};

use crate::error::RelayError;

/// Platform permission boundary.
///
/// Called exactly once at startup; there is no automatic re-request.
#[async_trait::async_trait]
pub trait PermissionProvider: Send + Sync {
    async fn request_recording_permission(&self) -> Result<bool>;
}

/// Microphone authorization state. Set once by the startup capability check
/// and never transitions back to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Unknown,
    Granted,
    Denied,
}

const STATE_UNKNOWN: u8 = 0;
const STATE_GRANTED: u8 = 1;
const STATE_DENIED: u8 = 2;

/// Gates all recording on microphone authorization.
pub struct PermissionGate {
    state: AtomicU8,
}

impl PermissionGate {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(STATE_UNKNOWN),
        }
    }

    /// Construct a gate already in a known state (tests, embedding apps that
    /// manage the platform check themselves).
    pub fn with_state(state: PermissionState) -> Self {
        let gate = Self::new();
        gate.set(state);
        gate
    }

    /// Run the one-time capability check.
    ///
    /// A provider error is treated the same as a denial: the gate lands in
    /// `Denied` and the error is returned so the caller can surface it. The
    /// user must restart the flow to re-request.
    pub async fn request(&self, provider: &dyn PermissionProvider) -> Result<PermissionState, RelayError> {
        match provider.request_recording_permission().await {
            Ok(true) => {
                info!("Microphone permission granted");
                self.set(PermissionState::Granted);
                Ok(PermissionState::Granted)
            }
            Ok(false) => {
                warn!("Microphone permission denied");
                self.set(PermissionState::Denied);
                Ok(PermissionState::Denied)
            }
            Err(e) => {
                warn!("Permission check failed: {}", e);
                self.set(PermissionState::Denied);
                Err(RelayError::PermissionCheckFailed(e))
            }
        }
    }

    pub fn state(&self) -> PermissionState {
        match self.state.load(Ordering::Acquire) {
            STATE_GRANTED => PermissionState::Granted,
            STATE_DENIED => PermissionState::Denied,
            _ => PermissionState::Unknown,
        }
    }

    /// Precondition check used before every recording start.
    pub fn authorize(&self) -> Result<(), RelayError> {
        match self.state() {
            PermissionState::Granted => Ok(()),
            _ => Err(RelayError::PermissionDenied),
        }
    }

    fn set(&self, state: PermissionState) {
        let raw = match state {
            PermissionState::Unknown => STATE_UNKNOWN,
            PermissionState::Granted => STATE_GRANTED,
            PermissionState::Denied => STATE_DENIED,
        };
        self.state.store(raw, Ordering::Release);
    }
}

impl Default for PermissionGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Desktop provider: microphone access is available when a default input
/// device exists. There is no OS-level permission broker to consult on the
/// platforms this binary targets.
pub struct HostPermissionProvider;

#[async_trait::async_trait]
impl PermissionProvider for HostPermissionProvider {
    async fn request_recording_permission(&self) -> Result<bool> {
        use cpal::traits::HostTrait;
        let host = cpal::default_host();
        Ok(host.default_input_device().is_some())
    }
}
