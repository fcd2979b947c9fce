pub mod audio;
pub mod cache;
pub mod config;
pub mod convert;
pub mod error;
pub mod history;
pub mod permission;
pub mod playback;
pub mod recording;
pub mod relay;

pub use audio::{AudioArtifact, CaptureConfig, CaptureDevice, MicrophoneDevice};
pub use cache::ArtifactCache;
pub use config::Config;
pub use convert::{ConversionClient, Converter};
pub use error::RelayError;
pub use history::{Direction, MessageEntry, MessageHistory};
pub use permission::{HostPermissionProvider, PermissionGate, PermissionProvider, PermissionState};
pub use playback::{AudioPlayer, PlaybackController, SpeakerDevice};
pub use recording::{RecorderStatus, RecordingSession};
pub use relay::RelaySession;
