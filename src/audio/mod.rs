pub mod artifact;
pub mod capture;
pub mod microphone;

pub use artifact::AudioArtifact;
pub use capture::{CaptureConfig, CaptureDevice};
pub use microphone::MicrophoneDevice;
