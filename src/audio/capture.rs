use anyhow::Result;
use std::path::PathBuf;

/// Fixed capture configuration for a recording session.
///
/// The format is chosen for downstream compatibility with the conversion
/// service: mono, 16 kHz, 16-bit PCM in a lossless WAV container.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Number of channels (1 = mono)
    pub channels: u16,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Bits per sample (16-bit signed PCM)
    pub bits_per_sample: u16,
    /// Directory where finished recordings are written
    pub output_dir: PathBuf,
}

impl CaptureConfig {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            channels: 1,
            sample_rate: 16_000,
            bits_per_sample: 16,
            output_dir,
        }
    }
}

/// Microphone capture boundary.
///
/// Implementations own the platform audio resources for one record cycle:
/// `prepare` fixes the capture format, `start` begins pulling samples, and
/// `stop` finalizes the capture and returns the locator of the finished
/// recording — or `None` when the platform produced nothing, which the
/// recording session surfaces rather than fabricating an empty artifact.
#[async_trait::async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Fix the capture format and output location for subsequent recordings
    async fn prepare(&mut self, config: &CaptureConfig) -> Result<()>;

    /// Begin capturing audio
    async fn start(&mut self) -> Result<()>;

    /// Finalize the capture and return the locator of the finished recording
    async fn stop(&mut self) -> Result<Option<String>>;

    /// Device name for logging
    fn name(&self) -> &str;
}
