use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{error, info};

use super::capture::{CaptureConfig, CaptureDevice};

/// Microphone capture device backed by cpal.
///
/// `cpal::Stream` is not `Send`, so the stream lives on a dedicated capture
/// thread for the duration of a recording. Samples accumulate in a shared
/// buffer; `stop()` signals the thread, joins it, and finalizes the buffer
/// into a WAV file under the configured output directory.
pub struct MicrophoneDevice {
    config: Option<CaptureConfig>,
    samples: Arc<Mutex<Vec<i16>>>,
    stop_flag: Arc<AtomicBool>,
    /// Sample rate the device actually negotiated (may differ from target)
    device_rate: Arc<AtomicU32>,
    worker: Option<JoinHandle<()>>,
}

impl MicrophoneDevice {
    pub fn new() -> Self {
        Self {
            config: None,
            samples: Arc::new(Mutex::new(Vec::new())),
            stop_flag: Arc::new(AtomicBool::new(false)),
            device_rate: Arc::new(AtomicU32::new(0)),
            worker: None,
        }
    }

    /// Run the capture loop on the dedicated thread until the stop flag is
    /// set. The stream must be created and dropped on this thread.
    fn capture_loop(
        config: CaptureConfig,
        samples: Arc<Mutex<Vec<i16>>>,
        stop_flag: Arc<AtomicBool>,
        device_rate: Arc<AtomicU32>,
        ready_tx: tokio::sync::oneshot::Sender<Result<()>>,
    ) {
        let stream = match Self::build_stream(&config, samples, Arc::clone(&stop_flag), device_rate)
        {
            Ok(stream) => stream,
            Err(e) => {
                let _ = ready_tx.send(Err(e));
                return;
            }
        };

        if let Err(e) = stream.play() {
            let _ = ready_tx.send(Err(anyhow!("failed to start input stream: {}", e)));
            return;
        }

        let _ = ready_tx.send(Ok(()));

        while !stop_flag.load(Ordering::Acquire) {
            std::thread::sleep(Duration::from_millis(50));
        }

        drop(stream);
    }

    fn build_stream(
        config: &CaptureConfig,
        samples: Arc<Mutex<Vec<i16>>>,
        stop_flag: Arc<AtomicBool>,
        device_rate: Arc<AtomicU32>,
    ) -> Result<cpal::Stream> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| anyhow!("no default input device found"))?;

        let stream_config = Self::closest_config(&device, config.sample_rate)?;
        let channels = stream_config.channels;
        device_rate.store(stream_config.sample_rate.0, Ordering::Release);

        let stream = device.build_input_stream(
            &stream_config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                if stop_flag.load(Ordering::Acquire) {
                    return;
                }
                if let Ok(mut buffer) = samples.lock() {
                    // Keep the first channel of each interleaved frame
                    for frame in data.chunks(channels as usize) {
                        let sample = frame[0].clamp(-1.0, 1.0);
                        buffer.push((sample * i16::MAX as f32) as i16);
                    }
                }
            },
            |err| {
                error!("Input stream error: {}", err);
            },
            None,
        )?;

        Ok(stream)
    }

    /// Find the input configuration closest to the target sample rate
    fn closest_config(device: &cpal::Device, target_rate: u32) -> Result<cpal::StreamConfig> {
        let supported = device
            .supported_input_configs()
            .context("failed to query input configurations")?;

        let mut best = None;
        let mut best_diff = u32::MAX;

        for range in supported {
            let diff = range.max_sample_rate().0.abs_diff(target_rate);
            if diff < best_diff {
                best_diff = diff;
                best = Some(range);
            }
        }

        let range = best.ok_or_else(|| anyhow!("no suitable input configuration found"))?;
        let rate = target_rate
            .clamp(range.min_sample_rate().0, range.max_sample_rate().0);

        Ok(range.with_sample_rate(cpal::SampleRate(rate)).into())
    }

    /// Downsample by decimation when the device negotiated a higher rate
    /// than the target (e.g. 48 kHz hardware feeding a 16 kHz recording).
    fn decimate(samples: Vec<i16>, device_rate: u32, target_rate: u32) -> Vec<i16> {
        if device_rate == 0 || target_rate == 0 {
            return samples;
        }
        let ratio = device_rate / target_rate;
        if ratio <= 1 {
            return samples;
        }
        samples.into_iter().step_by(ratio as usize).collect()
    }

    fn finalize_wav(&self, config: &CaptureConfig, samples: &[i16]) -> Result<String> {
        let filename = format!("recording-{}.wav", chrono::Utc::now().timestamp_millis());
        let path: PathBuf = config.output_dir.join(filename);

        let spec = hound::WavSpec {
            channels: config.channels,
            sample_rate: config.sample_rate,
            bits_per_sample: config.bits_per_sample,
            sample_format: hound::SampleFormat::Int,
        };

        let mut writer = hound::WavWriter::create(&path, spec)
            .with_context(|| format!("failed to create WAV file: {:?}", path))?;
        for &sample in samples {
            writer
                .write_sample(sample)
                .context("failed to write sample to WAV")?;
        }
        writer.finalize().context("failed to finalize WAV file")?;

        Ok(path.to_string_lossy().into_owned())
    }
}

impl Default for MicrophoneDevice {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CaptureDevice for MicrophoneDevice {
    async fn prepare(&mut self, config: &CaptureConfig) -> Result<()> {
        std::fs::create_dir_all(&config.output_dir)
            .context("failed to create recordings directory")?;
        self.config = Some(config.clone());
        Ok(())
    }

    async fn start(&mut self) -> Result<()> {
        let config = self
            .config
            .clone()
            .ok_or_else(|| anyhow!("capture device not prepared"))?;

        self.stop_flag.store(false, Ordering::Release);
        if let Ok(mut buffer) = self.samples.lock() {
            buffer.clear();
        }

        let (ready_tx, ready_rx) = tokio::sync::oneshot::channel();
        let samples = Arc::clone(&self.samples);
        let stop_flag = Arc::clone(&self.stop_flag);
        let device_rate = Arc::clone(&self.device_rate);

        let worker = std::thread::spawn(move || {
            Self::capture_loop(config, samples, stop_flag, device_rate, ready_tx);
        });

        match ready_rx.await {
            Ok(Ok(())) => {
                self.worker = Some(worker);
                info!("Microphone capture started");
                Ok(())
            }
            Ok(Err(e)) => {
                let _ = worker.join();
                Err(e)
            }
            Err(_) => {
                let _ = worker.join();
                Err(anyhow!("capture thread exited before starting"))
            }
        }
    }

    async fn stop(&mut self) -> Result<Option<String>> {
        let config = self
            .config
            .clone()
            .ok_or_else(|| anyhow!("capture device not prepared"))?;

        self.stop_flag.store(true, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                return Err(anyhow!("capture thread panicked"));
            }
        }

        let samples: Vec<i16> = {
            let mut buffer = self
                .samples
                .lock()
                .map_err(|_| anyhow!("sample buffer lock poisoned"))?;
            std::mem::take(&mut *buffer)
        };

        if samples.is_empty() {
            info!("Capture finished with no samples");
            return Ok(None);
        }

        let samples = Self::decimate(samples, self.device_rate.load(Ordering::Acquire), config.sample_rate);
        let locator = self.finalize_wav(&config, &samples)?;
        info!("Capture finished: {} ({} samples)", locator, samples.len());

        Ok(Some(locator))
    }

    fn name(&self) -> &str {
        "cpal-microphone"
    }
}
