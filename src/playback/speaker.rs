use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{error, info};

use super::player::AudioPlayer;

/// A fully decoded clip ready for output.
#[derive(Clone)]
struct LoadedClip {
    samples: Arc<Vec<i16>>,
    sample_rate: u32,
}

/// Speaker output backed by cpal.
///
/// Mirrors the microphone device: the `cpal::Stream` is not `Send`, so each
/// play cycle runs on a dedicated output thread that owns the stream. The
/// loaded source is replaced wholesale on `replace()`; there is no seeking,
/// so a re-played clip always starts from the beginning.
pub struct SpeakerDevice {
    loaded: Option<LoadedClip>,
    stop_flag: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl SpeakerDevice {
    pub fn new() -> Self {
        Self {
            loaded: None,
            stop_flag: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    fn load_wav(locator: &str) -> Result<LoadedClip> {
        let mut reader = hound::WavReader::open(locator)
            .with_context(|| format!("failed to open audio file: {}", locator))?;
        let spec = reader.spec();

        let samples: Vec<i16> = match spec.sample_format {
            hound::SampleFormat::Int => reader
                .samples::<i16>()
                .collect::<std::result::Result<_, _>>()
                .context("failed to read samples")?,
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .map(|s| s.map(|v| (v.clamp(-1.0, 1.0) * i16::MAX as f32) as i16))
                .collect::<std::result::Result<_, _>>()
                .context("failed to read samples")?,
        };

        // Fold interleaved channels down to mono
        let samples = if spec.channels > 1 {
            samples
                .chunks(spec.channels as usize)
                .map(|frame| {
                    let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                    (sum / frame.len() as i32) as i16
                })
                .collect()
        } else {
            samples
        };

        Ok(LoadedClip {
            samples: Arc::new(samples),
            sample_rate: spec.sample_rate,
        })
    }

    fn output_loop(
        clip: LoadedClip,
        stop_flag: Arc<AtomicBool>,
        ready_tx: tokio::sync::oneshot::Sender<Result<()>>,
    ) {
        let done = Arc::new(AtomicBool::new(false));

        let stream = match Self::build_stream(&clip, Arc::clone(&done)) {
            Ok(stream) => stream,
            Err(e) => {
                let _ = ready_tx.send(Err(e));
                return;
            }
        };

        if let Err(e) = stream.play() {
            let _ = ready_tx.send(Err(anyhow!("failed to start output stream: {}", e)));
            return;
        }

        let _ = ready_tx.send(Ok(()));

        while !stop_flag.load(Ordering::Acquire) && !done.load(Ordering::Acquire) {
            std::thread::sleep(Duration::from_millis(50));
        }

        drop(stream);
    }

    fn build_stream(clip: &LoadedClip, done: Arc<AtomicBool>) -> Result<cpal::Stream> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("no default output device found"))?;

        let config: cpal::StreamConfig = device
            .default_output_config()
            .context("failed to query output configuration")?
            .into();

        let channels = config.channels as usize;
        let device_rate = config.sample_rate.0;

        let samples = Arc::clone(&clip.samples);
        // Nearest-neighbour rate conversion: advance the read position by the
        // clip/device rate ratio per output frame.
        let step = clip.sample_rate as f64 / device_rate as f64;
        let mut position = 0f64;

        let stream = device.build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                for frame in data.chunks_mut(channels) {
                    let index = position as usize;
                    let value = if index < samples.len() {
                        samples[index] as f32 / i16::MAX as f32
                    } else {
                        done.store(true, Ordering::Release);
                        0.0
                    };
                    for out in frame.iter_mut() {
                        *out = value;
                    }
                    position += step;
                }
            },
            |err| {
                error!("Output stream error: {}", err);
            },
            None,
        )?;

        Ok(stream)
    }

    fn stop_worker(&mut self) {
        self.stop_flag.store(true, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Default for SpeakerDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SpeakerDevice {
    fn drop(&mut self) {
        self.stop_worker();
    }
}

#[async_trait::async_trait]
impl AudioPlayer for SpeakerDevice {
    async fn replace(&mut self, locator: &str) -> Result<()> {
        self.stop_worker();
        let clip = Self::load_wav(locator)?;
        info!(
            "Loaded clip: {} ({} samples at {} Hz)",
            locator,
            clip.samples.len(),
            clip.sample_rate
        );
        self.loaded = Some(clip);
        Ok(())
    }

    async fn play(&mut self) -> Result<()> {
        let clip = self
            .loaded
            .clone()
            .ok_or_else(|| anyhow!("no source loaded"))?;

        self.stop_worker();
        self.stop_flag.store(false, Ordering::Release);

        let (ready_tx, ready_rx) = tokio::sync::oneshot::channel();
        let stop_flag = Arc::clone(&self.stop_flag);

        let worker = std::thread::spawn(move || {
            Self::output_loop(clip, stop_flag, ready_tx);
        });

        match ready_rx.await {
            Ok(Ok(())) => {
                self.worker = Some(worker);
                Ok(())
            }
            Ok(Err(e)) => {
                let _ = worker.join();
                Err(e)
            }
            Err(_) => {
                let _ = worker.join();
                Err(anyhow!("output thread exited before starting"))
            }
        }
    }

    async fn pause(&mut self) -> Result<()> {
        self.stop_worker();
        Ok(())
    }
}
