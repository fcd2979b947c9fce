use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

use voice_relay::{
    ArtifactCache, CaptureConfig, Config, ConversionClient, Direction, HostPermissionProvider,
    MicrophoneDevice, PermissionGate, PermissionState, PlaybackController, RecordingSession,
    RelaySession, SpeakerDevice,
};

#[derive(Parser, Debug)]
#[command(name = "voice-relay", about = "Record, convert and play back voice clips")]
struct Args {
    /// Path to the configuration file (without extension)
    #[arg(short, long, default_value = "config/voice-relay")]
    config: String,

    /// Override the conversion endpoint from the config file
    #[arg(long)]
    endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            warn!("Could not load config from {}: {} (using defaults)", args.config, e);
            Config::default()
        }
    };

    let endpoint = args.endpoint.unwrap_or(config.conversion.endpoint);

    info!("{} starting", config.service.name);
    info!("Conversion endpoint: {}", endpoint);

    let gate = PermissionGate::new();
    if let Err(e) = gate.request(&HostPermissionProvider).await {
        error!("{}", e);
    }
    if gate.state() == PermissionState::Denied {
        warn!("Recording is disabled for this session");
    }

    let mut capture_config = CaptureConfig::new(config.audio.recordings_path.clone().into());
    capture_config.sample_rate = config.audio.sample_rate;
    capture_config.channels = config.audio.channels;
    let recorder = RecordingSession::new(Box::new(MicrophoneDevice::new()), capture_config);
    let cache = ArtifactCache::new(&config.cache.path)?;
    let converter = Arc::new(ConversionClient::new(endpoint, cache));
    let playback = PlaybackController::new(Box::new(SpeakerDevice::new()));

    let session = RelaySession::new(gate, recorder, converter, playback);

    println!("Commands: record | stop | send | play <n> | list | quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("record") => {
                if let Err(e) = session.start_recording().await {
                    error!("{}", e);
                }
            }
            Some("stop") => match session.stop_recording().await {
                Ok(entry) => println!("Recorded: {}", entry.artifact.locator),
                Err(e) => error!("{}", e),
            },
            Some("send") => match session.submit_latest().await {
                Ok(Some(entry)) => println!("Received: {}", entry.artifact.locator),
                Ok(None) => warn!("Conversion result discarded (superseded)"),
                Err(e) => error!("{}", e),
            },
            Some("play") => {
                let index: Option<usize> = parts.next().and_then(|s| s.parse().ok());
                let history = session.history().await;
                match index.and_then(|i| history.get(i)) {
                    Some(entry) => {
                        if let Err(e) = session.toggle_playback(&entry.artifact.locator).await {
                            error!("{}", e);
                        }
                    }
                    None => println!("No such entry (see `list`)"),
                }
            }
            Some("list") => {
                for (index, entry) in session.history().await.iter().enumerate() {
                    let direction = match entry.direction {
                        Direction::Sent => "sent",
                        Direction::Received => "received",
                    };
                    println!(
                        "{:3}  {:8}  {}  {}",
                        index,
                        direction,
                        entry.created_at.format("%H:%M:%S"),
                        entry.artifact.locator
                    );
                }
            }
            Some("quit") | Some("exit") => break,
            Some(other) => println!("Unknown command: {}", other),
            None => {}
        }
    }

    session.shutdown().await;
    info!("Goodbye");

    Ok(())
}
