use anyhow::{anyhow, Result};
use std::sync::{Arc, Mutex};

use voice_relay::playback::{AudioPlayer, PlaybackController};
use voice_relay::RelayError;

/// Player that records every call and can be scripted to fail on load.
struct RecordingPlayer {
    ops: Arc<Mutex<Vec<String>>>,
    fail_replace: bool,
}

impl RecordingPlayer {
    fn new(fail_replace: bool) -> (Self, Arc<Mutex<Vec<String>>>) {
        let ops = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                ops: Arc::clone(&ops),
                fail_replace,
            },
            ops,
        )
    }
}

#[async_trait::async_trait]
impl AudioPlayer for RecordingPlayer {
    async fn replace(&mut self, locator: &str) -> Result<()> {
        if self.fail_replace {
            return Err(anyhow!("corrupt resource"));
        }
        self.ops.lock().unwrap().push(format!("replace:{}", locator));
        Ok(())
    }

    async fn play(&mut self) -> Result<()> {
        self.ops.lock().unwrap().push("play".to_string());
        Ok(())
    }

    async fn pause(&mut self) -> Result<()> {
        self.ops.lock().unwrap().push("pause".to_string());
        Ok(())
    }
}

#[tokio::test]
async fn toggle_starts_playback_when_nothing_is_active() {
    let (player, ops) = RecordingPlayer::new(false);
    let mut controller = PlaybackController::new(Box::new(player));

    controller.toggle("a.wav").await.unwrap();

    assert_eq!(controller.active_locator(), Some("a.wav"));
    assert_eq!(*ops.lock().unwrap(), vec!["replace:a.wav", "play"]);
}

#[tokio::test]
async fn toggling_the_active_locator_stops_and_clears() {
    let (player, ops) = RecordingPlayer::new(false);
    let mut controller = PlaybackController::new(Box::new(player));

    controller.toggle("a.wav").await.unwrap();
    controller.toggle("a.wav").await.unwrap();

    assert_eq!(controller.active_locator(), None);
    assert_eq!(*ops.lock().unwrap(), vec!["replace:a.wav", "play", "pause"]);

    // A third toggle restarts from the beginning: the source is replaced
    // again, never seeked.
    controller.toggle("a.wav").await.unwrap();
    assert_eq!(controller.active_locator(), Some("a.wav"));
    assert_eq!(
        *ops.lock().unwrap(),
        vec!["replace:a.wav", "play", "pause", "replace:a.wav", "play"]
    );
}

#[tokio::test]
async fn switching_locators_stops_the_previous_one_first() {
    let (player, ops) = RecordingPlayer::new(false);
    let mut controller = PlaybackController::new(Box::new(player));

    controller.toggle("a.wav").await.unwrap();
    controller.toggle("b.wav").await.unwrap();

    assert_eq!(controller.active_locator(), Some("b.wav"));
    assert_eq!(
        *ops.lock().unwrap(),
        vec!["replace:a.wav", "play", "pause", "replace:b.wav", "play"]
    );
}

#[tokio::test]
async fn load_failure_clears_the_active_locator() {
    let (player, _) = RecordingPlayer::new(true);
    let mut controller = PlaybackController::new(Box::new(player));

    let err = controller.toggle("missing.wav").await.unwrap_err();
    assert!(matches!(err, RelayError::PlaybackFailure(_)));
    assert_eq!(controller.active_locator(), None);
}

#[tokio::test]
async fn shutdown_stops_active_playback() {
    let (player, ops) = RecordingPlayer::new(false);
    let mut controller = PlaybackController::new(Box::new(player));

    controller.toggle("a.wav").await.unwrap();
    controller.shutdown().await;

    assert_eq!(controller.active_locator(), None);
    assert_eq!(*ops.lock().unwrap(), vec!["replace:a.wav", "play", "pause"]);
}

#[tokio::test]
async fn shutdown_with_nothing_active_is_a_no_op() {
    let (player, ops) = RecordingPlayer::new(false);
    let mut controller = PlaybackController::new(Box::new(player));

    controller.shutdown().await;
    assert!(ops.lock().unwrap().is_empty());
}
