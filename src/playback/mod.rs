//! Single-active-stream playback
//!
//! One shared player resource serves every artifact in the history. All
//! playback goes through `PlaybackController::toggle`, which enforces that
//! at most one locator is active at a time.

mod controller;
mod player;
mod speaker;

pub use controller::PlaybackController;
pub use player::AudioPlayer;
pub use speaker::SpeakerDevice;
