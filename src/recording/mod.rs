//! Recording session lifecycle
//!
//! A single `RecordingSession` instance manages one record → stop →
//! produce-artifact cycle at a time, gated on microphone authorization.

mod session;

pub use session::{RecorderStatus, RecordingSession};
