//! Round-trip orchestration
//!
//! `RelaySession` wires the permission gate, recording session, conversion
//! client, message history and playback controller into the user-facing
//! record → send → play flow.

mod session;

pub use session::RelaySession;
