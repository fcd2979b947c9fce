use thiserror::Error;

/// Errors surfaced to the user at the boundary of a triggering action.
///
/// None of these are fatal: each variant leaves the owning component in a
/// well-defined state (Idle for recording, no active locator for playback,
/// history unchanged for conversion failures). Display strings double as the
/// user-visible notification text.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("microphone permission denied")]
    PermissionDenied,

    #[error("failed to request permission")]
    PermissionCheckFailed(anyhow::Error),

    #[error("recording already in progress")]
    RecordingAlreadyActive,

    /// `stop()` was requested with no active recording. This is a caller
    /// contract violation, not a retryable runtime condition.
    #[error("no recording in progress")]
    RecordingInactive,

    #[error("recording failed: {0}")]
    CaptureFailed(anyhow::Error),

    /// The capture device finished without producing a locator (e.g. the
    /// platform returned an empty result). Never papered over with an empty
    /// artifact.
    #[error("recording produced no audio")]
    RecordingProducedNoArtifact,

    #[error("conversion request failed: {0}")]
    ConversionNetworkFailure(anyhow::Error),

    /// Non-success response from the conversion service. The display text is
    /// exactly the server-provided message (or a generic fallback built by
    /// the client when the body was not parseable).
    #[error("{message}")]
    ConversionServerError { message: String },

    #[error("conversion response did not contain audio")]
    ConversionMissingAudio,

    #[error("conversion returned audio that could not be decoded: {0}")]
    ConversionInvalidAudio(anyhow::Error),

    #[error("nothing recorded yet")]
    NothingToSend,

    #[error("playback failed: {0}")]
    PlaybackFailure(anyhow::Error),
}
