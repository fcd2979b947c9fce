use anyhow::{anyhow, Context};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{info, warn};

use crate::audio::AudioArtifact;
use crate::cache::ArtifactCache;
use crate::error::RelayError;

/// Conversion boundary. Single-flight per invocation: the caller is
/// responsible for not submitting while a conversion is outstanding — the
/// client neither queues nor dedupes concurrent calls.
#[async_trait::async_trait]
pub trait Converter: Send + Sync {
    async fn convert(&self, artifact: &AudioArtifact) -> Result<AudioArtifact, RelayError>;
}

/// Success body: at minimum a base64-encoded audio payload.
#[derive(Debug, Deserialize)]
struct ConversionResponse {
    audio: Option<String>,
}

/// Error body: optional human-readable message.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// HTTP client for the remote conversion endpoint.
///
/// No timeout and no retry: a conversion runs to completion or failure, and
/// recovery is the user re-submitting (a brand-new conversion, not a
/// resumption). Timeout/cancellation is an extension point left to the
/// embedding application.
pub struct ConversionClient {
    http: reqwest::Client,
    endpoint: String,
    cache: ArtifactCache,
}

impl ConversionClient {
    pub fn new(endpoint: impl Into<String>, cache: ArtifactCache) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            cache,
        }
    }

    /// Handle a conversion response: parse the body, decode the audio
    /// payload, and persist it to the cache.
    ///
    /// Public so the response path can be exercised without a live server.
    pub async fn process_response(
        &self,
        status: u16,
        body: &[u8],
    ) -> Result<AudioArtifact, RelayError> {
        if !(200..300).contains(&status) {
            let message = serde_json::from_slice::<ErrorBody>(body)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| format!("conversion service returned status {}", status));
            warn!("Conversion rejected by server: {}", message);
            return Err(RelayError::ConversionServerError { message });
        }

        let response: ConversionResponse =
            serde_json::from_slice(body).map_err(|_| RelayError::ConversionMissingAudio)?;

        let payload = response.audio.ok_or(RelayError::ConversionMissingAudio)?;

        let name = format!("processed-{}.wav", chrono::Utc::now().timestamp_millis());
        let locator = self
            .cache
            .write(&name, &payload)
            .await
            .map_err(RelayError::ConversionInvalidAudio)?;

        Ok(AudioArtifact::from_path(&locator))
    }
}

#[async_trait::async_trait]
impl Converter for ConversionClient {
    async fn convert(&self, artifact: &AudioArtifact) -> Result<AudioArtifact, RelayError> {
        info!("Submitting {} for conversion", artifact.locator);

        let bytes = tokio::fs::read(&artifact.locator)
            .await
            .with_context(|| format!("failed to read recording: {}", artifact.locator))
            .map_err(RelayError::ConversionNetworkFailure)?;

        let filename = format!("recording-{}.wav", chrono::Utc::now().timestamp_millis());
        let part = Part::bytes(bytes)
            .file_name(filename)
            .mime_str("audio/wav")
            .map_err(|e| RelayError::ConversionNetworkFailure(anyhow!(e)))?;
        let form = Form::new().part("audio", part);

        let response = self
            .http
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await
            .map_err(|e| RelayError::ConversionNetworkFailure(anyhow!(e)))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| RelayError::ConversionNetworkFailure(anyhow!(e)))?;

        let converted = self.process_response(status, &body).await?;
        info!("Conversion complete: {}", converted.locator);

        Ok(converted)
    }
}
